//! Support for Packetised Elementary Stream syntax within Transport Stream packet payloads.
//!
//! Elementary streams are split into 'PES packets', which are then further split across the
//! payloads of transport stream packets.  [`PesAssembler`] re-joins the pieces: it buffers
//! the payload bytes of each PID it sees, and hands every completed PES packet — start code,
//! header and elementary stream data — to the callbacks registered for that PID.
//!
//! The delivered bytes can be inspected with [`PesHeader`], which exposes the stream id,
//! declared packet length and (for the 'media' stream ids) the parsed optional header
//! fields, including PTS and DTS timestamps.

use crate::fields;
use crate::packet::{Packet, Pid};
use crate::parser::PacketSink;
use log::warn;
use std::collections::HashMap;

/// Receives each completed PES packet for a PID.
///
/// The slice starts at the `packet_start_code_prefix` and is borrowed from the assembler's
/// buffer; it is only valid for the duration of the call.
pub trait PesSink {
    fn pes_packet(&mut self, data: &[u8]);
}

// capacity hint used when PES_packet_length is zero, which signals an unbounded packet
// (common for video streams)
const UNBOUNDED_PES_CAPACITY: usize = 16384;

/// Assembles complete PES packets from transport stream packet payloads and delivers them
/// to per-PID callbacks.
///
/// A PES packet is known to be complete only once the next one begins on the same PID, so
/// delivery happens on receipt of the following `payload_unit_start_indicator`.  Packets
/// whose accumulated bytes do not begin with the `0x000001` start code prefix (for example
/// because their first transport packet was lost) are silently dropped.
#[derive(Default)]
pub struct PesAssembler {
    open_packets: HashMap<Pid, Vec<u8>>,
    callbacks: HashMap<Pid, Vec<Box<dyn PesSink>>>,
}

impl PesAssembler {
    pub fn new() -> PesAssembler {
        Self::default()
    }

    /// Registers a sink for PES packets assembled on the given PID.  Multiple sinks may be
    /// registered per PID; they are invoked in registration order.
    pub fn add_pes_callback<S: PesSink + 'static>(&mut self, pid: Pid, sink: S) {
        self.callbacks.entry(pid).or_default().push(Box::new(sink));
    }

    /// Removes all registered callbacks.  In-flight reassembly state is unaffected.
    pub fn clear_callbacks(&mut self) {
        self.callbacks.clear();
    }

    /// Processes the payload of one transport stream packet.
    pub fn consume_packet(&mut self, pk: &Packet<'_>) {
        if pk.transport_error_indicator() {
            return;
        }
        let pid = pk.pid();
        let payload = match pk.payload() {
            Some(p) => p,
            None => return,
        };
        if pk.payload_unit_start_indicator() {
            if let Some(buf) = self.open_packets.get_mut(&pid) {
                if !buf.is_empty() {
                    Self::deliver(self.callbacks.get_mut(&pid), pid, buf);
                    buf.clear();
                }
            }
            let declared = usize::from(fields::u16_at(payload, 4));
            let capacity = if declared != 0 {
                declared
            } else {
                UNBOUNDED_PES_CAPACITY
            };
            self.open_packets.entry(pid).or_default().reserve(capacity);
        }
        // continuation bytes for a PID we never saw start are ignored, since no buffer
        // exists for it yet
        if let Some(buf) = self.open_packets.get_mut(&pid) {
            buf.extend_from_slice(payload);
        }
    }

    fn deliver(callbacks: Option<&mut Vec<Box<dyn PesSink>>>, pid: Pid, data: &[u8]) {
        if data.len() < 6 || fields::u24_at(data, 0) != 0x00_0001 {
            warn!(
                "[{:?}] dropping {} bytes not starting with a PES start code",
                pid,
                data.len()
            );
            return;
        }
        if let Some(sinks) = callbacks {
            for sink in sinks {
                sink.pes_packet(data);
            }
        }
    }
}

impl PacketSink for PesAssembler {
    fn consume(&mut self, data: &[u8]) {
        self.consume_packet(&Packet::new(data));
    }
}

/// Header at the start of every PES packet.
///
/// The header identifies,
///
///  * the stream identifier, returned by `stream_id()`
///  * the size of the packet, returned by `pes_packet_length()`, which may well be larger
///    than the size of the buffer obtained from a single transport stream packet (the
///    payload is likely split across multiple packets)
///
/// In addition, the header may provide access to either
///
///  * an additional set of header data followed by a payload, when `contents()` returns
///    `PesContents::Parsed`
///  * just a payload on its own, when `contents()` returns `PesContents::Payload`
pub struct PesHeader<'buf> {
    buf: &'buf [u8],
}

impl<'buf> PesHeader<'buf> {
    pub fn from_bytes(buf: &'buf [u8]) -> Option<PesHeader<'buf>> {
        if buf.len() < 6 {
            warn!("buffer size {} too small to hold PES header", buf.len());
            return None;
        }
        let packet_start_code_prefix = fields::u24_at(buf, 0);
        if packet_start_code_prefix != 1 {
            warn!(
                "invalid packet_start_code_prefix {:#x}, expected 0x000001",
                packet_start_code_prefix
            );
            return None;
        }
        Some(PesHeader { buf })
    }

    pub fn stream_id(&self) -> u8 {
        fields::u8_at(self.buf, 3)
    }

    /// The number of bytes in the PES packet following this field, or zero for an
    /// 'unbounded' packet whose size is not known in advance.
    pub fn pes_packet_length(&self) -> u16 {
        fields::u16_at(self.buf, 4)
    }

    pub fn contents(&self) -> PesContents<'buf> {
        const HEADER_LEN: usize = 6;
        let rest = &self.buf[HEADER_LEN..];
        if is_parsed(self.stream_id()) {
            PesContents::Parsed(PesParsedContents::from_bytes(rest))
        } else {
            PesContents::Payload(rest)
        }
    }
}

fn is_parsed(stream_id: u8) -> bool {
    !matches!(
        stream_id,
        0b1011_1100 // program_stream_map
        | 0b1011_1111 // private_stream_2
        | 0b1111_0000 // ECM
        | 0b1111_0001 // EMM
        | 0b1111_1111 // program_stream_directory
        | 0b1111_0010 // DSMCC_stream
        | 0b1111_1000 // ITU-T Rec. H.222.1 type E stream
    )
}

/// Either `PesContents::Payload`, when the `PesHeader` has no extra fields, or
/// `PesContents::Parsed`, when the header provides additional optional fields exposed in a
/// `PesParsedContents` object.
pub enum PesContents<'buf> {
    Parsed(Option<PesParsedContents<'buf>>),
    Payload(&'buf [u8]),
}

/// Extra data which may optionally be present in the `PesHeader`, potentially including
/// Presentation Timestamp (PTS) and Decode Timestamp (DTS) values.
pub struct PesParsedContents<'buf> {
    buf: &'buf [u8],
}

impl<'buf> PesParsedContents<'buf> {
    const FIXED_HEADER_LEN: usize = 3;
    const TIMESTAMP_LEN: usize = 5;

    pub fn from_bytes(buf: &'buf [u8]) -> Option<PesParsedContents<'buf>> {
        if buf.len() < Self::FIXED_HEADER_LEN {
            warn!(
                "buffer not large enough to hold parsed PES header: {} bytes",
                buf.len()
            );
            return None;
        }
        let check_bits = fields::u8_at(buf, 0) >> 6;
        if check_bits != 0b10 {
            warn!(
                "unexpected check-bits value {:#b}, expected 0b10",
                check_bits
            );
            return None;
        }
        Some(PesParsedContents { buf })
    }

    /// value 1 indicates higher priority and 0 indicates lower priority
    pub fn pes_priority(&self) -> u8 {
        fields::u8_at(self.buf, 0) >> 3 & 1
    }

    pub fn data_alignment_indicator(&self) -> DataAlignment {
        if fields::bit_at(self.buf, 0, 2) {
            DataAlignment::Aligned
        } else {
            DataAlignment::NotAligned
        }
    }

    pub fn copyright(&self) -> Copyright {
        if fields::bit_at(self.buf, 0, 1) {
            Copyright::Undefined
        } else {
            Copyright::Protected
        }
    }

    pub fn original_or_copy(&self) -> OriginalOrCopy {
        if fields::bit_at(self.buf, 0, 0) {
            OriginalOrCopy::Original
        } else {
            OriginalOrCopy::Copy
        }
    }

    fn pts_dts_flags(&self) -> u8 {
        fields::u8_at(self.buf, 1) >> 6
    }

    fn pes_header_data_len(&self) -> usize {
        usize::from(fields::u8_at(self.buf, 2))
    }

    pub fn pts_dts(&self) -> PtsDts {
        match self.pts_dts_flags() {
            0b00 => PtsDts::None,
            0b01 => PtsDts::Invalid,
            0b10 => {
                if self.buf.len() < Self::FIXED_HEADER_LEN + Self::TIMESTAMP_LEN {
                    warn!("PES header buffer too short to hold PTS: {}", self.buf.len());
                    return PtsDts::None;
                }
                PtsDts::PtsOnly(Timestamp::from_bytes(fields::sub_slice(
                    self.buf,
                    Self::FIXED_HEADER_LEN,
                    Self::TIMESTAMP_LEN,
                )))
            }
            0b11 => {
                if self.buf.len() < Self::FIXED_HEADER_LEN + Self::TIMESTAMP_LEN * 2 {
                    warn!(
                        "PES header buffer too short to hold PTS+DTS: {}",
                        self.buf.len()
                    );
                    return PtsDts::None;
                }
                PtsDts::Both {
                    pts: Timestamp::from_bytes(fields::sub_slice(
                        self.buf,
                        Self::FIXED_HEADER_LEN,
                        Self::TIMESTAMP_LEN,
                    )),
                    dts: Timestamp::from_bytes(fields::sub_slice(
                        self.buf,
                        Self::FIXED_HEADER_LEN + Self::TIMESTAMP_LEN,
                        Self::TIMESTAMP_LEN,
                    )),
                }
            }
            v => panic!("unexpected PTS_DTS_flags value {}", v),
        }
    }

    /// The elementary stream bytes following the optional header fields.
    pub fn payload(&self) -> &'buf [u8] {
        let start = Self::FIXED_HEADER_LEN + self.pes_header_data_len();
        if start > self.buf.len() {
            &[]
        } else {
            &self.buf[start..]
        }
    }
}

/// Detail about the formatting problem which prevented a [`Timestamp`] value being parsed.
#[derive(PartialEq, Eq, Debug)]
pub enum TimestampError {
    IncorrectPrefixBits { expected: u8, actual: u8 },
    MarkerBitNotSet { bit_number: u8 },
}

/// A 33-bit timestamp at 90 kHz resolution, used to represent the PTS and DTS values which
/// may appear in a PES header.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Timestamp {
    val: u64,
}

impl Timestamp {
    /// Parses a PTS field, checking the `0b0010` / `0b0011` prefix and the three marker
    /// bits.
    pub fn from_pts_bytes(buf: &[u8]) -> Result<Timestamp, TimestampError> {
        let actual = fields::u8_at(buf, 0) >> 4;
        if actual & 0b1110 != 0b0010 {
            return Err(TimestampError::IncorrectPrefixBits {
                expected: 0b0010,
                actual,
            });
        }
        Timestamp::from_bytes(buf)
    }

    /// Parses a DTS field, checking the `0b0001` prefix and the three marker bits.
    pub fn from_dts_bytes(buf: &[u8]) -> Result<Timestamp, TimestampError> {
        Timestamp::check_prefix(buf, 0b0001)?;
        Timestamp::from_bytes(buf)
    }

    fn check_prefix(buf: &[u8], expected: u8) -> Result<(), TimestampError> {
        assert!(expected <= 0b1111);
        let actual = fields::u8_at(buf, 0) >> 4;
        if actual == expected {
            Ok(())
        } else {
            Err(TimestampError::IncorrectPrefixBits { expected, actual })
        }
    }

    fn check_marker_bit(buf: &[u8], bit_number: u8) -> Result<(), TimestampError> {
        let byte_index = usize::from(bit_number / 8);
        let bit_index = bit_number % 8;
        let bit_mask = 1 << (7 - bit_index);
        if fields::u8_at(buf, byte_index) & bit_mask != 0 {
            Ok(())
        } else {
            Err(TimestampError::MarkerBitNotSet { bit_number })
        }
    }

    fn check_marker_bits(buf: &[u8]) -> Result<(), TimestampError> {
        Timestamp::check_marker_bit(buf, 7)?;
        Timestamp::check_marker_bit(buf, 23)?;
        Timestamp::check_marker_bit(buf, 39)
    }

    fn from_bytes_unchecked(buf: &[u8]) -> Result<Timestamp, TimestampError> {
        Ok(Timestamp {
            val: (u64::from(fields::u8_at(buf, 0) & 0b0000_1110) << 29)
                | u64::from(fields::u8_at(buf, 1)) << 22
                | (u64::from(fields::u8_at(buf, 2) & 0b1111_1110) << 14)
                | u64::from(fields::u8_at(buf, 3)) << 7
                | u64::from(fields::u8_at(buf, 4)) >> 1,
        })
    }

    /// Parses a timestamp field, checking only the three marker bits (the four prefix bits
    /// vary depending on whether the field holds a PTS or a DTS, and on the PTS_DTS_flags
    /// in force).
    pub fn from_bytes(buf: &[u8]) -> Result<Timestamp, TimestampError> {
        Timestamp::check_marker_bits(buf)?;
        Timestamp::from_bytes_unchecked(buf)
    }

    /// The timestamp value, a count of 90 kHz ticks in the range `0..2^33`.
    pub fn value(self) -> u64 {
        self.val
    }
}

#[derive(PartialEq, Eq, Debug)]
pub enum PtsDts {
    None,
    PtsOnly(Result<Timestamp, TimestampError>),
    Invalid,
    Both {
        pts: Result<Timestamp, TimestampError>,
        dts: Result<Timestamp, TimestampError>,
    },
}

/// Indicates if the start of some 'unit' of elementary stream content is immediately at the
/// start of the PES packet payload.
#[derive(PartialEq, Eq, Debug)]
pub enum DataAlignment {
    Aligned,
    NotAligned,
}
/// Indicates the copyright status of the contents of the elementary stream packet.
#[derive(PartialEq, Eq, Debug)]
pub enum Copyright {
    Protected,
    Undefined,
}
/// Indicates whether the contents of the elementary stream packet are original or a copy.
#[derive(PartialEq, Eq, Debug)]
pub enum OriginalOrCopy {
    Original,
    Copy,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::packet::SYNC_BYTE;
    use bitstream_io::{BigEndian, BitWrite, BitWriter};
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    fn make_test_data<F>(builder: F) -> Vec<u8>
    where
        F: Fn(&mut BitWriter<&mut Vec<u8>, BigEndian>) -> Result<(), io::Error>,
    {
        let mut data: Vec<u8> = Vec::new();
        let mut w = BitWriter::endian(&mut data, BigEndian);
        builder(&mut w).unwrap();
        data
    }

    /// `ts` is a 33-bit timestamp value
    fn write_ts(
        w: &mut BitWriter<&mut Vec<u8>, BigEndian>,
        ts: u64,
        prefix: u8,
    ) -> Result<(), io::Error> {
        assert!(ts < 1u64 << 33);
        w.write(4, prefix & 0b1111)?;
        w.write(3, (ts >> 30) as u32)?;
        w.write_bit(true)?; // marker_bit
        w.write(15, ((ts >> 15) & 0x7fff) as u32)?;
        w.write_bit(true)?; // marker_bit
        w.write(15, (ts & 0x7fff) as u32)?;
        w.write_bit(true) // marker_bit
    }

    #[test]
    fn parse_header() {
        let data = make_test_data(|w| {
            w.write(24, 1)?; // packet_start_code_prefix
            w.write(8, 0xc0)?; // stream_id (audio stream 0)
            w.write(16, 7)?; // PES_packet_length

            w.write(2, 0b10)?; // check-bits
            w.write(2, 0)?; // PES_scrambling_control
            w.write(1, 0)?; // PES_priority
            w.write(1, 1)?; // data_alignment_indicator
            w.write(1, 0)?; // copyright
            w.write(1, 0)?; // original_or_copy
            w.write(2, 0b10)?; // PTS_DTS_flags
            w.write(1, 0)?; // ESCR_flag
            w.write(1, 0)?; // ES_rate_flag
            w.write(1, 0)?; // DSM_trick_mode_flag
            w.write(1, 0)?; // additional_copy_info_flag
            w.write(1, 0)?; // PES_CRC_flag
            w.write(1, 0)?; // PES_extension_flag
            w.write(8, 5)?; // PES_header_data_length
            write_ts(w, 123456789, 0b0010) // PTS
        });
        let header = PesHeader::from_bytes(&data[..]).unwrap();
        assert_eq!(0xc0, header.stream_id());
        assert_eq!(7, header.pes_packet_length());

        match header.contents() {
            PesContents::Parsed(Some(p)) => {
                assert_eq!(0, p.pes_priority());
                assert_eq!(DataAlignment::Aligned, p.data_alignment_indicator());
                assert_eq!(Copyright::Protected, p.copyright());
                assert_eq!(OriginalOrCopy::Copy, p.original_or_copy());
                match p.pts_dts() {
                    PtsDts::PtsOnly(Ok(ts)) => assert_eq!(ts.value(), 123456789),
                    v => panic!("expected PtsDts::PtsOnly, got {:?}", v),
                }
                assert_eq!(p.payload().len(), 0);
            }
            _ => panic!("expected PesContents::Parsed"),
        }
    }

    #[test]
    fn pts_roundtrip() {
        for &ts in &[
            0u64,
            1,
            90000,
            0b1_0101_0101_0101_0101_0101_0101_0101_0101,
            (1 << 33) - 1,
        ] {
            let data = make_test_data(|w| write_ts(w, ts, 0b0010));
            assert_eq!(Timestamp::from_pts_bytes(&data[..]).unwrap().value(), ts);
        }
    }

    #[test]
    fn dts_prefix() {
        let data = make_test_data(|w| write_ts(w, 1234, 0b0001));
        assert_eq!(Timestamp::from_dts_bytes(&data[..]).unwrap().value(), 1234);
        assert_eq!(
            Timestamp::from_dts_bytes(&make_test_data(|w| write_ts(w, 1234, 0b0010))[..]),
            Err(TimestampError::IncorrectPrefixBits {
                expected: 0b0001,
                actual: 0b0010
            })
        );
    }

    #[test]
    fn bad_marker_bit() {
        let mut data = make_test_data(|w| write_ts(w, 1234, 0b0010));
        data[0] &= 0b1111_1110; // clear the first marker bit
        assert_eq!(
            Timestamp::from_pts_bytes(&data[..]),
            Err(TimestampError::MarkerBitNotSet { bit_number: 7 })
        );
    }

    // ---- assembler tests ----

    struct Collector {
        packets: Rc<RefCell<Vec<Vec<u8>>>>,
    }
    impl PesSink for Collector {
        fn pes_packet(&mut self, data: &[u8]) {
            self.packets.borrow_mut().push(data.to_vec());
        }
    }

    fn collecting_assembler(pid: Pid) -> (PesAssembler, Rc<RefCell<Vec<Vec<u8>>>>) {
        let packets = Rc::new(RefCell::new(vec![]));
        let mut asm = PesAssembler::new();
        asm.add_pes_callback(
            pid,
            Collector {
                packets: packets.clone(),
            },
        );
        (asm, packets)
    }

    fn ts_packet(pid: u16, pusi: bool, counter: u8, payload: &[u8]) -> [u8; 188] {
        assert!(payload.len() <= 184);
        let mut buf = [0xffu8; 188];
        buf[0] = SYNC_BYTE;
        buf[1] = (pid >> 8) as u8 | if pusi { 0x40 } else { 0 };
        buf[2] = (pid & 0xff) as u8;
        if payload.len() == 184 {
            buf[3] = 0b0001_0000 | (counter & 0xf);
            buf[4..].copy_from_slice(payload);
        } else {
            // shrink the payload with an all-stuffing adaptation field
            let af_len = 184 - payload.len() - 1;
            buf[3] = 0b0011_0000 | (counter & 0xf);
            buf[4] = af_len as u8;
            if af_len > 0 {
                buf[5] = 0; // adaptation field flags
            }
            buf[188 - payload.len()..].copy_from_slice(payload);
        }
        buf
    }

    // a PES packet of `es_len` bytes of ramp data, PES_packet_length filled in
    fn pes_packet(es_len: usize) -> Vec<u8> {
        let mut data = vec![0x00, 0x00, 0x01, 0xc0];
        let len = es_len + 3; // flags+flags+header_data_length
        data.push((len >> 8) as u8);
        data.push((len & 0xff) as u8);
        data.push(0x80); // check bits
        data.push(0x00); // no PTS/DTS
        data.push(0x00); // PES_header_data_length
        data.extend((0..es_len).map(|i| i as u8));
        data
    }

    #[test]
    fn reassembly_across_packets() {
        let pid = Pid::new(401);
        let (mut asm, packets) = collecting_assembler(pid);
        // 262 bytes of PES packet: a full first TS packet and a 78-byte remainder
        let pes = pes_packet(262 - 9);
        assert_eq!(pes.len(), 262);
        asm.consume(&ts_packet(401, true, 0, &pes[..184]));
        asm.consume(&ts_packet(401, false, 1, &pes[184..]));
        assert!(packets.borrow().is_empty());
        // the next payload_unit_start flushes the completed packet
        asm.consume(&ts_packet(401, true, 2, &pes_packet(10)));
        let got = packets.borrow();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0], pes);
    }

    #[test]
    fn delivered_bytes_equal_pes_stream() {
        let pid = Pid::new(401);
        let (mut asm, packets) = collecting_assembler(pid);
        let mut counter = 0u8;
        let mut expected = vec![];
        for es_len in [100usize, 300, 175] {
            let pes = pes_packet(es_len);
            expected.push(pes.clone());
            for chunk in pes.chunks(184) {
                asm.consume(&ts_packet(401, chunk.as_ptr() == pes.as_ptr(), counter, chunk));
                counter = (counter + 1) & 0xf;
            }
        }
        // flush the last packet
        asm.consume(&ts_packet(401, true, counter, &pes_packet(1)));
        let got = packets.borrow();
        assert_eq!(*got, expected);
    }

    #[test]
    fn missing_start_is_dropped() {
        let pid = Pid::new(401);
        let (mut asm, packets) = collecting_assembler(pid);
        // continuation without a preceding PUSI: ignored entirely
        asm.consume(&ts_packet(401, false, 0, &[0xab; 184]));
        asm.consume(&ts_packet(401, true, 1, &pes_packet(10)));
        assert!(packets.borrow().is_empty());
    }

    #[test]
    fn invalid_start_code_is_dropped() {
        let pid = Pid::new(401);
        let (mut asm, packets) = collecting_assembler(pid);
        let mut bad = pes_packet(20);
        bad[2] = 0x02; // break the start code prefix
        asm.consume(&ts_packet(401, true, 0, &bad));
        asm.consume(&ts_packet(401, true, 1, &pes_packet(10)));
        assert!(packets.borrow().is_empty());
    }

    #[test]
    fn multiple_callbacks_in_registration_order() {
        let pid = Pid::new(401);
        let order = Rc::new(RefCell::new(vec![]));
        struct Tagged {
            tag: u8,
            order: Rc<RefCell<Vec<u8>>>,
        }
        impl PesSink for Tagged {
            fn pes_packet(&mut self, _data: &[u8]) {
                self.order.borrow_mut().push(self.tag);
            }
        }
        let mut asm = PesAssembler::new();
        asm.add_pes_callback(
            pid,
            Tagged {
                tag: 0,
                order: order.clone(),
            },
        );
        asm.add_pes_callback(
            pid,
            Tagged {
                tag: 1,
                order: order.clone(),
            },
        );
        asm.consume(&ts_packet(401, true, 0, &pes_packet(10)));
        asm.consume(&ts_packet(401, true, 1, &pes_packet(10)));
        assert_eq!(*order.borrow(), vec![0, 1]);
    }

    #[test]
    fn transport_error_packets_rejected() {
        let pid = Pid::new(401);
        let (mut asm, packets) = collecting_assembler(pid);
        asm.consume(&ts_packet(401, true, 0, &pes_packet(10)));
        let mut bad = ts_packet(401, false, 1, &[0u8; 184]);
        bad[1] |= 0x80; // transport_error_indicator
        asm.consume(&bad);
        asm.consume(&ts_packet(401, true, 2, &pes_packet(10)));
        // the errored packet's bytes must not have been appended
        let got = packets.borrow();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0], pes_packet(10));
    }
}

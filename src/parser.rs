//! Resynchronisation on 188-byte packet boundaries within arbitrary byte buffers, and
//! dispatch of each located packet to per-PID sinks.
//!
//! [`TsParser`] is the entry point of the parsing pipeline: feed it a succession of
//! byte-slices containing transport stream data via [`TsParser::ingest`], and register
//! downstream consumers (such as [`SectionAssembler`](crate::psi::SectionAssembler) or
//! [`PesAssembler`](crate::pes::PesAssembler)) with [`TsParser::add_binding`].
//!
//! The parser maintains a small carry-over buffer so that a packet split across two
//! successive `ingest()` calls is still delivered; byte-for-byte the same packets are
//! produced no matter how the input is chunked.

use crate::packet::{Packet, Pid, SYNC_BYTE};
use fixedbitset::FixedBitSet;

/// Trait for sinks which consume byte slices handed along the parsing pipeline.
///
/// A sink registered with [`TsParser::add_binding`] receives each matching packet as a
/// 188-byte slice.  The slice is borrowed from the ingest buffer (or the parser's internal
/// carry-over buffer) and is only valid for the duration of the call: implementations
/// wishing to retain bytes must copy them.
pub trait PacketSink {
    /// Consume one 188-byte transport stream packet.
    fn consume(&mut self, data: &[u8]);
}

/// The smallest buffer accepted by [`TsParser::ingest`]: four packets' worth of bytes,
/// so that the stale-carry probe always has four windows to look at.
pub const MIN_INGEST_LEN: usize = 4 * Packet::SIZE;

type Binding = (FixedBitSet, Box<dyn PacketSink>);

/// Transport stream packet locator and dispatcher.
///
/// Bindings are an ordered list: every binding whose PID set contains a packet's PID
/// receives that packet, in the order the bindings were registered.  Packets flagged with
/// `transport_error_indicator` are still dispatched; the downstream assemblers discard
/// them.
#[derive(Default)]
pub struct TsParser {
    carry: Vec<u8>,
    bindings: Vec<Binding>,
}

impl TsParser {
    pub fn new() -> TsParser {
        Self::default()
    }

    /// Registers `sink` to receive every packet whose PID is in `pids`.
    pub fn add_binding<S: PacketSink + 'static>(&mut self, pids: &[Pid], sink: S) {
        let mut set = FixedBitSet::with_capacity(Pid::PID_COUNT);
        for pid in pids {
            set.insert(usize::from(*pid));
        }
        self.bindings.push((set, Box::new(sink)));
    }

    /// Removes all bindings.  The parser can still pick up the transport stream where it
    /// left off: the carry-over state survives.
    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    /// Locates 188-byte packets within `buf` and dispatches each to the matching bindings.
    ///
    /// Panics if `buf` is shorter than [`MIN_INGEST_LEN`]; callers are required to deliver
    /// at least four packets' worth of bytes per call.
    pub fn ingest(&mut self, buf: &[u8]) {
        assert!(
            buf.len() >= MIN_INGEST_LEN,
            "ingest() requires at least {} bytes, got {}",
            MIN_INGEST_LEN,
            buf.len()
        );
        let mut i = 0;
        if !self.carry.is_empty() {
            let need = Packet::SIZE - self.carry.len();
            if buf[0] == SYNC_BYTE
                && buf[188] == SYNC_BYTE
                && buf[376] == SYNC_BYTE
                && buf[564] == SYNC_BYTE
            {
                // the new buffer starts cleanly on a packet boundary, so whatever partial
                // packet we were holding belongs to an abandoned stream position
            } else if buf.len() == need || buf[need] == SYNC_BYTE {
                self.carry.extend_from_slice(&buf[..need]);
                Self::dispatch(&mut self.bindings, &self.carry);
                i = need;
            }
            self.carry.clear();
        }
        while i + Packet::SIZE < buf.len() {
            if buf[i] == SYNC_BYTE && buf[i + Packet::SIZE] == SYNC_BYTE {
                Self::dispatch(&mut self.bindings, &buf[i..i + Packet::SIZE]);
                i += Packet::SIZE;
            } else {
                i += 1;
            }
        }
        if i + Packet::SIZE > buf.len() {
            if i < buf.len() && buf[i] == SYNC_BYTE {
                self.carry.extend_from_slice(&buf[i..]);
            }
        } else if buf[i] == SYNC_BYTE && buf[i - Packet::SIZE] == SYNC_BYTE {
            // the buffer ends exactly on a packet boundary; sync against the packet before
            Self::dispatch(&mut self.bindings, &buf[i..]);
        }
    }

    fn dispatch(bindings: &mut [Binding], pk: &[u8]) {
        let pid = Packet::new(pk).pid();
        for (pids, sink) in bindings.iter_mut() {
            if pids.contains(usize::from(pid)) {
                sink.consume(pk);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        packets: Rc<RefCell<Vec<Vec<u8>>>>,
    }
    impl PacketSink for Recorder {
        fn consume(&mut self, data: &[u8]) {
            self.packets.borrow_mut().push(data.to_vec());
        }
    }

    fn mk_packet(pid: u16, counter: u8, fill: u8) -> [u8; Packet::SIZE] {
        let mut buf = [fill; Packet::SIZE];
        buf[0] = SYNC_BYTE;
        buf[1] = (pid >> 8) as u8;
        buf[2] = (pid & 0xff) as u8;
        buf[3] = 0b0001_0000 | (counter & 0xf);
        buf
    }

    fn recording_parser(pids: &[Pid]) -> (TsParser, Rc<RefCell<Vec<Vec<u8>>>>) {
        let packets = Rc::new(RefCell::new(vec![]));
        let mut parser = TsParser::new();
        parser.add_binding(
            pids,
            Recorder {
                packets: packets.clone(),
            },
        );
        (parser, packets)
    }

    #[test]
    #[should_panic]
    fn rejects_short_buffer() {
        let buf = [0u8; MIN_INGEST_LEN - 1];
        TsParser::new().ingest(&buf);
    }

    #[test]
    fn contiguous_packets() {
        let (mut parser, packets) = recording_parser(&[Pid::new(7), Pid::new(9)]);
        let mut buf = vec![];
        for (i, pid) in [7u16, 9, 11, 7].iter().enumerate() {
            buf.extend_from_slice(&mk_packet(*pid, i as u8, 0xaa));
        }
        parser.ingest(&buf);
        // PID 11 is filtered out; the final packet is synced against its predecessor
        let got = packets.borrow();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0][2], 7);
        assert_eq!(got[1][2], 9);
        assert_eq!(got[2][2], 7);
    }

    #[test]
    fn resync_after_noise_prefix() {
        let (mut parser, packets) = recording_parser(&[Pid::new(100)]);
        let mut buf = vec![0x42u8; 300];
        buf.push(SYNC_BYTE); // decoy sync byte with no packet following at +188
        buf.extend_from_slice(&[0x42u8; 99]);
        for i in 0..4 {
            buf.extend_from_slice(&mk_packet(100, i, 0x55));
        }
        parser.ingest(&buf);
        assert_eq!(packets.borrow().len(), 4);
    }

    #[test]
    fn packet_split_across_ingest_calls() {
        let (mut parser, packets) = recording_parser(&[Pid::new(100)]);
        let mut buf = vec![];
        for i in 0..12 {
            buf.extend_from_slice(&mk_packet(100, i, 0x55));
        }
        // split mid-packet: every packet must still be delivered exactly once
        let split = 5 * Packet::SIZE + 17;
        parser.ingest(&buf[..split]);
        parser.ingest(&buf[split..]);
        let got = packets.borrow();
        assert_eq!(got.len(), 12);
        for (i, pk) in got.iter().enumerate() {
            assert_eq!(pk[3] & 0xf, i as u8);
        }
    }

    #[test]
    fn split_continuation_without_sync_discards_carry() {
        let (mut parser, packets) = recording_parser(&[Pid::new(100)]);
        let mut first = vec![];
        for i in 0..4 {
            first.extend_from_slice(&mk_packet(100, i, 0x55));
        }
        first.extend_from_slice(&mk_packet(100, 4, 0x55)[..10]);
        parser.ingest(&first);
        assert_eq!(packets.borrow().len(), 4);
        // the second buffer does not continue the carried packet: garbage where the
        // rest of the packet should be, and no sync at the completion offset
        let mut second = vec![0x42u8; MIN_INGEST_LEN];
        second[180] = SYNC_BYTE; // not at the expected completion offset
        parser.ingest(&second);
        assert_eq!(packets.borrow().len(), 4);
    }

    #[test]
    fn stale_carry_dropped_when_input_restarts_on_boundary() {
        let (mut parser, packets) = recording_parser(&[Pid::new(100)]);
        let mut first = vec![];
        for i in 0..4 {
            first.extend_from_slice(&mk_packet(100, i, 0x55));
        }
        // a trailing partial packet enters the carry buffer
        first.extend_from_slice(&mk_packet(100, 4, 0x55)[..100]);
        parser.ingest(&first);
        assert_eq!(packets.borrow().len(), 4);
        // the next buffer starts with four aligned sync bytes: the carry is stale
        let mut second = vec![];
        for i in 0..4 {
            second.extend_from_slice(&mk_packet(100, 8 + i, 0x66));
        }
        parser.ingest(&second);
        let got = packets.borrow();
        assert_eq!(got.len(), 8);
        // none of the delivered packets is a hybrid of old carry and new data
        assert_eq!(got[4][3] & 0xf, 8);
    }

    #[test]
    fn carry_completed_when_following_sync_confirms() {
        let (mut parser, packets) = recording_parser(&[Pid::new(100)]);
        let mut buf = vec![];
        for i in 0..5 {
            buf.extend_from_slice(&mk_packet(100, i, 0x55));
        }
        let split = 4 * Packet::SIZE + 100;
        parser.ingest(&buf[..split]);
        assert_eq!(packets.borrow().len(), 4);
        // remainder of packet 4, then more packets so the buffer is large enough
        let mut second = buf[split..].to_vec();
        for i in 5..9 {
            second.extend_from_slice(&mk_packet(100, i, 0x55));
        }
        parser.ingest(&second);
        assert_eq!(packets.borrow().len(), 9);
    }

    #[test]
    fn bindings_receive_in_registration_order() {
        let packets_a = Rc::new(RefCell::new(vec![]));
        let packets_b = Rc::new(RefCell::new(vec![]));
        let order = Rc::new(RefCell::new(vec![]));

        struct Tagged {
            tag: u8,
            order: Rc<RefCell<Vec<u8>>>,
            packets: Rc<RefCell<Vec<Vec<u8>>>>,
        }
        impl PacketSink for Tagged {
            fn consume(&mut self, data: &[u8]) {
                self.order.borrow_mut().push(self.tag);
                self.packets.borrow_mut().push(data.to_vec());
            }
        }

        let mut parser = TsParser::new();
        parser.add_binding(
            &[Pid::new(100)],
            Tagged {
                tag: 0,
                order: order.clone(),
                packets: packets_a.clone(),
            },
        );
        parser.add_binding(
            &[Pid::new(100), Pid::new(101)],
            Tagged {
                tag: 1,
                order: order.clone(),
                packets: packets_b.clone(),
            },
        );

        let mut buf = vec![];
        buf.extend_from_slice(&mk_packet(100, 0, 0));
        buf.extend_from_slice(&mk_packet(101, 0, 0));
        buf.extend_from_slice(&mk_packet(100, 1, 0));
        buf.extend_from_slice(&mk_packet(100, 2, 0));
        parser.ingest(&buf);

        assert_eq!(packets_a.borrow().len(), 3);
        assert_eq!(packets_b.borrow().len(), 4);
        assert_eq!(*order.borrow(), vec![0, 1, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn clear_bindings() {
        let (mut parser, packets) = recording_parser(&[Pid::new(100)]);
        parser.clear_bindings();
        let mut buf = vec![];
        for i in 0..4 {
            buf.extend_from_slice(&mk_packet(100, i, 0x55));
        }
        parser.ingest(&buf);
        assert!(packets.borrow().is_empty());
    }
}

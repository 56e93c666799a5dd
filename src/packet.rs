//! A [`Packet`] struct and associated infrastructure to read an MPEG Transport Stream packet.

use crate::fields;
use log::warn;
use std::fmt;

/// The value `0x47`, which must appear in the first byte of every transport stream packet.
pub const SYNC_BYTE: u8 = 0x47;

/// A 13-bit Packet Identifier, identifying the sub-stream to which a packet belongs.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Pid(u16);
impl Pid {
    /// The total number of distinct PID values, `8192`.
    pub const PID_COUNT: usize = 0x2000;
    /// The largest valid PID value, `0x1fff`.
    pub const MAX: u16 = 0x1fff;

    /// PID of the Program Association Table.
    pub const PAT: Pid = Pid(0x00);
    /// PID of the Conditional Access Table.
    pub const CAT: Pid = Pid(0x01);
    /// PID carrying DVB Network Information Table sections.
    pub const NIT: Pid = Pid(0x10);
    /// PID carrying DVB Service Description Table (and Bouquet Association Table) sections.
    pub const SDT: Pid = Pid(0x11);
    /// PID carrying DVB Event Information Table sections.
    pub const EIT: Pid = Pid(0x12);
    /// PID carrying DVB Running Status Table sections.
    pub const RST: Pid = Pid(0x13);
    /// PID carrying DVB Time and Date Table / Time Offset Table sections.
    pub const TDT: Pid = Pid(0x14);
    /// PID of null packets, inserted to maintain a constant multiplex bitrate.
    pub const NULL: Pid = Pid(0x1fff);

    /// Panics if the given value is greater than `Pid::MAX` (this is taken to
    /// be a programming error, rather than a data error).
    pub fn new(pid: u16) -> Pid {
        assert!(pid <= Self::MAX, "invalid PID value {:#x}", pid);
        Pid(pid)
    }
}
impl From<Pid> for u16 {
    fn from(pid: Pid) -> u16 {
        pid.0
    }
}
impl From<Pid> for usize {
    fn from(pid: Pid) -> usize {
        usize::from(pid.0)
    }
}
impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pid({})", self.0)
    }
}

/// The different values indicating whether a `Packet`'s `adaptation_field()` and `payload()`
/// methods will return `Some` or `None`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AdaptationControl {
    /// This value is used if the transport stream packet `adaptation_control` field uses the value
    /// `0b00`, which is not defined by _ISO/IEC 13818-1_.
    Reserved,
    /// Indicates that this packet contains a payload, but not an adaptation field.
    PayloadOnly,
    /// Indicates that this packet contains an adaptation field, but not a payload.
    AdaptationFieldOnly,
    /// Indicates that this packet contains both an adaptation field and a payload.
    AdaptationFieldAndPayload,
}

impl AdaptationControl {
    #[inline]
    fn from(val: u8) -> AdaptationControl {
        match val {
            0 => AdaptationControl::Reserved,
            1 => AdaptationControl::PayloadOnly,
            2 => AdaptationControl::AdaptationFieldOnly,
            3 => AdaptationControl::AdaptationFieldAndPayload,
            _ => panic!("invalid value {}", val),
        }
    }

    /// True if this value indicates that the packet carries any payload bytes at all.
    #[inline]
    pub fn has_payload(self) -> bool {
        match self {
            AdaptationControl::Reserved | AdaptationControl::AdaptationFieldOnly => false,
            AdaptationControl::PayloadOnly | AdaptationControl::AdaptationFieldAndPayload => true,
        }
    }
}

/// Value of the `transport_scrambling_control` field.
#[derive(Eq, PartialEq, Debug)]
pub enum TransportScramblingControl {
    /// The packet payload is not scrambled.
    NotScrambled,
    /// The meaning of values 1-3 is defined by the conditional access system in use.
    Undefined(u8),
}

impl TransportScramblingControl {
    fn from(val: u8) -> TransportScramblingControl {
        match val {
            0 => TransportScramblingControl::NotScrambled,
            1..=3 => TransportScramblingControl::Undefined(val),
            _ => panic!("invalid value {}", val),
        }
    }
}

/// A counter value used within a transport stream to detect discontinuities in a sequence of
/// packets.
///
/// See [`Packet::continuity_counter()`].
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct ContinuityCounter {
    val: u8,
}

impl From<u8> for ContinuityCounter {
    fn from(count: u8) -> ContinuityCounter {
        ContinuityCounter::new(count)
    }
}

impl ContinuityCounter {
    /// Panics if the given value is greater than 15.
    pub fn new(count: u8) -> ContinuityCounter {
        assert!(count < 0b1_0000);
        ContinuityCounter { val: count }
    }

    /// Returns this counter's value, which will be between 0 and 15 inclusive.
    pub fn count(self) -> u8 {
        self.val
    }

    /// True iff the given `ContinuityCounter` value follows this one.  Note that the maximum
    /// counter value is 15, and the counter 'wraps around' back to 0.
    pub fn follows(self, other: ContinuityCounter) -> bool {
        (other.val + 1) & 0b1111 == self.val
    }
}

/// A collection of fields that may optionally appear within the header of a transport stream
/// `Packet`.
pub struct AdaptationField<'buf> {
    buf: &'buf [u8],
}

impl<'buf> AdaptationField<'buf> {
    fn new(buf: &'buf [u8]) -> AdaptationField<'buf> {
        AdaptationField { buf }
    }

    /// True if the stream timeline is discontinuous at this packet.
    pub fn discontinuity_indicator(&self) -> bool {
        fields::bit_at(self.buf, 0, 7)
    }

    /// True if the stream can be entered at this packet (e.g. the start of a video keyframe).
    pub fn random_access_indicator(&self) -> bool {
        fields::bit_at(self.buf, 0, 6)
    }

    /// Program Clock Reference as a `(base, extension)` pair, if this adaptation field carries
    /// one.  `base` counts 90 kHz ticks, `extension` counts 27 MHz ticks within the base tick.
    pub fn pcr(&self) -> Option<(u64, u16)> {
        if !fields::bit_at(self.buf, 0, 4) || self.buf.len() < 7 {
            return None;
        }
        let base = fields::mask_shift(fields::u64_at(self.buf, 1), 0xffff_ffff_8000_0000, 31);
        let extension = fields::u16_at(self.buf, 5) & 0x1ff;
        Some((base, extension))
    }
}

/// A transport stream `Packet` is a wrapper around a byte slice which allows the bytes to be
/// interpreted as a packet structure per _ISO/IEC 13818-1, Section 2.4.3.3_.
pub struct Packet<'buf> {
    buf: &'buf [u8],
}

const FIXED_HEADER_SIZE: usize = 4;
// when an adaptation field is present, a 1-byte 'length' field precedes its content,
const ADAPTATION_FIELD_OFFSET: usize = FIXED_HEADER_SIZE + 1;

impl<'buf> Packet<'buf> {
    /// The fixed 188 byte size of a transport stream packet.
    pub const SIZE: usize = 188;

    /// Returns `true` if the given value is a valid synchronisation byte, the value
    /// [`SYNC_BYTE`], which must appear at the start of every transport stream packet.
    #[inline]
    pub fn is_sync_byte(b: u8) -> bool {
        b == SYNC_BYTE
    }

    /// Panics if the given buffer is not exactly 188 bytes, or if the initial sync-byte does
    /// not have the correct value (`0x47`).  Calling code is expected to have already checked
    /// those conditions.
    #[inline]
    pub fn new(buf: &'buf [u8]) -> Packet<'buf> {
        assert_eq!(buf.len(), Self::SIZE);
        assert!(Packet::is_sync_byte(buf[0]));
        Packet { buf }
    }

    /// True if the transmission of this packet is known to have suffered at least one
    /// uncorrectable bit error.
    pub fn transport_error_indicator(&self) -> bool {
        fields::bit_at(self.buf, 1, 7)
    }

    /// A structure larger than a single packet payload needs to be split across multiple
    /// packets; `payload_unit_start_indicator()` indicates if this packet's payload contains
    /// the start of such a structure.  If `false`, this packet's payload is a continuation of
    /// a structure which began in an earlier packet within the transport stream.
    pub fn payload_unit_start_indicator(&self) -> bool {
        fields::bit_at(self.buf, 1, 6)
    }

    pub fn transport_priority(&self) -> bool {
        fields::bit_at(self.buf, 1, 5)
    }

    /// The sub-stream to which this packet belongs.
    pub fn pid(&self) -> Pid {
        Pid::new(fields::u16_at(self.buf, 1) & 0x1fff)
    }

    pub fn transport_scrambling_control(&self) -> TransportScramblingControl {
        TransportScramblingControl::from(fields::u8_at(self.buf, 3) >> 6 & 0b11)
    }

    /// The returned enum value indicates if `adaptation_field()`, `payload()` or both will
    /// return something.
    pub fn adaptation_control(&self) -> AdaptationControl {
        AdaptationControl::from(fields::u8_at(self.buf, 3) >> 4 & 0b11)
    }

    /// Each packet with a given `pid()` value within a transport stream should have a
    /// continuity counter value which increases by 1 from the last counter value seen.
    /// Unexpected continuity counter values allow the receiver of the transport stream to
    /// detect discontinuities in the stream (e.g. due to data loss during transmission).
    pub fn continuity_counter(&self) -> ContinuityCounter {
        ContinuityCounter::new(fields::u8_at(self.buf, 3) & 0b1111)
    }

    fn adaptation_field_length(&self) -> usize {
        usize::from(fields::u8_at(self.buf, 4))
    }

    /// An `AdaptationField` contains additional packet headers that may be present in the
    /// packet.
    pub fn adaptation_field(&self) -> Option<AdaptationField<'buf>> {
        match self.adaptation_control() {
            AdaptationControl::Reserved | AdaptationControl::PayloadOnly => None,
            AdaptationControl::AdaptationFieldOnly => {
                let len = self.adaptation_field_length();
                if len != Self::SIZE - ADAPTATION_FIELD_OFFSET {
                    warn!(
                        "invalid adaptation_field_length for AdaptationFieldOnly: {}",
                        len
                    );
                    return None;
                }
                Some(self.mk_af(len))
            }
            AdaptationControl::AdaptationFieldAndPayload => {
                let len = self.adaptation_field_length();
                if len > 182 {
                    warn!(
                        "invalid adaptation_field_length for AdaptationFieldAndPayload: {}",
                        len
                    );
                    return None;
                }
                Some(self.mk_af(len))
            }
        }
    }

    fn mk_af(&self, len: usize) -> AdaptationField<'buf> {
        AdaptationField::new(&self.buf[ADAPTATION_FIELD_OFFSET..ADAPTATION_FIELD_OFFSET + len])
    }

    /// The packet payload: the opaque bytes to be interpreted based on the stream's Program
    /// Specific Information tables.  If `Some` payload is returned, it is guaranteed not to be
    /// an empty slice.
    pub fn payload(&self) -> Option<&'buf [u8]> {
        match self.adaptation_control() {
            AdaptationControl::Reserved | AdaptationControl::AdaptationFieldOnly => None,
            AdaptationControl::PayloadOnly | AdaptationControl::AdaptationFieldAndPayload => {
                self.mk_payload()
            }
        }
    }

    fn mk_payload(&self) -> Option<&'buf [u8]> {
        let offset = self.content_offset();
        if offset >= self.buf.len() {
            warn!(
                "adaptation_field_length {} leaves no payload data",
                self.adaptation_field_length()
            );
            None
        } else {
            Some(&self.buf[offset..])
        }
    }

    fn content_offset(&self) -> usize {
        match self.adaptation_control() {
            AdaptationControl::Reserved | AdaptationControl::PayloadOnly => FIXED_HEADER_SIZE,
            AdaptationControl::AdaptationFieldOnly
            | AdaptationControl::AdaptationFieldAndPayload => {
                ADAPTATION_FIELD_OFFSET + self.adaptation_field_length()
            }
        }
    }

    /// The entire 188-byte packet buffer.
    pub fn buffer(&self) -> &'buf [u8] {
        self.buf
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[should_panic]
    fn zero_len() {
        let buf = [0u8; 0];
        Packet::new(&buf[..]);
    }

    #[test]
    #[should_panic]
    fn pid_out_of_range() {
        Pid::new(0x2000);
    }

    #[test]
    fn xmas_tree() {
        let mut buf = [0xffu8; Packet::SIZE];
        buf[0] = SYNC_BYTE;
        buf[4] = 3;
        let pk = Packet::new(&buf[..]);
        assert!(pk.transport_error_indicator());
        assert!(pk.payload_unit_start_indicator());
        assert!(pk.transport_priority());
        assert_eq!(pk.pid(), Pid::NULL);
        assert_eq!(
            pk.transport_scrambling_control(),
            TransportScramblingControl::Undefined(3)
        );
        assert_eq!(
            pk.adaptation_control(),
            AdaptationControl::AdaptationFieldAndPayload
        );
        assert_eq!(pk.continuity_counter().count(), 0b1111);
        let af = pk.adaptation_field().unwrap();
        assert!(af.discontinuity_indicator());
        assert!(af.random_access_indicator());
    }

    #[test]
    fn continuity_wraps_around() {
        let a = ContinuityCounter::new(0);
        let b = ContinuityCounter::new(15);
        assert!(a.follows(b));
        assert!(!b.follows(a));
    }

    #[test]
    fn payload_after_adaptation_field() {
        let mut buf = [0u8; Packet::SIZE];
        buf[0] = SYNC_BYTE;
        buf[1] = 0x40; // PUSI
        buf[3] = 0b0011_0000; // adaptation field + payload
        buf[4] = 10; // adaptation_field_length
        buf[15] = 0xab;
        let pk = Packet::new(&buf[..]);
        let payload = pk.payload().unwrap();
        assert_eq!(payload.len(), Packet::SIZE - 4 - 1 - 10);
        assert_eq!(payload[0], 0xab);
    }

    #[test]
    fn adaptation_field_only_has_no_payload() {
        let mut buf = [0u8; Packet::SIZE];
        buf[0] = SYNC_BYTE;
        buf[3] = 0b0010_0000;
        buf[4] = 183;
        let pk = Packet::new(&buf[..]);
        assert!(pk.payload().is_none());
        assert!(pk.adaptation_field().is_some());
    }

    #[test]
    fn pcr() {
        let mut buf = [0u8; Packet::SIZE];
        buf[0] = SYNC_BYTE;
        buf[3] = 0b0011_0000;
        buf[4] = 7; // adaptation_field_length
        buf[5] = 0b0001_0000; // PCR_flag
        // PCR base 2, extension 1: 33 bits of base, 6 reserved bits, 9 bits of extension
        buf[9] = 1;
        buf[10] = 0b0111_1110;
        buf[11] = 1;
        let pk = Packet::new(&buf[..]);
        let af = pk.adaptation_field().unwrap();
        assert_eq!(af.pcr(), Some((2, 1)));
    }
}

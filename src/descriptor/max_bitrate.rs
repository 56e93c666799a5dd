//! Descriptor bounding the bitrate of the stream it is attached to, transport overheads
//! included.
//!
//! Appears in the PMT, either within an elementary stream's descriptor loop (bounding that
//! stream alone) or in the program's own loop (bounding the program as a whole).

use super::{descriptor_len, DescriptorError};
use crate::fields;
use std::fmt;

/// An upper bound on the bitrate of an elementary stream or of a whole program.
pub struct MaximumBitrateDescriptor<'buf> {
    buf: &'buf [u8],
}
impl<'buf> MaximumBitrateDescriptor<'buf> {
    /// The descriptor tag value which identifies the descriptor as a
    /// `MaximumBitrateDescriptor`.
    pub const TAG: u8 = 14;

    /// Construct a `MaximumBitrateDescriptor` instance that will parse the data from the
    /// given slice.
    pub fn new(
        tag: u8,
        buf: &'buf [u8],
    ) -> Result<MaximumBitrateDescriptor<'buf>, DescriptorError> {
        descriptor_len(buf, tag, 3)?;
        Ok(MaximumBitrateDescriptor { buf })
    }

    /// The 22-bit bound, expressed in units of 50 bytes per second.
    pub fn maximum_bitrate(&self) -> u32 {
        fields::u24_at(self.buf, 0) & 0x3f_ffff
    }

    /// The bound converted to bits per second.
    pub fn maximum_bits_per_second(&self) -> u32 {
        self.maximum_bitrate() * 50 * 8
    }
}

impl fmt::Debug for MaximumBitrateDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaximumBitrateDescriptor")
            .field("maximum_bits_per_second", &self.maximum_bits_per_second())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::super::{CoreDescriptors, Descriptor, DescriptorError};
    use assert_matches::assert_matches;
    use hex_literal::hex;

    #[test]
    fn descriptor() {
        // 0x1770 units of 50 bytes/s, with the two reserved bits set
        let data = hex!("0e03 c01770");
        let desc = CoreDescriptors::from_bytes(&data[..]).unwrap();
        assert_matches!(desc, CoreDescriptors::MaximumBitrate(max_bitrate) => {
            assert_eq!(max_bitrate.maximum_bitrate(), 6000);
            assert_eq!(max_bitrate.maximum_bits_per_second(), 2_400_000);
            assert!(!format!("{:?}", max_bitrate).is_empty());
        });
    }

    #[test]
    fn too_short() {
        let data = hex!("0e02 c017");
        assert_matches!(
            CoreDescriptors::from_bytes(&data[..]),
            Err(DescriptorError::NotEnoughData {
                tag: 14,
                actual: 2,
                expected: 3
            })
        );
    }
}

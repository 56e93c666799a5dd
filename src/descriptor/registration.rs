//! Descriptor announcing, via a registered format identifier, the syntax that 'private
//! data' elsewhere in the transport stream will follow.

use super::{descriptor_len, DescriptorError};
use crate::fields;
use smptera_format_identifiers_rust::FormatIdentifier;
use std::fmt;

/// Announces the syntax of private data carried in the stream, by way of a four-byte
/// identifier issued by the SMPTE Registration Authority (`CUEI` for SCTE-35 cues, `HDMV`
/// for Blu-ray streams, and so on).
pub struct RegistrationDescriptor<'buf> {
    buf: &'buf [u8],
}
impl<'buf> RegistrationDescriptor<'buf> {
    /// The descriptor tag value which identifies the descriptor as a
    /// `RegistrationDescriptor`.
    pub const TAG: u8 = 5;

    const FORMAT_IDENTIFIER_LEN: usize = 4;

    pub fn new(tag: u8, buf: &'buf [u8]) -> Result<RegistrationDescriptor<'buf>, DescriptorError> {
        descriptor_len(buf, tag, Self::FORMAT_IDENTIFIER_LEN)?;
        Ok(RegistrationDescriptor { buf })
    }

    /// The format identifier assigned by the _Registration Authority_.
    pub fn format_identifier(&self) -> FormatIdentifier {
        FormatIdentifier::from(fields::sub_slice(self.buf, 0, Self::FORMAT_IDENTIFIER_LEN))
    }

    /// True if this descriptor carries the given format identifier.
    pub fn is_format(&self, id: FormatIdentifier) -> bool {
        self.format_identifier() == id
    }

    /// Any bytes following the format identifier; their layout is defined by whoever
    /// registered the identifier.
    pub fn additional_identification_info(&self) -> &'buf [u8] {
        fields::sub_slice(
            self.buf,
            Self::FORMAT_IDENTIFIER_LEN,
            self.buf.len().saturating_sub(Self::FORMAT_IDENTIFIER_LEN),
        )
    }
}
impl<'buf> fmt::Debug for RegistrationDescriptor<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("RegistrationDescriptor")
            .field("format_identifier", &self.format_identifier())
            .field(
                "additional_identification_info",
                &format!("{:x?}", self.additional_identification_info()),
            )
            .finish()
    }
}

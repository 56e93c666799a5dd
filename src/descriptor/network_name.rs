//! Descriptor giving the name of a DVB network, in text form.  Carried in the NIT.

use super::DescriptorError;
use crate::dvbtext::{self, TextConfig, TextError};
use std::fmt;

/// Provides the network name in text form.
pub struct NetworkNameDescriptor<'buf> {
    buf: &'buf [u8],
}
impl<'buf> NetworkNameDescriptor<'buf> {
    /// The descriptor tag value which identifies the descriptor as a
    /// `NetworkNameDescriptor`.
    pub const TAG: u8 = 0x40;

    pub fn new(_tag: u8, buf: &'buf [u8]) -> Result<NetworkNameDescriptor<'buf>, DescriptorError> {
        Ok(NetworkNameDescriptor { buf })
    }

    /// The undecoded bytes of the name, including any leading codepage selector.
    pub fn name_bytes(&self) -> &'buf [u8] {
        self.buf
    }

    /// The network name decoded to UTF-8.
    pub fn name(&self, config: &TextConfig) -> Result<String, TextError> {
        dvbtext::decode(self.buf, config)
    }
}
impl<'buf> fmt::Debug for NetworkNameDescriptor<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkNameDescriptor")
            .field("name", &self.name(&TextConfig::default()))
            .finish()
    }
}

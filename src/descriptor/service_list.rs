//! Descriptor listing the services carried in a transport stream.  Carried per-transport-
//! stream in the NIT.

use super::DescriptorError;
use crate::fields;
use std::fmt;

/// One `(service_id, service_type)` pair from a [`ServiceListDescriptor`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ServiceListEntry {
    pub service_id: u16,
    pub service_type: u8,
}

/// Lists the services present in a transport stream, with the same `service_type` coding
/// used by [`ServiceDescriptor`](crate::descriptor::service::ServiceDescriptor).
pub struct ServiceListDescriptor<'buf> {
    buf: &'buf [u8],
}
impl<'buf> ServiceListDescriptor<'buf> {
    /// The descriptor tag value which identifies the descriptor as a
    /// `ServiceListDescriptor`.
    pub const TAG: u8 = 0x41;

    pub fn new(_tag: u8, buf: &'buf [u8]) -> Result<ServiceListDescriptor<'buf>, DescriptorError> {
        Ok(ServiceListDescriptor { buf })
    }

    /// Iterates over the three-byte service entries of this descriptor.
    pub fn services(&self) -> impl Iterator<Item = ServiceListEntry> + 'buf {
        self.buf.chunks_exact(3).map(|entry| ServiceListEntry {
            service_id: fields::u16_at(entry, 0),
            service_type: fields::u8_at(entry, 2),
        })
    }
}
impl<'buf> fmt::Debug for ServiceListDescriptor<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.services()).finish()
    }
}

//! Descriptor naming a DVB service and its provider.  Carried per-service in the SDT.

use super::{descriptor_len, DescriptorError};
use crate::dvbtext::{self, TextConfig, TextError};
use crate::fields;
use std::fmt;

/// Names a service (e.g. a TV channel) and the organisation providing it, and classifies
/// the kind of service (digital television, radio, data..).
pub struct ServiceDescriptor<'buf> {
    buf: &'buf [u8],
}
impl<'buf> ServiceDescriptor<'buf> {
    /// The descriptor tag value which identifies the descriptor as a `ServiceDescriptor`.
    pub const TAG: u8 = 0x48;

    pub fn new(tag: u8, buf: &'buf [u8]) -> Result<ServiceDescriptor<'buf>, DescriptorError> {
        descriptor_len(buf, tag, 3)?;
        Ok(ServiceDescriptor { buf })
    }

    /// The kind of service; `0x01` is digital television, `0x02` digital radio, and ETSI
    /// EN 300 468 defines many more values.
    pub fn service_type(&self) -> u8 {
        self.buf[0]
    }

    fn provider_name_len(&self) -> usize {
        usize::from(self.buf[1])
    }

    fn service_name_offset(&self) -> usize {
        2 + self.provider_name_len()
    }

    /// The undecoded bytes of the provider name, including any leading codepage selector.
    pub fn provider_name_bytes(&self) -> &'buf [u8] {
        fields::sub_slice(self.buf, 2, self.provider_name_len())
    }

    /// The undecoded bytes of the service name, including any leading codepage selector.
    pub fn service_name_bytes(&self) -> &'buf [u8] {
        let offset = self.service_name_offset();
        let len = usize::from(fields::u8_at(self.buf, offset));
        fields::sub_slice(self.buf, offset + 1, len)
    }

    /// The provider name decoded to UTF-8.
    pub fn provider_name(&self, config: &TextConfig) -> Result<String, TextError> {
        dvbtext::decode(self.provider_name_bytes(), config)
    }

    /// The service name decoded to UTF-8.
    pub fn service_name(&self, config: &TextConfig) -> Result<String, TextError> {
        dvbtext::decode(self.service_name_bytes(), config)
    }
}
impl<'buf> fmt::Debug for ServiceDescriptor<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = TextConfig::default();
        f.debug_struct("ServiceDescriptor")
            .field("service_type", &self.service_type())
            .field("provider_name", &self.provider_name(&config))
            .field("service_name", &self.service_name(&config))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::super::{CoreDescriptors, Descriptor};
    use super::*;
    use assert_matches::assert_matches;
    use hex_literal::hex;

    #[test]
    fn descriptor() {
        // service_type 1, provider "BBC", service "BBC ONE"
        let data = hex!("480d 01 03424243 07424243204f4e45");
        let desc = CoreDescriptors::from_bytes(&data[..]).unwrap();
        assert_matches!(desc, CoreDescriptors::Service(svc) => {
            let config = TextConfig::default();
            assert_eq!(svc.service_type(), 1);
            assert_eq!(svc.provider_name(&config).unwrap(), "BBC");
            assert_eq!(svc.service_name(&config).unwrap(), "BBC ONE");
        });
    }

    #[test]
    fn truncated_names_decode_empty() {
        // provider_name_length runs past the end of the descriptor body
        let data = hex!("4803 01 0a 42");
        let desc = CoreDescriptors::from_bytes(&data[..]).unwrap();
        assert_matches!(desc, CoreDescriptors::Service(svc) => {
            let config = TextConfig::default();
            assert_eq!(svc.provider_name(&config).unwrap(), "");
            assert_eq!(svc.service_name(&config).unwrap(), "");
        });
    }
}

//! Types related to the DVB _Service Description Table_.

use crate::descriptor;
use crate::fields;
use crate::psi::{RunningStatus, SectionHeader};

/// Sections of the _Service Description Table_ describe the services contained within a
/// particular transport stream: their names, providers, running status and so on.
///
/// Wraps the complete section bytes, of the form stored by
/// [`SectionAssembler`](crate::psi::SectionAssembler).  `table_id` 0x42 describes the
/// transport stream actually carrying this section; 0x46 describes another one.
#[derive(Clone)]
pub struct SdtSection<'buf> {
    data: &'buf [u8],
}

impl<'buf> SdtSection<'buf> {
    const LOOP_START: usize = 11;
    const CRC_SIZE: usize = 4;

    pub fn new(data: &'buf [u8]) -> SdtSection<'buf> {
        SdtSection { data }
    }

    pub fn header(&self) -> SectionHeader<'buf> {
        SectionHeader::new(self.data)
    }

    /// The `table_id_extension` of an SDT section names the transport stream it describes.
    pub fn transport_stream_id(&self) -> u16 {
        fields::u16_at(self.data, 3)
    }

    pub fn original_network_id(&self) -> u16 {
        fields::u16_at(self.data, 8)
    }

    /// Iterates over the per-service entries in this section.
    pub fn services(&self) -> ServiceIter<'buf> {
        let end = self
            .header()
            .section_size()
            .min(self.data.len())
            .saturating_sub(Self::CRC_SIZE);
        ServiceIter {
            inner: fields::RecordIter::new(
                fields::sub_slice(
                    self.data,
                    Self::LOOP_START,
                    end.saturating_sub(Self::LOOP_START),
                ),
                ServiceEntry::HEADER_SIZE,
                |buf| usize::from(fields::u16_at(buf, 3) & 0xfff) + ServiceEntry::HEADER_SIZE,
            ),
        }
    }
}

/// Iterator over the [`ServiceEntry`] items in an `SdtSection`.
pub struct ServiceIter<'buf> {
    inner: fields::RecordIter<'buf>,
}
impl<'buf> Iterator for ServiceIter<'buf> {
    type Item = ServiceEntry<'buf>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(ServiceEntry::new)
    }
}

/// Details of one service described by an SDT section.
pub struct ServiceEntry<'buf> {
    data: &'buf [u8],
}

impl<'buf> ServiceEntry<'buf> {
    const HEADER_SIZE: usize = 5;

    fn new(data: &'buf [u8]) -> ServiceEntry<'buf> {
        ServiceEntry { data }
    }

    pub fn service_id(&self) -> u16 {
        fields::u16_at(self.data, 0)
    }

    /// True if EIT schedule information for this service is present in the stream.
    pub fn eit_schedule_flag(&self) -> bool {
        fields::bit_at(self.data, 2, 1)
    }

    /// True if EIT present/following information for this service is present in the stream.
    pub fn eit_present_following_flag(&self) -> bool {
        fields::bit_at(self.data, 2, 0)
    }

    pub fn running_status(&self) -> RunningStatus {
        RunningStatus::from(fields::u8_at(self.data, 3) >> 5)
    }

    /// True if access to one or more streams of this service is controlled by a CA system.
    pub fn free_ca_mode(&self) -> bool {
        fields::bit_at(self.data, 3, 4)
    }

    pub fn descriptors_loop_length(&self) -> usize {
        usize::from(fields::u16_at(self.data, 3) & 0xfff)
    }

    /// Descriptors for this service (typically at least a service_descriptor naming it).
    pub fn descriptors<Desc: descriptor::Descriptor<'buf>>(
        &self,
    ) -> descriptor::DescriptorIter<'buf, Desc> {
        descriptor::DescriptorIter::new(fields::sub_slice(
            self.data,
            Self::HEADER_SIZE,
            self.descriptors_loop_length(),
        ))
    }
}

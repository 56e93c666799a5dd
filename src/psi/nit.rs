//! Types related to the DVB _Network Information Table_.

use crate::descriptor;
use crate::fields;
use crate::psi::SectionHeader;

/// Sections of the _Network Information Table_ describe the physical organisation of the
/// multiplexes carried via a network, and the characteristics of the network itself.
///
/// Wraps the complete section bytes, of the form stored by
/// [`SectionAssembler`](crate::psi::SectionAssembler).  `table_id` 0x40 describes the
/// network actually carrying this section; 0x41 describes another network.
#[derive(Clone)]
pub struct NitSection<'buf> {
    data: &'buf [u8],
}

impl<'buf> NitSection<'buf> {
    const CRC_SIZE: usize = 4;

    pub fn new(data: &'buf [u8]) -> NitSection<'buf> {
        NitSection { data }
    }

    pub fn header(&self) -> SectionHeader<'buf> {
        SectionHeader::new(self.data)
    }

    /// The `table_id_extension` of a NIT section names the network it describes.
    pub fn network_id(&self) -> u16 {
        fields::u16_at(self.data, 3)
    }

    pub fn network_descriptors_length(&self) -> usize {
        usize::from(fields::u16_at(self.data, 8) & 0xfff)
    }

    /// Descriptors applying to the network as a whole (the network name, for instance).
    pub fn descriptors<Desc: descriptor::Descriptor<'buf>>(
        &self,
    ) -> descriptor::DescriptorIter<'buf, Desc> {
        descriptor::DescriptorIter::new(fields::sub_slice(
            self.data,
            10,
            self.network_descriptors_length(),
        ))
    }

    pub fn transport_stream_loop_length(&self) -> usize {
        usize::from(fields::u16_at(self.data, 10 + self.network_descriptors_length()) & 0xfff)
    }

    /// Iterates over the per-transport-stream entries in this section.
    pub fn transport_streams(&self) -> TransportStreamIter<'buf> {
        let start = 12 + self.network_descriptors_length();
        let end = self
            .header()
            .section_size()
            .min(self.data.len())
            .saturating_sub(Self::CRC_SIZE);
        let len = self
            .transport_stream_loop_length()
            .min(end.saturating_sub(start));
        TransportStreamIter {
            inner: fields::RecordIter::new(
                fields::sub_slice(self.data, start, len),
                TransportStreamEntry::HEADER_SIZE,
                |buf| {
                    usize::from(fields::u16_at(buf, 4) & 0xfff) + TransportStreamEntry::HEADER_SIZE
                },
            ),
        }
    }
}

/// Iterator over the [`TransportStreamEntry`] items in a `NitSection`.
pub struct TransportStreamIter<'buf> {
    inner: fields::RecordIter<'buf>,
}
impl<'buf> Iterator for TransportStreamIter<'buf> {
    type Item = TransportStreamEntry<'buf>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(TransportStreamEntry::new)
    }
}

/// Details of one transport stream within the network.
pub struct TransportStreamEntry<'buf> {
    data: &'buf [u8],
}

impl<'buf> TransportStreamEntry<'buf> {
    const HEADER_SIZE: usize = 6;

    fn new(data: &'buf [u8]) -> TransportStreamEntry<'buf> {
        TransportStreamEntry { data }
    }

    pub fn transport_stream_id(&self) -> u16 {
        fields::u16_at(self.data, 0)
    }

    pub fn original_network_id(&self) -> u16 {
        fields::u16_at(self.data, 2)
    }

    pub fn transport_descriptors_length(&self) -> usize {
        usize::from(fields::u16_at(self.data, 4) & 0xfff)
    }

    /// Descriptors for this transport stream (delivery system parameters, service lists..).
    pub fn descriptors<Desc: descriptor::Descriptor<'buf>>(
        &self,
    ) -> descriptor::DescriptorIter<'buf, Desc> {
        descriptor::DescriptorIter::new(fields::sub_slice(
            self.data,
            Self::HEADER_SIZE,
            self.transport_descriptors_length(),
        ))
    }
}

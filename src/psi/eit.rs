//! Types related to the DVB _Event Information Table_.

use crate::descriptor;
use crate::fields;
use crate::psi::{RunningStatus, SectionHeader};
use chrono::naive::NaiveDateTime;
use std::time::Duration;

/// Sections of the _Event Information Table_ list, in chronological order, the events
/// carried within a service: programme start times, durations and descriptive metadata.
///
/// Wraps the complete section bytes, of the form stored by
/// [`SectionAssembler`](crate::psi::SectionAssembler).  `table_id` 0x4e carries
/// present/following information for the actual transport stream, 0x4f the same for
/// another stream, and 0x50..=0x6f carry schedule information.
#[derive(Clone)]
pub struct EitSection<'buf> {
    data: &'buf [u8],
}

impl<'buf> EitSection<'buf> {
    const LOOP_START: usize = 14;
    const CRC_SIZE: usize = 4;

    pub fn new(data: &'buf [u8]) -> EitSection<'buf> {
        EitSection { data }
    }

    pub fn header(&self) -> SectionHeader<'buf> {
        SectionHeader::new(self.data)
    }

    /// The `table_id_extension` of an EIT section names the service it describes.
    pub fn service_id(&self) -> u16 {
        fields::u16_at(self.data, 3)
    }

    pub fn transport_stream_id(&self) -> u16 {
        fields::u16_at(self.data, 8)
    }

    pub fn original_network_id(&self) -> u16 {
        fields::u16_at(self.data, 10)
    }

    /// The last section number of this table's current segment; EIT schedule tables are
    /// transmitted in segments of up to eight sections.
    pub fn segment_last_section_number(&self) -> u8 {
        fields::u8_at(self.data, 12)
    }

    /// The last `table_id` in use for this service's event information.
    pub fn last_table_id(&self) -> u8 {
        fields::u8_at(self.data, 13)
    }

    /// Iterates over the events in this section.
    pub fn events(&self) -> EventIter<'buf> {
        let end = self
            .header()
            .section_size()
            .min(self.data.len())
            .saturating_sub(Self::CRC_SIZE);
        EventIter {
            inner: fields::RecordIter::new(
                fields::sub_slice(
                    self.data,
                    Self::LOOP_START,
                    end.saturating_sub(Self::LOOP_START),
                ),
                EventEntry::HEADER_SIZE,
                |buf| usize::from(fields::u16_at(buf, 10) & 0xfff) + EventEntry::HEADER_SIZE,
            ),
        }
    }
}

/// Iterator over the [`EventEntry`] items in an `EitSection`.
pub struct EventIter<'buf> {
    inner: fields::RecordIter<'buf>,
}
impl<'buf> Iterator for EventIter<'buf> {
    type Item = EventEntry<'buf>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(EventEntry::new)
    }
}

/// Details of one event within a service.
pub struct EventEntry<'buf> {
    data: &'buf [u8],
}

impl<'buf> EventEntry<'buf> {
    const HEADER_SIZE: usize = 12;

    fn new(data: &'buf [u8]) -> EventEntry<'buf> {
        EventEntry { data }
    }

    pub fn event_id(&self) -> u16 {
        fields::u16_at(self.data, 0)
    }

    /// UTC start time of the event; `None` if the field holds no decodable date (the
    /// all-ones value conventionally marks an undefined start time).
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        fields::mjd_utc_time(fields::u40_at(self.data, 2))
    }

    /// Scheduled duration of the event.
    pub fn duration(&self) -> Duration {
        fields::bcd_duration(fields::u24_at(self.data, 7))
    }

    pub fn running_status(&self) -> RunningStatus {
        RunningStatus::from(fields::u8_at(self.data, 10) >> 5)
    }

    /// True if access to one or more streams of this event is controlled by a CA system.
    pub fn free_ca_mode(&self) -> bool {
        fields::bit_at(self.data, 10, 4)
    }

    pub fn descriptors_loop_length(&self) -> usize {
        usize::from(fields::u16_at(self.data, 10) & 0xfff)
    }

    /// Descriptors for this event (typically at least a short_event_descriptor).
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

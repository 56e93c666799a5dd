//! Types related to the DVB _Running Status Table_.

use crate::fields;
use crate::psi::{RunningStatus, SectionHeader};

/// A _Running Status Table_ section carries rapid updates to the running status of one or
/// more events, without the latency of retransmitting a whole EIT.
///
/// RST sections use the compact section syntax: no versioning, and no CRC.  The payload is
/// a fixed-stride list of nine-byte status records.
#[derive(Clone)]
pub struct RstSection<'buf> {
    data: &'buf [u8],
}

impl<'buf> RstSection<'buf> {
    const ENTRY_SIZE: usize = 9;

    pub fn new(data: &'buf [u8]) -> RstSection<'buf> {
        RstSection { data }
    }

    pub fn header(&self) -> SectionHeader<'buf> {
        SectionHeader::new(self.data)
    }

    /// Iterates over the status records in this section.
    pub fn statuses(&self) -> impl Iterator<Item = StatusEntry<'buf>> + 'buf {
        let header = self.header();
        let len = header.section_length().min(
            self.data
                .len()
                .saturating_sub(SectionHeader::COMMON_SIZE),
        );
        fields::sub_slice(self.data, SectionHeader::COMMON_SIZE, len)
            .chunks_exact(Self::ENTRY_SIZE)
            .map(StatusEntry::new)
    }
}

/// One nine-byte record of an RST section, updating the running status of a single event.
pub struct StatusEntry<'buf> {
    data: &'buf [u8],
}

impl<'buf> StatusEntry<'buf> {
    fn new(data: &'buf [u8]) -> StatusEntry<'buf> {
        StatusEntry { data }
    }

    pub fn transport_stream_id(&self) -> u16 {
        fields::u16_at(self.data, 0)
    }

    pub fn original_network_id(&self) -> u16 {
        fields::u16_at(self.data, 2)
    }

    pub fn service_id(&self) -> u16 {
        fields::u16_at(self.data, 4)
    }

    pub fn event_id(&self) -> u16 {
        fields::u16_at(self.data, 6)
    }

    pub fn running_status(&self) -> RunningStatus {
        RunningStatus::from(fields::u8_at(self.data, 8) & 0x7)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn status_records() {
        let sect = hex!(
            "717012
             0007 0008 0001 002a 04
             0007 0008 0002 002b 01"
        );
        let rst = RstSection::new(&sect);
        let statuses: Vec<_> = rst.statuses().collect();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].transport_stream_id(), 7);
        assert_eq!(statuses[0].original_network_id(), 8);
        assert_eq!(statuses[0].service_id(), 1);
        assert_eq!(statuses[0].event_id(), 0x2a);
        assert_eq!(statuses[0].running_status(), RunningStatus::Running);
        assert_eq!(statuses[1].running_status(), RunningStatus::NotRunning);
    }

    #[test]
    fn truncated_record_ignored() {
        let sect = hex!("71700b 0007 0008 0001 002a 04 0007");
        let rst = RstSection::new(&sect);
        assert_eq!(rst.statuses().count(), 1);
    }
}

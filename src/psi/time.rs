//! Types related to the DVB _Time and Date Table_ and _Time Offset Table_.

use crate::descriptor;
use crate::fields;
use crate::psi::SectionHeader;
use chrono::naive::NaiveDateTime;

/// A _Time and Date Table_ section carries only the current UTC time and date.
///
/// TDT sections use the compact section syntax: no versioning, and no CRC.
#[derive(Clone)]
pub struct TdtSection<'buf> {
    data: &'buf [u8],
}

impl<'buf> TdtSection<'buf> {
    pub fn new(data: &'buf [u8]) -> TdtSection<'buf> {
        TdtSection { data }
    }

    pub fn header(&self) -> SectionHeader<'buf> {
        SectionHeader::new(self.data)
    }

    /// The current UTC time and date; `None` if the field holds no decodable date.
    pub fn utc_time(&self) -> Option<NaiveDateTime> {
        fields::mjd_utc_time(fields::u40_at(self.data, 3))
    }
}

/// A _Time Offset Table_ section carries the current UTC time and date, plus descriptors
/// giving the local time offset in force in the regions the stream serves.
#[derive(Clone)]
pub struct TotSection<'buf> {
    data: &'buf [u8],
}

impl<'buf> TotSection<'buf> {
    pub fn new(data: &'buf [u8]) -> TotSection<'buf> {
        TotSection { data }
    }

    pub fn header(&self) -> SectionHeader<'buf> {
        SectionHeader::new(self.data)
    }

    /// The current UTC time and date; `None` if the field holds no decodable date.
    pub fn utc_time(&self) -> Option<NaiveDateTime> {
        fields::mjd_utc_time(fields::u40_at(self.data, 3))
    }

    pub fn descriptors_loop_length(&self) -> usize {
        usize::from(fields::u16_at(self.data, 8) & 0xfff)
    }

    /// Descriptors attached to this table (typically local_time_offset_descriptors).
    pub fn descriptors<Desc: descriptor::Descriptor<'buf>>(
        &self,
    ) -> descriptor::DescriptorIter<'buf, Desc> {
        descriptor::DescriptorIter::new(fields::sub_slice(
            self.data,
            10,
            self.descriptors_loop_length(),
        ))
    }
}

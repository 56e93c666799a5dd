//! Types related to the _Program Map Table_.

use crate::descriptor;
use crate::fields;
use crate::packet::Pid;
use crate::psi::SectionHeader;
use crate::StreamType;
use std::fmt;

/// Sections of the _Program Map Table_ give details of the elementary streams within a
/// particular program.
///
/// Wraps the complete section bytes, of the form stored by
/// [`SectionAssembler`](crate::psi::SectionAssembler).
#[derive(Clone)]
pub struct PmtSection<'buf> {
    data: &'buf [u8],
}

impl<'buf> PmtSection<'buf> {
    const HEADER_SIZE: usize = 12;
    const CRC_SIZE: usize = 4;

    pub fn new(data: &'buf [u8]) -> PmtSection<'buf> {
        PmtSection { data }
    }

    pub fn header(&self) -> SectionHeader<'buf> {
        SectionHeader::new(self.data)
    }

    /// The `table_id_extension` of a PMT section names the program it describes.
    pub fn program_number(&self) -> u16 {
        fields::u16_at(self.data, 3)
    }

    /// The PID of the packets carrying the Program Clock Reference for this program.
    pub fn pcr_pid(&self) -> Pid {
        Pid::new(fields::u16_at(self.data, 8) & 0x1fff)
    }

    pub fn program_info_length(&self) -> usize {
        usize::from(fields::u16_at(self.data, 10) & 0xfff)
    }

    /// Descriptors applying to the program as a whole.
    pub fn descriptors<Desc: descriptor::Descriptor<'buf>>(
        &self,
    ) -> descriptor::DescriptorIter<'buf, Desc> {
        descriptor::DescriptorIter::new(fields::sub_slice(
            self.data,
            Self::HEADER_SIZE,
            self.program_info_length(),
        ))
    }

    /// Iterates over the per-elementary-stream entries in this section.
    pub fn streams(&self) -> StreamInfoIter<'buf> {
        let start = Self::HEADER_SIZE + self.program_info_length();
        let end = self
            .header()
            .section_size()
            .min(self.data.len())
            .saturating_sub(Self::CRC_SIZE);
        StreamInfoIter {
            inner: fields::RecordIter::new(
                fields::sub_slice(self.data, start, end.saturating_sub(start)),
                StreamInfo::HEADER_SIZE,
                |buf| usize::from(fields::u16_at(buf, 3) & 0xfff) + StreamInfo::HEADER_SIZE,
            ),
        }
    }
}

impl<'buf> fmt::Debug for PmtSection<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PmtSection")
            .field("program_number", &self.program_number())
            .field("pcr_pid", &self.pcr_pid())
            .field("streams", &StreamsDebug(self))
            .finish()
    }
}
struct StreamsDebug<'buf>(&'buf PmtSection<'buf>);
impl<'buf> fmt::Debug for StreamsDebug<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.streams()).finish()
    }
}

/// Iterator over the [`StreamInfo`] entries in a `PmtSection`.
pub struct StreamInfoIter<'buf> {
    inner: fields::RecordIter<'buf>,
}
impl<'buf> Iterator for StreamInfoIter<'buf> {
    type Item = StreamInfo<'buf>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(StreamInfo::new)
    }
}

/// Details of a particular elementary stream within a program.
///
///  - `stream_type()` gives an indication of the kind of content carried within the stream
///  - `elementary_pid()` allows us to find the transport stream packets that belong to the
///    elementary stream
///  - `descriptors()` _may_ provide extra metadata describing some of the stream's
///    properties (for example, the stream's language might be given in a descriptor; or it
///    might not)
pub struct StreamInfo<'buf> {
    data: &'buf [u8],
}

impl<'buf> StreamInfo<'buf> {
    const HEADER_SIZE: usize = 5;

    fn new(data: &'buf [u8]) -> StreamInfo<'buf> {
        StreamInfo { data }
    }

    pub fn stream_type(&self) -> StreamType {
        fields::u8_at(self.data, 0).into()
    }

    pub fn elementary_pid(&self) -> Pid {
        Pid::new(fields::u16_at(self.data, 1) & 0x1fff)
    }

    pub fn es_info_length(&self) -> usize {
        usize::from(fields::u16_at(self.data, 3) & 0xfff)
    }

    pub fn descriptors<Desc: descriptor::Descriptor<'buf>>(
        &self,
    ) -> descriptor::DescriptorIter<'buf, Desc> {
        descriptor::DescriptorIter::new(fields::sub_slice(
            self.data,
            Self::HEADER_SIZE,
            self.es_info_length(),
        ))
    }
}

impl<'buf> fmt::Debug for StreamInfo<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamInfo")
            .field("stream_type", &self.stream_type())
            .field("elementary_pid", &self.elementary_pid())
            .finish()
    }
}

//! Types related to the _Program Association Table_.

use crate::fields;
use crate::packet::Pid;
use crate::psi::SectionHeader;
use log::warn;

/// One entry from the program loop of a [`PatSection`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramDescriptor {
    /// A `program_number` of zero labels the PID on which Network Information Table
    /// sections are carried.
    Network { pid: Pid },
    /// Associates a `program_number` with the PID carrying that program's Program Map
    /// Table sections.
    Program { program_number: u16, pid: Pid },
}

impl ProgramDescriptor {
    /// Panics if fewer than 4 bytes are provided.
    pub fn from_bytes(data: &[u8]) -> ProgramDescriptor {
        assert!(data.len() >= 4);
        let program_number = fields::u16_at(data, 0);
        let pid = Pid::new(fields::u16_at(data, 2) & 0x1fff);
        if program_number == 0 {
            ProgramDescriptor::Network { pid }
        } else {
            ProgramDescriptor::Program {
                program_number,
                pid,
            }
        }
    }

    pub fn pid(&self) -> Pid {
        match *self {
            ProgramDescriptor::Network { pid } => pid,
            ProgramDescriptor::Program { pid, .. } => pid,
        }
    }
}

/// Sections of the _Program Association Table_ give details of the programs within a
/// transport stream.  There may be only one program, or in the case of a broadcast
/// multiplex, there may be many.
///
/// Wraps the complete section bytes, of the form stored by
/// [`SectionAssembler`](crate::psi::SectionAssembler).
#[derive(Clone)]
pub struct PatSection<'buf> {
    data: &'buf [u8],
}

impl<'buf> PatSection<'buf> {
    pub fn new(data: &'buf [u8]) -> PatSection<'buf> {
        PatSection { data }
    }

    pub fn header(&self) -> SectionHeader<'buf> {
        SectionHeader::new(self.data)
    }

    /// The `table_id_extension` of a PAT section names the transport stream it describes.
    pub fn transport_stream_id(&self) -> u16 {
        fields::u16_at(self.data, 3)
    }

    /// Iterates over the program entries in this section.
    pub fn programs(&self) -> ProgramIter<'buf> {
        const LOOP_START: usize = 8;
        const CRC_SIZE: usize = 4;
        let end = self
            .header()
            .section_size()
            .min(self.data.len())
            .saturating_sub(CRC_SIZE);
        ProgramIter {
            buf: fields::sub_slice(self.data, LOOP_START, end.saturating_sub(LOOP_START)),
        }
    }
}

/// Iterate over the list of programs in a `PatSection`.
pub struct ProgramIter<'buf> {
    buf: &'buf [u8],
}
impl<'buf> Iterator for ProgramIter<'buf> {
    type Item = ProgramDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.is_empty() {
            return None;
        }
        if self.buf.len() < 4 {
            warn!(
                "too few bytes remaining for PAT program entry: {}",
                self.buf.len()
            );
            return None;
        }
        let (head, tail) = self.buf.split_at(4);
        self.buf = tail;
        Some(ProgramDescriptor::from_bytes(head))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    use hex_literal::hex;

    #[test]
    fn program_entries() {
        // PAT for transport_stream_id 1 announcing the NIT PID and one program
        let sect = hex!("00b011 0001 c10000 0000e010 0001e064 deadbeef");
        let pat = PatSection::new(&sect);
        assert_eq!(pat.transport_stream_id(), 1);
        let programs: Vec<_> = pat.programs().collect();
        assert_eq!(programs.len(), 2);
        assert_matches!(programs[0], ProgramDescriptor::Network { pid } => {
            assert_eq!(pid, Pid::NIT);
        });
        assert_matches!(programs[1], ProgramDescriptor::Program { program_number, pid } => {
            assert_eq!(program_number, 1);
            assert_eq!(pid, Pid::new(100));
        });
    }

    #[test]
    fn empty_program_loop() {
        let sect = hex!("00b009 0001 c10000 deadbeef");
        let pat = PatSection::new(&sect);
        assert_eq!(pat.programs().count(), 0);
    }
}

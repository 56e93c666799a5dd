//! Structures for parsing MPEG-2 Transport Stream data and the DVB Service Information
//! it carries.
//!
//! # Design principles
//!
//!  * *Avoid copying and allocating* if possible.  Most of the implementation works by
//!    borrowing slices of the underlying byte buffer.  Bytes are only accumulated where
//!    the syntax demands it: PSI sections and PES packets that span transport stream
//!    packets.
//!  * *Non-blocking*.  It should be possible to integrate this library into a system
//!    non-blocking event-loop.  The caller has to 'push' data.
//!  * *Transport neutral*.  There is currently no code here supporting consuming from
//!    files or the network.  The APIs accept `&[u8]`, and the caller handles providing
//!    the data from wherever.
//!  * *Tolerant of malformed data*.  Broadcast streams routinely carry damaged bytes;
//!    parsing drops what it cannot interpret and re-synchronises, and only misuse of the
//!    API by the calling program panics.
//!
//! # Pipeline
//!
//! [`parser::TsParser`] finds 188-byte packets in the byte buffers fed to it and hands
//! each to the sinks registered per PID:
//!
//!  * [`psi::SectionAssembler`] reassembles PSI/SI sections and keeps the current version
//!    of each in a shared, thread-safe [`psi::SectionStore`], from which the table readers
//!    ([`psi::pat::PatSection`], [`psi::sdt::SdtSection`], ..) borrow directly
//!  * [`pes::PesAssembler`] reassembles PES packets and hands them to per-PID callbacks,
//!    such as [`audio::AudioFrameExtractor`], which recovers MPEG audio frames and their
//!    presentation timestamps

pub mod audio;
pub mod descriptor;
pub mod dvbtext;
pub mod fields;
mod mpegts_crc;
pub mod packet;
pub mod parser;
pub mod pes;
pub mod psi;

/// The coding of an elementary stream, as signalled by the `stream_type` field of a PMT
/// section.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StreamType {
    /// ISO/IEC 11172-2 video
    Mpeg1Video,
    /// ISO/IEC 13818-2 video
    Mpeg2Video,
    /// ISO/IEC 11172-3 audio
    Mpeg1Audio,
    /// ISO/IEC 13818-3 audio
    Mpeg2Audio,
    /// ISO/IEC 13818-1 private_sections
    PrivateSections,
    /// ISO/IEC 13818-1 PES packets containing private data
    PrivateData,
    /// ISO/IEC 13522 MHEG
    Mheg,
    /// ISO/IEC 13818-1 Annex A DSM-CC
    DsmCc,
    /// ITU-T Rec. H.222.1
    H2221,
    /// ISO/IEC 13818-7 audio with ADTS transport syntax
    AdtsAudio,
    /// ISO/IEC 14496-2 visual
    Mpeg4Video,
    /// ISO/IEC 14496-3 audio with LATM transport syntax
    LatmAudio,
    /// ISO/IEC 14496-10 (AVC / H.264) video
    H264Video,
    /// ISO/IEC 23008-2 (HEVC / H.265) video
    H265Video,
    /// Other value reserved by ISO/IEC 13818-1
    Reserved(u8),
    /// Value not defined by ISO/IEC 13818-1 (the PMT's descriptors may define its meaning)
    Private(u8),
}

impl From<u8> for StreamType {
    fn from(v: u8) -> StreamType {
        match v {
            0x01 => StreamType::Mpeg1Video,
            0x02 => StreamType::Mpeg2Video,
            0x03 => StreamType::Mpeg1Audio,
            0x04 => StreamType::Mpeg2Audio,
            0x05 => StreamType::PrivateSections,
            0x06 => StreamType::PrivateData,
            0x07 => StreamType::Mheg,
            0x08 => StreamType::DsmCc,
            0x09 => StreamType::H2221,
            0x0f => StreamType::AdtsAudio,
            0x10 => StreamType::Mpeg4Video,
            0x11 => StreamType::LatmAudio,
            0x1b => StreamType::H264Video,
            0x24 => StreamType::H265Video,
            v if v >= 0x80 => StreamType::Private(v),
            v => StreamType::Reserved(v),
        }
    }
}

impl StreamType {
    /// True for the MPEG audio stream types whose frames
    /// [`AudioFrameExtractor`](audio::AudioFrameExtractor) can recover.
    pub fn is_mpeg_audio(self) -> bool {
        matches!(self, StreamType::Mpeg1Audio | StreamType::Mpeg2Audio)
    }
}

#[cfg(test)]
mod test {
    use super::StreamType;

    #[test]
    fn stream_type_mapping() {
        assert_eq!(StreamType::from(0x03), StreamType::Mpeg1Audio);
        assert_eq!(StreamType::from(0x1b), StreamType::H264Video);
        assert_eq!(StreamType::from(0x0a), StreamType::Reserved(0x0a));
        assert_eq!(StreamType::from(0x86), StreamType::Private(0x86));
        assert!(StreamType::from(0x04).is_mpeg_audio());
        assert!(!StreamType::from(0x0f).is_mpeg_audio());
    }
}

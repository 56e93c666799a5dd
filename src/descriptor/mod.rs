//! Descriptors provide metadata about an element of a Transport Stream.
//!
//! For example, a descriptor may be used to specify the language of an audio track.  Use of
//! specific descriptors is often not mandatory (many streams do not describe the language of
//! their audio).
//!
//! The syntax of specific PSI tables often allows descriptors to be attached to the table
//! itself, or to entries within the table.  Every descriptor loop, wherever it appears, is
//! a concatenation of `{tag, length, body}` elements, iterated by [`DescriptorIter`].
//!
//! # Extensions
//!
//! Descriptors are a point of extension, with a range of descriptor types defined by the
//! core standard and by DVB, and further descriptor types defined by standards based upon
//! transport streams.  In order to support this extension while avoiding allocations,
//! descriptor-related types and methods within this crate have a type-parameter so that
//! calling code which wants to use externally-defined descriptors can supply a type which
//! supports them; [`CoreDescriptors`] is the implementation supplied here, and
//! [`descriptor_enum!`](crate::descriptor_enum) can generate alternatives.

pub mod iso_639_language;
pub mod max_bitrate;
pub mod network_name;
pub mod registration;
pub mod service;
pub mod service_list;
pub mod short_event;

use self::iso_639_language::Iso639LanguageDescriptor;
use self::max_bitrate::MaximumBitrateDescriptor;
use self::network_name::NetworkNameDescriptor;
use self::registration::RegistrationDescriptor;
use self::service::ServiceDescriptor;
use self::service_list::ServiceListDescriptor;
use self::short_event::ShortEventDescriptor;
use std::fmt;
use std::marker;

/// Trait for types parsed out of the body of one descriptor-loop element.
pub trait Descriptor<'buf>: Sized {
    /// Parses the `{tag, length, body}` element at the start of the given slice.
    fn from_bytes(buf: &'buf [u8]) -> Result<Self, DescriptorError>;
}

/// Returns an error unless at least `len` bytes of descriptor body are present.
pub fn descriptor_len(buf: &[u8], tag: u8, len: usize) -> Result<(), DescriptorError> {
    if buf.len() < len {
        Err(DescriptorError::NotEnoughData {
            tag,
            actual: buf.len(),
            expected: len,
        })
    } else {
        Ok(())
    }
}

/// Creates an enum implementing [`Descriptor`](descriptor::Descriptor) by matching on the
/// `descriptor_tag` value and delegating each case to a specific descriptor type.
///
/// This is how [`CoreDescriptors`](descriptor::CoreDescriptors) is defined; calling code
/// supporting additional standards can generate its own enum covering further tag values.
#[macro_export]
macro_rules! descriptor_enum {
    (
        $(#[$outer:meta])*
        $name:ident {
            $(
                $(#[$inner:ident $($args:tt)*])*
                $case_name:ident $($tags:pat_param)|* => $t:ident
            ),*,
        }
    ) => {
        $(#[$outer])*
        pub enum $name<'buf> {
            $(
                $(#[$inner $($args)*])*
                $case_name($t<'buf>),
            )*
        }
        impl<'buf> $crate::descriptor::Descriptor<'buf> for $name<'buf> {
            fn from_bytes(buf: &'buf [u8]) -> Result<Self, $crate::descriptor::DescriptorError> {
                if buf.len() < 2 {
                    return Err($crate::descriptor::DescriptorError::BufferTooShort {
                        buflen: buf.len(),
                    });
                }
                let tag = buf[0];
                let len = buf[1] as usize;
                let tag_end = len + 2;
                if tag_end > buf.len() {
                    return Err($crate::descriptor::DescriptorError::TagTooLongForBuffer {
                        taglen: len,
                        buflen: buf.len(),
                    });
                }
                let payload = &buf[2..tag_end];
                #[allow(unreachable_patterns)]
                match tag {
                    $( $( $tags )|* => Ok($name::$case_name($t::new(tag, payload)?)), )*
                    _ => Err($crate::descriptor::DescriptorError::UnhandledTagValue(tag)),
                }
            }
        }
    }
}

/// Catch-all descriptor type exposing the tag and raw body bytes of descriptors whose
/// syntax this crate does not model.
pub struct UnknownDescriptor<'buf> {
    pub tag: u8,
    pub payload: &'buf [u8],
}
impl<'buf> UnknownDescriptor<'buf> {
    pub fn new(tag: u8, payload: &'buf [u8]) -> Result<UnknownDescriptor<'buf>, DescriptorError> {
        Ok(UnknownDescriptor { tag, payload })
    }
}
impl<'buf> fmt::Debug for UnknownDescriptor<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("UnknownDescriptor")
            .field("tag", &self.tag)
            .field("len", &self.payload.len())
            .finish()
    }
}

descriptor_enum! {
    #[derive(Debug)]
    CoreDescriptors {
        Reserved 0 | 1 | 36..=63 => UnknownDescriptor,
        VideoStream 2 => UnknownDescriptor,
        AudioStream 3 => UnknownDescriptor,
        Hierarchy 4 => UnknownDescriptor,
        Registration 5 => RegistrationDescriptor,
        DataStreamAlignment 6 => UnknownDescriptor,
        TargetBackgroundGrid 7 => UnknownDescriptor,
        VideoWindow 8 => UnknownDescriptor,
        CA 9 => UnknownDescriptor,
        ISO639Language 10 => Iso639LanguageDescriptor,
        SystemClock 11 => UnknownDescriptor,
        MultiplexBufferUtilization 12 => UnknownDescriptor,
        Copyright 13 => UnknownDescriptor,
        MaximumBitrate 14 => MaximumBitrateDescriptor,
        PrivateDataIndicator 15 => UnknownDescriptor,
        SmoothingBuffer 16 => UnknownDescriptor,
        STD 17 => UnknownDescriptor,
        IBP 18 => UnknownDescriptor,
        /// ISO/IEC 13818-6
        IsoIec13818dash6 19..=26 => UnknownDescriptor,
        MPEG4Video 27 => UnknownDescriptor,
        MPEG4Audio 28 => UnknownDescriptor,
        IOD 29 => UnknownDescriptor,
        SL 30 => UnknownDescriptor,
        FMC 31 => UnknownDescriptor,
        ExternalESID 32 => UnknownDescriptor,
        MuxCode 33 => UnknownDescriptor,
        FmxBufferSize 34 => UnknownDescriptor,
        MultiplexBuffer 35 => UnknownDescriptor,
        /// ETSI EN 300 468 network_name_descriptor
        NetworkName 0x40 => NetworkNameDescriptor,
        /// ETSI EN 300 468 service_list_descriptor
        ServiceList 0x41 => ServiceListDescriptor,
        /// ETSI EN 300 468 service_descriptor
        Service 0x48 => ServiceDescriptor,
        /// ETSI EN 300 468 short_event_descriptor
        ShortEvent 0x4d => ShortEventDescriptor,
        /// remaining tag values assigned by ETSI EN 300 468 but not modelled here
        OtherDvb 0x42..=0x47 | 0x49..=0x4c | 0x4e..=0x7f => UnknownDescriptor,
        UserPrivate 0x80..=0xff => UnknownDescriptor,
    }
}

/// Iterator over the `{tag, length, body}` elements of a descriptor loop.
///
/// Produced by the `descriptors()` methods of the PSI table types; never materialises a
/// list of descriptors, each element is parsed as iteration reaches it.
pub struct DescriptorIter<'buf, Desc>
where
    Desc: Descriptor<'buf>,
{
    buf: &'buf [u8],
    phantom: marker::PhantomData<Desc>,
}
impl<'buf, Desc> DescriptorIter<'buf, Desc>
where
    Desc: Descriptor<'buf>,
{
    pub fn new(buf: &'buf [u8]) -> DescriptorIter<'buf, Desc> {
        DescriptorIter {
            buf,
            phantom: marker::PhantomData,
        }
    }
}
impl<'buf, Desc> Iterator for DescriptorIter<'buf, Desc>
where
    Desc: Descriptor<'buf>,
{
    type Item = Result<Desc, DescriptorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.is_empty() {
            return None;
        }
        if self.buf.len() < 2 {
            let buflen = self.buf.len();
            self.buf = &self.buf[0..0];
            return Some(Err(DescriptorError::BufferTooShort { buflen }));
        }
        let tag = self.buf[0];
        let len = usize::from(self.buf[1]);
        let remaining_size = self.buf.len() - 2;
        if len > remaining_size {
            // ensure another call to next() will yield None,
            self.buf = &self.buf[0..0];
            Some(Err(DescriptorError::NotEnoughData {
                tag,
                actual: remaining_size,
                expected: len,
            }))
        } else {
            let (desc, rest) = self.buf.split_at(len + 2);
            self.buf = rest;
            Some(Descriptor::from_bytes(desc))
        }
    }
}

/// Problems encountered while parsing the descriptor syntax.
#[derive(Debug, PartialEq, Eq)]
pub enum DescriptorError {
    /// The descriptor_length field claimed more bytes than the loop has left.
    NotEnoughData {
        tag: u8,
        actual: usize,
        expected: usize,
    },
    /// The descriptor_length field claimed more bytes than the element's slice holds.
    TagTooLongForBuffer { taglen: usize, buflen: usize },
    /// Fewer than the two bytes of tag+length header remain.
    BufferTooShort { buflen: usize },
    /// The tag value is not covered by this `Descriptor` implementation.
    UnhandledTagValue(u8),
}

//! Descriptor giving the name and a one-line description of an event, in text form.
//! Carried per-event in the EIT.

use super::{descriptor_len, DescriptorError};
use crate::dvbtext::{self, TextConfig, TextError};
use crate::fields;
use std::fmt;

/// Names an event (e.g. a programme in a broadcast schedule) and optionally carries a short
/// description of it, in the language named by `language_code()`.
pub struct ShortEventDescriptor<'buf> {
    buf: &'buf [u8],
}
impl<'buf> ShortEventDescriptor<'buf> {
    /// The descriptor tag value which identifies the descriptor as a
    /// `ShortEventDescriptor`.
    pub const TAG: u8 = 0x4d;

    pub fn new(tag: u8, buf: &'buf [u8]) -> Result<ShortEventDescriptor<'buf>, DescriptorError> {
        descriptor_len(buf, tag, 5)?;
        Ok(ShortEventDescriptor { buf })
    }

    /// The three-letter ISO 639-2 language code of the texts in this descriptor.
    pub fn language_code(&self) -> String {
        self.buf[0..3].iter().map(|&b| char::from(b)).collect()
    }

    fn event_name_len(&self) -> usize {
        usize::from(self.buf[3])
    }

    fn text_offset(&self) -> usize {
        4 + self.event_name_len()
    }

    /// The undecoded bytes of the event name, including any leading codepage selector.
    pub fn event_name_bytes(&self) -> &'buf [u8] {
        fields::sub_slice(self.buf, 4, self.event_name_len())
    }

    /// The undecoded bytes of the description, including any leading codepage selector.
    pub fn text_bytes(&self) -> &'buf [u8] {
        let offset = self.text_offset();
        let len = usize::from(fields::u8_at(self.buf, offset));
        fields::sub_slice(self.buf, offset + 1, len)
    }

    /// The event name decoded to UTF-8.
    pub fn event_name(&self, config: &TextConfig) -> Result<String, TextError> {
        dvbtext::decode(self.event_name_bytes(), config)
    }

    /// The event description decoded to UTF-8.
    pub fn text(&self, config: &TextConfig) -> Result<String, TextError> {
        dvbtext::decode(self.text_bytes(), config)
    }
}
impl<'buf> fmt::Debug for ShortEventDescriptor<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = TextConfig::default();
        f.debug_struct("ShortEventDescriptor")
            .field("language_code", &self.language_code())
            .field("event_name", &self.event_name(&config))
            .field("text", &self.text(&config))
            .finish()
    }
}

//! Decoding of DVB SI text fields to UTF-8, per _ETSI EN 300 468, Annex A_.
//!
//! Text fields in SI tables (service names, event descriptions and so on) start with an
//! optional codepage selector byte; absent a selector, the default character set of
//! Annex A (a superset of ISO 6937) applies.  Three control codes may be embedded in the
//! text, and the markup they turn into is the caller's choice, configured per decoding via
//! [`TextConfig`] rather than process-wide.

use std::fmt;

/// The markup emitted for the three control codes that may appear inside DVB text.
///
/// The defaults render emphasis as nothing at all and a line break as `"\n"`; a caller
/// producing HTML might configure `"<em>"` / `"</em>"` / `"<br/>"`.
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Replaces control code `0x86` (emphasis on).
    pub emphasis_on: String,
    /// Replaces control code `0x87` (emphasis off).
    pub emphasis_off: String,
    /// Replaces control code `0x8a` (line break).
    pub linebreak: String,
}

impl Default for TextConfig {
    fn default() -> TextConfig {
        TextConfig {
            emphasis_on: String::new(),
            emphasis_off: String::new(),
            linebreak: "\n".to_string(),
        }
    }
}

/// The reason a text field could not be decoded.
///
/// None of these abort parsing; the caller decides whether a missing name matters.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TextError {
    /// The codepage selector byte `0x00` is not a legal value.
    InvalidCodepage,
    /// The byte sequence is too short to hold the codepage selector it starts with.
    NotPlausible,
    /// A legal codepage which this decoder does not (yet) implement.
    Unsupported(&'static str),
    /// Codepage selector `0x1f`: an encoding privately defined by the broadcaster.
    PrivateCodepage(u8),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextError::InvalidCodepage => f.write_str("invalid codepage selector 0x00"),
            TextError::NotPlausible => f.write_str("data too short for codepage selector"),
            TextError::Unsupported(name) => write!(f, "codepage {} not supported", name),
            TextError::PrivateCodepage(id) => {
                write!(f, "private codepage {} not available", id)
            }
        }
    }
}

// the default Annex A character set, a superset of ISO 6937; zero entries have no mapping
#[rustfmt::skip]
static CP6937: [u16; 256] = [
    //   0       1       2       3       4       5       6       7       8       9       a       b       c       d       e       f
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // 0
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // 1
    0x0020, 0x0021, 0x0022, 0x0023, 0x0024, 0x0025, 0x0026, 0x0027, 0x0028, 0x0029, 0x002a, 0x002b, 0x002c, 0x002d, 0x002e, 0x002f, // 2
    0x0030, 0x0031, 0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037, 0x0038, 0x0039, 0x003a, 0x003b, 0x003c, 0x003d, 0x003e, 0x003f, // 3
    0x0040, 0x0041, 0x0042, 0x0043, 0x0044, 0x0045, 0x0046, 0x0047, 0x0048, 0x0049, 0x004a, 0x004b, 0x004c, 0x004d, 0x004e, 0x004f, // 4
    0x0050, 0x0051, 0x0052, 0x0053, 0x0054, 0x0055, 0x0056, 0x0057, 0x0058, 0x0059, 0x005a, 0x005b, 0x005c, 0x005d, 0x005e, 0x005f, // 5
    0x0060, 0x0061, 0x0062, 0x0063, 0x0064, 0x0065, 0x0066, 0x0067, 0x0068, 0x0069, 0x006a, 0x006b, 0x006c, 0x006d, 0x006e, 0x006f, // 6
    0x0070, 0x0071, 0x0072, 0x0073, 0x0074, 0x0075, 0x0076, 0x0077, 0x0078, 0x0079, 0x007a, 0x007b, 0x007c, 0x007d, 0x007e, 0x0000, // 7
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // 8
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // 9
    0x00a0, 0x00a1, 0x00a2, 0x00a3, 0x20ac, 0x00a5, 0x0000, 0x00a7, 0x00a4, 0x2018, 0x201c, 0x00ab, 0x2190, 0x2191, 0x2192, 0x2193, // a
    0x00b0, 0x00b1, 0x00b2, 0x00b3, 0x00d7, 0x00b5, 0x00b6, 0x00b7, 0x00f7, 0x2019, 0x201d, 0x00bb, 0x00bc, 0x00bd, 0x00be, 0x00bf, // b
    0x0000, 0x0300, 0x0301, 0x0302, 0x0303, 0x0304, 0x0306, 0x0307, 0x0308, 0x0000, 0x030a, 0x0327, 0x0000, 0x030b, 0x0328, 0x030c, // c
    0x2015, 0x00b9, 0x00ae, 0x00a9, 0x2122, 0x266a, 0x00ac, 0x00a6, 0x0000, 0x0000, 0x0000, 0x0000, 0x215b, 0x215c, 0x215d, 0x215e, // d
    0x2126, 0x00c6, 0x0110, 0x00aa, 0x0126, 0x0000, 0x0132, 0x013f, 0x0141, 0x00d8, 0x0152, 0x00ba, 0x00de, 0x0166, 0x014a, 0x0149, // e
    0x0138, 0x00e6, 0x0111, 0x00f0, 0x0127, 0x0131, 0x0133, 0x0140, 0x0142, 0x00f8, 0x0153, 0x00df, 0x00fe, 0x0167, 0x014b, 0x00ad, // f
];

// appends the config markup for a control code, returning false if `cc` is not one of the
// three codes given special meaning
fn push_control_code(cc: u8, out: &mut String, config: &TextConfig) -> bool {
    match cc {
        0x86 => out.push_str(&config.emphasis_on),
        0x87 => out.push_str(&config.emphasis_off),
        0x8a => out.push_str(&config.linebreak),
        _ => return false,
    }
    true
}

fn cp6937(data: &[u8], config: &TextConfig) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        if push_control_code(b, &mut out, config) {
            continue;
        }
        if let Some(c) = char::from_u32(u32::from(CP6937[usize::from(b)])) {
            if c != '\0' {
                out.push(c);
            }
        }
    }
    out
}

fn cp8859_9(data: &[u8], config: &TextConfig) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        match b {
            // the six positions where ISO 8859-9 departs from Latin-1
            0xd0 => out.push('\u{011e}'),
            0xdd => out.push('\u{0130}'),
            0xde => out.push('\u{015e}'),
            0xf0 => out.push('\u{011f}'),
            0xfd => out.push('\u{0131}'),
            0xfe => out.push('\u{015f}'),
            0x20..=0x7e | 0xa0..=0xff => out.push(char::from(b)),
            _ => {
                push_control_code(b, &mut out, config);
            }
        }
    }
    out
}

/// Decodes a DVB SI text field to UTF-8.
///
/// An empty input decodes to the empty string.  A first byte of `0x20` or above means the
/// whole input is in the default Annex A character set; byte values below `0x20` select
/// another codepage for the remainder.  Codepages this decoder does not implement yield a
/// [`TextError`] naming the problem, never a panic.
pub fn decode(data: &[u8], config: &TextConfig) -> Result<String, TextError> {
    let selector = match data.first() {
        None => return Ok(String::new()),
        Some(&b) if b >= 0x20 => return Ok(cp6937(data, config)),
        Some(&b) => b,
    };
    match selector {
        0x00 => Err(TextError::InvalidCodepage),
        0x01 => Err(TextError::Unsupported("ISO 8859-5")),
        0x02 => Err(TextError::Unsupported("ISO 8859-6")),
        0x03 => Err(TextError::Unsupported("ISO 8859-7")),
        0x04 => Err(TextError::Unsupported("ISO 8859-8")),
        0x05 => Ok(cp8859_9(&data[1..], config)),
        0x06 => Err(TextError::Unsupported("ISO 8859-10")),
        0x07 => Err(TextError::Unsupported("ISO 8859-11")),
        0x09 => Err(TextError::Unsupported("ISO 8859-13")),
        0x0a => Err(TextError::Unsupported("ISO 8859-14")),
        0x0b => Err(TextError::Unsupported("ISO 8859-15")),
        0x10 => {
            // two-byte selector for the ISO 8859 family
            if data.len() < 3 {
                return Err(TextError::NotPlausible);
            }
            if data[1] != 0 {
                return Err(TextError::Unsupported("reserved"));
            }
            match data[2] {
                0x01 => Err(TextError::Unsupported("ISO 8859-1")),
                0x02 => Err(TextError::Unsupported("ISO 8859-2")),
                0x03 => Err(TextError::Unsupported("ISO 8859-3")),
                0x04 => Err(TextError::Unsupported("ISO 8859-4")),
                0x05 => Err(TextError::Unsupported("ISO 8859-5")),
                0x06 => Err(TextError::Unsupported("ISO 8859-6")),
                0x07 => Err(TextError::Unsupported("ISO 8859-7")),
                0x08 => Err(TextError::Unsupported("ISO 8859-8")),
                0x09 => Ok(cp8859_9(&data[3..], config)),
                0x0a => Err(TextError::Unsupported("ISO 8859-10")),
                0x0b => Err(TextError::Unsupported("ISO 8859-11")),
                0x0d => Err(TextError::Unsupported("ISO 8859-13")),
                0x0e => Err(TextError::Unsupported("ISO 8859-14")),
                0x0f => Err(TextError::Unsupported("ISO 8859-15")),
                _ => Err(TextError::Unsupported("reserved")),
            }
        }
        0x11 => Err(TextError::Unsupported("ISO 10646 basic multilingual plane")),
        0x12 => Err(TextError::Unsupported("KSX1001 Korean")),
        0x13 => Err(TextError::Unsupported("GB-2312 simplified Chinese")),
        0x14 => Err(TextError::Unsupported("Big5 traditional Chinese")),
        0x15 => Ok(String::from_utf8_lossy(&data[1..]).into_owned()),
        0x1f => {
            if data.len() < 2 {
                return Err(TextError::NotPlausible);
            }
            Err(TextError::PrivateCodepage(data[1]))
        }
        _ => Err(TextError::Unsupported("reserved")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_codepage_ascii() {
        let config = TextConfig::default();
        assert_eq!(decode(b"BBC ONE", &config).unwrap(), "BBC ONE");
        assert_eq!(decode(b"", &config).unwrap(), "");
    }

    #[test]
    fn default_codepage_beyond_ascii() {
        let config = TextConfig::default();
        // 0xa4 is the Euro sign in the Annex A default set, unlike Latin-1
        assert_eq!(decode(&[0x31, 0xa4], &config).unwrap(), "1\u{20ac}");
        // unmapped byte values are dropped rather than replaced
        assert_eq!(decode(&[0x41, 0xa6, 0x42], &config).unwrap(), "AB");
    }

    #[test]
    fn control_codes_use_config() {
        let config = TextConfig {
            emphasis_on: "<em>".to_string(),
            emphasis_off: "</em>".to_string(),
            linebreak: "<br/>".to_string(),
        };
        assert_eq!(
            decode(b"a\x86b\x87c\x8ad", &config).unwrap(),
            "a<em>b</em>c<br/>d"
        );
        // the default config drops emphasis markers entirely
        assert_eq!(
            decode(b"a\x86b\x87c\x8ad", &TextConfig::default()).unwrap(),
            "abc\nd"
        );
    }

    #[test]
    fn utf8_passthrough() {
        let config = TextConfig::default();
        let mut data = vec![0x15];
        data.extend_from_slice("käse 🧀".as_bytes());
        assert_eq!(decode(&data, &config).unwrap(), "käse 🧀");
    }

    #[test]
    fn iso8859_9() {
        let config = TextConfig::default();
        // "Türkiye" with the dotless ı at 0xfd
        let data = [0x05, 0x54, 0xfc, 0x72, 0x6b, 0x69, 0x79, 0x65, 0x20, 0xfd];
        assert_eq!(decode(&data, &config).unwrap(), "Türkiye ı");
        // the same codepage through the two-byte selector form
        let data = [0x10, 0x00, 0x09, 0xd0, 0xde];
        assert_eq!(decode(&data, &config).unwrap(), "ĞŞ");
    }

    #[test]
    fn unsupported_codepages_are_reported() {
        let config = TextConfig::default();
        assert_eq!(
            decode(&[0x01, 0x41], &config),
            Err(TextError::Unsupported("ISO 8859-5"))
        );
        assert_eq!(decode(&[0x00], &config), Err(TextError::InvalidCodepage));
        assert_eq!(decode(&[0x10, 0x00], &config), Err(TextError::NotPlausible));
        assert_eq!(
            decode(&[0x1f, 0x03, 0x41], &config),
            Err(TextError::PrivateCodepage(3))
        );
        assert!(!decode(&[0x12, 0x41], &config).unwrap_err().to_string().is_empty());
    }
}

//! # Font Decoding
//!
//! Shown strings are font codes, not text. This module maps them to Unicode
//! through the font selected with `Tf`: its `/ToUnicode` CMap first, then the
//! simple-font `/Encoding` (with its `/Differences`).

use pdf::encoding::BaseEncoding;
use pdf::font::{Font, ToUnicodeMap};
use pdf::object::{Page, Resolve};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Decoders for the fonts in a page's resources, keyed by resource name (without the `/`).
pub type PageFonts = HashMap<String, FontDecoder>;

/// The byte-to-character table of a simple (single-byte) font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimpleEncoding {
    WinAnsi,
    #[default]
    Latin1,
}

impl SimpleEncoding {
    fn decode(self, code: u8) -> Option<char> {
        match self {
            SimpleEncoding::WinAnsi if (0x80..0xA0).contains(&code) => {
                WIN_ANSI_HIGH[usize::from(code - 0x80)]
            }
            _ => Some(char::from(code)),
        }
    }
}

/// `WinAnsiEncoding` codes 0x80..=0x9F. Everything else matches Latin-1.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

/// Turns the codes of one font into text.
#[derive(Debug, Clone, Default)]
pub struct FontDecoder {
    two_byte_codes: bool,
    to_unicode: Option<ToUnicodeMap>,
    encoding: SimpleEncoding,
    differences: HashMap<u8, char>,
}

impl FontDecoder {
    /// A single-byte font without a `/ToUnicode` map.
    pub fn simple(encoding: SimpleEncoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }

    /// A composite (Type0) font. Its two-byte codes only decode through `to_unicode`.
    pub fn composite(to_unicode: ToUnicodeMap) -> Self {
        Self {
            two_byte_codes: true,
            to_unicode: Some(to_unicode),
            ..Self::default()
        }
    }

    pub fn from_font(font: &Font, resolve: &impl Resolve) -> Self {
        let to_unicode = match font.to_unicode(resolve) {
            Some(Ok(map)) if !map.is_empty() => Some(map),
            Some(Err(e)) => {
                debug!("Ignoring unreadable ToUnicode map: {e}");
                None
            }
            _ => None,
        };

        let (encoding, differences) = match font.encoding() {
            Some(encoding) => {
                let base = match encoding.base {
                    BaseEncoding::WinAnsiEncoding => SimpleEncoding::WinAnsi,
                    _ => SimpleEncoding::Latin1,
                };
                let differences = encoding
                    .differences
                    .iter()
                    .filter_map(|(code, name)| {
                        let code = u8::try_from(*code).ok()?;
                        glyph_name_to_char(name).map(|c| (code, c))
                    })
                    .collect();
                (base, differences)
            }
            None => (SimpleEncoding::default(), HashMap::new()),
        };

        Self {
            two_byte_codes: font.is_cid(),
            to_unicode,
            encoding,
            differences,
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        let mut text = String::with_capacity(bytes.len());

        if self.two_byte_codes {
            for pair in bytes.chunks(2) {
                let code = match *pair {
                    [high, low] => u16::from_be_bytes([high, low]),
                    [single] => u16::from(single),
                    _ => continue,
                };
                if let Some(unicode) = self.to_unicode.as_ref().and_then(|map| map.get(code)) {
                    text.push_str(unicode);
                }
            }
            return text;
        }

        for &code in bytes {
            if let Some(unicode) = self
                .to_unicode
                .as_ref()
                .and_then(|map| map.get(u16::from(code)))
            {
                text.push_str(unicode);
            } else if let Some(c) = self.differences.get(&code) {
                text.push(*c);
            } else if let Some(c) = self.encoding.decode(code) {
                text.push(c);
            }
        }
        text
    }
}

/// Builds the decoders for every font the page can select.
///
/// A font that fails to load is skipped; text shown with it falls back to a
/// lossy byte decoding.
pub fn page_fonts(page: &Page, resolve: &impl Resolve) -> PageFonts {
    let Ok(resources) = page.resources() else {
        return PageFonts::new();
    };

    resources
        .fonts
        .iter()
        .filter_map(|(name, font)| match font.load(resolve) {
            Ok(font) => Some((
                name.as_str().to_string(),
                FontDecoder::from_font(&font, resolve),
            )),
            Err(e) => {
                warn!(font = name.as_str(), "Failed to load font: {e}");
                None
            }
        })
        .collect()
}

fn glyph_name_to_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(c);
    }
    if let Some(hex) = name.strip_prefix("uni").or_else(|| name.strip_prefix('u')) {
        if let Some(c) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            return Some(c);
        }
    }

    let c = match name {
        "space" => ' ',
        "period" => '.',
        "comma" => ',',
        "colon" => ':',
        "semicolon" => ';',
        "hyphen" => '-',
        "slash" => '/',
        "parenleft" => '(',
        "parenright" => ')',
        "percent" => '%',
        "ampersand" => '&',
        "quoteright" => '\u{2019}',
        "quoteleft" => '\u{2018}',
        "quotedbl" => '"',
        "quotesingle" => '\'',
        "endash" => '\u{2013}',
        "emdash" => '\u{2014}',
        "bullet" => '\u{2022}',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        "eacute" => '\u{e9}',
        "egrave" => '\u{e8}',
        "agrave" => '\u{e0}',
        "ccedilla" => '\u{e7}',
        "adieresis" => '\u{e4}',
        "odieresis" => '\u{f6}',
        "udieresis" => '\u{fc}',
        "germandbls" => '\u{df}',
        _ => return None,
    };
    Some(c)
}

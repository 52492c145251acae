//! Built-in (standard 14) font handling
//!
//! The overlay only needs the Times family, which every PDF viewer ships.
//! No font program is embedded; widths come from the Adobe font metrics so
//! that centred and right-aligned text can be positioned.

use lopdf::{Dictionary, Object};

/// Advance widths (1/1000 em) for WinAnsi codes 32..=126, Times-Roman
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // ' '..'/'
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // '0'..'9'
    278, 278, 564, 564, 564, 444, 921, // ':'..'@'
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, // 'A'..'M'
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, // 'N'..'Z'
    333, 278, 333, 469, 500, 333, // '['..'`'
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, // 'a'..'m'
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, // 'n'..'z'
    480, 200, 480, 541, // '{'..'~'
];

/// Advance widths (1/1000 em) for WinAnsi codes 32..=126, Times-Bold
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278, // ' '..'/'
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // '0'..'9'
    333, 333, 570, 570, 570, 500, 930, // ':'..'@'
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, // 'A'..'M'
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, // 'N'..'Z'
    333, 278, 333, 581, 500, 333, // '['..'`'
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, // 'a'..'m'
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, // 'n'..'z'
    394, 220, 394, 520, // '{'..'~'
];

/// Width used for codes outside the printable ASCII range
const DEFAULT_WIDTH: u16 = 500;

/// One of the standard Type1 fonts used by the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BuiltinFont {
    #[default]
    TimesRoman,
    TimesBold,
}

impl BuiltinFont {
    /// PostScript name written as `/BaseFont`
    pub fn base_font(self) -> &'static str {
        match self {
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::TimesBold => "Times-Bold",
        }
    }

    /// Name under which the font is registered in page resources
    ///
    /// Prefixed so it cannot collide with fonts already used by a template.
    pub fn resource_name(self) -> &'static str {
        match self {
            BuiltinFont::TimesRoman => "BpTimesRoman",
            BuiltinFont::TimesBold => "BpTimesBold",
        }
    }

    /// Cap height in 1/1000 em
    pub fn cap_height(self) -> u16 {
        match self {
            BuiltinFont::TimesRoman => 662,
            BuiltinFont::TimesBold => 676,
        }
    }

    /// Advance width of a single WinAnsi code in 1/1000 em
    fn code_width(self, code: u8) -> u16 {
        let table = match self {
            BuiltinFont::TimesRoman => &TIMES_ROMAN_WIDTHS,
            BuiltinFont::TimesBold => &TIMES_BOLD_WIDTHS,
        };
        match code {
            32..=126 => table[(code - 32) as usize],
            _ => DEFAULT_WIDTH,
        }
    }

    /// Width of `text` in points at `font_size`
    pub fn text_width_points(self, text: &str, font_size: f32) -> f64 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| self.code_width(code) as u32)
            .sum();
        units as f64 * font_size as f64 / 1000.0
    }

    /// Font dictionary for the page resources
    pub fn to_pdf_dict(self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Font".to_vec()));
        dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        dict.set("BaseFont", Object::Name(self.base_font().as_bytes().to_vec()));
        dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        dict
    }
}

/// Encode text as WinAnsi bytes
///
/// Latin-1 characters map to their own code; control characters and anything
/// outside Latin-1 become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Render WinAnsi bytes as a PDF literal string, e.g. `(a\(b\))`
pub fn to_literal_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('(');
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_widths() {
        // "100.00" = five digits (500) + period (250)
        let width = BuiltinFont::TimesRoman.text_width_points("100.00", 10.0);
        assert!((width - 27.5).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = BuiltinFont::TimesRoman.text_width_points("TOTAL", 10.0);
        let bold = BuiltinFont::TimesBold.text_width_points("TOTAL", 10.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_empty_width() {
        assert_eq!(BuiltinFont::TimesBold.text_width_points("", 12.0), 0.0);
    }

    #[test]
    fn test_encode_latin1_and_fallback() {
        assert_eq!(encode_win_ansi("Aé"), vec![b'A', 0xE9]);
        assert_eq!(encode_win_ansi("₹5"), vec![b'?', b'5']);
        assert_eq!(encode_win_ansi("a\tb"), vec![b'a', b'?', b'b']);
    }

    #[test]
    fn test_literal_string_escaping() {
        assert_eq!(to_literal_string(b"a(b)\\"), "(a\\(b\\)\\\\)");
        assert_eq!(to_literal_string(&[0xE9]), "(\\351)");
    }

    #[test]
    fn test_font_dict() {
        let dict = BuiltinFont::TimesBold.to_pdf_dict();
        assert_eq!(
            dict.get(b"BaseFont").unwrap().as_name().unwrap(),
            b"Times-Bold"
        );
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Type1");
    }
}

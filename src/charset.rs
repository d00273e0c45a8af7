// Copyright (c) 2026 rezky_nightky

use std::char;

use rand::{seq::IndexedRandom, Rng};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Charset(u32);

impl Charset {
    pub const LETTERS: Charset = Charset(0x1);
    pub const DIGITS: Charset = Charset(0x2);
    pub const PUNCTUATION: Charset = Charset(0x4);
    pub const KATAKANA: Charset = Charset(0x8);
    pub const BINARY: Charset = Charset(0x10);
    pub const HEX: Charset = Charset(0x20);
    pub const SYMBOLS: Charset = Charset(0x40);

    pub const ASCII: Charset = Charset(0x7);
    pub const MATRIX: Charset = Charset(0xA);

    pub fn contains(self, other: Charset) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn union(self, other: Charset) -> Charset {
        Charset(self.0 | other.0)
    }
}

pub const PRESETS: &[(&str, &str)] = &[
    ("auto", "matrix on UTF-8 terminals, ascii otherwise"),
    ("matrix", "Half-width katakana + digits"),
    ("ascii", "Letters + digits + punctuation"),
    ("katakana", "Half-width katakana"),
    ("digits", "Digits only"),
    ("binary", "0 and 1"),
    ("hex", "0-9 and A-F"),
    ("symbols", "Math symbols"),
    ("code", "Letters + digits + symbols"),
];

pub fn charset_from_str(name: &str, utf8: bool) -> Result<Charset, ConfigError> {
    let name = name.trim().to_ascii_lowercase();
    match name.as_str() {
        "auto" => Ok(if utf8 { Charset::MATRIX } else { Charset::ASCII }),
        "matrix" => Ok(Charset::MATRIX),
        "ascii" => Ok(Charset::ASCII),
        "katakana" => Ok(Charset::KATAKANA),
        "digits" => Ok(Charset::DIGITS),
        "binary" | "bin" | "01" => Ok(Charset::BINARY),
        "hex" => Ok(Charset::HEX),
        "symbols" => Ok(Charset::SYMBOLS),
        "code" => Ok(Charset::LETTERS
            .union(Charset::DIGITS)
            .union(Charset::SYMBOLS)),
        _ => Err(ConfigError::UnknownCharset(name)),
    }
}

/// Parses `--chars`: comma separated hex code points taken in pairs as
/// inclusive ranges.
pub fn parse_user_ranges(s: &str) -> Result<Vec<(char, char)>, ConfigError> {
    let mut points = Vec::new();
    for (i, part) in s.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let v = u32::from_str_radix(part, 16)
            .map_err(|_| ConfigError::InvalidChars(format!("bad hex at index {}", i + 1)))?;
        let ch = char::from_u32(v).ok_or_else(|| {
            ConfigError::InvalidChars(format!("not a unicode scalar at index {}", i + 1))
        })?;
        points.push(ch);
    }
    if points.len() % 2 != 0 {
        return Err(ConfigError::InvalidChars(
            "odd number of code points (ranges come in pairs)".to_string(),
        ));
    }
    Ok(points.chunks(2).map(|p| (p[0], p[1])).collect())
}

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    out.extend((start..=end).filter_map(char::from_u32));
}

/// The glyphs a column may show. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphSet {
    chars: Vec<char>,
}

impl GlyphSet {
    pub fn new(charset: Charset, user_ranges: &[(char, char)]) -> Self {
        let mut out = Vec::new();

        if charset.contains(Charset::BINARY) {
            push_range(&mut out, 0x30, 0x31);
        }
        if charset.contains(Charset::HEX) {
            push_range(&mut out, 0x30, 0x39);
            push_range(&mut out, 0x41, 0x46);
        }
        if charset.contains(Charset::LETTERS) {
            push_range(&mut out, 0x41, 0x5A);
            push_range(&mut out, 0x61, 0x7A);
        }
        if charset.contains(Charset::DIGITS) {
            push_range(&mut out, 0x30, 0x39);
        }
        if charset.contains(Charset::PUNCTUATION) {
            push_range(&mut out, 0x21, 0x2F);
            push_range(&mut out, 0x3A, 0x40);
            push_range(&mut out, 0x5B, 0x60);
            push_range(&mut out, 0x7B, 0x7E);
        }
        if charset.contains(Charset::KATAKANA) {
            push_range(&mut out, 0xFF66, 0xFF9D);
        }
        if charset.contains(Charset::SYMBOLS) {
            out.extend("∞∑∫√π∆Ωµλ≈≠≤≥×÷±∂∇∈∩∪⊂⊃⊕⊗".chars());
        }

        for &(a, b) in user_ranges {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            push_range(&mut out, lo as u32, hi as u32);
        }

        out.sort_unstable();
        out.dedup();
        Self::from_chars(out)
    }

    pub fn from_chars(chars: Vec<char>) -> Self {
        let chars = chars
            .into_iter()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect::<Vec<_>>();
        if chars.is_empty() {
            return Self {
                chars: vec!['0', '1'],
            };
        }
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[cfg(test)]
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.chars.choose(rng).copied().unwrap_or('0')
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn parse_user_ranges_pairs_code_points() {
        let v = parse_user_ranges("30,31").unwrap();
        assert_eq!(v, vec![('0', '1')]);
        assert!(parse_user_ranges("30").is_err());
        assert!(parse_user_ranges("zz,31").is_err());
    }

    #[test]
    fn auto_falls_back_to_ascii_without_utf8() {
        assert_eq!(charset_from_str("auto", false).unwrap(), Charset::ASCII);
        assert_eq!(charset_from_str("auto", true).unwrap(), Charset::MATRIX);
        assert!(charset_from_str("klingon", true).is_err());
    }

    #[test]
    fn binary_has_only_0_and_1() {
        let set = GlyphSet::new(Charset::BINARY, &[]);
        assert_eq!(set.len(), 2);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let c = set.pick(&mut rng);
            assert!(c == '0' || c == '1');
        }
    }

    #[test]
    fn whitespace_only_set_falls_back_to_binary() {
        let set = GlyphSet::from_chars(vec![' ', '\n']);
        assert!(set.contains('0') && set.contains('1'));
    }
}

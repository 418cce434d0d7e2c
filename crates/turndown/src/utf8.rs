//! Lenient UTF-8 decoding.
//!
//! Whitespace classification works on code points, but the bytes it sees may
//! come from arbitrary parser output. Every malformed sequence decodes to a
//! single code point equal to its lead byte, so decoding never fails and never
//! drops bytes.

/// One decoded code point and the bytes it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointSlice {
    pub value: u32,
    pub offset: usize,
    pub len: usize,
}

impl CodepointSlice {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

const MIN_VALUE: [u32; 5] = [0, 0, 0x80, 0x800, 0x10000];

/// Decode the code point starting at `pos`, returning `(value, byte_len)`.
///
/// Returns `None` when `pos` is past the end of `bytes`.
pub fn decode_at(bytes: &[u8], pos: usize) -> Option<(u32, usize)> {
    let lead = *bytes.get(pos)?;
    let fallback = Some((u32::from(lead), 1));

    let len = match lead {
        0x00..=0x7F => return fallback,
        _ if lead & 0xE0 == 0xC0 => 2,
        _ if lead & 0xF0 == 0xE0 => 3,
        _ if lead & 0xF8 == 0xF0 => 4,
        _ => return fallback,
    };
    if pos + len > bytes.len() {
        return fallback;
    }

    let mut value = u32::from(lead & (0x7F >> len));
    for &byte in &bytes[pos + 1..pos + len] {
        if byte & 0xC0 != 0x80 {
            return fallback;
        }
        value = (value << 6) | u32::from(byte & 0x3F);
    }

    if value < MIN_VALUE[len] || (0xD800..=0xDFFF).contains(&value) || value > 0x10FFFF {
        return fallback;
    }
    Some((value, len))
}

/// Decode a whole buffer.
pub fn decode(bytes: &[u8]) -> Vec<CodepointSlice> {
    Codepoints::new(bytes).collect()
}

/// Turn arbitrary bytes into a string.
///
/// Valid UTF-8 is copied as is. Each malformed byte becomes the code point
/// with the same value, so Latin-1 input such as `caf\xE9` reads as `café`.
pub fn decode_lossy(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }
    Codepoints::new(bytes)
        .map(|cp| char::from_u32(cp.value).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Iterator form of [`decode`].
#[derive(Debug, Clone)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Codepoints<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl Iterator for Codepoints<'_> {
    type Item = CodepointSlice;

    fn next(&mut self) -> Option<CodepointSlice> {
        let (value, len) = decode_at(self.bytes, self.pos)?;
        let slice = CodepointSlice {
            value,
            offset: self.pos,
            len,
        };
        self.pos += len;
        Some(slice)
    }
}

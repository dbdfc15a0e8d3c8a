//! Incremental UTF-8 decoding over raw bytes.
//!
//! An invalid unit is never collapsed into U+FFFD. It is surfaced as the
//! character whose scalar value equals the raw byte, so no input byte is
//! silently dropped and cursor positions stay byte-accurate.

/// The expected encoded length for a leading byte, or 0 when the byte cannot
/// start a valid sequence.
pub(crate) fn leading_len(byte: u8) -> usize {
    match byte {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Decode the first character of `bytes`, returning it along with the number
/// of bytes it occupies. An invalid or truncated sequence yields its leading
/// byte as a raw-byte character of width 1. Returns `None` only on empty
/// input.
pub(crate) fn decode_prefix(bytes: &[u8]) -> Option<(char, usize)> {
    let first = *bytes.first()?;
    let want = leading_len(first);

    if want > 0 && want <= bytes.len() {
        if let Some(c) = std::str::from_utf8(&bytes[..want])
            .ok()
            .and_then(|s| s.chars().next())
        {
            return Some((c, want));
        }
    }

    Some((char::from(first), 1))
}

/// Decode a whole byte region into a string, substituting raw-byte
/// characters for invalid units.
pub(crate) fn decode_region(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    while let Some((c, width)) = decode_prefix(bytes) {
        out.push(c);
        bytes = &bytes[width..];
    }

    out
}

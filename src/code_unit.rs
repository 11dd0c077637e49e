//! Codec primitives for the three Unicode transformation formats, and the
//! [`CodeUnit`] trait that selects a codec from the unit width at compile
//! time.
//!
//! Each decode primitive reads one code point from the front of a borrowed
//! unit slice and reports how many units it consumed; each encode primitive
//! appends the unit sequence for one scalar value to a growable buffer.
//! Neither keeps any state between calls.

use core::fmt;
use core::ops::RangeInclusive;

use thiserror::Error;

/// Reason a decode step could not produce a Unicode scalar value.
///
/// A malformed sequence always consumes exactly one unit, so decoding can
/// resume (or substitute U+FFFD) deterministically at the next unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// A byte that cannot begin any UTF-8 sequence (`80..=C1`, `F5..=FF`).
    #[error("invalid start byte")]
    InvalidStart,
    /// A byte outside the valid continuation range of its sequence. Overlong
    /// forms and UTF-8-encoded surrogates are reported as this, matching the
    /// standard well-formed byte ranges.
    #[error("invalid continuation byte")]
    InvalidContinuation,
    /// The input ends in the middle of a multi-unit sequence.
    #[error("unexpected end of data")]
    UnexpectedEnd,
    /// A UTF-16 surrogate unit with no matching other half.
    #[error("unpaired surrogate")]
    UnpairedSurrogate,
    /// A UTF-32 unit above U+10FFFF or in the surrogate range.
    #[error("code point out of range")]
    InvalidCodePoint,
}

/// Units consumed from the front of the input, and the scalar value decoded
/// from them, or the reason there isn't one.
pub(crate) type Decoded = (usize, Result<char, DecodeErrorKind>);

mod sealed {
    #[allow(unreachable_pub)]
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// A fixed-width code unit of one Unicode encoding form.
///
/// The unit width identifies the form: `u8` is UTF-8, `u16` is UTF-16, and
/// `u32` is UTF-32. The trait is sealed over exactly those three types, so
/// the codec for a conversion is picked by monomorphization; an unsupported
/// width has no impl and fails to compile. [`WideUnit`] is only ever an alias
/// for `u16` or `u32`, never a fourth rule.
pub trait CodeUnit:
    Copy + Eq + Ord + core::hash::Hash + fmt::Debug + sealed::Sealed + 'static
{
    /// Most units a single code point can occupy in this form.
    const MAX_LEN: usize;

    /// Decodes one code point from the front of `units`.
    ///
    /// `units` must be non-empty. Returns the number of units consumed and
    /// the decoded scalar value, or the reason the front of the slice is
    /// malformed (in which case exactly one unit is consumed).
    fn decode(units: &[Self]) -> Decoded;

    /// Appends the encoded form of `ch` to `sink` and returns how many units
    /// were appended. Never reads from `sink`.
    fn encode(ch: char, sink: &mut Vec<Self>) -> usize;
}

impl CodeUnit for u8 {
    const MAX_LEN: usize = 4;

    #[inline]
    fn decode(units: &[Self]) -> Decoded {
        next_code_point_utf8(units)
    }

    #[inline]
    fn encode(ch: char, sink: &mut Vec<Self>) -> usize {
        encode_utf8_raw(ch as u32, sink)
    }
}

impl CodeUnit for u16 {
    const MAX_LEN: usize = 2;

    #[inline]
    fn decode(units: &[Self]) -> Decoded {
        next_code_point_utf16(units)
    }

    #[inline]
    fn encode(ch: char, sink: &mut Vec<Self>) -> usize {
        encode_utf16_raw(ch as u32, sink)
    }
}

impl CodeUnit for u32 {
    const MAX_LEN: usize = 1;

    #[inline]
    fn decode(units: &[Self]) -> Decoded {
        next_code_point_utf32(units)
    }

    #[inline]
    fn encode(ch: char, sink: &mut Vec<Self>) -> usize {
        sink.push(ch as u32);
        1
    }
}

/// Code unit of the platform's wide-character form: 16-bit on Windows,
/// 32-bit everywhere else. Resolved when the crate is compiled.
#[cfg(windows)]
pub type WideUnit = u16;
/// Code unit of the platform's wide-character form: 16-bit on Windows,
/// 32-bit everywhere else. Resolved when the crate is compiled.
#[cfg(not(windows))]
pub type WideUnit = u32;

/// Mask of the payload bits in a UTF-8 continuation byte.
const CONT_MASK: u8 = 0x3F;

#[inline]
const fn is_continuation(byte: u8) -> bool {
    // 0x80..=0xBF
    (byte as i8) < -64
}

/// Decodes one code point from the front of a UTF-8 byte slice.
///
/// Follows the standard well-formed byte ranges: the second byte's range is
/// narrowed after the `E0`, `ED`, `F0`, and `F4` leads so that overlong
/// forms, encoded surrogates, and values past U+10FFFF never decode.
fn next_code_point_utf8(bytes: &[u8]) -> Decoded {
    debug_assert!(!bytes.is_empty());
    let lead = bytes[0];
    let (len, mut code) = match lead {
        0x00..=0x7F => return (1, Ok(lead as char)),
        0xC2..=0xDF => (2, (lead & 0x1F) as u32),
        0xE0..=0xEF => (3, (lead & 0x0F) as u32),
        0xF0..=0xF4 => (4, (lead & 0x07) as u32),
        _ => return (1, Err(DecodeErrorKind::InvalidStart)),
    };
    let second: RangeInclusive<u8> = match lead {
        0xE0 => 0xA0..=0xBF,
        0xED => 0x80..=0x9F,
        0xF0 => 0x90..=0xBF,
        0xF4 => 0x80..=0x8F,
        _ => 0x80..=0xBF,
    };
    match bytes.get(1) {
        None => return (1, Err(DecodeErrorKind::UnexpectedEnd)),
        Some(b) if !second.contains(b) => return (1, Err(DecodeErrorKind::InvalidContinuation)),
        Some(&b) => code = code << 6 | (b & CONT_MASK) as u32,
    }
    for i in 2..len {
        match bytes.get(i) {
            None => return (1, Err(DecodeErrorKind::UnexpectedEnd)),
            Some(&b) if !is_continuation(b) => {
                return (1, Err(DecodeErrorKind::InvalidContinuation));
            }
            Some(&b) => code = code << 6 | (b & CONT_MASK) as u32,
        }
    }
    // SAFETY: the lead and continuation ranges above admit no surrogate,
    // overlong form, or value past U+10FFFF.
    (len, Ok(unsafe { char::from_u32_unchecked(code) }))
}

/// Decodes one code point from the front of a UTF-16 unit slice, combining
/// a lead surrogate in `D800..=DBFF` with a trail in `DC00..=DFFF`.
fn next_code_point_utf16(units: &[u16]) -> Decoded {
    debug_assert!(!units.is_empty());
    let lead = units[0];
    match lead {
        0xD800..=0xDBFF => match units.get(1) {
            None => (1, Err(DecodeErrorKind::UnexpectedEnd)),
            Some(&trail @ 0xDC00..=0xDFFF) => {
                let code = 0x10000 + (((lead - 0xD800) as u32) << 10 | (trail - 0xDC00) as u32);
                // SAFETY: a surrogate pair always combines into
                // 0x10000..=0x10FFFF.
                (2, Ok(unsafe { char::from_u32_unchecked(code) }))
            }
            Some(_) => (1, Err(DecodeErrorKind::UnpairedSurrogate)),
        },
        0xDC00..=0xDFFF => (1, Err(DecodeErrorKind::UnpairedSurrogate)),
        // SAFETY: not a surrogate, and any other u16 is a valid scalar value.
        _ => (1, Ok(unsafe { char::from_u32_unchecked(lead as u32) })),
    }
}

/// Decodes one code point from the front of a UTF-32 unit slice. The unit
/// value is the code point itself; only the scalar-value check applies.
fn next_code_point_utf32(units: &[u32]) -> Decoded {
    debug_assert!(!units.is_empty());
    match char::from_u32(units[0]) {
        Some(ch) => (1, Ok(ch)),
        None => (1, Err(DecodeErrorKind::InvalidCodePoint)),
    }
}

/// Appends the 1–4 UTF-8 bytes of `code` to `sink`.
fn encode_utf8_raw(code: u32, sink: &mut Vec<u8>) -> usize {
    if code < 0x80 {
        sink.push(code as u8);
        1
    } else if code < 0x800 {
        sink.extend_from_slice(&[0xC0 | (code >> 6) as u8, 0x80 | (code as u8 & CONT_MASK)]);
        2
    } else if code < 0x10000 {
        sink.extend_from_slice(&[
            0xE0 | (code >> 12) as u8,
            0x80 | ((code >> 6) as u8 & CONT_MASK),
            0x80 | (code as u8 & CONT_MASK),
        ]);
        3
    } else {
        sink.extend_from_slice(&[
            0xF0 | (code >> 18) as u8,
            0x80 | ((code >> 12) as u8 & CONT_MASK),
            0x80 | ((code >> 6) as u8 & CONT_MASK),
            0x80 | (code as u8 & CONT_MASK),
        ]);
        4
    }
}

/// Appends the one unit or surrogate pair of `code` to `sink`.
fn encode_utf16_raw(code: u32, sink: &mut Vec<u16>) -> usize {
    if code < 0x10000 {
        sink.push(code as u16);
        1
    } else {
        let code = code - 0x10000;
        sink.extend_from_slice(&[0xD800 | (code >> 10) as u16, 0xDC00 | (code as u16 & 0x3FF)]);
        2
    }
}

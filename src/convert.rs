//! The conversion driver: a cursor-based code-point iterator over a borrowed
//! unit slice, and the single pass that re-encodes each decoded code point
//! into a fresh owned string.

use core::iter::FusedIterator;

use itertools::process_results;
use thiserror::Error;

use crate::code_unit::{CodeUnit, DecodeErrorKind};
use crate::string::UtfString;

/// A malformed sequence encountered while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at unit offset {offset}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    offset: usize,
}

impl DecodeError {
    /// What made the sequence malformed.
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Offset of the offending unit, in code units from the start of the
    /// input.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Iterator decoding one code point per step from a borrowed unit slice.
///
/// Each step consumes however many units the code point occupies; a malformed
/// sequence yields `Err` and consumes exactly one unit, so iteration always
/// reaches the end of the input. Created with [`CodePoints::new`] or
/// [`UtfString::code_points`].
#[derive(Clone)]
pub struct CodePoints<'a, U: CodeUnit> {
    units: &'a [U],
    offset: usize,
}

impl<'a, U: CodeUnit> CodePoints<'a, U> {
    pub fn new(units: &'a [U]) -> Self {
        CodePoints { units, offset: 0 }
    }

    /// The units not yet consumed.
    pub fn as_units(&self) -> &'a [U] {
        self.units
    }
}

impl<U: CodeUnit> Iterator for CodePoints<'_, U> {
    type Item = Result<char, DecodeError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.units.is_empty() {
            return None;
        }
        let (consumed, decoded) = U::decode(self.units);
        let offset = self.offset;
        self.units = &self.units[consumed..];
        self.offset += consumed;
        Some(decoded.map_err(|kind| DecodeError { kind, offset }))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.units.len();
        (len.div_ceil(U::MAX_LEN), Some(len))
    }
}

impl<U: CodeUnit> FusedIterator for CodePoints<'_, U> {}

/// Converts a borrowed unit slice into an owned string of another form,
/// substituting U+FFFD for each malformed unit.
///
/// One pass: decode a code point, append its encoding, repeat until the
/// input is exhausted.
pub(crate) fn convert<S: CodeUnit, D: CodeUnit>(src: &[S]) -> UtfString<D> {
    // One output unit per input unit is the common case.
    let mut out = UtfString::with_capacity(src.len());
    for decoded in CodePoints::new(src) {
        out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    out
}

/// Converts a borrowed unit slice into an owned string of another form,
/// stopping at the first malformed sequence.
pub(crate) fn try_convert<S: CodeUnit, D: CodeUnit>(src: &[S]) -> Result<UtfString<D>, DecodeError> {
    process_results(CodePoints::new(src), |points| points.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars_lossy<U: CodeUnit>(units: &[U]) -> String {
        CodePoints::new(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(CodePoints::<u8>::new(&[]).count(), 0);
        assert_eq!(CodePoints::<u16>::new(&[]).count(), 0);
        assert_eq!(CodePoints::<u32>::new(&[]).count(), 0);
        assert!(convert::<u8, u16>(&[]).is_empty());
    }

    #[test]
    fn one_step_per_code_point() {
        // "aé€😀" spans all four UTF-8 lengths but is four steps.
        let bytes = "aé€😀".as_bytes();
        assert_eq!(bytes.len(), 10);
        let decoded: Vec<_> = CodePoints::new(bytes).map(Result::unwrap).collect();
        assert_eq!(decoded, ['a', 'é', '€', '😀']);

        let units: Vec<u16> = "a😀".chars().flat_map(|c| {
            let mut v = Vec::new();
            u16::encode(c, &mut v);
            v
        }).collect();
        assert_eq!(units.len(), 3);
        assert_eq!(CodePoints::new(&units).count(), 2);
    }

    #[test]
    fn malformed_utf8_substitutes_per_unit() {
        assert_eq!(chars_lossy(&[0x61u8, 0xFF, 0x62]), "a\u{FFFD}b");
        // A truncated three-byte sequence: the lead errors and is consumed,
        // then the orphaned continuation byte errors on its own step.
        assert_eq!(chars_lossy(&[0xE0u8, 0xA0]), "\u{FFFD}\u{FFFD}");
        assert_eq!(chars_lossy(&[0x61u8, 0xC3]), "a\u{FFFD}");
    }

    #[test]
    fn malformed_utf16_substitutes_per_unit() {
        assert_eq!(chars_lossy(&[0x0041u16, 0xDC00, 0x0042]), "A\u{FFFD}B");
        assert_eq!(chars_lossy(&[0xD800u16, 0x0041]), "\u{FFFD}A");
        assert_eq!(chars_lossy(&[0xD800u16]), "\u{FFFD}");
    }

    #[test]
    fn error_offsets_are_unit_offsets() {
        let err = CodePoints::new(&[0x61u8, 0x62, 0x80])
            .find_map(Result::err)
            .unwrap();
        assert_eq!(err.kind(), DecodeErrorKind::InvalidStart);
        assert_eq!(err.offset(), 2);

        // The offset counts units, not code points.
        let err = CodePoints::new(&[0xD83Du16, 0xDE00, 0xDC00])
            .find_map(Result::err)
            .unwrap();
        assert_eq!(err.kind(), DecodeErrorKind::UnpairedSurrogate);
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn try_convert_stops_at_first_error() {
        let ok: Result<UtfString<u16>, _> = try_convert(&[0x61u8, 0x62]);
        assert_eq!(ok.unwrap().as_units(), [0x61, 0x62]);

        let err = try_convert::<u8, u16>(&[0x61, 0x80, 0x62]).unwrap_err();
        assert_eq!(err.offset(), 1);
        assert_eq!(err.to_string(), "invalid start byte at unit offset 1");
    }

    #[test]
    fn convert_collapses_multi_unit_sequences() {
        let out: UtfString<u32> = convert("😀".as_bytes());
        assert_eq!(out.as_units(), [0x1F600]);
        let out: UtfString<u16> = convert(&[0x1F600u32][..]);
        assert_eq!(out.as_units(), [0xD83D, 0xDE00]);
    }

    #[test]
    fn as_units_tracks_the_cursor() {
        let mut points = CodePoints::new("é!".as_bytes());
        assert_eq!(points.as_units(), "é!".as_bytes());
        assert_eq!(points.next(), Some(Ok('é')));
        assert_eq!(points.as_units(), b"!");
    }

    #[test]
    fn size_hint_brackets_actual_count() {
        let bytes = "aé€😀".as_bytes();
        let iter = CodePoints::new(bytes);
        let (low, high) = iter.size_hint();
        let count = iter.count();
        assert!(low <= count && count <= high.unwrap());
    }
}

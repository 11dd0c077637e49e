//! Owned strings of code units in exactly one encoding form.

use core::fmt;
use core::fmt::Write;
use core::hash::{Hash, Hasher};
use core::str;

use crate::code_unit::{CodeUnit, WideUnit};
use crate::convert::{CodePoints, DecodeError};

/// An owned, growable, contiguous buffer of code units in exactly one
/// encoding form, identified by the unit type `U`.
///
/// Similar to `String`, but generic over the unit width. The contents are
/// always a well-formed sequence in `U`'s form: the only ways to build one
/// are from scalar values, from another well-formed string, or from a unit
/// buffer that has been validated (or whose well-formedness the caller
/// vouches for with [`from_units_unchecked`]).
///
/// [`from_units_unchecked`]: UtfString::from_units_unchecked
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtfString<U> {
    units: Vec<U>,
}

/// An owned UTF-8 string; bridges to `str`/`String` without copying.
pub type Utf8String = UtfString<u8>;
/// An owned UTF-16 string.
pub type Utf16String = UtfString<u16>;
/// An owned UTF-32 string.
pub type Utf32String = UtfString<u32>;
/// An owned string in the platform's wide-character form.
pub type WideString = UtfString<WideUnit>;
/// An owned string in the platform-native text form. On every supported
/// platform this coincides with the wide form.
pub type TString = WideString;

impl<U: CodeUnit> UtfString<U> {
    /// Creates a new, empty string.
    #[inline]
    pub fn new() -> Self {
        UtfString { units: Vec::new() }
    }

    /// Creates a new, empty string with room for `capacity` units.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        UtfString {
            units: Vec::with_capacity(capacity),
        }
    }

    /// Creates a string from a unit buffer, validating that it is a
    /// well-formed sequence in `U`'s form.
    pub fn from_units(units: Vec<U>) -> Result<Self, DecodeError> {
        match CodePoints::new(&units).find_map(Result::err) {
            // SAFETY: every decode step over `units` just succeeded.
            None => Ok(unsafe { Self::from_units_unchecked(units) }),
            Some(err) => Err(err),
        }
    }

    /// Creates a string from a unit buffer without validating it.
    ///
    /// # Safety
    ///
    /// `units` must be a well-formed sequence in `U`'s encoding form.
    #[inline]
    pub unsafe fn from_units_unchecked(units: Vec<U>) -> Self {
        UtfString { units }
    }

    /// Length in code units (not code points).
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units this string can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.units.capacity()
    }

    /// Reserves capacity for at least `additional` more units.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.units.reserve(additional)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.units.clear()
    }

    /// The read-only view of the code units.
    #[inline]
    pub fn as_units(&self) -> &[U] {
        &self.units
    }

    /// Consumes the string and returns the unit buffer.
    #[inline]
    pub fn into_units(self) -> Vec<U> {
        self.units
    }

    /// Appends one scalar value, in `U`'s encoding form.
    #[inline]
    pub fn push(&mut self, ch: char) {
        U::encode(ch, &mut self.units);
    }

    /// Appends another string of the same form. A unit-level copy; nothing
    /// is re-encoded.
    #[inline]
    pub fn push_utf(&mut self, other: &UtfString<U>) {
        self.units.extend_from_slice(&other.units);
    }

    /// Iterates the string's code points.
    ///
    /// Decoding a well-formed buffer cannot fail, so every item is `Ok`;
    /// the `Result` is shared with decoding arbitrary input slices.
    #[inline]
    pub fn code_points(&self) -> CodePoints<'_, U> {
        CodePoints::new(&self.units)
    }

    /// Iterates the string's scalar values.
    #[inline]
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.code_points()
            .map(|decoded| decoded.unwrap_or(char::REPLACEMENT_CHARACTER))
    }
}

impl UtfString<u8> {
    /// Views the string as `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: the buffer is well-formed UTF-8 by the type's invariant.
        unsafe { str::from_utf8_unchecked(&self.units) }
    }

    /// Consumes the string and converts it to a `String` without copying.
    #[inline]
    pub fn into_string(self) -> String {
        // SAFETY: the buffer is well-formed UTF-8 by the type's invariant.
        unsafe { String::from_utf8_unchecked(self.units) }
    }
}

impl<U: CodeUnit> Default for UtfString<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: CodeUnit> Hash for UtfString<U> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.units.hash(state)
    }
}

/// Formats the string's scalar values.
impl<U: CodeUnit> fmt::Display for UtfString<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

/// Formats the string in double quotes, with characters escaped according to
/// [`char::escape_debug`].
impl<U: CodeUnit> fmt::Debug for UtfString<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for ch in self.chars().flat_map(char::escape_debug) {
            f.write_char(ch)?;
        }
        f.write_str("\"")
    }
}

impl<U: CodeUnit> Extend<char> for UtfString<U> {
    fn extend<T: IntoIterator<Item = char>>(&mut self, iter: T) {
        let iterator = iter.into_iter();
        let (low, _high) = iterator.size_hint();
        // At least one unit per scalar value.
        self.units.reserve(low);
        iterator.for_each(|ch| self.push(ch));
    }
}

impl<U: CodeUnit> FromIterator<char> for UtfString<U> {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        let mut string = UtfString::new();
        string.extend(iter);
        string
    }
}

impl From<&str> for Utf8String {
    fn from(s: &str) -> Self {
        UtfString {
            units: s.as_bytes().to_vec(),
        }
    }
}

impl From<String> for Utf8String {
    fn from(s: String) -> Self {
        UtfString {
            units: s.into_bytes(),
        }
    }
}

impl From<Utf8String> for String {
    fn from(s: Utf8String) -> Self {
        s.into_string()
    }
}

impl From<char> for Utf8String {
    fn from(ch: char) -> Self {
        let mut s = UtfString::new();
        s.push(ch);
        s
    }
}

impl From<UtfString<u16>> for widestring::U16String {
    fn from(s: UtfString<u16>) -> Self {
        widestring::U16String::from_vec(s.into_units())
    }
}

impl From<UtfString<u32>> for widestring::U32String {
    fn from(s: UtfString<u32>) -> Self {
        widestring::U32String::from_vec(s.into_units())
    }
}

impl PartialEq<str> for Utf8String {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Utf8String {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_encodes_in_the_string_form() {
        let mut s = Utf16String::new();
        s.push('H');
        s.push('😀');
        assert_eq!(s.as_units(), [0x0048, 0xD83D, 0xDE00]);
        assert_eq!(s.len(), 3);

        let mut s = Utf32String::new();
        s.push('😀');
        assert_eq!(s.as_units(), [0x1F600]);
    }

    #[test]
    fn from_iter_collects_scalar_values() {
        let s: Utf8String = "héllo".chars().collect();
        assert_eq!(s, "héllo");
        let s: Utf16String = "héllo".chars().collect();
        assert_eq!(s.code_points().count(), 5);
    }

    #[test]
    fn from_units_validates() {
        assert!(Utf16String::from_units(vec![0x0048, 0x0069]).is_ok());
        let err = Utf16String::from_units(vec![0x0048, 0xD800]).unwrap_err();
        assert_eq!(err.offset(), 1);
        assert!(Utf8String::from_units(vec![0xC0, 0x80]).is_err());
        assert!(Utf32String::from_units(vec![0x110000]).is_err());
    }

    #[test]
    fn string_bridges_do_not_reencode() {
        let s = Utf8String::from("touché");
        assert_eq!(s.as_str(), "touché");
        assert_eq!(String::from(s), "touché");

        let s = Utf8String::from(String::from("touché"));
        assert_eq!(s.into_string(), "touché");

        assert_eq!(Utf8String::from('é').as_units(), [0xC3, 0xA9]);
    }

    #[test]
    fn display_and_debug() {
        let s: Utf16String = "a\"b\n".chars().collect();
        assert_eq!(s.to_string(), "a\"b\n");
        assert_eq!(format!("{s:?}"), "\"a\\\"b\\n\"");
    }

    #[test]
    fn push_utf_is_a_unit_copy() {
        let a: Utf16String = "ab".chars().collect();
        let mut b: Utf16String = "c".chars().collect();
        b.push_utf(&a);
        assert_eq!(b.as_units(), [0x63, 0x61, 0x62]);
    }

    #[test]
    fn widestring_interop() {
        let s: UtfString<u16> = "Hi".chars().collect();
        let w: widestring::U16String = s.into();
        assert_eq!(w.as_slice(), [0x48, 0x69]);
    }

    #[test]
    fn empty_string() {
        let s = Utf32String::new();
        assert!(s.is_empty());
        assert_eq!(s.code_points().count(), 0);
        assert_eq!(s.to_string(), "");
    }
}

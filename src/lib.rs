//! Conversion between the Unicode encoding forms: UTF-8, UTF-16, UTF-32, and
//! the platform's wide-character form.
//!
//! The encoding form of a string is identified structurally by its code-unit
//! width: 8-bit units are UTF-8, 16-bit units are UTF-16, and 32-bit units
//! are UTF-32. The wide form is never a rule of its own, only a
//! `cfg`-resolved alias ([`WideUnit`]) for whichever of the 16- and 32-bit
//! forms the target platform uses for wide characters, and the same goes for
//! the platform-native "t" form. The codec for a conversion is therefore
//! selected entirely at compile time, by the [`CodeUnit`] impl of the unit
//! types involved.
//!
//! A conversion is a single pass: decode one code point from the borrowed
//! input view, append its encoding to the owned output string, repeat until
//! the input is exhausted. Every code point a decoder produces is a valid
//! Unicode scalar value; UTF-16 surrogate pairs are combined, and UTF-8
//! sequences that a well-formed encoder could not have produced (overlongs,
//! encoded surrogates, truncations) do not decode.
//!
//! Malformed input is handled by one fixed rule: the offending unit is
//! replaced with U+FFFD and decoding resumes at the next unit, so [`to_utf8`]
//! and the other lossy entry points always complete. Where the caller needs
//! malformed input surfaced instead of repaired, the `try_` variants return
//! the first [`DecodeError`] with the offset of the unit that caused it.

mod code_unit;
mod convert;
mod string;

pub use code_unit::{CodeUnit, DecodeErrorKind, WideUnit};
pub use convert::{CodePoints, DecodeError};
pub use string::{TString, Utf8String, Utf16String, Utf32String, UtfString, WideString};

use core::any::TypeId;

use convert::{convert, try_convert};

/// A string-like value exposing a read-only view of its code units.
///
/// The unit type's width identifies the source encoding form, by the same
/// structural rule as everywhere else in the crate. Implemented for the
/// standard string and slice types, for [`UtfString`], and for the
/// [`widestring`] wide-string types; callers' own types only need to hand
/// out a unit slice.
pub trait AsCodeUnits {
    /// The code-unit type of the value's encoding form.
    type Unit: CodeUnit;

    fn as_code_units(&self) -> &[Self::Unit];
}

impl AsCodeUnits for str {
    type Unit = u8;

    #[inline]
    fn as_code_units(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsCodeUnits for String {
    type Unit = u8;

    #[inline]
    fn as_code_units(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<U: CodeUnit> AsCodeUnits for [U] {
    type Unit = U;

    #[inline]
    fn as_code_units(&self) -> &[U] {
        self
    }
}

impl<U: CodeUnit> AsCodeUnits for Vec<U> {
    type Unit = U;

    #[inline]
    fn as_code_units(&self) -> &[U] {
        self
    }
}

impl<U: CodeUnit> AsCodeUnits for UtfString<U> {
    type Unit = U;

    #[inline]
    fn as_code_units(&self) -> &[U] {
        self.as_units()
    }
}

impl<T: AsCodeUnits + ?Sized> AsCodeUnits for &T {
    type Unit = T::Unit;

    #[inline]
    fn as_code_units(&self) -> &[T::Unit] {
        (**self).as_code_units()
    }
}

impl AsCodeUnits for widestring::U16Str {
    type Unit = u16;

    #[inline]
    fn as_code_units(&self) -> &[u16] {
        self.as_slice()
    }
}

impl AsCodeUnits for widestring::U32Str {
    type Unit = u32;

    #[inline]
    fn as_code_units(&self) -> &[u32] {
        self.as_slice()
    }
}

impl AsCodeUnits for widestring::U16String {
    type Unit = u16;

    #[inline]
    fn as_code_units(&self) -> &[u16] {
        self.as_slice()
    }
}

impl AsCodeUnits for widestring::U32String {
    type Unit = u32;

    #[inline]
    fn as_code_units(&self) -> &[u32] {
        self.as_slice()
    }
}

/// Reinterprets the slice as the destination unit type when source and
/// destination are in fact the same type, i.e. the same encoding form.
fn cast_same_form<S: CodeUnit, D: CodeUnit>(units: &[S]) -> Option<&[D]> {
    if TypeId::of::<S>() == TypeId::of::<D>() {
        // SAFETY: `S` and `D` are the same type per the `TypeId` check, so
        // the two slice types have identical layout.
        Some(unsafe { &*(units as *const [S] as *const [D]) })
    } else {
        None
    }
}

/// Converts any string-like value into an owned string of the form with unit
/// type `D`, substituting U+FFFD for malformed input.
///
/// When the source already uses the destination form, the units are copied
/// over as-is instead of being decoded and re-encoded — an optimization
/// only, taken once a validation scan has shown the copy and the codec path
/// would produce identical output.
pub fn to_utf_string<D: CodeUnit>(s: impl AsCodeUnits) -> UtfString<D> {
    let units = s.as_code_units();
    if let Some(same) = cast_same_form::<_, D>(units) {
        if CodePoints::new(same).all(|decoded| decoded.is_ok()) {
            // SAFETY: the scan above proved `same` well-formed.
            return unsafe { UtfString::from_units_unchecked(same.to_vec()) };
        }
    }
    convert(units)
}

/// Converts any string-like value into an owned string of the form with unit
/// type `D`, stopping at the first malformed sequence.
///
/// Unlike [`to_utf_string`], a same-form source is still fully decoded, so
/// validation is never skipped.
pub fn try_to_utf_string<D: CodeUnit>(s: impl AsCodeUnits) -> Result<UtfString<D>, DecodeError> {
    try_convert(s.as_code_units())
}

/// Converts to an owned UTF-8 string, substituting U+FFFD for malformed
/// input.
#[inline]
pub fn to_utf8(s: impl AsCodeUnits) -> Utf8String {
    to_utf_string(s)
}

/// Converts to an owned UTF-16 string, substituting U+FFFD for malformed
/// input.
#[inline]
pub fn to_utf16(s: impl AsCodeUnits) -> Utf16String {
    to_utf_string(s)
}

/// Converts to an owned UTF-32 string, substituting U+FFFD for malformed
/// input.
#[inline]
pub fn to_utf32(s: impl AsCodeUnits) -> Utf32String {
    to_utf_string(s)
}

/// Converts to an owned string in the platform's wide-character form,
/// substituting U+FFFD for malformed input.
#[inline]
pub fn to_wide(s: impl AsCodeUnits) -> WideString {
    to_utf_string(s)
}

/// Converts to an owned string in the platform-native text form. An alias of
/// [`to_wide`] on every supported platform, kept as its own entry point so
/// call sites name the form they mean.
#[inline]
pub fn to_t(s: impl AsCodeUnits) -> TString {
    to_wide(s)
}

/// Strict [`to_utf8`]: the first malformed sequence is returned as an error.
#[inline]
pub fn try_to_utf8(s: impl AsCodeUnits) -> Result<Utf8String, DecodeError> {
    try_to_utf_string(s)
}

/// Strict [`to_utf16`]: the first malformed sequence is returned as an
/// error.
#[inline]
pub fn try_to_utf16(s: impl AsCodeUnits) -> Result<Utf16String, DecodeError> {
    try_to_utf_string(s)
}

/// Strict [`to_utf32`]: the first malformed sequence is returned as an
/// error.
#[inline]
pub fn try_to_utf32(s: impl AsCodeUnits) -> Result<Utf32String, DecodeError> {
    try_to_utf_string(s)
}

/// Strict [`to_wide`]: the first malformed sequence is returned as an error.
#[inline]
pub fn try_to_wide(s: impl AsCodeUnits) -> Result<WideString, DecodeError> {
    try_to_utf_string(s)
}

/// Strict [`to_t`]: the first malformed sequence is returned as an error.
#[inline]
pub fn try_to_t(s: impl AsCodeUnits) -> Result<TString, DecodeError> {
    try_to_wide(s)
}

//! Marshaling between domain values and their flat C representation
//!
//! Provides the two converter directions:
//! - [`CReprOf::c_repr_of`]: domain value → newly allocated flat value
//! - [`AsRust::as_rust`]: flat value → independent domain value
//!
//! # Memory Safety
//!
//! Conversion out never leaks on failure. Every buffer is first staged in an
//! owning Rust value (`CString`, `Vec`, a flat struct with a `Drop` impl) and
//! raw pointers are only released once nothing else can fail. An error at any
//! point drops what was staged so far.
//!
//! Conversion in only borrows. It copies every string and list out of the
//! flat value, so the result stays valid after the flat value is destroyed.

use crate::error::{FfiError, FfiResult};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uchar};
use std::ptr;

/// Domain → flat conversion
pub trait CReprOf<T>: Sized {
    /// Allocate a flat value mirroring `input`
    ///
    /// # Errors
    ///
    /// `InvalidMessage` if `input` cannot be represented; nothing stays
    /// allocated in that case.
    fn c_repr_of(input: T) -> FfiResult<Self>;
}

/// Flat → domain conversion
pub trait AsRust<T> {
    /// Build an independent domain value from this flat value
    ///
    /// # Errors
    ///
    /// `MalformedFlat` on a null required pointer, a negative or inconsistent
    /// count, an unknown tag, or invalid UTF-8.
    fn as_rust(&self) -> FfiResult<T>;
}

/// Moving flat values in and out of the heap as raw pointers
pub trait RawPointerConverter: Sized {
    /// Box the value and release the pointer
    fn into_raw_pointer(self) -> *const Self {
        Box::into_raw(Box::new(self)) as *const Self
    }

    /// Take back ownership of a pointer released by [`into_raw_pointer`]
    ///
    /// # Safety
    ///
    /// `input` must come from `into_raw_pointer` on the same type and must
    /// not have been taken back already.
    ///
    /// [`into_raw_pointer`]: RawPointerConverter::into_raw_pointer
    unsafe fn from_raw_pointer(input: *const Self) -> FfiResult<Self> {
        if input.is_null() {
            return Err(FfiError::malformed("unexpected null pointer"));
        }
        Ok(*Box::from_raw(input as *mut Self))
    }

    /// Take back and drop
    ///
    /// # Safety
    ///
    /// Same contract as [`RawPointerConverter::from_raw_pointer`].
    unsafe fn drop_raw_pointer(input: *const Self) -> FfiResult<()> {
        Self::from_raw_pointer(input).map(drop)
    }
}

impl<T> RawPointerConverter for T {}

/// Borrow a flat value behind a pointer, rejecting null
///
/// # Safety
///
/// A non-null `input` must point to a live, properly initialized `T` that
/// outlives `'a`.
pub unsafe fn raw_borrow<'a, T>(input: *const T, field: &str) -> FfiResult<&'a T> {
    input
        .as_ref()
        .ok_or_else(|| FfiError::malformed(format!("unexpected null pointer in '{}'", field)))
}

// ===== Strings =====

/// Stage a string as an owned nul-terminated buffer
pub(crate) fn c_string(field: &str, value: String) -> FfiResult<CString> {
    CString::new(value).map_err(|_| FfiError::invalid(field, "contains an interior NUL byte"))
}

pub(crate) fn optional_c_string(field: &str, value: Option<String>) -> FfiResult<Option<CString>> {
    value.map(|v| c_string(field, v)).transpose()
}

/// Release a staged buffer; null stands for absent
pub(crate) fn optional_c_string_into_raw(value: Option<CString>) -> *const c_char {
    value.map_or(ptr::null(), |v| v.into_raw() as *const c_char)
}

/// Free a buffer released by `CString::into_raw`; null is ignored
///
/// # Safety
///
/// `value` must be null or come from `CString::into_raw` and not be freed yet.
pub(crate) unsafe fn take_back_c_string(value: *const c_char) {
    if !value.is_null() {
        drop(CString::from_raw(value as *mut c_char));
    }
}

/// Copy a required string out of foreign memory
///
/// # Safety
///
/// A non-null `value` must point to a nul-terminated buffer.
pub(crate) unsafe fn rust_string_from(value: *const c_char, field: &str) -> FfiResult<String> {
    if value.is_null() {
        return Err(FfiError::malformed(format!(
            "required string '{}' is null",
            field
        )));
    }
    CStr::from_ptr(value)
        .to_str()
        .map(str::to_string)
        .map_err(|e| FfiError::malformed(format!("invalid UTF-8 in '{}': {}", field, e)))
}

/// # Safety
///
/// Same contract as [`rust_string_from`].
pub(crate) unsafe fn optional_rust_string_from(
    value: *const c_char,
    field: &str,
) -> FfiResult<Option<String>> {
    if value.is_null() {
        Ok(None)
    } else {
        rust_string_from(value, field).map(Some)
    }
}

// ===== Optional flat values =====

/// Box an optional flat value; null stands for absent
pub(crate) fn optional_into_raw<T>(value: Option<T>) -> *const T {
    value.map_or(ptr::null(), T::into_raw_pointer)
}

/// # Safety
///
/// A non-null `value` must point to a live `T`.
pub(crate) unsafe fn optional_as_rust<T, U>(value: *const T) -> FfiResult<Option<U>>
where
    T: AsRust<U>,
{
    value.as_ref().map(|v| v.as_rust()).transpose()
}

/// # Safety
///
/// `value` must be null or come from [`optional_into_raw`].
pub(crate) unsafe fn take_back_optional<T>(value: *const T) {
    if !value.is_null() {
        let _ = T::drop_raw_pointer(value);
    }
}

// ===== Optional scalars =====

/// Box an optional scalar; null stands for absent
pub(crate) fn optional_scalar_into_raw<T>(value: Option<T>) -> *const T {
    value.map_or(ptr::null(), |v| Box::into_raw(Box::new(v)) as *const T)
}

/// # Safety
///
/// `value` must be null or come from [`optional_scalar_into_raw`].
pub(crate) unsafe fn take_back_scalar<T>(value: *const T) {
    if !value.is_null() {
        drop(Box::from_raw(value as *mut T));
    }
}

/// # Safety
///
/// A non-null `value` must point to a live `T`.
pub(crate) unsafe fn read_optional_scalar<T: Copy>(value: *const T) -> Option<T> {
    value.as_ref().copied()
}

pub(crate) fn bool_to_c(value: bool) -> c_uchar {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn bool_from_c(value: c_uchar, field: &str) -> FfiResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(FfiError::malformed(format!(
            "'{}' holds {} where a boolean (0 or 1) was expected",
            field, other
        ))),
    }
}

// ===== Counts and offsets =====

pub(crate) fn count_to_c(len: usize, field: &str) -> FfiResult<c_int> {
    c_int::try_from(len)
        .map_err(|_| FfiError::invalid(field, format!("has {} entries, more than a C int can count", len)))
}

pub(crate) fn offset_to_c(value: usize, field: &str) -> FfiResult<c_int> {
    c_int::try_from(value)
        .map_err(|_| FfiError::invalid(field, format!("offset {} does not fit in a C int", value)))
}

pub(crate) fn offset_from_c(value: c_int, field: &str) -> FfiResult<usize> {
    usize::try_from(value)
        .map_err(|_| FfiError::malformed(format!("'{}' holds negative offset {}", field, value)))
}

// ===== Contiguous arrays =====

/// Release a staged list as a contiguous array
///
/// The empty list is published as `(null, 0)`.
pub(crate) fn vec_into_raw<T>(items: Vec<T>, field: &str) -> FfiResult<(*const T, c_int)> {
    let count = count_to_c(items.len(), field)?;
    Ok((slice_into_raw(items), count))
}

/// Release a list whose count is already known to fit
pub(crate) fn slice_into_raw<T>(items: Vec<T>) -> *const T {
    if items.is_empty() {
        return ptr::null();
    }
    Box::into_raw(items.into_boxed_slice()) as *mut T as *const T
}

/// Take back and drop an array released by [`vec_into_raw`]
///
/// # Safety
///
/// `(entries, count)` must come from `vec_into_raw` and not be freed yet.
pub(crate) unsafe fn take_back_vec<T>(entries: *const T, count: c_int) {
    if entries.is_null() || count <= 0 {
        return;
    }
    let slice = ptr::slice_from_raw_parts_mut(entries as *mut T, count as usize);
    drop(Box::from_raw(slice));
}

/// View a foreign `(pointer, count)` pair as a slice
///
/// # Safety
///
/// A non-null `entries` must point to `count` initialized values that
/// outlive `'a`.
pub(crate) unsafe fn flat_slice<'a, T>(
    entries: *const T,
    count: c_int,
    field: &str,
) -> FfiResult<&'a [T]> {
    if count < 0 {
        return Err(FfiError::malformed(format!(
            "'{}' has negative count {}",
            field, count
        )));
    }
    if count == 0 {
        return Ok(&[]);
    }
    if entries.is_null() {
        return Err(FfiError::malformed(format!(
            "'{}' has count {} but a null entries pointer",
            field, count
        )));
    }
    Ok(std::slice::from_raw_parts(entries, count as usize))
}

//! Contiguous list and map layouts
//!
//! A homogeneous list is `(entries, count)`; the empty list is `(null, 0)`.
//! A map of string to string list is a list of `(key, values)` entries with
//! the value list stored inline, so an empty value list is never confused
//! with an absent one.

use crate::error::{FfiError, FfiResult};
use crate::marshal::{
    c_string, count_to_c, flat_slice, rust_string_from, slice_into_raw, take_back_c_string,
    take_back_vec, vec_into_raw, AsRust, CReprOf,
};
use std::collections::BTreeMap;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};

/// Contiguous array of flat values
#[repr(C)]
#[derive(Debug)]
pub struct CArray<T> {
    pub entries: *const T,
    pub count: c_int,
}

impl<T> CArray<T> {
    pub fn len(&self) -> usize {
        usize::try_from(self.count).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, U> CReprOf<Vec<U>> for CArray<T>
where
    T: CReprOf<U>,
{
    fn c_repr_of(input: Vec<U>) -> FfiResult<Self> {
        let items = input
            .into_iter()
            .map(T::c_repr_of)
            .collect::<FfiResult<Vec<T>>>()?;
        let (entries, count) = vec_into_raw(items, "entries")?;
        Ok(Self { entries, count })
    }
}

impl<T, U> AsRust<Vec<U>> for CArray<T>
where
    T: AsRust<U>,
{
    fn as_rust(&self) -> FfiResult<Vec<U>> {
        unsafe { flat_slice(self.entries, self.count, "entries") }?
            .iter()
            .map(|item| item.as_rust())
            .collect()
    }
}

impl<T> Drop for CArray<T> {
    fn drop(&mut self) {
        unsafe { take_back_vec(self.entries, self.count) };
    }
}

/// Array of nul-terminated strings
#[repr(C)]
#[derive(Debug)]
pub struct CStringArray {
    pub data: *const *const c_char,
    pub size: c_int,
}

impl CReprOf<Vec<String>> for CStringArray {
    fn c_repr_of(input: Vec<String>) -> FfiResult<Self> {
        let size = count_to_c(input.len(), "strings")?;
        let staged = input
            .into_iter()
            .map(|value| c_string("strings", value))
            .collect::<FfiResult<Vec<CString>>>()?;
        let raw = staged
            .into_iter()
            .map(|value| value.into_raw() as *const c_char)
            .collect::<Vec<_>>();
        Ok(Self {
            data: slice_into_raw(raw),
            size,
        })
    }
}

impl AsRust<Vec<String>> for CStringArray {
    fn as_rust(&self) -> FfiResult<Vec<String>> {
        unsafe { flat_slice(self.data, self.size, "strings") }?
            .iter()
            .map(|&value| unsafe { rust_string_from(value, "strings") })
            .collect()
    }
}

impl Drop for CStringArray {
    fn drop(&mut self) {
        if self.data.is_null() || self.size <= 0 {
            return;
        }
        unsafe {
            for &value in std::slice::from_raw_parts(self.data, self.size as usize) {
                take_back_c_string(value);
            }
            take_back_vec(self.data, self.size);
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CMapStringToStringArrayEntry {
    pub key: *const c_char,
    pub value: CStringArray,
}

impl Drop for CMapStringToStringArrayEntry {
    fn drop(&mut self) {
        unsafe { take_back_c_string(self.key) };
    }
}

/// Map of string to string list, entries in key order
#[repr(C)]
#[derive(Debug)]
pub struct CMapStringToStringArray {
    pub entries: *const CMapStringToStringArrayEntry,
    pub count: c_int,
}

impl CReprOf<BTreeMap<String, Vec<String>>> for CMapStringToStringArray {
    fn c_repr_of(input: BTreeMap<String, Vec<String>>) -> FfiResult<Self> {
        let mut staged = Vec::with_capacity(input.len());
        for (key, values) in input {
            let key = c_string("key", key)?;
            let value = CStringArray::c_repr_of(values)?;
            staged.push(CMapStringToStringArrayEntry {
                key: key.into_raw(),
                value,
            });
        }
        let (entries, count) = vec_into_raw(staged, "entries")?;
        Ok(Self { entries, count })
    }
}

impl AsRust<BTreeMap<String, Vec<String>>> for CMapStringToStringArray {
    fn as_rust(&self) -> FfiResult<BTreeMap<String, Vec<String>>> {
        let mut result = BTreeMap::new();
        for entry in unsafe { flat_slice(self.entries, self.count, "entries") }? {
            let key = unsafe { rust_string_from(entry.key, "key") }?;
            let values = entry.value.as_rust()?;
            if result.insert(key.clone(), values).is_some() {
                return Err(FfiError::malformed(format!("duplicate map key '{}'", key)));
            }
        }
        Ok(result)
    }
}

impl Drop for CMapStringToStringArray {
    fn drop(&mut self) {
        unsafe { take_back_vec(self.entries, self.count) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ptr;

    #[test]
    fn test_string_array_round_trip() {
        let input = vec!["hello".to_string(), String::new(), "world".to_string()];
        let flat = CStringArray::c_repr_of(input.clone()).unwrap();
        assert_eq!(flat.size, 3);
        assert_eq!(flat.as_rust().unwrap(), input);
    }

    #[test]
    fn test_empty_string_array_is_null_zero() {
        let flat = CStringArray::c_repr_of(vec![]).unwrap();
        assert!(flat.data.is_null());
        assert_eq!(flat.size, 0);
        assert_eq!(flat.as_rust().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_string_array_rejects_nul() {
        let result = CStringArray::c_repr_of(vec!["ok".into(), "b\0d".into()]);
        assert!(matches!(result, Err(FfiError::InvalidMessage { .. })));
    }

    #[test]
    fn test_map_keeps_empty_value_list() {
        let mut input = BTreeMap::new();
        input.insert("films".to_string(), vec!["alien".to_string()]);
        input.insert("empty".to_string(), vec![]);

        let flat = CMapStringToStringArray::c_repr_of(input.clone()).unwrap();
        let back = flat.as_rust().unwrap();
        assert_eq!(back, input);
        assert_eq!(back.get("empty"), Some(&vec![]));
    }

    #[test]
    fn test_map_rejects_duplicate_keys() {
        let key = CString::new("same").unwrap();
        let entries = [
            CMapStringToStringArrayEntry {
                key: key.as_ptr(),
                value: CStringArray {
                    data: ptr::null(),
                    size: 0,
                },
            },
            CMapStringToStringArrayEntry {
                key: key.as_ptr(),
                value: CStringArray {
                    data: ptr::null(),
                    size: 0,
                },
            },
        ];
        let map = std::mem::ManuallyDrop::new(CMapStringToStringArray {
            entries: entries.as_ptr(),
            count: 2,
        });
        let result = map.as_rust();
        // borrowed keys, not ours to free
        std::mem::forget(entries);
        assert!(matches!(result, Err(FfiError::MalformedFlat(_))));
    }

    #[test]
    fn test_array_negative_count() {
        let array = std::mem::ManuallyDrop::new(CStringArray {
            data: ptr::null(),
            size: -1,
        });
        assert!(matches!(array.as_rust(), Err(FfiError::MalformedFlat(_))));
    }
}

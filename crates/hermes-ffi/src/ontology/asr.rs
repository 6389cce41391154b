use super::collections::CArray;
use crate::error::FfiResult;
use crate::marshal::{
    c_string, offset_from_c, offset_to_c, rust_string_from, take_back_c_string, AsRust, CReprOf,
};
use hermes_ontology::{AsrDecodingDuration, AsrToken};
use std::os::raw::{c_char, c_float, c_int};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CAsrDecodingDuration {
    pub start: c_float,
    pub end: c_float,
}

impl From<AsrDecodingDuration> for CAsrDecodingDuration {
    fn from(input: AsrDecodingDuration) -> Self {
        Self {
            start: input.start,
            end: input.end,
        }
    }
}

impl From<CAsrDecodingDuration> for AsrDecodingDuration {
    fn from(input: CAsrDecodingDuration) -> Self {
        Self {
            start: input.start,
            end: input.end,
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CAsrToken {
    pub value: *const c_char,
    pub confidence: c_float,
    pub range_start: c_int,
    pub range_end: c_int,
    pub time: CAsrDecodingDuration,
}

impl CReprOf<AsrToken> for CAsrToken {
    fn c_repr_of(input: AsrToken) -> FfiResult<Self> {
        let range_start = offset_to_c(input.range_start, "range_start")?;
        let range_end = offset_to_c(input.range_end, "range_end")?;
        let value = c_string("value", input.value)?;
        Ok(Self {
            value: value.into_raw(),
            confidence: input.confidence,
            range_start,
            range_end,
            time: input.time.into(),
        })
    }
}

impl AsRust<AsrToken> for CAsrToken {
    fn as_rust(&self) -> FfiResult<AsrToken> {
        Ok(AsrToken {
            value: unsafe { rust_string_from(self.value, "value") }?,
            confidence: self.confidence,
            range_start: offset_from_c(self.range_start, "range_start")?,
            range_end: offset_from_c(self.range_end, "range_end")?,
            time: self.time.into(),
        })
    }
}

impl Drop for CAsrToken {
    fn drop(&mut self) {
        unsafe { take_back_c_string(self.value) };
    }
}

/// Tokens of one ASR pass
pub type CAsrTokenArray = CArray<CAsrToken>;

/// One token list per ASR pass
pub type CAsrTokenDoubleArray = CArray<CAsrTokenArray>;

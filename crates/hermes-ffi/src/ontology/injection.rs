use super::collections::{CArray, CMapStringToStringArray};
use crate::error::{FfiError, FfiResult};
use crate::marshal::{
    optional_c_string, optional_c_string_into_raw, optional_rust_string_from, take_back_c_string,
    AsRust, CReprOf,
};
use hermes_ontology::{InjectionKind, InjectionRequestMessage, MapStringToStringArray, Validate};
use std::os::raw::{c_char, c_int};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CInjectionKind {
    Add = 1,
    AddFromVanilla = 2,
}

impl CInjectionKind {
    fn raw_of(kind: InjectionKind) -> c_int {
        match kind {
            InjectionKind::Add => CInjectionKind::Add as c_int,
            InjectionKind::AddFromVanilla => CInjectionKind::AddFromVanilla as c_int,
        }
    }

    fn parse(raw: c_int) -> FfiResult<InjectionKind> {
        match raw {
            1 => Ok(InjectionKind::Add),
            2 => Ok(InjectionKind::AddFromVanilla),
            other => Err(FfiError::malformed(format!("unknown injection kind {}", other))),
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CInjectionRequestOperation {
    /// One of [`CInjectionKind`]
    pub kind: c_int,
    pub values: CMapStringToStringArray,
}

impl CReprOf<(InjectionKind, MapStringToStringArray)> for CInjectionRequestOperation {
    fn c_repr_of(input: (InjectionKind, MapStringToStringArray)) -> FfiResult<Self> {
        let (kind, values) = input;
        Ok(Self {
            kind: CInjectionKind::raw_of(kind),
            values: CMapStringToStringArray::c_repr_of(values)?,
        })
    }
}

impl AsRust<(InjectionKind, MapStringToStringArray)> for CInjectionRequestOperation {
    fn as_rust(&self) -> FfiResult<(InjectionKind, MapStringToStringArray)> {
        Ok((CInjectionKind::parse(self.kind)?, self.values.as_rust()?))
    }
}

pub type CInjectionRequestOperations = CArray<CInjectionRequestOperation>;

#[repr(C)]
#[derive(Debug)]
pub struct CInjectionRequestMessage {
    pub operations: CInjectionRequestOperations,
    pub lexicon: CMapStringToStringArray,
    /// Nullable
    pub cross_language: *const c_char,
    /// Nullable
    pub id: *const c_char,
}

impl CReprOf<InjectionRequestMessage> for CInjectionRequestMessage {
    fn c_repr_of(input: InjectionRequestMessage) -> FfiResult<Self> {
        input.validate()?;
        let cross_language = optional_c_string("cross_language", input.cross_language)?;
        let id = optional_c_string("id", input.id)?;
        let operations = CInjectionRequestOperations::c_repr_of(input.operations)?;
        let lexicon = CMapStringToStringArray::c_repr_of(input.lexicon)?;
        Ok(Self {
            operations,
            lexicon,
            cross_language: optional_c_string_into_raw(cross_language),
            id: optional_c_string_into_raw(id),
        })
    }
}

impl AsRust<InjectionRequestMessage> for CInjectionRequestMessage {
    fn as_rust(&self) -> FfiResult<InjectionRequestMessage> {
        Ok(InjectionRequestMessage {
            operations: self.operations.as_rust()?,
            lexicon: self.lexicon.as_rust()?,
            cross_language: unsafe {
                optional_rust_string_from(self.cross_language, "cross_language")
            }?,
            id: unsafe { optional_rust_string_from(self.id, "id") }?,
        })
    }
}

impl Drop for CInjectionRequestMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.cross_language);
            take_back_c_string(self.id);
        }
    }
}

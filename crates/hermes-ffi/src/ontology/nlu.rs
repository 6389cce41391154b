//! Flat NLU results and the tagged slot value union
//!
//! A [`CSlotValue`] pairs a raw `value_type` tag with an untyped pointer whose
//! target depends on the tag:
//!
//! | tag                                                   | `value` points to       |
//! |-------------------------------------------------------|-------------------------|
//! | Custom, MusicAlbum/Artist/Track, City, Country, Region | `c_char` string         |
//! | Number, Percentage                                    | `c_double`              |
//! | Ordinal                                               | `i64`                   |
//! | InstantTime                                           | [`CInstantTimeValue`]   |
//! | TimeInterval                                          | [`CTimeIntervalValue`]  |
//! | AmountOfMoney                                         | [`CAmountOfMoneyValue`] |
//! | Temperature                                           | [`CTemperatureValue`]   |
//! | Duration                                              | [`CDurationValue`]      |
//!
//! The tag is kept as a plain `c_int` so that an out-of-range value written
//! by a foreign producer is read as an error instead of an invalid enum.

use super::collections::CArray;
use crate::error::{FfiError, FfiResult};
use crate::marshal::{
    c_string, offset_from_c, offset_to_c, optional_c_string, optional_c_string_into_raw,
    optional_rust_string_from, optional_scalar_into_raw, raw_borrow, read_optional_scalar,
    rust_string_from, take_back_c_string, take_back_scalar, AsRust, CReprOf, RawPointerConverter,
};
use hermes_ontology::{
    AmountOfMoneyValue, DurationValue, Grain, InstantTimeValue, NluIntentClassifierResult, NluSlot,
    NumberValue, OrdinalValue, PercentageValue, Precision, SlotValue, StringValue,
    TemperatureValue, TimeIntervalValue,
};
use std::os::raw::{c_char, c_double, c_float, c_int, c_void};

#[repr(C)]
#[derive(Debug)]
pub struct CNluIntentClassifierResult {
    pub intent_name: *const c_char,
    pub confidence_score: c_float,
}

impl CReprOf<NluIntentClassifierResult> for CNluIntentClassifierResult {
    fn c_repr_of(input: NluIntentClassifierResult) -> FfiResult<Self> {
        let intent_name = c_string("intent_name", input.intent_name)?;
        Ok(Self {
            intent_name: intent_name.into_raw(),
            confidence_score: input.confidence_score,
        })
    }
}

impl AsRust<NluIntentClassifierResult> for CNluIntentClassifierResult {
    fn as_rust(&self) -> FfiResult<NluIntentClassifierResult> {
        Ok(NluIntentClassifierResult {
            intent_name: unsafe { rust_string_from(self.intent_name, "intent_name") }?,
            confidence_score: self.confidence_score,
        })
    }
}

impl Drop for CNluIntentClassifierResult {
    fn drop(&mut self) {
        unsafe { take_back_c_string(self.intent_name) };
    }
}

// ===== Tags =====

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotValueType {
    Custom = 1,
    Number = 2,
    Ordinal = 3,
    InstantTime = 4,
    TimeInterval = 5,
    AmountOfMoney = 6,
    Temperature = 7,
    Duration = 8,
    Percentage = 9,
    MusicAlbum = 10,
    MusicArtist = 11,
    MusicTrack = 12,
    City = 13,
    Country = 14,
    Region = 15,
}

impl SlotValueType {
    const ALL: [SlotValueType; 15] = [
        SlotValueType::Custom,
        SlotValueType::Number,
        SlotValueType::Ordinal,
        SlotValueType::InstantTime,
        SlotValueType::TimeInterval,
        SlotValueType::AmountOfMoney,
        SlotValueType::Temperature,
        SlotValueType::Duration,
        SlotValueType::Percentage,
        SlotValueType::MusicAlbum,
        SlotValueType::MusicArtist,
        SlotValueType::MusicTrack,
        SlotValueType::City,
        SlotValueType::Country,
        SlotValueType::Region,
    ];

    pub fn of(value: &SlotValue) -> Self {
        match value {
            SlotValue::Custom(_) => SlotValueType::Custom,
            SlotValue::Number(_) => SlotValueType::Number,
            SlotValue::Ordinal(_) => SlotValueType::Ordinal,
            SlotValue::InstantTime(_) => SlotValueType::InstantTime,
            SlotValue::TimeInterval(_) => SlotValueType::TimeInterval,
            SlotValue::AmountOfMoney(_) => SlotValueType::AmountOfMoney,
            SlotValue::Temperature(_) => SlotValueType::Temperature,
            SlotValue::Duration(_) => SlotValueType::Duration,
            SlotValue::Percentage(_) => SlotValueType::Percentage,
            SlotValue::MusicAlbum(_) => SlotValueType::MusicAlbum,
            SlotValue::MusicArtist(_) => SlotValueType::MusicArtist,
            SlotValue::MusicTrack(_) => SlotValueType::MusicTrack,
            SlotValue::City(_) => SlotValueType::City,
            SlotValue::Country(_) => SlotValueType::Country,
            SlotValue::Region(_) => SlotValueType::Region,
        }
    }

    pub fn try_from_raw(raw: c_int) -> FfiResult<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| *tag as c_int == raw)
            .ok_or_else(|| FfiError::malformed(format!("unknown slot value type {}", raw)))
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CGrain {
    Year = 0,
    Quarter = 1,
    Month = 2,
    Week = 3,
    Day = 4,
    Hour = 5,
    Minute = 6,
    Second = 7,
}

impl CGrain {
    fn raw_of(grain: Grain) -> c_int {
        let tag = match grain {
            Grain::Year => CGrain::Year,
            Grain::Quarter => CGrain::Quarter,
            Grain::Month => CGrain::Month,
            Grain::Week => CGrain::Week,
            Grain::Day => CGrain::Day,
            Grain::Hour => CGrain::Hour,
            Grain::Minute => CGrain::Minute,
            Grain::Second => CGrain::Second,
        };
        tag as c_int
    }

    fn parse(raw: c_int) -> FfiResult<Grain> {
        Ok(match raw {
            0 => Grain::Year,
            1 => Grain::Quarter,
            2 => Grain::Month,
            3 => Grain::Week,
            4 => Grain::Day,
            5 => Grain::Hour,
            6 => Grain::Minute,
            7 => Grain::Second,
            other => return Err(FfiError::malformed(format!("unknown grain {}", other))),
        })
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CPrecision {
    Approximate = 0,
    Exact = 1,
}

impl CPrecision {
    fn raw_of(precision: Precision) -> c_int {
        match precision {
            Precision::Approximate => CPrecision::Approximate as c_int,
            Precision::Exact => CPrecision::Exact as c_int,
        }
    }

    fn parse(raw: c_int) -> FfiResult<Precision> {
        match raw {
            0 => Ok(Precision::Approximate),
            1 => Ok(Precision::Exact),
            other => Err(FfiError::malformed(format!("unknown precision {}", other))),
        }
    }
}

// ===== Slot value payloads =====

#[repr(C)]
#[derive(Debug)]
pub struct CInstantTimeValue {
    pub value: *const c_char,
    pub grain: c_int,
    pub precision: c_int,
}

impl CReprOf<InstantTimeValue> for CInstantTimeValue {
    fn c_repr_of(input: InstantTimeValue) -> FfiResult<Self> {
        let value = c_string("value", input.value)?;
        Ok(Self {
            value: value.into_raw(),
            grain: CGrain::raw_of(input.grain),
            precision: CPrecision::raw_of(input.precision),
        })
    }
}

impl AsRust<InstantTimeValue> for CInstantTimeValue {
    fn as_rust(&self) -> FfiResult<InstantTimeValue> {
        Ok(InstantTimeValue {
            value: unsafe { rust_string_from(self.value, "value") }?,
            grain: CGrain::parse(self.grain)?,
            precision: CPrecision::parse(self.precision)?,
        })
    }
}

impl Drop for CInstantTimeValue {
    fn drop(&mut self) {
        unsafe { take_back_c_string(self.value) };
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CTimeIntervalValue {
    /// Nullable
    pub from: *const c_char,
    /// Nullable
    pub to: *const c_char,
}

impl CReprOf<TimeIntervalValue> for CTimeIntervalValue {
    fn c_repr_of(input: TimeIntervalValue) -> FfiResult<Self> {
        let from = optional_c_string("from", input.from)?;
        let to = optional_c_string("to", input.to)?;
        Ok(Self {
            from: optional_c_string_into_raw(from),
            to: optional_c_string_into_raw(to),
        })
    }
}

impl AsRust<TimeIntervalValue> for CTimeIntervalValue {
    fn as_rust(&self) -> FfiResult<TimeIntervalValue> {
        Ok(TimeIntervalValue {
            from: unsafe { optional_rust_string_from(self.from, "from") }?,
            to: unsafe { optional_rust_string_from(self.to, "to") }?,
        })
    }
}

impl Drop for CTimeIntervalValue {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.from);
            take_back_c_string(self.to);
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CAmountOfMoneyValue {
    /// Nullable
    pub unit: *const c_char,
    pub value: c_float,
    pub precision: c_int,
}

impl CReprOf<AmountOfMoneyValue> for CAmountOfMoneyValue {
    fn c_repr_of(input: AmountOfMoneyValue) -> FfiResult<Self> {
        let unit = optional_c_string("unit", input.unit)?;
        Ok(Self {
            unit: optional_c_string_into_raw(unit),
            value: input.value,
            precision: CPrecision::raw_of(input.precision),
        })
    }
}

impl AsRust<AmountOfMoneyValue> for CAmountOfMoneyValue {
    fn as_rust(&self) -> FfiResult<AmountOfMoneyValue> {
        Ok(AmountOfMoneyValue {
            value: self.value,
            precision: CPrecision::parse(self.precision)?,
            unit: unsafe { optional_rust_string_from(self.unit, "unit") }?,
        })
    }
}

impl Drop for CAmountOfMoneyValue {
    fn drop(&mut self) {
        unsafe { take_back_c_string(self.unit) };
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CTemperatureValue {
    /// Nullable
    pub unit: *const c_char,
    pub value: c_float,
}

impl CReprOf<TemperatureValue> for CTemperatureValue {
    fn c_repr_of(input: TemperatureValue) -> FfiResult<Self> {
        let unit = optional_c_string("unit", input.unit)?;
        Ok(Self {
            unit: optional_c_string_into_raw(unit),
            value: input.value,
        })
    }
}

impl AsRust<TemperatureValue> for CTemperatureValue {
    fn as_rust(&self) -> FfiResult<TemperatureValue> {
        Ok(TemperatureValue {
            value: self.value,
            unit: unsafe { optional_rust_string_from(self.unit, "unit") }?,
        })
    }
}

impl Drop for CTemperatureValue {
    fn drop(&mut self) {
        unsafe { take_back_c_string(self.unit) };
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CDurationValue {
    pub years: i64,
    pub quarters: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub precision: c_int,
}

impl From<DurationValue> for CDurationValue {
    fn from(input: DurationValue) -> Self {
        Self {
            years: input.years,
            quarters: input.quarters,
            months: input.months,
            weeks: input.weeks,
            days: input.days,
            hours: input.hours,
            minutes: input.minutes,
            seconds: input.seconds,
            precision: CPrecision::raw_of(input.precision),
        }
    }
}

impl AsRust<DurationValue> for CDurationValue {
    fn as_rust(&self) -> FfiResult<DurationValue> {
        Ok(DurationValue {
            years: self.years,
            quarters: self.quarters,
            months: self.months,
            weeks: self.weeks,
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            precision: CPrecision::parse(self.precision)?,
        })
    }
}

// ===== Tagged union =====

#[repr(C)]
#[derive(Debug)]
pub struct CSlotValue {
    /// One of [`SlotValueType`]
    pub value_type: c_int,
    pub value: *const c_void,
}

fn string_payload(field: &str, value: StringValue) -> FfiResult<*const c_void> {
    Ok(c_string(field, value.value)?.into_raw() as *const c_void)
}

fn boxed_payload<T>(value: T) -> *const c_void {
    value.into_raw_pointer() as *const c_void
}

impl CReprOf<SlotValue> for CSlotValue {
    fn c_repr_of(input: SlotValue) -> FfiResult<Self> {
        let value_type = SlotValueType::of(&input) as c_int;
        let value = match input {
            SlotValue::Custom(v)
            | SlotValue::MusicAlbum(v)
            | SlotValue::MusicArtist(v)
            | SlotValue::MusicTrack(v)
            | SlotValue::City(v)
            | SlotValue::Country(v)
            | SlotValue::Region(v) => string_payload("value", v)?,
            SlotValue::Number(NumberValue { value }) => boxed_payload::<c_double>(value),
            SlotValue::Percentage(PercentageValue { value }) => boxed_payload::<c_double>(value),
            SlotValue::Ordinal(OrdinalValue { value }) => boxed_payload::<i64>(value),
            SlotValue::InstantTime(v) => boxed_payload(CInstantTimeValue::c_repr_of(v)?),
            SlotValue::TimeInterval(v) => boxed_payload(CTimeIntervalValue::c_repr_of(v)?),
            SlotValue::AmountOfMoney(v) => boxed_payload(CAmountOfMoneyValue::c_repr_of(v)?),
            SlotValue::Temperature(v) => boxed_payload(CTemperatureValue::c_repr_of(v)?),
            SlotValue::Duration(v) => boxed_payload(CDurationValue::from(v)),
        };
        Ok(Self { value_type, value })
    }
}

impl AsRust<SlotValue> for CSlotValue {
    fn as_rust(&self) -> FfiResult<SlotValue> {
        let tag = SlotValueType::try_from_raw(self.value_type)?;
        let text = || -> FfiResult<StringValue> {
            Ok(unsafe { rust_string_from(self.value as *const c_char, "value") }?.into())
        };
        unsafe {
            Ok(match tag {
                SlotValueType::Custom => SlotValue::Custom(text()?),
                SlotValueType::MusicAlbum => SlotValue::MusicAlbum(text()?),
                SlotValueType::MusicArtist => SlotValue::MusicArtist(text()?),
                SlotValueType::MusicTrack => SlotValue::MusicTrack(text()?),
                SlotValueType::City => SlotValue::City(text()?),
                SlotValueType::Country => SlotValue::Country(text()?),
                SlotValueType::Region => SlotValue::Region(text()?),
                SlotValueType::Number => SlotValue::Number(NumberValue {
                    value: *raw_borrow(self.value as *const c_double, "value")?,
                }),
                SlotValueType::Percentage => SlotValue::Percentage(PercentageValue {
                    value: *raw_borrow(self.value as *const c_double, "value")?,
                }),
                SlotValueType::Ordinal => SlotValue::Ordinal(OrdinalValue {
                    value: *raw_borrow(self.value as *const i64, "value")?,
                }),
                SlotValueType::InstantTime => SlotValue::InstantTime(
                    raw_borrow(self.value as *const CInstantTimeValue, "value")?.as_rust()?,
                ),
                SlotValueType::TimeInterval => SlotValue::TimeInterval(
                    raw_borrow(self.value as *const CTimeIntervalValue, "value")?.as_rust()?,
                ),
                SlotValueType::AmountOfMoney => SlotValue::AmountOfMoney(
                    raw_borrow(self.value as *const CAmountOfMoneyValue, "value")?.as_rust()?,
                ),
                SlotValueType::Temperature => SlotValue::Temperature(
                    raw_borrow(self.value as *const CTemperatureValue, "value")?.as_rust()?,
                ),
                SlotValueType::Duration => SlotValue::Duration(
                    raw_borrow(self.value as *const CDurationValue, "value")?.as_rust()?,
                ),
            })
        }
    }
}

impl Drop for CSlotValue {
    fn drop(&mut self) {
        if self.value.is_null() {
            return;
        }
        // An unknown tag does not say how to free the payload: leak it.
        let Ok(tag) = SlotValueType::try_from_raw(self.value_type) else {
            return;
        };
        unsafe {
            let _ = match tag {
                SlotValueType::Custom
                | SlotValueType::MusicAlbum
                | SlotValueType::MusicArtist
                | SlotValueType::MusicTrack
                | SlotValueType::City
                | SlotValueType::Country
                | SlotValueType::Region => {
                    take_back_c_string(self.value as *const c_char);
                    Ok(())
                }
                SlotValueType::Number | SlotValueType::Percentage => {
                    c_double::drop_raw_pointer(self.value as _)
                }
                SlotValueType::Ordinal => i64::drop_raw_pointer(self.value as _),
                SlotValueType::InstantTime => CInstantTimeValue::drop_raw_pointer(self.value as _),
                SlotValueType::TimeInterval => {
                    CTimeIntervalValue::drop_raw_pointer(self.value as _)
                }
                SlotValueType::AmountOfMoney => {
                    CAmountOfMoneyValue::drop_raw_pointer(self.value as _)
                }
                SlotValueType::Temperature => CTemperatureValue::drop_raw_pointer(self.value as _),
                SlotValueType::Duration => CDurationValue::drop_raw_pointer(self.value as _),
            };
        }
    }
}

// ===== Slots =====

#[repr(C)]
#[derive(Debug)]
pub struct CNluSlot {
    pub raw_value: *const c_char,
    pub value: CSlotValue,
    pub range_start: c_int,
    pub range_end: c_int,
    pub entity: *const c_char,
    pub slot_name: *const c_char,
    /// Nullable
    pub confidence_score: *const c_float,
}

impl CReprOf<NluSlot> for CNluSlot {
    fn c_repr_of(input: NluSlot) -> FfiResult<Self> {
        let range_start = offset_to_c(input.range.start, "range_start")?;
        let range_end = offset_to_c(input.range.end, "range_end")?;
        let raw_value = c_string("raw_value", input.raw_value)?;
        let entity = c_string("entity", input.entity)?;
        let slot_name = c_string("slot_name", input.slot_name)?;
        let value = CSlotValue::c_repr_of(input.value)?;
        Ok(Self {
            raw_value: raw_value.into_raw(),
            value,
            range_start,
            range_end,
            entity: entity.into_raw(),
            slot_name: slot_name.into_raw(),
            confidence_score: optional_scalar_into_raw(input.confidence_score),
        })
    }
}

impl AsRust<NluSlot> for CNluSlot {
    fn as_rust(&self) -> FfiResult<NluSlot> {
        let start = offset_from_c(self.range_start, "range_start")?;
        let end = offset_from_c(self.range_end, "range_end")?;
        Ok(NluSlot {
            raw_value: unsafe { rust_string_from(self.raw_value, "raw_value") }?,
            value: self.value.as_rust()?,
            range: start..end,
            entity: unsafe { rust_string_from(self.entity, "entity") }?,
            slot_name: unsafe { rust_string_from(self.slot_name, "slot_name") }?,
            confidence_score: unsafe { read_optional_scalar(self.confidence_score) },
        })
    }
}

impl Drop for CNluSlot {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.raw_value);
            take_back_c_string(self.entity);
            take_back_c_string(self.slot_name);
            take_back_scalar(self.confidence_score);
        }
    }
}

pub type CNluSlotArray = CArray<CNluSlot>;

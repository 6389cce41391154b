//! NLU results: intent classification, slots and typed slot values

use crate::validate::{finite, optional_finite, optional_text, text, Validate};
use crate::OntologyResult;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Outcome of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NluIntentClassifierResult {
    pub intent_name: String,
    pub confidence_score: f32,
}

impl Validate for NluIntentClassifierResult {
    fn validate(&self) -> OntologyResult<()> {
        text("intent_name", &self.intent_name)?;
        finite("confidence_score", self.confidence_score)
    }
}

/// A slot extracted from the input, owning its typed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NluSlot {
    pub raw_value: String,
    pub value: SlotValue,
    /// Character range of `raw_value` in the input
    pub range: Range<usize>,
    pub entity: String,
    pub slot_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
}

impl Validate for NluSlot {
    fn validate(&self) -> OntologyResult<()> {
        text("raw_value", &self.raw_value)?;
        self.value.validate()?;
        text("entity", &self.entity)?;
        text("slot_name", &self.slot_name)?;
        optional_finite("confidence_score", self.confidence_score)
    }
}

/// Closed set of slot value shapes, keyed by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SlotValue {
    Custom(StringValue),
    Number(NumberValue),
    Ordinal(OrdinalValue),
    Percentage(PercentageValue),
    InstantTime(InstantTimeValue),
    TimeInterval(TimeIntervalValue),
    AmountOfMoney(AmountOfMoneyValue),
    Temperature(TemperatureValue),
    Duration(DurationValue),
    MusicAlbum(StringValue),
    MusicArtist(StringValue),
    MusicTrack(StringValue),
    City(StringValue),
    Country(StringValue),
    Region(StringValue),
}

impl SlotValue {
    /// Name of the variant, as written in the `kind` tag
    pub fn kind(&self) -> &'static str {
        match self {
            SlotValue::Custom(_) => "Custom",
            SlotValue::Number(_) => "Number",
            SlotValue::Ordinal(_) => "Ordinal",
            SlotValue::Percentage(_) => "Percentage",
            SlotValue::InstantTime(_) => "InstantTime",
            SlotValue::TimeInterval(_) => "TimeInterval",
            SlotValue::AmountOfMoney(_) => "AmountOfMoney",
            SlotValue::Temperature(_) => "Temperature",
            SlotValue::Duration(_) => "Duration",
            SlotValue::MusicAlbum(_) => "MusicAlbum",
            SlotValue::MusicArtist(_) => "MusicArtist",
            SlotValue::MusicTrack(_) => "MusicTrack",
            SlotValue::City(_) => "City",
            SlotValue::Country(_) => "Country",
            SlotValue::Region(_) => "Region",
        }
    }
}

impl Validate for SlotValue {
    fn validate(&self) -> OntologyResult<()> {
        match self {
            SlotValue::Custom(v)
            | SlotValue::MusicAlbum(v)
            | SlotValue::MusicArtist(v)
            | SlotValue::MusicTrack(v)
            | SlotValue::City(v)
            | SlotValue::Country(v)
            | SlotValue::Region(v) => text("value", &v.value),
            SlotValue::InstantTime(v) => text("value", &v.value),
            SlotValue::TimeInterval(v) => {
                optional_text("from", v.from.as_ref())?;
                optional_text("to", v.to.as_ref())
            }
            SlotValue::AmountOfMoney(v) => {
                finite("value", v.value)?;
                optional_text("unit", v.unit.as_ref())
            }
            SlotValue::Temperature(v) => {
                finite("value", v.value)?;
                optional_text("unit", v.unit.as_ref())
            }
            SlotValue::Number(v) => finite("value", v.value),
            SlotValue::Percentage(v) => finite("value", v.value),
            SlotValue::Ordinal(_) | SlotValue::Duration(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringValue {
    pub value: String,
}

impl From<String> for StringValue {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl From<&str> for StringValue {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberValue {
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalValue {
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageValue {
    pub value: f64,
}

/// A point in time, ISO-8601 formatted, with its resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantTimeValue {
    pub value: String,
    pub grain: Grain,
    pub precision: Precision,
}

/// A time interval; either bound may be open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeIntervalValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountOfMoneyValue {
    pub value: f32,
    pub precision: Precision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureValue {
    pub value: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationValue {
    pub years: i64,
    pub quarters: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub precision: Precision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grain {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    Approximate,
    Exact,
}

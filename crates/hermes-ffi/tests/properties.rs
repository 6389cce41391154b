//! Property tests: identity of every round trip over generated messages

use hermes_ffi::ontology::{
    CAsrTokenDoubleArray, CContinueSessionMessage, CDialogueConfigureMessage, CIntentMessage,
    CMapStringToStringArray,
};
use hermes_ffi::{verify, FfiError, FfiResult, Gateway};
use hermes_ontology::*;
use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use std::sync::OnceLock;

fn gateway() -> &'static Gateway {
    static GATEWAY: OnceLock<Gateway> = OnceLock::new();
    GATEWAY.get_or_init(Gateway::loopback)
}

// ============================================================================
// Strategies
// ============================================================================

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 éàü_-]{0,12}"
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,10}"
}

fn unit_f32() -> impl Strategy<Value = f32> {
    (0u32..=1000).prop_map(|n| n as f32 / 1000.0)
}

/// Exactly representable, so the JSON text is never ambiguous
fn any_f32() -> impl Strategy<Value = f32> {
    (-1_000_000i32..1_000_000).prop_map(|n| n as f32 / 64.0)
}

/// Includes NaN and the infinities, which no message may carry
fn any_f64() -> impl Strategy<Value = f64> {
    any::<f64>()
}

fn asr_token() -> impl Strategy<Value = AsrToken> {
    (text(), unit_f32(), 0usize..1000, 0usize..1000, any_f32(), any_f32()).prop_map(
        |(value, confidence, range_start, range_end, start, end)| AsrToken {
            value,
            confidence,
            range_start,
            range_end,
            time: AsrDecodingDuration { start, end },
        },
    )
}

fn precision() -> impl Strategy<Value = Precision> {
    prop_oneof![Just(Precision::Approximate), Just(Precision::Exact)]
}

fn grain() -> impl Strategy<Value = Grain> {
    prop_oneof![
        Just(Grain::Year),
        Just(Grain::Quarter),
        Just(Grain::Month),
        Just(Grain::Week),
        Just(Grain::Day),
        Just(Grain::Hour),
        Just(Grain::Minute),
        Just(Grain::Second),
    ]
}

fn slot_value() -> impl Strategy<Value = SlotValue> {
    prop_oneof![
        text().prop_map(|v| SlotValue::Custom(v.into())),
        any_f64().prop_map(|value| SlotValue::Number(NumberValue { value })),
        any::<i64>().prop_map(|value| SlotValue::Ordinal(OrdinalValue { value })),
        any_f64().prop_map(|value| SlotValue::Percentage(PercentageValue { value })),
        (text(), grain(), precision()).prop_map(|(value, grain, precision)| {
            SlotValue::InstantTime(InstantTimeValue {
                value,
                grain,
                precision,
            })
        }),
        (option::of(text()), option::of(text()))
            .prop_map(|(from, to)| SlotValue::TimeInterval(TimeIntervalValue { from, to })),
        (any_f32(), precision(), option::of(text())).prop_map(|(value, precision, unit)| {
            SlotValue::AmountOfMoney(AmountOfMoneyValue {
                value,
                precision,
                unit,
            })
        }),
        (any_f32(), option::of(text()))
            .prop_map(|(value, unit)| SlotValue::Temperature(TemperatureValue { value, unit })),
        (vec(any::<i64>(), 8), precision()).prop_map(|(d, precision)| {
            SlotValue::Duration(DurationValue {
                years: d[0],
                quarters: d[1],
                months: d[2],
                weeks: d[3],
                days: d[4],
                hours: d[5],
                minutes: d[6],
                seconds: d[7],
                precision,
            })
        }),
        text().prop_map(|v| SlotValue::MusicAlbum(v.into())),
        text().prop_map(|v| SlotValue::MusicArtist(v.into())),
        text().prop_map(|v| SlotValue::MusicTrack(v.into())),
        text().prop_map(|v| SlotValue::City(v.into())),
        text().prop_map(|v| SlotValue::Country(v.into())),
        text().prop_map(|v| SlotValue::Region(v.into())),
    ]
}

fn nlu_slot() -> impl Strategy<Value = NluSlot> {
    (
        text(),
        slot_value(),
        0usize..500,
        0usize..500,
        text(),
        text(),
        option::of(unit_f32()),
    )
        .prop_map(
            |(raw_value, value, start, len, entity, slot_name, confidence_score)| NluSlot {
                raw_value,
                value,
                range: start..start + len,
                entity,
                slot_name,
                confidence_score,
            },
        )
}

fn intent_message() -> impl Strategy<Value = IntentMessage> {
    (
        identifier(),
        identifier(),
        option::of(text()),
        text(),
        (text(), unit_f32()),
        vec(nlu_slot(), 0..4),
        option::of(vec(vec(asr_token(), 0..4), 0..3)),
        option::of(unit_f32()),
    )
        .prop_map(
            |(session_id, site_id, custom_data, input, intent, slots, asr_tokens, asr_confidence)| {
                let (intent_name, confidence_score) = intent;
                IntentMessage {
                    session_id,
                    site_id,
                    custom_data,
                    input,
                    intent: NluIntentClassifierResult {
                        intent_name,
                        confidence_score,
                    },
                    slots,
                    asr_tokens,
                    asr_confidence,
                }
            },
        )
}

fn string_map() -> impl Strategy<Value = MapStringToStringArray> {
    btree_map(text(), vec(text(), 0..4), 0..5)
}

fn continue_session() -> impl Strategy<Value = ContinueSessionMessage> {
    (
        identifier(),
        text(),
        option::of(vec(text(), 0..3)),
        option::of(text()),
        option::of(text()),
        any::<bool>(),
    )
        .prop_map(
            |(session_id, text, intent_filter, custom_data, slot, send_intent_not_recognized)| {
                ContinueSessionMessage {
                    session_id,
                    text,
                    intent_filter,
                    custom_data,
                    slot,
                    send_intent_not_recognized,
                }
            },
        )
}

fn dialogue_configure() -> impl Strategy<Value = DialogueConfigureMessage> {
    let intent = (text(), option::of(any::<bool>()))
        .prop_map(|(intent_id, enable)| DialogueConfigureIntent { intent_id, enable });
    (option::of(identifier()), option::of(vec(intent, 0..4)))
        .prop_map(|(site_id, intents)| DialogueConfigureMessage { site_id, intents })
}

/// A valid message must come back unchanged; an invalid one must be
/// rejected before it reaches the engine
fn accepted_iff_valid<M: Validate, T>(message: &M, result: FfiResult<T>) -> Result<(), TestCaseError> {
    match (message.validate(), result) {
        (Ok(()), Ok(_)) => Ok(()),
        (Err(_), Err(FfiError::InvalidMessage { .. })) => Ok(()),
        (valid, Err(e)) => Err(TestCaseError::fail(format!("valid: {}, rejected with {}", valid.is_ok(), e))),
        (Err(e), Ok(_)) => Err(TestCaseError::fail(format!("invalid message crossed: {}", e))),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_intent_local_round_trip(message in intent_message()) {
        let result = verify::local_round_trip::<CIntentMessage>(&message);
        if let Ok(back) = &result {
            prop_assert_eq!(back, &message);
        }
        accepted_iff_valid(&message, result)?;
    }

    #[test]
    fn prop_intent_parity(message in intent_message()) {
        accepted_iff_valid(&message, verify::check_parity::<CIntentMessage>(gateway(), &message))?;
    }

    #[test]
    fn prop_number_slot_crosses_iff_finite(value in any_f64()) {
        let message = IntentMessage {
            session_id: "session".into(),
            site_id: "kitchen".into(),
            custom_data: None,
            input: "set it to that".into(),
            intent: NluIntentClassifierResult {
                intent_name: "set".into(),
                confidence_score: 0.5,
            },
            slots: vec![NluSlot {
                raw_value: "that".into(),
                value: SlotValue::Number(NumberValue { value }),
                range: 10..14,
                entity: "snips/number".into(),
                slot_name: "level".into(),
                confidence_score: None,
            }],
            asr_tokens: None,
            asr_confidence: None,
        };
        let result = verify::check_parity::<CIntentMessage>(gateway(), &message);
        prop_assert_eq!(result.is_ok(), value.is_finite());
        accepted_iff_valid(&message, result)?;
    }

    #[test]
    fn prop_token_lists_parity(message in vec(vec(asr_token(), 0..5), 0..4)) {
        let received = verify::check_flat::<CAsrTokenDoubleArray>(gateway(), &message).unwrap();
        let lengths: Vec<_> = received.iter().map(Vec::len).collect();
        let expected: Vec<_> = message.iter().map(Vec::len).collect();
        prop_assert_eq!(lengths, expected);
        prop_assert!(verify::check_json(gateway(), &message).is_ok());
    }

    #[test]
    fn prop_map_parity(message in string_map()) {
        prop_assert!(verify::check_parity::<CMapStringToStringArray>(gateway(), &message).is_ok());
    }

    #[test]
    fn prop_continue_session_parity(message in continue_session()) {
        prop_assert!(verify::check_parity::<CContinueSessionMessage>(gateway(), &message).is_ok());
    }

    #[test]
    fn prop_dialogue_configure_parity(message in dialogue_configure()) {
        prop_assert!(verify::check_parity::<CDialogueConfigureMessage>(gateway(), &message).is_ok());
    }
}

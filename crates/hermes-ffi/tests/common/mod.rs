//! Shared message fixtures for the boundary tests

#![allow(dead_code)]

use hermes_ontology::*;

pub fn token(value: &str, confidence: f32, start: usize, end: usize) -> AsrToken {
    AsrToken {
        value: value.to_string(),
        confidence,
        range_start: start,
        range_end: end,
        time: AsrDecodingDuration {
            start: start as f32 * 0.25,
            end: end as f32 * 0.25,
        },
    }
}

pub fn tokens() -> Vec<AsrToken> {
    vec![
        token("hello", 0.5, 1, 4),
        token("world", 0.75, 5, 9),
        token("again", 0.125, 10, 15),
    ]
}

pub fn slot(name: &str, value: SlotValue) -> NluSlot {
    NluSlot {
        raw_value: "some raw value".into(),
        value,
        range: 2..14,
        entity: "some entity".into(),
        slot_name: name.to_string(),
        confidence_score: Some(0.8),
    }
}

pub fn map(entries: Vec<(&str, Vec<&str>)>) -> MapStringToStringArray {
    entries
        .into_iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.into_iter().map(String::from).collect(),
            )
        })
        .collect()
}

pub fn start_session() -> StartSessionMessage {
    StartSessionMessage {
        init: SessionInit::Action {
            text: Some("what would you like?".into()),
            intent_filter: Some(vec!["weather".into(), "music".into()]),
            can_be_enqueued: true,
            send_intent_not_recognized: false,
        },
        custom_data: Some("custom data".into()),
        site_id: Some("kitchen".into()),
    }
}

pub fn start_notification() -> StartSessionMessage {
    StartSessionMessage {
        init: SessionInit::Notification {
            text: "the oven is hot".into(),
        },
        custom_data: None,
        site_id: None,
    }
}

pub fn continue_session() -> ContinueSessionMessage {
    ContinueSessionMessage {
        session_id: "session id".into(),
        text: "which city?".into(),
        intent_filter: Some(vec![]),
        custom_data: None,
        slot: Some("city".into()),
        send_intent_not_recognized: true,
    }
}

pub fn end_session() -> EndSessionMessage {
    EndSessionMessage {
        session_id: "session id".into(),
        text: Some("goodbye".into()),
    }
}

pub fn session_queued() -> SessionQueuedMessage {
    SessionQueuedMessage {
        session_id: "session id".into(),
        site_id: "site id".into(),
        custom_data: Some("custom data".into()),
    }
}

pub fn session_started() -> SessionStartedMessage {
    SessionStartedMessage {
        session_id: "session id".into(),
        site_id: "site id".into(),
        custom_data: None,
        reactivated_from_session_id: Some("previous session".into()),
    }
}

pub fn session_ended(termination: SessionTerminationType) -> SessionEndedMessage {
    SessionEndedMessage {
        session_id: "session id".into(),
        site_id: "site id".into(),
        custom_data: Some("custom data".into()),
        termination,
    }
}

pub fn intent() -> IntentMessage {
    IntentMessage {
        session_id: "session id".into(),
        site_id: "site id".into(),
        custom_data: Some("custom data".into()),
        input: "play some music by the band".into(),
        intent: NluIntentClassifierResult {
            intent_name: "playMusic".into(),
            confidence_score: 0.5,
        },
        slots: vec![
            slot("artist", SlotValue::MusicArtist("the band".into())),
            slot("volume", SlotValue::Percentage(PercentageValue { value: 42.5 })),
        ],
        asr_tokens: Some(vec![tokens(), vec![]]),
        asr_confidence: Some(0.9),
    }
}

pub fn intent_not_recognized() -> IntentNotRecognizedMessage {
    IntentNotRecognizedMessage {
        session_id: "session id".into(),
        site_id: "site id".into(),
        input: None,
        custom_data: Some("custom data".into()),
        confidence_score: 0.25,
    }
}

pub fn text_captured() -> TextCapturedMessage {
    TextCapturedMessage {
        text: "hello world again".into(),
        likelihood: 0.5,
        tokens: Some(tokens()),
        seconds: 4.5,
        site_id: "site id".into(),
        session_id: Some("session id".into()),
    }
}

pub fn injection_request() -> InjectionRequestMessage {
    InjectionRequestMessage {
        operations: vec![
            (
                InjectionKind::Add,
                map(vec![(
                    "films",
                    vec!["The Wolf of Wall Street", "The Lord of the Rings"],
                )]),
            ),
            (InjectionKind::AddFromVanilla, map(vec![("artists", vec![])])),
        ],
        lexicon: map(vec![("wolf", vec!["w O l f"])]),
        cross_language: Some("en".into()),
        id: Some("injection id".into()),
    }
}

pub fn dialogue_configure() -> DialogueConfigureMessage {
    DialogueConfigureMessage {
        site_id: Some("kitchen".into()),
        intents: Some(vec![
            DialogueConfigureIntent {
                intent_id: "weather".into(),
                enable: Some(true),
            },
            DialogueConfigureIntent {
                intent_id: "music".into(),
                enable: Some(false),
            },
            DialogueConfigureIntent {
                intent_id: "alarm".into(),
                enable: None,
            },
        ]),
    }
}

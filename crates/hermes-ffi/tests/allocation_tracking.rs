//! Every allocation made while crossing the boundary is released, on success
//! and on every failure path
//!
//! A counting global allocator tracks live allocations per thread. Each
//! scenario runs once to warm up one-time state (symbol tables, the error
//! slot), then again under measurement, where the net count must be zero.

mod common;

use common::*;
use hermes_ffi::ontology::*;
use hermes_ffi::{verify, AsRust, CReprOf, FfiResult, Gateway, RoundTripKind};
use hermes_ontology::{EndSessionMessage, IntentMessage, SessionQueuedMessage, SessionTerminationType};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ptr;

struct CountingAllocator;

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

fn adjust(delta: isize) {
    let _ = LIVE.try_with(|live| live.set(live.get() + delta));
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            adjust(1);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            adjust(1);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        adjust(-1);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        System.realloc(ptr, layout, new_size)
    }
}

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

fn live() -> isize {
    LIVE.try_with(Cell::get).unwrap_or(0)
}

/// Net live allocations left behind by `scenario`, after a warm-up run
fn leaked(name: &str, scenario: impl Fn()) -> isize {
    scenario();
    let before = live();
    scenario();
    let net = live() - before;
    if net != 0 {
        eprintln!("{}: {} allocations still live", name, net);
    }
    net
}

fn flat_round_trip<K: RoundTripKind>(gateway: &Gateway, message: &K::Domain) {
    verify::check_flat::<K>(gateway, message).unwrap();
}

fn json_round_trip<K: RoundTripKind>(gateway: &Gateway, message: &K::Domain) {
    verify::check_json(gateway, message).unwrap();
}

fn local_round_trip<K: RoundTripKind>(message: &K::Domain) {
    verify::local_round_trip::<K>(message).unwrap();
}

// One test, so no other test thread frees what this thread allocated.
#[test]
fn test_no_allocation_outlives_its_round_trip() {
    let gateway = Gateway::loopback();
    let mut failures = Vec::new();
    let mut check = |name: &str, scenario: &dyn Fn()| {
        if leaked(name, scenario) != 0 {
            failures.push(name.to_string());
        }
    };

    // Successful round trips
    check("local intent", &|| local_round_trip::<CIntentMessage>(&intent()));
    check("local start session", &|| {
        local_round_trip::<CStartSessionMessage>(&start_session())
    });
    check("local injection", &|| {
        local_round_trip::<CInjectionRequestMessage>(&injection_request())
    });
    check("flat intent", &|| flat_round_trip::<CIntentMessage>(&gateway, &intent()));
    check("flat token lists", &|| {
        flat_round_trip::<CAsrTokenDoubleArray>(&gateway, &vec![tokens(), vec![]])
    });
    check("flat map", &|| {
        flat_round_trip::<CMapStringToStringArray>(
            &gateway,
            &map(vec![("empty", vec![]), ("full", vec!["a", "b"])]),
        )
    });
    check("flat continue session", &|| {
        flat_round_trip::<CContinueSessionMessage>(&gateway, &continue_session())
    });
    check("flat session ended", &|| {
        flat_round_trip::<CSessionEndedMessage>(
            &gateway,
            &session_ended(SessionTerminationType::Error {
                error: "boom".into(),
            }),
        )
    });
    check("flat text captured", &|| {
        flat_round_trip::<CTextCapturedMessage>(&gateway, &text_captured())
    });
    check("flat injection", &|| {
        flat_round_trip::<CInjectionRequestMessage>(&gateway, &injection_request())
    });
    check("flat dialogue configure", &|| {
        flat_round_trip::<CDialogueConfigureMessage>(&gateway, &dialogue_configure())
    });
    check("json intent", &|| json_round_trip::<CIntentMessage>(&gateway, &intent()));
    check("json start session", &|| {
        json_round_trip::<CStartSessionMessage>(&gateway, &start_notification())
    });

    // Invalid input rejected before crossing
    check("invalid message", &|| {
        let message = EndSessionMessage {
            session_id: "id".into(),
            text: Some("bad\0text".into()),
        };
        assert!(CEndSessionMessage::c_repr_of(message).is_err());
    });
    check("invalid nested token", &|| {
        let mut message = intent();
        if let Some(lists) = message.asr_tokens.as_mut() {
            lists[0][1].value = "wo\0rld".into();
        }
        assert!(CIntentMessage::c_repr_of(message).is_err());
    });

    // Malformed flat values
    check("negative count through engine", &|| {
        let flat = CAsrTokenArray {
            entries: ptr::null(),
            count: -1,
        };
        assert!(gateway.round_trip(&flat).is_err());
    });
    check("negative nested count read locally", &|| {
        let flat = CIntentMessage::c_repr_of(intent()).unwrap();
        let outer = flat.asr_tokens as *mut CAsrTokenDoubleArray;
        let inner = unsafe { &mut *((*outer).entries as *mut CAsrTokenArray).add(1) };
        inner.count = -1;

        let result: FfiResult<IntentMessage> = flat.as_rust();
        assert!(result.is_err());

        inner.count = 0;
    });
    check("negative nested count through engine", &|| {
        let flat = CIntentMessage::c_repr_of(intent()).unwrap();
        let outer = flat.asr_tokens as *mut CAsrTokenDoubleArray;
        let inner = unsafe { &mut *((*outer).entries as *mut CAsrTokenArray).add(1) };
        inner.count = -1;

        assert!(gateway.round_trip(&flat).is_err());

        inner.count = 0;
    });
    check("invalid json through engine", &|| {
        assert!(gateway
            .round_trip_json::<SessionQueuedMessage>("{\"sessionId\":")
            .is_err());
    });
    check("last error read", &|| {
        let _ = gateway.round_trip_json::<SessionQueuedMessage>("nope");
        let last = gateway.last_error().unwrap();
        assert!(last.is_some());
    });

    assert!(failures.is_empty(), "leaking scenarios: {:?}", failures);
}

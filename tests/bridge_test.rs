//! Dispatch bridge end-to-end tests

use notification_bridge::notification::{
    BroadcastDelivery, DedupLedger, DispatchBridge, DispatchOutcome, Identity, IntentDelivery,
    RawExtras, RecordingSink,
};
use std::sync::Arc;

fn setup() -> (DispatchBridge, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let bridge = DispatchBridge::new(sink.clone(), Arc::new(DedupLedger::new()));
    (bridge, sink)
}

fn local(id: i32) -> BroadcastDelivery {
    BroadcastDelivery {
        id: Some(id),
        tag: Some("reminder".to_string()),
        manager_name: Some("main".to_string()),
        raw_notification_extras: Some(RawExtras::new().with("payload", "{\"kind\":\"daily\"}")),
    }
}

fn remote(message_id: &str) -> IntentDelivery {
    IntentDelivery {
        extras: Some(
            RawExtras::new()
                .with("google.sent_time", 1501533936476i64)
                .with("from", "353277717468")
                .with("google.message_id", message_id)
                .with("collapse_key", "org.example.app"),
        ),
        ..Default::default()
    }
}

#[test]
fn test_local_id_delivered_twice_reports_once() {
    let (bridge, sink) = setup();

    bridge.on_broadcast(local(5));
    bridge.on_broadcast(local(5));

    assert_eq!(sink.notifications().len(), 1);
}

#[test]
fn test_repeated_local_id_after_other_identity_reports_again() {
    let (bridge, sink) = setup();

    bridge.on_broadcast(local(5));
    bridge.on_resume(&remote("x"));
    bridge.on_broadcast(local(5));

    let identities: Vec<Identity> = sink
        .notifications()
        .iter()
        .map(|e| e.identity().clone())
        .collect();
    assert_eq!(
        identities,
        vec![
            Identity::Local { id: 5 },
            Identity::Remote { message_id: "x".to_string() },
            Identity::Local { id: 5 },
        ]
    );
}

#[test]
fn test_repeated_remote_id_after_local_reports_again() {
    let (bridge, sink) = setup();

    assert!(bridge.on_new_intent(&remote("m1")).is_emitted());
    assert!(bridge.on_broadcast(local(5)).is_emitted());
    assert!(bridge.on_resume(&remote("m1")).is_emitted());

    assert_eq!(sink.notifications().len(), 3);
}

#[test]
fn test_alternating_distinct_local_ids_all_report() {
    let (bridge, sink) = setup();

    for id in [1, 2, 1, 2, 1] {
        assert!(bridge.on_broadcast(local(id)).is_emitted());
    }
    assert_eq!(sink.notifications().len(), 5);
}

#[test]
fn test_remote_then_local_with_same_raw_value_both_report() {
    let (bridge, sink) = setup();

    assert!(bridge.on_new_intent(&remote("7")).is_emitted());
    assert!(bridge.on_broadcast(local(7)).is_emitted());
    assert_eq!(sink.notifications().len(), 2);
}

#[test]
fn test_cold_start_intent_after_broadcast_is_suppressed() {
    // 广播到达时已上报，之后用户点击通知把应用拉起
    let (bridge, sink) = setup();

    bridge.on_broadcast(local(11));
    let tap = IntentDelivery {
        extras: Some(
            RawExtras::new()
                .with("notification_id", 11)
                .with("notification_tag", "reminder"),
        ),
        action: Some("android.intent.action.MAIN".to_string()),
        data_uri: None,
    };

    assert_eq!(
        bridge.on_resume(&tap),
        DispatchOutcome::Suppressed(Identity::Local { id: 11 })
    );
    assert_eq!(sink.notifications().len(), 1);
    assert!(sink.links().is_empty());
}

#[test]
fn test_remote_payload_is_normalized() {
    let (bridge, sink) = setup();
    bridge.on_resume(&remote("0:1501533936482206%8fe8bb7f8fe8bb7f"));

    let events = sink.notifications();
    let payload: serde_json::Value = serde_json::from_str(events[0].payload()).unwrap();
    let object = payload.as_object().unwrap();

    assert_eq!(object.len(), 4);
    assert_eq!(payload["sent_time"], 1501533936476i64);
    assert_eq!(payload["from"], "353277717468");
    assert_eq!(payload["message_id"], "0:1501533936482206%8fe8bb7f8fe8bb7f");
    assert_eq!(payload["collapse_key"], "org.example.app");
}

#[test]
fn test_local_payload_passes_through() {
    let (bridge, sink) = setup();
    bridge.on_broadcast(local(3));

    assert_eq!(sink.notifications()[0].payload(), "{\"kind\":\"daily\"}");
}

#[test]
fn test_keyboard_and_links() {
    let (bridge, sink) = setup();

    bridge.on_keyboard_height(0);
    bridge.on_keyboard_height(0);
    bridge.on_keyboard_height(250);
    assert_eq!(sink.keyboard_heights(), vec![0, 250]);

    let link = IntentDelivery {
        action: Some("android.intent.action.VIEW".to_string()),
        data_uri: Some("myapp://open".to_string()),
        extras: None,
    };
    bridge.on_resume(&link);
    bridge.on_new_intent(&link);
    assert_eq!(sink.links(), vec!["myapp://open", "myapp://open"]);
}

//! Configuration flowing through the bridge

use notification_bridge::notification::{
    DedupLedger, DispatchBridge, Identity, IntentDelivery, RawExtras, RecordingSink,
};
use notification_bridge::BridgeConfig;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

#[test]
fn test_custom_keys_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "keys": {{"notification_id": "alarm_id", "remote_message_id": "push_id"}},
            "renames": [{{"from": "push_id", "to": "id"}}]
        }}"#
    )
    .unwrap();
    let config = BridgeConfig::load_from(file.path()).unwrap();

    let sink = Arc::new(RecordingSink::new());
    let bridge = DispatchBridge::with_config(sink.clone(), Arc::new(DedupLedger::new()), &config);

    let local = IntentDelivery {
        extras: Some(RawExtras::new().with("alarm_id", 4)),
        ..Default::default()
    };
    let remote = IntentDelivery {
        extras: Some(RawExtras::new().with("push_id", "p9").with("google.sent_time", 1)),
        ..Default::default()
    };

    assert!(bridge.on_resume(&local).is_emitted());
    assert!(bridge.on_resume(&remote).is_emitted());

    let events = sink.notifications();
    assert_eq!(events[0].identity(), &Identity::Local { id: 4 });
    assert_eq!(events[1].identity(), &Identity::Remote { message_id: "p9".to_string() });
    assert_eq!(events[1].payload(), r#"{"id":"p9","google.sent_time":1}"#);
}

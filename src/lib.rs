//! Notification Bridge - 把平台通知投递恰好一次地上报给应用

pub mod cli;
pub mod config;
pub mod notification;

pub use config::{BridgeConfig, ExtrasKeys, KeyRename};
pub use notification::{
    BroadcastDelivery, ColdStartQueue, DedupLedger, DispatchBridge, DispatchOutcome, EventSink,
    Identity, IntentDelivery, NotificationEvent, PayloadEncoder, RawExtras, RawValue,
    RecordingSink, RemoteMessage, ReportKind,
};

//! 通知接入层 - 把平台投递统一上报给应用
//!
//! # 设计目标
//! 1. 统一出口：所有事件经由 `EventSink` trait 上报
//! 2. 恰好一次：同一条通知无论从哪条路径到达都只上报一次
//! 3. 显式状态：去重账本由调用方创建并注入，不使用全局单例
//! 4. 尽力而为：格式不对的投递静默丢弃，不向外抛错
//!
//! # 使用示例
//! ```ignore
//! use notification_bridge::notification::{DedupLedger, DispatchBridge, RecordingSink};
//! use std::sync::Arc;
//!
//! let ledger = Arc::new(DedupLedger::new());
//! let bridge = DispatchBridge::new(Arc::new(RecordingSink::new()), ledger);
//! bridge.on_resume(&intent);
//! ```

pub mod channel;
pub mod classifier;
pub mod deduplicator;
pub mod dispatcher;
pub mod event;
pub mod extras;
pub mod keyboard;
pub mod payload;
pub mod queue;

pub use channel::{EventSink, RecordingSink, SinkCall};
pub use classifier::{BroadcastDelivery, Classified, Delivery, DeliveryClassifier, IntentDelivery};
pub use deduplicator::{DedupLedger, DedupState};
pub use dispatcher::{DispatchBridge, DispatchOutcome};
pub use event::{Identity, NotificationEvent, ReportKind};
pub use extras::{RawExtras, RawValue};
pub use keyboard::{keyboard_height, KeyboardHeightTracker};
pub use payload::{encode_extras, encode_remote_message, PayloadEncoder, RemoteMessage, RemoteNotification};
pub use queue::ColdStartQueue;

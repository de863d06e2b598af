//! 通知分发桥 - 平台入口到应用 sink 的唯一通道
//!
//! 每次投递同步处理到底：分类 → 去重检查并提交 → 编码 payload → 上报。
//! 分发桥本身不返回错误，格式不对的投递只记录日志后丢弃。

use super::channel::EventSink;
use super::classifier::{BroadcastDelivery, Delivery, DeliveryClassifier, IntentDelivery};
use super::deduplicator::DedupLedger;
use super::event::{Identity, NotificationEvent, ReportKind};
use super::keyboard::{keyboard_height, KeyboardHeightTracker};
use super::payload::{encode_remote_message, PayloadEncoder, RemoteMessage};
use crate::config::BridgeConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// 一次通知投递的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// 不是通知投递
    Ignored,
    /// 与上一次同类上报重复
    Suppressed(Identity),
    /// 已上报给 sink
    Emitted(Identity),
}

impl DispatchOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, DispatchOutcome::Emitted(_))
    }
}

/// 通知分发桥
pub struct DispatchBridge {
    sink: Arc<dyn EventSink>,
    ledger: Arc<DedupLedger>,
    classifier: DeliveryClassifier,
    encoder: PayloadEncoder,
    keyboard: KeyboardHeightTracker,
}

impl DispatchBridge {
    /// 使用默认配置创建
    pub fn new(sink: Arc<dyn EventSink>, ledger: Arc<DedupLedger>) -> Self {
        Self::with_config(sink, ledger, &BridgeConfig::default())
    }

    pub fn with_config(
        sink: Arc<dyn EventSink>,
        ledger: Arc<DedupLedger>,
        config: &BridgeConfig,
    ) -> Self {
        info!(sink = sink.name(), "Creating notification dispatch bridge");
        Self {
            sink,
            ledger,
            classifier: DeliveryClassifier::new(config.keys.clone()),
            encoder: PayloadEncoder::from_config(config),
            keyboard: KeyboardHeightTracker::new(),
        }
    }

    pub fn ledger(&self) -> &Arc<DedupLedger> {
        &self.ledger
    }

    /// 广播入口（闹钟触发的本地通知）
    pub fn on_broadcast(&self, broadcast: BroadcastDelivery) -> DispatchOutcome {
        let delivery = self.classifier.from_broadcast(broadcast);
        self.dispatch(&delivery, "broadcast")
    }

    /// Activity resume 入口
    pub fn on_resume(&self, intent: &IntentDelivery) -> DispatchOutcome {
        self.handle_intent(intent, "resume")
    }

    /// Activity new-intent 入口
    pub fn on_new_intent(&self, intent: &IntentDelivery) -> DispatchOutcome {
        self.handle_intent(intent, "new_intent")
    }

    /// 前台推送入口：应用在前台时消息服务直接交来的推送
    ///
    /// 与点击入口共用去重账本，先收到再点击同一条推送只上报一次
    pub fn on_remote_message(&self, message: &RemoteMessage) -> DispatchOutcome {
        let message_id = match message.message_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => {
                debug!("Push message has no message id, ignoring");
                return DispatchOutcome::Ignored;
            }
        };
        let identity = Identity::Remote { message_id: message_id.to_string() };

        if !self.ledger.admit(&identity) {
            debug!(identity = %identity, "Push message already reported, suppressing");
            return DispatchOutcome::Suppressed(identity);
        }

        let tag = message
            .notification
            .as_ref()
            .and_then(|n| n.tag.clone())
            .unwrap_or_default();
        let event = NotificationEvent::new(identity.clone(), tag, -1, "", encode_remote_message(message))
            .with_kind(ReportKind::Received);

        info!(
            source = "remote_message",
            identity = %event.identity(),
            tag = %event.tag(),
            "Reporting received push message"
        );
        self.sink.on_notification_reported(&event);

        DispatchOutcome::Emitted(identity)
    }

    /// 布局回调：根据可见区域计算键盘高度，变化时上报
    pub fn on_layout(&self, screen_height: i32, visible_bottom: i32) -> Option<i32> {
        self.on_keyboard_height(keyboard_height(screen_height, visible_bottom))
    }

    /// 直接提供键盘高度的布局回调
    pub fn on_keyboard_height(&self, height_px: i32) -> Option<i32> {
        let reported = self.keyboard.observe(height_px)?;
        debug!(height = reported, "Keyboard height changed");
        self.sink.on_keyboard_height_changed(reported);
        Some(reported)
    }

    /// 处理一次已归一化的投递
    pub fn dispatch(&self, delivery: &Delivery, source: &str) -> DispatchOutcome {
        let Some(classified) = self.classifier.classify(delivery) else {
            debug!(source = %source, "Delivery is not a notification, ignoring");
            return DispatchOutcome::Ignored;
        };

        if !self.ledger.admit(&classified.identity) {
            debug!(
                source = %source,
                identity = %classified.identity,
                "Notification already reported, suppressing"
            );
            return DispatchOutcome::Suppressed(classified.identity);
        }

        let payload = match &classified.identity {
            Identity::Local { .. } => delivery.local_payload.clone().unwrap_or_default(),
            Identity::Remote { .. } => self.encoder.encode(&delivery.extras),
        };

        let event = NotificationEvent::new(
            classified.identity.clone(),
            classified.tag,
            classified.display_id,
            classified.manager_name,
            payload,
        );

        info!(
            source = %source,
            identity = %event.identity(),
            tag = %event.tag(),
            manager = %event.manager_name(),
            "Reporting notification"
        );
        self.sink.on_notification_reported(&event);

        DispatchOutcome::Emitted(classified.identity)
    }

    fn handle_intent(&self, intent: &IntentDelivery, source: &str) -> DispatchOutcome {
        let outcome = match self.classifier.from_intent(intent) {
            Some(delivery) => self.dispatch(&delivery, source),
            None => {
                debug!(source = %source, "Intent has no extras, skipping notification check");
                DispatchOutcome::Ignored
            }
        };
        self.report_link(intent, source);
        outcome
    }

    // 链接事件不去重：每次 resume / new-intent 只要带 data URI 就上报
    fn report_link(&self, intent: &IntentDelivery, source: &str) {
        if let Some(uri) = &intent.data_uri {
            info!(source = %source, uri = %uri, "App opened with link");
            self.sink.on_link_opened(uri);
        }
    }
}

//! 应用事件 sink trait 定义

use super::event::NotificationEvent;
use std::sync::{Mutex, MutexGuard};

/// 应用层事件接收端
///
/// 分发桥只通过这个 trait 向外报告事件，不依赖任何平台回调。
pub trait EventSink: Send + Sync {
    /// sink 名称（用于日志）
    fn name(&self) -> &str;

    /// 一条通知被上报（每条逻辑通知只调用一次）
    fn on_notification_reported(&self, event: &NotificationEvent);

    /// 应用通过链接启动或恢复
    fn on_link_opened(&self, uri: &str);

    /// 软键盘高度变化
    fn on_keyboard_height_changed(&self, height_px: i32);
}

/// sink 收到的一次调用
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Notification(NotificationEvent),
    LinkOpened(String),
    KeyboardHeight(i32),
}

/// 记录所有调用的内存 sink
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出并清空已记录的调用
    pub fn take(&self) -> Vec<SinkCall> {
        std::mem::take(&mut *self.lock())
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.lock().clone()
    }

    pub fn notifications(&self) -> Vec<NotificationEvent> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Notification(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn links(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::LinkOpened(uri) => Some(uri.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn keyboard_heights(&self) -> Vec<i32> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::KeyboardHeight(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SinkCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn on_notification_reported(&self, event: &NotificationEvent) {
        self.lock().push(SinkCall::Notification(event.clone()));
    }

    fn on_link_opened(&self, uri: &str) {
        self.lock().push(SinkCall::LinkOpened(uri.to_string()));
    }

    fn on_keyboard_height_changed(&self, height_px: i32) {
        self.lock().push(SinkCall::KeyboardHeight(height_px));
    }
}

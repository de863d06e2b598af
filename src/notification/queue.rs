//! 冷启动通知队列
//!
//! 应用被通知拉起时，平台入口早于应用层加载完成就会投递事件。此时还没有
//! 任何通知管理器可以接收，需要先排队，等管理器加载后再回放。
//!
//! ## 回放规则
//! 1. 指定了管理器名称的通知，只回放给同名管理器，回放后出队
//! 2. 管理器名称为空的通知，回放给每一个加载的管理器，保留在队列中
//! 3. `mark_ready` 时清空队列：从未回放过的条目直接转发给内层 sink，
//!    已回放过的广播条目丢弃
//! 4. `mark_ready` 之后的通知直接转发给内层 sink
//!
//! 只有完全相同的上报（身份、到达方式、tag、id、管理器都相同）才会合并。
//!
//! 链接和键盘事件不排队，始终直接转发。

use super::channel::EventSink;
use super::event::NotificationEvent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// 排队中的上报
#[derive(Debug)]
struct Pending {
    event: NotificationEvent,
    /// 是否已回放给至少一个管理器
    replayed: bool,
}

pub struct ColdStartQueue {
    inner: Arc<dyn EventSink>,
    ready: AtomicBool,
    pending: Mutex<Vec<Pending>>,
}

impl ColdStartQueue {
    pub fn new(inner: Arc<dyn EventSink>) -> Self {
        Self {
            inner,
            ready: AtomicBool::new(false),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// 应用层加载完成，后续通知直接转发
    ///
    /// 清空队列，返回补发给内层 sink 的条数（没有任何管理器认领过的条目）
    pub fn mark_ready(&self) -> usize {
        let unclaimed: Vec<NotificationEvent> = {
            let mut pending = self.lock();
            // 持锁切换状态，避免与 on_notification_reported 交错时漏掉条目
            self.ready.store(true, Ordering::SeqCst);
            pending
                .drain(..)
                .filter(|entry| !entry.replayed)
                .map(|entry| entry.event)
                .collect()
        };

        info!(count = unclaimed.len(), "App loaded, flushing unclaimed notifications");
        for event in &unclaimed {
            self.inner.on_notification_reported(event);
        }
        unclaimed.len()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn pending_len(&self) -> usize {
        self.lock().len()
    }

    /// 管理器加载完成，回放属于它的通知
    ///
    /// 返回回放的条数
    pub fn attach_manager(&self, manager_name: &str) -> usize {
        let replay: Vec<NotificationEvent> = {
            let mut pending = self.lock();
            let mut replay = Vec::new();
            pending.retain_mut(|entry| {
                let target = entry.event.manager_name();
                let addressed = !manager_name.is_empty() && target == manager_name;
                let broadcast = target.is_empty();
                if addressed || broadcast {
                    replay.push(entry.event.clone());
                    entry.replayed = true;
                }
                !addressed
            });
            replay
        };

        info!(
            manager = %manager_name,
            count = replay.len(),
            "Replaying queued notifications"
        );
        for event in &replay {
            self.inner.on_notification_reported(event);
        }
        replay.len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Pending>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for ColdStartQueue {
    fn name(&self) -> &str {
        "cold-start-queue"
    }

    fn on_notification_reported(&self, event: &NotificationEvent) {
        {
            let mut pending = self.lock();
            if !self.is_ready() {
                if pending
                    .iter()
                    .any(|queued| queued.event.routing_key() == event.routing_key())
                {
                    debug!(identity = %event.identity(), "Notification already queued");
                    return;
                }
                debug!(identity = %event.identity(), "Queueing notification until app is loaded");
                pending.push(Pending { event: event.clone(), replayed: false });
                return;
            }
        }
        self.inner.on_notification_reported(event);
    }

    fn on_link_opened(&self, uri: &str) {
        self.inner.on_link_opened(uri);
    }

    fn on_keyboard_height_changed(&self, height_px: i32) {
        self.inner.on_keyboard_height_changed(height_px);
    }
}

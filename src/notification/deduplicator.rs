//! 通知去重器 - 防止同一条通知被重复上报
//!
//! 同一条通知可能经由多条路径到达：广播接收、Activity resume、new-intent。
//! 每个投递类别（本地 / 远程）只记录最近一次上报的身份。
//!
//! ## 去重策略
//! 1. 本地通知：与上一次上报的本地 id 相同则跳过
//! 2. 远程通知：与上一次上报的 message id 相同则跳过
//! 3. 一个类别的通知不会导致另一个类别被跳过
//! 4. 单槽位：中间上报过别的身份（包括另一类别）后，同一身份可以再次上报

use super::event::Identity;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// 本地槽位的"无记录"哨兵值
const NO_LOCAL_ID: i32 = -1;

/// 去重状态（每个类别一个槽位）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupState {
    last_local_id: i32,
    /// 空字符串表示无记录，永远不会匹配真实 message id
    last_remote_message_id: String,
}

impl DedupState {
    pub fn new() -> Self {
        Self {
            last_local_id: NO_LOCAL_ID,
            last_remote_message_id: String::new(),
        }
    }

    /// 是否应当跳过此身份
    pub fn should_suppress(&self, identity: &Identity) -> bool {
        match identity {
            Identity::Local { id } => self.last_local_id == *id,
            Identity::Remote { message_id } => {
                !message_id.is_empty() && self.last_remote_message_id == *message_id
            }
        }
    }

    /// 记录已上报的身份
    ///
    /// 上报后另一类别的槽位清空：连续两次上报之间只要出现过别的身份，
    /// 同一身份就可以再次上报。
    pub fn commit(&mut self, identity: &Identity) {
        match identity {
            Identity::Local { id } => {
                self.last_local_id = *id;
                self.last_remote_message_id.clear();
            }
            Identity::Remote { message_id } => {
                self.last_remote_message_id = message_id.clone();
                self.last_local_id = NO_LOCAL_ID;
            }
        }
    }

    pub fn last_local_id(&self) -> Option<i32> {
        (self.last_local_id != NO_LOCAL_ID).then_some(self.last_local_id)
    }

    pub fn last_remote_message_id(&self) -> Option<&str> {
        (!self.last_remote_message_id.is_empty()).then_some(self.last_remote_message_id.as_str())
    }
}

impl Default for DedupState {
    fn default() -> Self {
        Self::new()
    }
}

/// 进程级去重账本
///
/// 检查与提交在同一个临界区内完成：广播线程和 UI 线程可能同时投递。
/// 由调用方显式创建一次，以 `Arc` 注入各个入口。
#[derive(Debug, Default)]
pub struct DedupLedger {
    state: Mutex<DedupState>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 检查并提交
    ///
    /// 返回 `true` 表示应该上报（身份已提交），`false` 表示重复、应跳过
    pub fn admit(&self, identity: &Identity) -> bool {
        let mut state = self.lock();
        if state.should_suppress(identity) {
            debug!(identity = %identity, "Notification deduplicated (same identity as last report)");
            return false;
        }
        state.commit(identity);
        true
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> DedupState {
        self.lock().clone()
    }

    // 状态只有两个标量，写入不会只完成一半，锁中毒时直接接管
    fn lock(&self) -> MutexGuard<'_, DedupState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

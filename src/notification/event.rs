//! 统一通知事件结构
//!
//! 无论通知经由广播、点击还是冷启动 intent 到达，交给应用层的都是同一个
//! `NotificationEvent`。

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// 去重身份：按投递类别区分
///
/// `Local` 与 `Remote` 永不相等，即使原始值碰巧相同。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum Identity {
    /// 本应用调度的通知
    Local { id: i32 },
    /// 推送后端下发的通知
    Remote { message_id: String },
}

impl Identity {
    pub fn is_remote(&self) -> bool {
        matches!(self, Identity::Remote { .. })
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Local { id } => write!(f, "local:{}", id),
            Identity::Remote { message_id } => write!(f, "remote:{}", message_id),
        }
    }
}

/// 通知如何到达应用
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// 用户点击通知、广播或冷启动 intent
    #[default]
    Tapped,
    /// 应用在前台时直接收到推送消息
    Received,
}

/// 交给应用 sink 的通知事件，构造后不可变
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationEvent {
    identity: Identity,
    kind: ReportKind,
    tag: String,
    display_id: i32,
    manager_name: String,
    /// JSON 字符串
    payload: String,
    received_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(
        identity: Identity,
        tag: impl Into<String>,
        display_id: i32,
        manager_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            kind: ReportKind::Tapped,
            tag: tag.into(),
            display_id,
            manager_name: manager_name.into(),
            payload: payload.into(),
            received_at: Utc::now(),
        }
    }

    /// 设置到达方式
    pub fn with_kind(mut self, kind: ReportKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn display_id(&self) -> i32 {
        self.display_id
    }

    pub fn manager_name(&self) -> &str {
        &self.manager_name
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// 同一条上报的判定键，冷启动队列用它合并重复条目
    pub fn routing_key(&self) -> (&Identity, ReportKind, &str, i32, &str) {
        (&self.identity, self.kind, &self.tag, self.display_id, &self.manager_name)
    }
}

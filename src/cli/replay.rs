//! replay 命令 - 从 JSON-lines 文件回放平台投递
//!
//! 每行一条投递记录，例如：
//! ```text
//! {"kind":"broadcast","id":5,"tag":"daily","manager_name":"reminders"}
//! {"kind":"resume","extras":{"google.message_id":"m1","from":"123"}}
//! {"kind":"new_intent","action":"VIEW","data_uri":"myapp://item/1"}
//! {"kind":"layout","screen_height":1920,"visible_bottom":1670}
//! {"kind":"remote_message","message_id":"m2","data":{"screen":"inbox"}}
//! ```

use crate::config::BridgeConfig;
use crate::notification::{
    BroadcastDelivery, DedupLedger, DispatchBridge, DispatchOutcome, IntentDelivery, RemoteMessage,
};
use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::output::JsonLinesSink;

/// replay 命令参数
#[derive(Args)]
pub struct ReplayArgs {
    /// 投递记录文件（默认读取 stdin）
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// 配置文件（默认 ~/.config/notification-bridge/config.json）
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// 一条投递记录
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryRecord {
    Broadcast(BroadcastDelivery),
    Resume(IntentDelivery),
    NewIntent(IntentDelivery),
    Layout { screen_height: i32, visible_bottom: i32 },
    /// 前台收到的推送消息
    RemoteMessage(RemoteMessage),
}

/// 回放统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub emitted: usize,
    pub suppressed: usize,
    pub ignored: usize,
    /// 无法解析而跳过的行
    pub skipped: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Emitted(_) => self.emitted += 1,
            DispatchOutcome::Suppressed(_) => self.suppressed += 1,
            DispatchOutcome::Ignored => self.ignored += 1,
        }
    }
}

/// 把记录逐行交给分发桥
pub fn replay<R: BufRead>(reader: R, bridge: &DispatchBridge) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let record: DeliveryRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping malformed delivery record");
                summary.skipped += 1;
                continue;
            }
        };

        match record {
            DeliveryRecord::Broadcast(broadcast) => summary.record(&bridge.on_broadcast(broadcast)),
            DeliveryRecord::Resume(intent) => summary.record(&bridge.on_resume(&intent)),
            DeliveryRecord::NewIntent(intent) => summary.record(&bridge.on_new_intent(&intent)),
            DeliveryRecord::Layout { screen_height, visible_bottom } => {
                bridge.on_layout(screen_height, visible_bottom);
            }
            DeliveryRecord::RemoteMessage(message) => {
                summary.record(&bridge.on_remote_message(&message))
            }
        }
    }

    Ok(summary)
}

/// 处理 replay 命令
pub fn handle_replay(args: ReplayArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => BridgeConfig::load_from(path)?,
        None => BridgeConfig::load()?,
    };

    let sink = Arc::new(JsonLinesSink::new(io::stdout()));
    let bridge = DispatchBridge::with_config(sink, Arc::new(DedupLedger::new()), &config);

    let summary = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            replay(BufReader::new(file), &bridge)?
        }
        None => replay(io::stdin().lock(), &bridge)?,
    };

    info!(
        emitted = summary.emitted,
        suppressed = summary.suppressed,
        ignored = summary.ignored,
        skipped = summary.skipped,
        "Replay finished"
    );
    Ok(())
}

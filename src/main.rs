//! Notification Bridge CLI
//!
//! 回放平台投递记录、编码推送 payload，用于调试通知接入层

use anyhow::Result;
use clap::{Parser, Subcommand};
use notification_bridge::cli::{handle_encode, handle_replay, EncodeArgs, ReplayArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "nbridge")]
#[command(about = "Notification Bridge - 通知投递去重与 payload 规范化")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 从 JSON-lines 记录回放投递，输出上报给应用的事件
    Replay(ReplayArgs),
    /// 把一组 extras 编码为规范化 payload
    Encode(EncodeArgs),
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug nbridge replay --input deliveries.jsonl
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("notification_bridge=info,nbridge=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => handle_replay(args)?,
        Commands::Encode(args) => handle_encode(args)?,
    }

    Ok(())
}

//! encode 命令 - 把一组 extras 规范化为 payload

use crate::config::BridgeConfig;
use crate::notification::{PayloadEncoder, RawExtras};
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::io;
use std::path::PathBuf;

/// encode 命令参数
#[derive(Args)]
pub struct EncodeArgs {
    /// 包含 extras JSON 对象的文件（默认读取 stdin）
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// 配置文件
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// 解析 extras 并编码
pub fn encode_json(input: &str, config: &BridgeConfig) -> Result<String> {
    let extras: RawExtras =
        serde_json::from_str(input).context("Input must be a JSON object of extras")?;
    Ok(PayloadEncoder::from_config(config).encode(&extras))
}

/// 处理 encode 命令
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => BridgeConfig::load_from(path)?,
        None => BridgeConfig::load()?,
    };

    let input = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("Failed to read stdin")?,
    };

    println!("{}", encode_json(&input, &config)?);
    Ok(())
}

//! # process 子命令 CLI 定义
//!
//! 按街道去重并提取几何与属性
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/process.rs`

use clap::Args;
use std::path::PathBuf;

/// process 子命令参数
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Raw Overpass JSON (default: <data-dir>/osm/raw.json)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Processed JSON output (default: <data-dir>/osm/processed.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Building types to drop (repeatable)
    #[arg(long, default_values_t = vec!["house".to_string()])]
    pub exclude_type: Vec<String>,

    /// Keep every building instead of one per street
    #[arg(long, default_value_t = false)]
    pub all_streets: bool,

    /// Also export the processed buildings as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

//! # prompt 子命令 CLI 定义
//!
//! 将 YAML 提示词与图片打包为 VLM 请求体
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/prompt.rs`

use clap::Args;
use std::path::PathBuf;

/// prompt 子命令参数
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// YAML prompt file
    #[arg(short, long)]
    pub prompt: PathBuf,

    /// Model id (gemini*, gpt*, claude*)
    #[arg(short, long)]
    pub model: String,

    /// Image files or directories
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Glob patterns for images inside directories (comma-separated)
    #[arg(long, default_value = "*.jpg,*.jpeg,*.png")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Output JSON file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

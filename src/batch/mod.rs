//! # 批量执行模块
//!
//! 逐建筑下载任务的并行执行，以及 prompt 命令的图片收集。
//!
//! ## 依赖关系
//! - `runner` 被 `commands/images.rs`, `commands/aerial.rs` 使用
//! - `collector` 被 `commands/prompt.rs` 使用
//! - 使用 `rayon`, `indicatif`, `walkdir`, `glob`

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchRunner, ProcessResult};

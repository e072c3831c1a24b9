//! # aerial 子命令 CLI 定义
//!
//! 获取卫星图：单点模式或按 processed.json 批量
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/aerial.rs`

use crate::maps::ImageFormat;

use clap::Args;
use std::path::PathBuf;

/// aerial 子命令参数
#[derive(Args, Debug)]
pub struct AerialArgs {
    /// Latitude of the image centre (single mode)
    #[arg(long, allow_hyphen_values = true, requires = "lon", conflicts_with = "input")]
    pub lat: Option<f64>,

    /// Longitude of the image centre (single mode)
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Processed buildings JSON (batch mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Zoom level (0-21)
    #[arg(long, default_value_t = 19)]
    pub zoom: u8,

    /// Image size WIDTHxHEIGHT, each side at most 640
    #[arg(long, default_value = "640x640")]
    pub size: String,

    /// Scale factor: 1 (standard) or 2 (high resolution)
    #[arg(long, default_value_t = 2)]
    pub scale: u8,

    /// Image format
    #[arg(long, value_enum, default_value = "png")]
    pub format: ImageFormat,

    /// Marker definition, e.g. "color:red|51.5,-0.12" ("center" marks the image centre)
    #[arg(long)]
    pub marker: Option<String>,

    /// Output file (single mode) or directory (batch mode, default: <data-dir>/images/aerial)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only process the first N buildings (batch mode, 0 means all)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Number of parallel downloads (batch mode)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Overwrite existing images (batch mode)
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

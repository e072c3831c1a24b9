//! # images 子命令 CLI 定义
//!
//! 为处理后的建筑下载街景图片
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/images.rs`

use clap::Args;
use std::path::PathBuf;

/// images 子命令参数
#[derive(Args, Debug)]
pub struct ImagesArgs {
    /// Fetch images with a fixed camera pitch
    #[arg(long, default_value_t = false)]
    pub fixed_pitch: bool,

    /// Fetch images with a pitch derived from the building height
    #[arg(long, default_value_t = false)]
    pub height_pitch: bool,

    /// Pitch in degrees for fixed-pitch images (default: from config, 30)
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<f64>,

    /// Minimum seconds between API requests (default: from config, 0.1)
    #[arg(long, alias = "sleep")]
    pub interval: Option<f64>,

    /// Only process the first N buildings (0 means all)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Number of parallel downloads
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Processed JSON input (default: <data-dir>/osm/processed.json)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output JSON with image paths (default: <data-dir>/osm/processed_with_images.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ImagesArgs {
    /// 两个开关都未指定时默认固定俯仰
    pub fn modes(&self) -> (bool, bool) {
        if !self.fixed_pitch && !self.height_pitch {
            (true, false)
        } else {
            (self.fixed_pitch, self.height_pitch)
        }
    }
}

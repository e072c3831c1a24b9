//! # camera 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/camera.rs`

use clap::Args;

/// camera 子命令参数
#[derive(Args, Debug)]
pub struct CameraArgs {
    /// Longitude of the requested location
    #[arg(allow_hyphen_values = true)]
    pub longitude: f64,

    /// Latitude of the requested location
    #[arg(allow_hyphen_values = true)]
    pub latitude: f64,
}

//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构（按数据流顺序）
//! - `fetch`: 从 Overpass 获取建筑
//! - `process`: 去重、几何与属性提取
//! - `images`: 下载街景图片
//! - `aerial`: 下载卫星图
//! - `camera`: 查询街景相机位置
//! - `prompt`: 生成 VLM 请求载荷
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: fetch, process, images, aerial, camera, prompt

pub mod aerial;
pub mod camera;
pub mod fetch;
pub mod images;
pub mod process;
pub mod prompt;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// facadeset - 街景建筑属性数据集构建工具
#[derive(Parser)]
#[command(name = "facadeset")]
#[command(version)]
#[command(
    about = "Build street-level building imagery datasets from OpenStreetMap and Google Street View",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// 所有子命令共享的参数
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to a TOML config file (default: ./facadeset.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root data directory (default: data)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Google Maps API key
    #[arg(long, global = true, env = "GOOGLE_MAPS_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// 可用的子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch building footprints and tags from the Overpass API
    Fetch(fetch::FetchArgs),

    /// Filter raw OSM buildings and extract geometry and attributes
    Process(process::ProcessArgs),

    /// Download Street View images for processed buildings
    Images(images::ImagesArgs),

    /// Download satellite imagery for a location or for processed buildings
    Aerial(aerial::AerialArgs),

    /// Look up the Street View camera position nearest to a location
    Camera(camera::CameraArgs),

    /// Build a vision-language model request from a YAML prompt and images
    Prompt(prompt::PromptArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "facadeset",
            "process",
            "--data-dir",
            "/tmp/ds",
            "--exclude-type",
            "house",
            "--exclude-type",
            "retail",
        ])
        .unwrap();
        assert_eq!(cli.global.data_dir, Some(PathBuf::from("/tmp/ds")));
        match cli.command {
            Commands::Process(args) => assert_eq!(args.exclude_type, vec!["house", "retail"]),
            _ => panic!("expected process"),
        }
    }
}

//! # facadeset - 建筑立面数据集构建工具
//!
//! 从 OpenStreetMap 获取带属性标签的建筑，配合 Google 街景 / 卫星图，
//! 构建用于视觉语言模型的建筑立面数据集。
//!
//! ## 子命令
//! - `fetch`   - 通过 Overpass API 获取建筑原始数据
//! - `process` - 按街道去重，提取代表点、轮廓与面积
//! - `images`  - 下载街景图片（固定俯仰 / 按楼高俯仰）
//! - `aerial`  - 下载卫星图（单点或批量）
//! - `camera`  - 查询街景相机位置
//! - `prompt`  - 组装 VLM 请求体
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── config.rs   (配置合并与数据目录)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── osm/    (Overpass 查询、过滤、处理)
//!   │     ├── maps/   (街景与卫星图)
//!   │     ├── geo/    (投影与几何)
//!   │     ├── vlm/    (模型请求体)
//!   │     ├── batch/  (并行执行、文件收集)
//!   │     └── models/ (数据模型)
//!   ├── utils/      (输出、进度条、日志、JSON)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod geo;
mod maps;
mod models;
mod osm;
mod utils;
mod vlm;

use clap::Parser;
use cli::Cli;
use config::Settings;

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let settings = match Settings::resolve(&cli.global) {
        Ok(settings) => settings,
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            std::process::exit(1);
        }
    };

    // guard 存活期间日志持续写入
    let _log_guard = match settings
        .layout
        .ensure()
        .and_then(|_| utils::logging::init_file_logging(&settings.layout.logs_dir()))
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            utils::output::print_warning(&format!("File logging disabled: {}", e));
            None
        }
    };
    tracing::info!(command = ?cli.command, "Starting");

    if let Err(e) = commands::run(cli.command, &settings) {
        tracing::error!(error = %e, "Command failed");
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

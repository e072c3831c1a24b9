//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config.rs`, `osm/`, `maps/`, `vlm/`, `utils/`
//! - 子模块: fetch, process, images, aerial, camera, prompt

pub mod aerial;
pub mod camera;
pub mod fetch;
pub mod images;
pub mod process;
pub mod prompt;

use crate::cli::Commands;
use crate::config::Settings;
use crate::error::Result;
use crate::maps::HttpClient;

/// 执行命令
pub fn run(cmd: Commands, settings: &Settings) -> Result<()> {
    match cmd {
        Commands::Fetch(args) => fetch::execute(args, settings),
        Commands::Process(args) => process::execute(args, settings),
        Commands::Images(args) => images::execute(args, settings),
        Commands::Aerial(args) => aerial::execute(args, settings),
        Commands::Camera(args) => camera::execute(args, settings),
        Commands::Prompt(args) => prompt::execute(args, settings),
    }
}

/// 按设置创建 HTTP 客户端
fn http_client(settings: &Settings) -> Result<HttpClient> {
    HttpClient::new(settings.timeout, settings.request_interval)
}

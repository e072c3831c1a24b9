//! # 日志初始化
//!
//! 终端输出由 `utils/output.rs` 负责；`tracing` 事件写入
//! `<data>/logs/facadeset.log`，供长时间下载任务事后排查。
//! 过滤级别由 `RUST_LOG` 控制，默认 `info`。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber`, `tracing-appender`

use crate::error::{FacadesetError, Result};

use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "facadeset.log";

/// 初始化文件日志；返回的 guard 必须存活到进程结束，否则缓冲日志会丢失
pub fn init_file_logging(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir).map_err(|e| FacadesetError::FileWriteError {
        path: log_dir.display().to_string(),
        source: e,
    })?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    // 重复初始化（如测试中）时保持已有订阅者
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    Ok(guard)
}

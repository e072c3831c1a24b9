//! # 终端输出
//!
//! 统一的状态行前缀（`[OK]` `[ERR]` `[WARN]` `[*]` `[DONE]`）、
//! 标题栏与摘要键值行。结构化日志见 `utils/logging.rs`。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块与 `main.rs` 使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};
use std::fmt::Display;

const RULE_WIDTH: usize = 60;

fn status(tag: ColoredString, msg: &str) {
    println!("{} {}", tag, msg);
}

pub fn print_success(msg: &str) {
    status("[OK]".green().bold(), msg);
}

/// 错误写到 stderr
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    status("[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    status("[*]".blue().bold(), msg);
}

pub fn print_done(msg: &str) {
    status("[DONE]".green().bold(), msg);
}

/// 命令开始时的标题栏
pub fn print_header(title: &str) {
    let rule = "─".repeat(RULE_WIDTH);
    println!("\n{}", rule.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", rule.dimmed());
}

/// 摘要小节标题，如 "Summary:"
pub fn print_section(title: &str) {
    println!("\n{}", title.bold());
}

/// 摘要中的一行：左对齐的键与值
pub fn print_kv(key: &str, value: impl Display) {
    println!("  {:<28} {}", key.dimmed(), value);
}

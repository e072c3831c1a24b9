//! # 文件收集器
//!
//! 根据输入路径列表和模式收集图片文件。
//!
//! ## 功能
//! - 输入可混合文件与目录
//! - 逗号分隔的多 glob 模式（仅匹配文件名）
//! - 可选递归
//! - 结果去重并按路径排序
//!
//! ## 依赖关系
//! - 被 `commands/prompt.rs` 调用
//! - 使用 `walkdir`, `glob`

use crate::error::{FacadesetError, Result};

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::PathBuf;
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    inputs: Vec<PathBuf>,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器（默认匹配全部文件）
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Pattern::new(s).map_err(|e| {
                    FacadesetError::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件。显式给出的文件总是被收集；不存在的路径报错
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        for input in &self.inputs {
            if input.is_file() {
                files.insert(input.clone());
                continue;
            }
            if !input.is_dir() {
                return Err(FacadesetError::FileNotFound {
                    path: input.display().to_string(),
                });
            }

            WalkDir::new(input)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| self.matches(&e.file_name().to_string_lossy()))
                .for_each(|e| {
                    files.insert(e.into_path());
                });
        }

        Ok(files.into_iter().collect())
    }

    /// 检查文件名是否匹配任一模式（大小写不敏感）
    fn matches(&self, filename: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(filename, options))
    }
}

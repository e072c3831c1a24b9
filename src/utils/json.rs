//! # JSON 文件读写
//!
//! 所有中间产物（raw.json, processed.json, processed_with_images.json）
//! 都经由这里读写，统一错误类型与缩进格式。
//!
//! ## 依赖关系
//! - 被 `osm/` 与 `commands/` 使用
//! - 使用 `serde_json`

use crate::error::{FacadesetError, Result};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// 读取 JSON 文件
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(FacadesetError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let file = File::open(path).map_err(|e| FacadesetError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| FacadesetError::ParseError {
        format: "JSON".to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// 写入 JSON 文件（2 空格缩进），必要时创建父目录
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let write_err = |e| FacadesetError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(write_err)?;
    Ok(())
}

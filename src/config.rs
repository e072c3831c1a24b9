//! # 配置模块
//!
//! 合并命令行、环境变量与 TOML 配置文件，得到运行期 `Settings`。
//!
//! ## 优先级
//! 命令行 > 环境变量 (`GOOGLE_MAPS_KEY`, `GOOGLE_MAPS_API_KEY`) > 配置文件 > 默认值
//!
//! ## 配置文件示例 (`facadeset.toml`)
//! ```toml
//! data_dir = "data"
//! api_key = "..."
//! overpass_url = "https://overpass-api.de/api/interpreter"
//! request_interval_secs = 0.1
//! timeout_secs = 60
//!
//! [streetview]
//! size = "350x350"
//! fov = 70
//! default_pitch = 30.0
//! min_image_bytes = 5000
//! ```
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用，结果传递给所有 `commands/`
//! - 使用 `toml`, `serde`

use crate::cli::GlobalArgs;
use crate::error::{FacadesetError, Result};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件名（工作目录下存在时自动加载）
pub const DEFAULT_CONFIG_FILE: &str = "facadeset.toml";

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// 街景请求参数
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StreetViewSettings {
    /// 图片尺寸 "宽x高"
    pub size: String,
    /// 视场角（度）
    pub fov: u32,
    /// 固定俯仰角（度）
    pub default_pitch: f64,
    /// 小于该字节数的响应视为“无图像”占位图
    pub min_image_bytes: usize,
}

impl Default for StreetViewSettings {
    fn default() -> Self {
        StreetViewSettings {
            size: "350x350".to_string(),
            fov: 70,
            default_pitch: 30.0,
            min_image_bytes: 5000,
        }
    }
}

/// 配置文件内容（全部可选）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub overpass_url: Option<String>,
    pub request_interval_secs: Option<f64>,
    pub timeout_secs: Option<u64>,
    pub streetview: StreetViewSettings,
}

impl FileConfig {
    /// 读取并解析 TOML 配置文件
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FacadesetError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| FacadesetError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// 运行期设置
#[derive(Debug, Clone)]
pub struct Settings {
    pub layout: DataLayout,
    pub api_key: Option<String>,
    pub overpass_url: String,
    pub request_interval: Duration,
    pub timeout: Duration,
    pub streetview: StreetViewSettings,
}

impl Settings {
    /// 按优先级合并命令行与配置文件
    pub fn resolve(global: &GlobalArgs) -> Result<Self> {
        let file = match &global.config {
            Some(path) => FileConfig::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                FileConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => FileConfig::default(),
        };

        let fallback_key = std::env::var("GOOGLE_MAPS_API_KEY").ok();
        Self::merge(global, file, fallback_key)
    }

    /// 合并逻辑，不读取文件系统和环境
    pub(crate) fn merge(global: &GlobalArgs, file: FileConfig, fallback_key: Option<String>) -> Result<Self> {
        let data_dir = global
            .data_dir
            .clone()
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from("data"));

        // 空白值视为未设置，继续向下一来源查找
        let non_blank = |k: &String| !k.trim().is_empty();
        let api_key = global
            .api_key
            .clone()
            .filter(non_blank)
            .or(fallback_key.filter(non_blank))
            .or(file.api_key.filter(non_blank));

        let interval = file.request_interval_secs.unwrap_or(0.1);
        if !interval.is_finite() || interval < 0.0 {
            return Err(FacadesetError::InvalidArgument(format!(
                "request_interval_secs must be >= 0, got {}",
                interval
            )));
        }

        Ok(Settings {
            layout: DataLayout::new(data_dir),
            api_key,
            overpass_url: file
                .overpass_url
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_string()),
            request_interval: Duration::from_secs_f64(interval),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(60)),
            streetview: file.streetview,
        })
    }

    /// 需要 Google Maps 的命令调用
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(FacadesetError::MissingApiKey)
    }
}

/// 数据目录布局
#[derive(Debug, Clone, PartialEq)]
pub struct DataLayout {
    pub root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataLayout { root: root.into() }
    }

    pub fn osm_dir(&self) -> PathBuf {
        self.root.join("osm")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn raw_osm(&self) -> PathBuf {
        self.osm_dir().join("raw.json")
    }

    pub fn processed(&self) -> PathBuf {
        self.osm_dir().join("processed.json")
    }

    pub fn processed_with_images(&self) -> PathBuf {
        self.osm_dir().join("processed_with_images.json")
    }

    /// 创建完整目录结构（已存在则忽略）
    pub fn ensure(&self) -> Result<()> {
        let dirs = [
            self.osm_dir(),
            self.images_dir().join("fixed_pitch"),
            self.images_dir().join("height_pitch"),
            self.logs_dir(),
        ];
        for dir in &dirs {
            fs::create_dir_all(dir).map_err(|e| FacadesetError::FileWriteError {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}

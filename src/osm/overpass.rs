//! # Overpass 查询
//!
//! 构建 Overpass QL 查询并获取带几何的建筑 way。
//!
//! ## 查询格式
//! ```text
//! [out:json][timeout:500];
//! // Gather ways that are buildings with required attributes
//! way
//!   ["building"~"^(commercial|...)$"]
//!   ["height"]
//!   ...
//!   (south,west,north,east);
//! out body geom [N];
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/fetch.rs` 调用
//! - 使用 `maps/client.rs` 的 `HttpFetch::post_form`

use crate::error::{FacadesetError, Result};
use crate::maps::HttpFetch;
use crate::utils::json;

use std::fmt;
use std::path::{Path, PathBuf};

/// 默认建筑类型
pub const DEFAULT_BUILDING_TYPES: &[&str] = &[
    "commercial",
    "retail",
    "office",
    "apartments",
    "residential",
    "house",
    "detached",
    "terrace",
    "semidetached_house",
];

/// 默认必须存在的标签
pub const DEFAULT_REQUIRED_TAGS: &[&str] = &["height", "building:levels", "building:material"];

/// 包围盒 (度)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// 英格兰、威尔士与苏格兰大部 (49.8°N–58.7°N, 5.8°W–1.8°E)
    pub const GREAT_BRITAIN: BoundingBox = BoundingBox {
        south: 49.8,
        west: -5.8,
        north: 58.7,
        east: 1.8,
    };

    /// 解析 "south,west,north,east"
    pub fn parse(input: &str) -> Result<Self> {
        let values: Vec<f64> = input
            .split(',')
            .map(|s| s.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| {
                FacadesetError::InvalidArgument(format!("Invalid bbox '{}': {}", input, e))
            })?;

        if values.len() != 4 {
            return Err(FacadesetError::InvalidArgument(format!(
                "Invalid bbox '{}': expected south,west,north,east",
                input
            )));
        }
        let bbox = BoundingBox {
            south: values[0],
            west: values[1],
            north: values[2],
            east: values[3],
        };
        if bbox.south >= bbox.north || !(-90.0..=90.0).contains(&bbox.south)
            || !(-90.0..=90.0).contains(&bbox.north)
        {
            return Err(FacadesetError::InvalidArgument(format!(
                "Invalid bbox '{}': south must be below north, both within [-90, 90]",
                input
            )));
        }
        Ok(bbox)
    }
}

/// Overpass 建筑查询
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    pub bbox: BoundingBox,
    pub building_types: Vec<String>,
    pub required_tags: Vec<String>,
    /// 服务端超时（秒）
    pub timeout_secs: u32,
    /// 返回数量上限；None 表示全部
    pub limit: Option<usize>,
}

impl Default for OverpassQuery {
    fn default() -> Self {
        OverpassQuery {
            bbox: BoundingBox::GREAT_BRITAIN,
            building_types: DEFAULT_BUILDING_TYPES.iter().map(|s| s.to_string()).collect(),
            required_tags: DEFAULT_REQUIRED_TAGS.iter().map(|s| s.to_string()).collect(),
            timeout_secs: 500,
            limit: None,
        }
    }
}

impl OverpassQuery {
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.filter(|&n| n > 0);
        self
    }
}

impl fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[out:json][timeout:{}];", self.timeout_secs)?;
        writeln!(f, "// Gather ways that are buildings with required attributes")?;
        writeln!(f, "way")?;
        writeln!(
            f,
            "  [\"building\"~\"^({})$\"]",
            self.building_types.join("|")
        )?;
        for tag in &self.required_tags {
            writeln!(f, "  [\"{}\"]", tag)?;
        }
        writeln!(
            f,
            "  ({},{},{},{});",
            self.bbox.south, self.bbox.west, self.bbox.north, self.bbox.east
        )?;
        match self.limit {
            Some(n) => write!(f, "out body geom {};", n),
            None => write!(f, "out body geom;"),
        }
    }
}

/// 执行查询，返回原始 JSON（保持服务端返回内容不变）
pub fn fetch_raw(client: &dyn HttpFetch, endpoint: &str, query: &OverpassQuery) -> Result<serde_json::Value> {
    let query_text = query.to_string();
    tracing::info!(endpoint = %endpoint, limit = ?query.limit, "Querying Overpass API");

    let response = client.post_form(endpoint, &[("data", query_text.as_str())])?;
    if !response.is_success() {
        return Err(FacadesetError::ApiError {
            status: response.status,
            body: response.body_preview(200),
        });
    }

    serde_json::from_slice(&response.body).map_err(|e| FacadesetError::ParseError {
        format: "Overpass JSON".to_string(),
        path: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// 保存为 `<dir>/raw.json`
pub fn save_raw(data: &serde_json::Value, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("raw.json");
    json::write_json_pretty(&path, data)?;
    Ok(path)
}

/// 原始响应中的元素数量
pub fn element_count(data: &serde_json::Value) -> usize {
    data.get("elements")
        .and_then(|e| e.as_array())
        .map(|a| a.len())
        .unwrap_or(0)
}

//! # OSM 原始数据模型
//!
//! Overpass `out body geom` 返回的 way 元素。未列出的字段被忽略。
//!
//! ## 依赖关系
//! - 被 `osm/filter.rs`, `osm/processor.rs` 使用

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overpass 响应（仅关心 elements）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsmResponse {
    #[serde(default)]
    pub elements: Vec<OsmElement>,
}

/// way 几何中的一个节点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OsmNode {
    pub lat: f64,
    pub lon: f64,
}

/// OSM 元素（建筑 way）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsmElement {
    pub id: i64,

    #[serde(default)]
    pub tags: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub geometry: Vec<OsmNode>,
}

impl OsmElement {
    /// 读取标签，缺失返回 None
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .as_ref()
            .and_then(|t| t.get(key))
            .map(|s| s.as_str())
    }

    /// 读取标签，缺失返回空串
    pub fn tag_or_empty(&self, key: &str) -> String {
        self.tag(key).unwrap_or_default().to_string()
    }
}

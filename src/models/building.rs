//! # 处理后的建筑记录
//!
//! `processed.json` 与 `processed_with_images.json` 的记录结构。
//! 字段名即 JSON 键名，下游训练脚本依赖这些名称。
//!
//! ## 依赖关系
//! - 由 `osm/processor.rs` 生成
//! - 被 `commands/images.rs`, `commands/aerial.rs` 读取

use serde::{Deserialize, Serialize};

/// 单栋建筑的属性与几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedBuilding {
    pub osm_id: i64,

    /// 代表点经度
    pub longitude: f64,

    /// 代表点纬度
    pub latitude: f64,

    /// 楼高 (m)，标签无法解析时为 null
    pub building_height: Option<f64>,

    /// 楼层数，标签无法解析时为 null
    pub levels: Option<i64>,

    pub building_type: String,
    pub building_material: String,
    pub roof_material: String,
    pub roof_shape: String,
    pub name: String,
    pub street: String,
    pub housenumber: String,
    pub postcode: String,
    pub city: String,

    /// 轮廓 WKT (lon lat)
    pub footprint_wkt: String,

    /// 轮廓面积 (m²)，UTM 投影
    pub footprint_area: f64,
}

/// 带街景图片路径的建筑记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingWithImages {
    #[serde(flatten)]
    pub building: ProcessedBuilding,

    #[serde(default)]
    pub fixed_pitch_image: Option<String>,

    #[serde(default)]
    pub height_pitch_image: Option<String>,
}

impl BuildingWithImages {
    pub fn new(building: ProcessedBuilding) -> Self {
        BuildingWithImages {
            building,
            fixed_pitch_image: None,
            height_pitch_image: None,
        }
    }

    /// 至少有一张图片
    pub fn has_any_image(&self) -> bool {
        self.fixed_pitch_image.is_some() || self.height_pitch_image.is_some()
    }
}

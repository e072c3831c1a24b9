//! # 大地测量与建筑轮廓几何模块
//!
//! 提供 WGS84 坐标与 UTM / 地心坐标之间的转换，以及建筑轮廓多边形的
//! 面积、内点、WKT 表示。
//!
//! ## 子模块
//! - `utm`: UTM 横轴墨卡托投影
//! - `ecef`: WGS84 -> 地心坐标 (EPSG:4978)
//! - `polygon`: 轮廓多边形（面积、代表点、WKT）
//!
//! ## 依赖关系
//! - 被 `osm/processor.rs` 和 `maps/streetview.rs` 使用
//! - 无外部 crate 依赖

pub mod ecef;
pub mod polygon;
pub mod utm;

pub use ecef::Ecef;
pub use polygon::Polygon;

use serde::{Deserialize, Serialize};

/// 经纬度坐标（度，WGS84）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

impl Coord {
    pub fn new(lon: f64, lat: f64) -> Self {
        Coord { lon, lat }
    }
}

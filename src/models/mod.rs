//! # 数据模型模块
//!
//! 定义 OSM 原始元素与处理后的建筑记录。
//!
//! ## 依赖关系
//! - 被 `osm/` 和 `commands/` 使用
//! - 子模块: osm, building

pub mod building;
pub mod osm;

pub use building::{BuildingWithImages, ProcessedBuilding};
pub use osm::{OsmElement, OsmResponse};

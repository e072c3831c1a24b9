//! # 建筑处理
//!
//! 将单个 OSM way 转换为 `ProcessedBuilding`：轮廓几何、代表点、
//! UTM 面积以及属性标签。
//!
//! ## 依赖关系
//! - 被 `commands/process.rs` 调用
//! - 使用 `geo/polygon.rs`, `models/`

use crate::error::{FacadesetError, Result};
use crate::geo::{Coord, Polygon};
use crate::models::{OsmElement, ProcessedBuilding};

use rayon::prelude::*;

/// 处理单栋建筑
pub fn process_building(element: &OsmElement) -> Result<ProcessedBuilding> {
    if element.geometry.is_empty() {
        return Err(FacadesetError::InvalidGeometry(format!(
            "way {} has no geometry",
            element.id
        )));
    }

    let ring: Vec<Coord> = element
        .geometry
        .iter()
        .map(|node| Coord::new(node.lon, node.lat))
        .collect();
    let footprint = Polygon::new(ring, Vec::new())?;
    let point = footprint.representative_point();
    let footprint_area = footprint.area_m2()?;

    Ok(ProcessedBuilding {
        osm_id: element.id,
        longitude: point.lon,
        latitude: point.lat,
        building_height: element.tag("height").and_then(parse_height),
        levels: element.tag("building:levels").and_then(parse_levels),
        building_type: element.tag_or_empty("building"),
        building_material: element.tag_or_empty("building:material"),
        roof_material: element.tag_or_empty("roof:material"),
        roof_shape: element.tag_or_empty("roof:shape"),
        name: element.tag_or_empty("name"),
        street: element.tag_or_empty("addr:street"),
        housenumber: element.tag_or_empty("addr:housenumber"),
        postcode: element.tag_or_empty("addr:postcode"),
        city: element.tag_or_empty("addr:city"),
        footprint_wkt: footprint.to_wkt(),
        footprint_area,
    })
}

/// 楼高：纯数字（米）；"12 m" 等带单位写法视为无效
pub fn parse_height(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|h| h.is_finite())
}

/// 楼层数：整数
pub fn parse_levels(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// 并行处理所有建筑，保持输入顺序；失败的建筑与错误一并返回
pub fn process_all(elements: &[OsmElement]) -> (Vec<ProcessedBuilding>, Vec<(i64, FacadesetError)>) {
    let results: Vec<(i64, Result<ProcessedBuilding>)> = elements
        .par_iter()
        .map(|e| (e.id, process_building(e)))
        .collect();

    let mut processed = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (id, result) in results {
        match result {
            Ok(building) => processed.push(building),
            Err(e) => failures.push((id, e)),
        }
    }
    (processed, failures)
}

//! # 建筑轮廓多边形
//!
//! 经纬度多边形（外环 + 内环），提供：
//! - 由 OSM 节点构建（自动闭合）
//! - WKT 输出
//! - UTM 投影面积（平方米，扣除内环）
//! - 代表点（保证落在多边形内部）
//!
//! ## 代表点算法
//! 1. 取包围盒中心纵坐标 centreY
//! 2. 在所有顶点纵坐标中找到紧邻 centreY 上下的两个值，扫描线取其平均
//! 3. 计算所有环的边与扫描线的交点并排序
//! 4. 两两配对得到内部区间，取最宽区间的中点
//!
//! ## 依赖关系
//! - 被 `osm/processor.rs` 调用
//! - 使用 `geo/utm.rs` 计算面积

use super::{utm, Coord};
use crate::error::{FacadesetError, Result};

/// 经纬度多边形，所有环首尾闭合
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Vec<Coord>,
    pub interiors: Vec<Vec<Coord>>,
}

impl Polygon {
    /// 由坐标序列构建，必要时闭合外环
    pub fn new(exterior: Vec<Coord>, interiors: Vec<Vec<Coord>>) -> Result<Self> {
        let exterior = close_ring(exterior)?;
        let interiors = interiors
            .into_iter()
            .map(close_ring)
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon {
            exterior,
            interiors,
        })
    }

    fn rings(&self) -> impl Iterator<Item = &Vec<Coord>> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// WKT 表示：`POLYGON((lon lat, ...), (...))`
    pub fn to_wkt(&self) -> String {
        let rings: Vec<String> = self
            .rings()
            .map(|ring| {
                let coords: Vec<String> = ring
                    .iter()
                    .map(|c| format!("{} {}", c.lon, c.lat))
                    .collect();
                format!("({})", coords.join(", "))
            })
            .collect();
        format!("POLYGON({})", rings.join(", "))
    }

    /// UTM 投影面积（平方米），内环面积被扣除
    pub fn area_m2(&self) -> Result<f64> {
        let first = self.exterior[0];
        let zone = utm::zone_number(first.lat, first.lon);

        let mut area = ring_area_utm(&self.exterior, zone)?;
        for hole in &self.interiors {
            area -= ring_area_utm(hole, zone)?;
        }
        Ok(area)
    }

    /// 返回一个保证位于多边形内部的点
    pub fn representative_point(&self) -> Coord {
        let fallback = self.exterior[0];
        let scan_y = self.scan_line_y();

        let mut crossings: Vec<f64> = Vec::new();
        for ring in self.rings() {
            for seg in ring.windows(2) {
                if let Some(x) = horizontal_crossing(seg[0], seg[1], scan_y) {
                    crossings.push(x);
                }
            }
        }

        if crossings.len() < 2 {
            return fallback;
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        let mut best: Option<(f64, f64)> = None; // (宽度, 中点 x)
        for pair in crossings.chunks_exact(2) {
            let width = pair[1] - pair[0];
            if best.map_or(true, |(w, _)| width > w) {
                best = Some((width, (pair[0] + pair[1]) / 2.0));
            }
        }

        match best {
            Some((width, x)) if width > 0.0 => Coord::new(x, scan_y),
            _ => fallback,
        }
    }

    /// 扫描线纵坐标：紧邻包围盒中心上下两个顶点纵坐标的平均
    fn scan_line_y(&self) -> f64 {
        let (min_y, max_y) = self
            .exterior
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.lat), hi.max(c.lat))
            });
        let centre_y = (min_y + max_y) / 2.0;

        let mut lo_y = min_y;
        let mut hi_y = max_y;
        for ring in self.rings() {
            for c in ring {
                let y = c.lat;
                if y <= centre_y {
                    if y > lo_y {
                        lo_y = y;
                    }
                } else if y < hi_y {
                    hi_y = y;
                }
            }
        }
        (lo_y + hi_y) / 2.0
    }
}

/// 闭合环并检查点数
fn close_ring(mut ring: Vec<Coord>) -> Result<Vec<Coord>> {
    let (first, last) = match (ring.first(), ring.last()) {
        (Some(f), Some(l)) => (*f, *l),
        _ => return Err(FacadesetError::InvalidGeometry("empty ring".to_string())),
    };
    if first != last {
        ring.push(first);
    }
    if ring.len() < 4 {
        return Err(FacadesetError::InvalidGeometry(format!(
            "ring needs at least 4 coordinates, got {}",
            ring.len()
        )));
    }
    Ok(ring)
}

/// 单个环投影到指定 UTM 带后的鞋带公式面积
fn ring_area_utm(ring: &[Coord], zone: u8) -> Result<f64> {
    let projected = ring
        .iter()
        .map(|c| utm::from_latlon(c.lat, c.lon, Some(zone)).map(|u| (u.easting, u.northing)))
        .collect::<Result<Vec<_>>>()?;

    let twice_area: f64 = projected
        .windows(2)
        .map(|w| w[0].0 * w[1].1 - w[1].0 * w[0].1)
        .sum();
    Ok(twice_area.abs() / 2.0)
}

/// 线段与水平线 y 的交点横坐标；水平线段与重复计数的端点被排除
fn horizontal_crossing(p0: Coord, p1: Coord, y: f64) -> Option<f64> {
    if (p0.lat > y && p1.lat > y) || (p0.lat < y && p1.lat < y) {
        return None;
    }
    if p0.lat == p1.lat {
        return None;
    }
    if p0.lat == y && p1.lat < y {
        return None;
    }
    if p1.lat == y && p0.lat < y {
        return None;
    }
    if p0.lon == p1.lon {
        return Some(p0.lon);
    }
    Some(p0.lon + (y - p0.lat) * (p1.lon - p0.lon) / (p1.lat - p0.lat))
}

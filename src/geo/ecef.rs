//! # 地心坐标转换
//!
//! WGS84 大地坐标 (lon, lat, h) -> 地心地固坐标 (EPSG:4978)。
//!
//! ## 依赖关系
//! - 被 `maps/streetview.rs` 用于计算按楼高的俯仰角

use std::ops::Sub;

/// WGS84 长半轴 (m)
const A: f64 = 6_378_137.0;
/// WGS84 扁率
const F: f64 = 1.0 / 298.257_223_563;

/// 地心坐标 (m)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    /// 从经度、纬度（度）和椭球高（m）计算地心坐标
    pub fn from_geodetic(lon: f64, lat: f64, height: f64) -> Self {
        let e2 = F * (2.0 - F);
        let lat_rad = lat.to_radians();
        let lon_rad = lon.to_radians();
        let sin_lat = lat_rad.sin();
        let n = A / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Ecef {
            x: (n + height) * lat_rad.cos() * lon_rad.cos(),
            y: (n + height) * lat_rad.cos() * lon_rad.sin(),
            z: (n * (1.0 - e2) + height) * sin_lat,
        }
    }

    pub fn dot(&self, other: &Ecef) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// 两向量夹角（度）；任一向量长度为零时返回 None
    pub fn angle_to(&self, other: &Ecef) -> Option<f64> {
        let denom = self.norm() * other.norm();
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }
        let cosine = (self.dot(other) / denom).clamp(-1.0, 1.0);
        Some(cosine.acos().to_degrees())
    }
}

impl Sub for Ecef {
    type Output = Ecef;

    fn sub(self, rhs: Ecef) -> Ecef {
        Ecef {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

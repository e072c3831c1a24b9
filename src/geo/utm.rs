//! # UTM 投影
//!
//! WGS84 经纬度 -> UTM (easting, northing)。
//!
//! ## 算法概述
//! 横轴墨卡托级数展开（Snyder, *Map Projections: A Working Manual*），
//! k0 = 0.9996，假东偏 500 000 m，南半球假北偏 10 000 000 m。
//! 带号计算包含挪威 (32V) 与斯瓦尔巴 (31X/33X/35X/37X) 的特例。
//!
//! ## 依赖关系
//! - 被 `geo/polygon.rs` 调用

use crate::error::{FacadesetError, Result};

const K0: f64 = 0.9996;
const R: f64 = 6_378_137.0;
const E: f64 = 0.006_694_38;
const E2: f64 = E * E;
const E3: f64 = E2 * E;
const E_P2: f64 = E / (1.0 - E);

const M1: f64 = 1.0 - E / 4.0 - 3.0 * E2 / 64.0 - 5.0 * E3 / 256.0;
const M2: f64 = 3.0 * E / 8.0 + 3.0 * E2 / 32.0 + 45.0 * E3 / 1024.0;
const M3: f64 = 15.0 * E2 / 256.0 + 45.0 * E3 / 1024.0;
const M4: f64 = 35.0 * E3 / 3072.0;

const ZONE_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWXX";

/// UTM 坐标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmCoord {
    pub easting: f64,
    pub northing: f64,
    pub zone_number: u8,
    pub zone_letter: Option<char>,
}

/// 计算 UTM 带号
pub fn zone_number(lat: f64, lon: f64) -> u8 {
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }

    if (72.0..=84.0).contains(&lat) && lon >= 0.0 {
        if lon < 9.0 {
            return 31;
        } else if lon < 21.0 {
            return 33;
        } else if lon < 33.0 {
            return 35;
        } else if lon < 42.0 {
            return 37;
        }
    }

    if lon == 180.0 {
        return 60;
    }

    (((lon + 180.0) / 6.0).floor() as i64).rem_euclid(60) as u8 + 1
}

/// 计算 UTM 纬度带字母
pub fn zone_letter(lat: f64) -> Option<char> {
    if !(-80.0..=84.0).contains(&lat) {
        return None;
    }
    let index = ((lat + 80.0) as usize) >> 3;
    ZONE_LETTERS.get(index).map(|&b| b as char)
}

/// 中央经线（度）
fn central_longitude(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// 将角度归一化到 [-π, π)
fn mod_angle(value: f64) -> f64 {
    (value + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI
}

/// 经纬度 -> UTM
///
/// `force_zone` 为 `Some` 时所有点投影到同一带，跨带多边形的面积才有意义。
pub fn from_latlon(lat: f64, lon: f64, force_zone: Option<u8>) -> Result<UtmCoord> {
    if !(-80.0..=84.0).contains(&lat) {
        return Err(FacadesetError::CoordinateOutOfRange(format!(
            "latitude {} outside [-80, 84]",
            lat
        )));
    }
    if !(-180.0..180.0).contains(&lon) {
        return Err(FacadesetError::CoordinateOutOfRange(format!(
            "longitude {} outside [-180, 180)",
            lon
        )));
    }

    let zone = match force_zone {
        Some(z) if (1..=60).contains(&z) => z,
        Some(z) => {
            return Err(FacadesetError::CoordinateOutOfRange(format!(
                "UTM zone {} outside [1, 60]",
                z
            )))
        }
        None => zone_number(lat, lon),
    };

    let lat_rad = lat.to_radians();
    let lat_sin = lat_rad.sin();
    let lat_cos = lat_rad.cos();
    let lat_tan = lat_sin / lat_cos;
    let lat_tan2 = lat_tan * lat_tan;
    let lat_tan4 = lat_tan2 * lat_tan2;

    let lon_rad = lon.to_radians();
    let central_lon_rad = central_longitude(zone).to_radians();

    let n = R / (1.0 - E * lat_sin * lat_sin).sqrt();
    let c = E_P2 * lat_cos * lat_cos;

    let a = lat_cos * mod_angle(lon_rad - central_lon_rad);
    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let m = R
        * (M1 * lat_rad - M2 * (2.0 * lat_rad).sin() + M3 * (4.0 * lat_rad).sin()
            - M4 * (6.0 * lat_rad).sin());

    let easting = K0
        * n
        * (a + a3 / 6.0 * (1.0 - lat_tan2 + c)
            + a5 / 120.0 * (5.0 - 18.0 * lat_tan2 + lat_tan4 + 72.0 * c - 58.0 * E_P2))
        + 500_000.0;

    let mut northing = K0
        * (m + n
            * lat_tan
            * (a2 / 2.0
                + a4 / 24.0 * (5.0 - lat_tan2 + 9.0 * c + 4.0 * c * c)
                + a6 / 720.0 * (61.0 - 58.0 * lat_tan2 + lat_tan4 + 600.0 * c - 330.0 * E_P2)));

    if lat < 0.0 {
        northing += 10_000_000.0;
    }

    Ok(UtmCoord {
        easting,
        northing,
        zone_number: zone,
        zone_letter: zone_letter(lat),
    })
}

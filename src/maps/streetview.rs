//! # Google Street View 接口
//!
//! ## 功能
//! - 元数据查询：给定位置附近是否有街景，以及实际相机位置
//! - 俯仰角计算：按楼高让画面同时覆盖楼底与楼顶
//! - 图片 URL 构建与下载（过滤“无图像”占位图）
//!
//! ## 俯仰角算法
//! 以相机（地面高度 0）为原点，分别指向建筑底部 (h=0) 与顶部 (h=楼高)
//! 的两个地心坐标向量，夹角的一半即为俯仰角。
//!
//! ## 依赖关系
//! - 被 `commands/images.rs`, `commands/camera.rs` 调用
//! - 使用 `maps/client.rs` 的 `HttpFetch`
//! - 使用 `geo/ecef.rs`

use super::client::{redact_key, HttpFetch};
use crate::config::StreetViewSettings;
use crate::error::{FacadesetError, Result};
use crate::geo::{Coord, Ecef};

use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const STREETVIEW_IMAGE_URL: &str = "https://maps.googleapis.com/maps/api/streetview";
pub const STREETVIEW_METADATA_URL: &str =
    "https://maps.googleapis.com/maps/api/streetview/metadata";

/// 俯仰角来源
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchMode {
    /// 固定角度（度）
    Fixed(f64),
    /// 按楼高计算；无法计算时退回给定角度
    BuildingHeight { height: Option<f64>, fallback: f64 },
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    status: String,
    location: Option<MetadataLocation>,
}

#[derive(Debug, Deserialize)]
struct MetadataLocation {
    lat: f64,
    lng: f64,
}

/// Street View 客户端
pub struct StreetView<'a> {
    http: &'a dyn HttpFetch,
    api_key: String,
    settings: StreetViewSettings,
}

impl<'a> StreetView<'a> {
    pub fn new(http: &'a dyn HttpFetch, api_key: &str, settings: StreetViewSettings) -> Self {
        StreetView {
            http,
            api_key: api_key.to_string(),
            settings,
        }
    }

    /// 元数据查询 URL
    pub fn metadata_url(&self, location: Coord) -> Result<Url> {
        let loc = format!("{},{}", location.lat, location.lon);
        build_url(
            STREETVIEW_METADATA_URL,
            &[
                ("location", loc.as_str()),
                ("source", "outdoor"),
                ("key", self.api_key.as_str()),
            ],
        )
    }

    /// 图片 URL
    pub fn image_url(&self, location: Coord, pitch: f64) -> Result<Url> {
        let loc = format!("{},{}", location.lat, location.lon);
        let fov = self.settings.fov.to_string();
        let pitch = pitch.to_string();
        build_url(
            STREETVIEW_IMAGE_URL,
            &[
                ("size", self.settings.size.as_str()),
                ("location", loc.as_str()),
                ("fov", fov.as_str()),
                ("pitch", pitch.as_str()),
                ("source", "outdoor"),
                ("key", self.api_key.as_str()),
            ],
        )
    }

    /// 查询街景相机实际位置；无街景返回 None
    pub fn camera_position(&self, location: Coord) -> Result<Option<Coord>> {
        let url = self.metadata_url(location)?;
        let response = self.http.get(&url)?;
        if response.status != 200 {
            tracing::debug!(status = response.status, "Metadata request failed");
            return Ok(None);
        }

        let meta: MetadataResponse =
            serde_json::from_slice(&response.body).map_err(|e| FacadesetError::ParseError {
                format: "Street View metadata".to_string(),
                path: redact_key(&url),
                reason: e.to_string(),
            })?;

        if meta.status != "OK" {
            tracing::debug!(status = %meta.status, "No Street View at location");
            return Ok(None);
        }
        Ok(meta.location.map(|l| Coord::new(l.lng, l.lat)))
    }

    /// 解析俯仰角：按楼高模式需要一次元数据查询
    pub fn resolve_pitch(&self, location: Coord, mode: PitchMode) -> Result<f64> {
        match mode {
            PitchMode::Fixed(pitch) => Ok(pitch),
            PitchMode::BuildingHeight { height, fallback } => {
                let height = match height {
                    Some(h) if h != 0.0 && h.is_finite() => h,
                    _ => return Ok(fallback),
                };
                let pitch = self
                    .camera_position(location)?
                    .and_then(|camera| height_pitch(location, camera, height));
                Ok(pitch.unwrap_or(fallback))
            }
        }
    }

    /// 下载图片到 `output_path`。无图像或 HTTP 失败返回 `Ok(false)`
    pub fn download_image(&self, location: Coord, mode: PitchMode, output_path: &Path) -> Result<bool> {
        let pitch = self.resolve_pitch(location, mode)?;
        let url = self.image_url(location, pitch)?;
        let response = self.http.get(&url)?;

        if !response.is_success() {
            tracing::warn!(
                status = response.status,
                body = %response.body_preview(200),
                "Street View image request failed"
            );
            return Ok(false);
        }

        if response.body.len() < self.settings.min_image_bytes {
            tracing::debug!(bytes = response.body.len(), "Blank Street View tile");
            return Ok(false);
        }

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| FacadesetError::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        fs::write(output_path, &response.body).map_err(|e| FacadesetError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        })?;
        Ok(true)
    }
}

/// 按楼高计算俯仰角（度）；相机与建筑重合等退化情况返回 None
pub fn height_pitch(building: Coord, camera: Coord, height: f64) -> Option<f64> {
    let origin = Ecef::from_geodetic(camera.lon, camera.lat, 0.0);
    let base = Ecef::from_geodetic(building.lon, building.lat, 0.0) - origin;
    let top = Ecef::from_geodetic(building.lon, building.lat, height) - origin;
    base.angle_to(&top).map(|angle| angle * 0.5)
}

fn build_url(base: &str, params: &[(&str, &str)]) -> Result<Url> {
    Url::parse_with_params(base, params)
        .map_err(|e| FacadesetError::InvalidArgument(format!("Invalid URL {}: {}", base, e)))
}

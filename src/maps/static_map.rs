//! # Google Static Maps 卫星图
//!
//! 以给定坐标为中心获取正射卫星影像（`maptype=satellite`），用于从顶部
//! 观察屋顶形状与材质。
//!
//! ## 依赖关系
//! - 被 `commands/aerial.rs` 调用
//! - 使用 `maps/client.rs` 的 `HttpFetch`

use super::client::HttpFetch;
use crate::error::{FacadesetError, Result};
use crate::geo::Coord;

use clap::ValueEnum;
use regex::Regex;
use reqwest::Url;
use std::sync::OnceLock;

pub const STATIC_MAPS_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// 赤道周长 (m)
const EARTH_CIRCUMFERENCE: f64 = 40_075_016.686;

/// Static Maps API 单边像素上限
pub const MAX_SIDE_PIXELS: u32 = 640;

/// 影像格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Webp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 卫星图请求参数
#[derive(Debug, Clone, PartialEq)]
pub struct AerialRequest {
    pub center: Coord,
    /// 缩放级别 0-21
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    /// 1 或 2（高分辨率）
    pub scale: u8,
    pub format: ImageFormat,
    /// 例如 "color:red|51.5,-0.12"
    pub marker: Option<String>,
}

impl AerialRequest {
    pub fn new(center: Coord) -> Self {
        AerialRequest {
            center,
            zoom: 19,
            width: 640,
            height: 640,
            scale: 2,
            format: ImageFormat::Png,
            marker: None,
        }
    }

    /// 检查参数是否在 API 允许范围内
    pub fn validate(&self) -> Result<()> {
        if self.zoom > 21 {
            return Err(FacadesetError::InvalidArgument(format!(
                "zoom must be in 0-21, got {}",
                self.zoom
            )));
        }
        if !(1..=2).contains(&self.scale) {
            return Err(FacadesetError::InvalidArgument(format!(
                "scale must be 1 or 2, got {}",
                self.scale
            )));
        }
        if self.width == 0
            || self.height == 0
            || self.width > MAX_SIDE_PIXELS
            || self.height > MAX_SIDE_PIXELS
        {
            return Err(FacadesetError::InvalidArgument(format!(
                "size must be within 1x1..{max}x{max}, got {}x{}",
                self.width,
                self.height,
                max = MAX_SIDE_PIXELS
            )));
        }
        Ok(())
    }

    pub fn url(&self, api_key: &str) -> Result<Url> {
        let center = format!("{},{}", self.center.lat, self.center.lon);
        let zoom = self.zoom.to_string();
        let size = format!("{}x{}", self.width, self.height);
        let scale = self.scale.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("center", center.as_str()),
            ("zoom", zoom.as_str()),
            ("size", size.as_str()),
            ("scale", scale.as_str()),
            ("maptype", "satellite"),
            ("format", self.format.extension()),
            ("key", api_key),
        ];
        if let Some(marker) = &self.marker {
            params.push(("markers", marker.as_str()));
        }

        Url::parse_with_params(STATIC_MAPS_URL, &params)
            .map_err(|e| FacadesetError::InvalidArgument(format!("Invalid URL: {}", e)))
    }

    /// 该请求影像的地面分辨率 (m/px)
    pub fn meters_per_pixel(&self) -> f64 {
        meters_per_pixel(self.center.lat, self.zoom, self.scale)
    }
}

/// 地面分辨率估算 (m/px)
pub fn meters_per_pixel(lat_deg: f64, zoom: u8, scale: u8) -> f64 {
    (lat_deg.to_radians().cos() * EARTH_CIRCUMFERENCE)
        / (256.0 * 2f64.powi(zoom as i32) * scale as f64)
}

/// 解析 "宽x高" 尺寸字符串
pub fn parse_size(input: &str) -> Result<(u32, u32)> {
    static SIZE_RE: OnceLock<Regex> = OnceLock::new();
    let re = SIZE_RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$").unwrap());

    let caps = re.captures(input).ok_or_else(|| {
        FacadesetError::InvalidArgument(format!(
            "Invalid size '{}'. Use WIDTHxHEIGHT, e.g. 640x640",
            input
        ))
    })?;
    let parse = |s: &str| {
        s.parse::<u32>()
            .map_err(|e| FacadesetError::InvalidArgument(format!("Invalid size '{}': {}", input, e)))
    };
    Ok((parse(&caps[1])?, parse(&caps[2])?))
}

/// 获取卫星图字节
///
/// 非 200 或 `text/*` 响应（API 以文本返回错误）视为失败，错误信息附带
/// 响应体前 200 个字符。
pub fn fetch_aerial(http: &dyn HttpFetch, request: &AerialRequest, api_key: &str) -> Result<Vec<u8>> {
    request.validate()?;
    let url = request.url(api_key)?;
    let response = http.get(&url)?;

    let is_text = response
        .content_type
        .as_deref()
        .map(|ct| ct.starts_with("text/"))
        .unwrap_or(false);

    if response.status != 200 || is_text {
        return Err(FacadesetError::ApiError {
            status: response.status,
            body: response.body_preview(200),
        });
    }
    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::client::testing::{image, FakeHttp};
    use crate::maps::client::HttpResponse;

    const PATH: &str = "/maps/api/staticmap";

    #[test]
    fn test_meters_per_pixel() {
        let equator = meters_per_pixel(0.0, 0, 1);
        assert!((equator - 156_543.03).abs() < 0.01);

        // 纬度 60° 分辨率减半，scale 2 再减半
        let north = meters_per_pixel(60.0, 0, 2);
        assert!((north - equator / 4.0).abs() < 1e-6);

        let z19 = AerialRequest::new(Coord::new(-74.0445, 40.6892)).meters_per_pixel();
        assert!((z19 - 0.113).abs() < 0.001, "z19 = {}", z19);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("640x640").unwrap(), (640, 640));
        assert_eq!(parse_size(" 350 X 200 ").unwrap(), (350, 200));
        assert!(parse_size("640").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn test_validate() {
        let mut req = AerialRequest::new(Coord::new(0.0, 0.0));
        assert!(req.validate().is_ok());
        req.scale = 3;
        assert!(req.validate().is_err());
        req.scale = 1;
        req.width = 1280;
        assert!(req.validate().is_err());
        req.width = 640;
        req.zoom = 22;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_url_parameters() {
        let mut req = AerialRequest::new(Coord::new(-0.12, 51.5));
        req.marker = Some("color:red|51.5,-0.12".to_string());
        let url = req.url("KEY").unwrap();
        let q: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(q["center"], "51.5,-0.12");
        assert_eq!(q["zoom"], "19");
        assert_eq!(q["size"], "640x640");
        assert_eq!(q["scale"], "2");
        assert_eq!(q["maptype"], "satellite");
        assert_eq!(q["format"], "png");
        assert_eq!(q["markers"], "color:red|51.5,-0.12");
    }

    #[test]
    fn test_fetch_aerial_ok() {
        let http = FakeHttp::default().route(PATH, image(1234));
        let req = AerialRequest::new(Coord::new(-0.12, 51.5));
        let bytes = fetch_aerial(&http, &req, "KEY").unwrap();
        assert_eq!(bytes.len(), 1234);
    }

    #[test]
    fn test_fetch_aerial_text_response_is_error() {
        let http = FakeHttp::default().route(
            PATH,
            HttpResponse {
                status: 200,
                content_type: Some("text/html; charset=UTF-8".to_string()),
                body: b"The Google Maps Platform server rejected your request.".to_vec(),
            },
        );
        let req = AerialRequest::new(Coord::new(-0.12, 51.5));
        match fetch_aerial(&http, &req, "KEY") {
            Err(FacadesetError::ApiError { status, body }) => {
                assert_eq!(status, 200);
                assert!(body.starts_with("The Google Maps Platform"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_fetch_aerial_invalid_request_sends_nothing() {
        let http = FakeHttp::default();
        let mut req = AerialRequest::new(Coord::new(-0.12, 51.5));
        req.scale = 4;
        assert!(fetch_aerial(&http, &req, "KEY").is_err());
        assert_eq!(http.request_count(), 0);
    }
}

//! # Google Maps 影像模块
//!
//! ## 子模块
//! - `client`: 带速率限制的 HTTP 客户端与 `HttpFetch` 接缝
//! - `streetview`: 街景元数据、俯仰角、图片下载
//! - `static_map`: 卫星图
//!
//! ## 依赖关系
//! - 被 `commands/images.rs`, `commands/aerial.rs`, `commands/camera.rs` 使用
//! - 使用 `geo/`

pub mod client;
pub mod static_map;
pub mod streetview;

pub use client::{HttpClient, HttpFetch};
pub use static_map::ImageFormat;
pub use streetview::{PitchMode, StreetView};

//! # OpenStreetMap 数据模块
//!
//! ## 子模块
//! - `overpass`: Overpass 查询构建与获取
//! - `filter`: 按街道去重
//! - `processor`: 几何与属性提取
//!
//! ## 依赖关系
//! - 被 `commands/fetch.rs`, `commands/process.rs` 使用
//! - 使用 `models/`, `geo/`

pub mod filter;
pub mod overpass;
pub mod processor;

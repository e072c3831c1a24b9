//! # 视觉语言模型请求载荷
//!
//! 将 YAML 提示词与建筑图片打包为 OpenAI 兼容的 chat 请求体，
//! 供外部 VLM 服务标注建筑材质、屋顶形状等属性。
//!
//! ## 子模块
//! - `payload`: 提示词加载、图片编码、按模型格式化
//!
//! ## 依赖关系
//! - 被 `commands/prompt.rs` 使用

pub mod payload;

pub use payload::{build_request, load_yaml_as_json, ModelFamily};

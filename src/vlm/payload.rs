//! # 请求载荷构建
//!
//! ## 图片格式
//! - `gemini*`: `{"type": "image_url", "image_url": "data:image/jpeg;base64,..."}`
//! - `gpt*`, `claude*`: `{"type": "image_url", "image_url": {"url": "data:..."}}`
//!
//! ## 依赖关系
//! - 被 `commands/prompt.rs` 调用
//! - 使用 `base64`, `serde_yaml`, `serde_json`

use crate::error::{FacadesetError, Result};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// 模型家族，决定图片部分的格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Gemini,
    Gpt,
    Claude,
}

impl ModelFamily {
    /// 由模型 id 前缀识别
    pub fn from_model(model: &str) -> Result<Self> {
        if model.starts_with("gemini") {
            Ok(ModelFamily::Gemini)
        } else if model.starts_with("gpt") {
            Ok(ModelFamily::Gpt)
        } else if model.starts_with("claude") {
            Ok(ModelFamily::Claude)
        } else {
            Err(FacadesetError::UnsupportedModel(model.to_string()))
        }
    }
}

/// 读取 YAML 文件并转为 JSON 字符串（4 空格缩进）
pub fn load_yaml_as_json(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| FacadesetError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    yaml_to_json(&content).map_err(|reason| FacadesetError::ParseError {
        format: "YAML".to_string(),
        path: path.display().to_string(),
        reason,
    })
}

fn yaml_to_json(content: &str) -> std::result::Result<String, String> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).map_err(|e| e.to_string())?;
    String::from_utf8(buf).map_err(|e| e.to_string())
}

/// base64 编码图片字节
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// 读取并编码多张图片，保持顺序
pub fn load_and_encode_images<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            fs::read(path)
                .map(|bytes| encode_image(&bytes))
                .map_err(|e| FacadesetError::FileReadError {
                    path: path.display().to_string(),
                    source: e,
                })
        })
        .collect()
}

/// 按模型格式化单张图片
pub fn format_image_for_model(base64_image: &str, model: &str) -> Result<Value> {
    let data_url = format!("data:image/jpeg;base64,{}", base64_image);
    let part = match ModelFamily::from_model(model)? {
        ModelFamily::Gemini => json!({
            "type": "image_url",
            "image_url": data_url,
        }),
        ModelFamily::Gpt | ModelFamily::Claude => json!({
            "type": "image_url",
            "image_url": { "url": data_url },
        }),
    };
    Ok(part)
}

/// 构建完整请求体：一条 user 消息，先文本提示后图片
pub fn build_request(model: &str, prompt: &str, base64_images: &[String]) -> Result<Value> {
    let mut content = vec![json!({ "type": "text", "text": prompt })];
    for image in base64_images {
        content.push(format_image_for_model(image, model)?);
    }

    Ok(json!({
        "model": model,
        "messages": [
            { "role": "user", "content": content }
        ],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_family() {
        assert_eq!(ModelFamily::from_model("gemini-1.5-pro").unwrap(), ModelFamily::Gemini);
        assert_eq!(ModelFamily::from_model("gpt-4o").unwrap(), ModelFamily::Gpt);
        assert_eq!(ModelFamily::from_model("claude-3-5-sonnet").unwrap(), ModelFamily::Claude);
        assert!(matches!(
            ModelFamily::from_model("llava"),
            Err(FacadesetError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_encode_image() {
        assert_eq!(encode_image(b"hello"), "aGVsbG8=");
        assert_eq!(encode_image(b""), "");
    }

    #[test]
    fn test_format_image_gemini_is_flat() {
        let part = format_image_for_model("QUJD", "gemini-pro").unwrap();
        assert_eq!(part["type"], "image_url");
        assert_eq!(part["image_url"], "data:image/jpeg;base64,QUJD");
    }

    #[test]
    fn test_format_image_gpt_and_claude_are_nested() {
        for model in ["gpt-4o", "claude-3-opus"] {
            let part = format_image_for_model("QUJD", model).unwrap();
            assert_eq!(part["image_url"]["url"], "data:image/jpeg;base64,QUJD");
        }
    }

    #[test]
    fn test_yaml_to_json() {
        let yaml = "task: classify\nlabels:\n  - brick\n  - stone\n";
        let json = yaml_to_json(yaml).unwrap();
        assert!(json.contains("\n    \"task\": \"classify\""));

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["labels"][1], "stone");
    }

    #[test]
    fn test_load_yaml_as_json_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_yaml_as_json(&tmp.path().join("missing.yaml")).is_err());

        let bad = tmp.path().join("bad.yaml");
        fs::write(&bad, "key: [unclosed").unwrap();
        assert!(matches!(
            load_yaml_as_json(&bad),
            Err(FacadesetError::ParseError { .. })
        ));
    }

    #[test]
    fn test_build_request() {
        let images = vec!["QUJD".to_string(), "REVG".to_string()];
        let request = build_request("gpt-4o", "{\"task\": \"x\"}", &images).unwrap();

        assert_eq!(request["model"], "gpt-4o");
        let content = request["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[2]["image_url"]["url"], "data:image/jpeg;base64,REVG");
        assert_eq!(request["messages"][0]["role"], "user");
    }

    #[test]
    fn test_build_request_rejects_unknown_model() {
        assert!(build_request("mistral", "p", &["QUJD".to_string()]).is_err());
    }

    #[test]
    fn test_load_and_encode_images() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.jpg");
        fs::write(&a, b"hello").unwrap();
        let encoded = load_and_encode_images(&[&a]).unwrap();
        assert_eq!(encoded, vec!["aGVsbG8=".to_string()]);
    }
}

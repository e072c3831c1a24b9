//! # prompt 命令实现
//!
//! 将 YAML 提示词转为 JSON 文本，与 base64 图片一起组装为 VLM 请求体。
//!
//! ## 依赖关系
//! - 使用 `cli/prompt.rs` 定义的参数
//! - 使用 `vlm/payload.rs`, `batch/collector.rs`

use crate::batch::FileCollector;
use crate::cli::prompt::PromptArgs;
use crate::config::Settings;
use crate::error::{FacadesetError, Result};
use crate::utils::{json, output};
use crate::vlm::{self, payload};

use serde_json::Value;

/// 执行 prompt 命令
pub fn execute(args: PromptArgs, _settings: &Settings) -> Result<()> {
    let request = build_payload(&args)?;

    match &args.output {
        Some(path) => {
            json::write_json_pretty(path, &request)?;
            output::print_success(&format!("Request written to {}", path.display()));
        }
        None => println!("{}", serde_json::to_string_pretty(&request)?),
    }
    Ok(())
}

fn build_payload(args: &PromptArgs) -> Result<Value> {
    vlm::ModelFamily::from_model(&args.model)?;

    let images = FileCollector::new(args.images.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;
    if images.is_empty() {
        return Err(FacadesetError::InvalidArgument(format!(
            "No images matching '{}' found",
            args.pattern
        )));
    }

    let prompt = vlm::load_yaml_as_json(&args.prompt)?;
    let encoded = payload::load_and_encode_images(&images)?;
    tracing::info!(model = %args.model, images = images.len(), "Built VLM request");

    vlm::build_request(&args.model, &prompt, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn args(dir: &Path, model: &str) -> PromptArgs {
        PromptArgs {
            prompt: dir.join("prompt.yaml"),
            model: model.to_string(),
            images: vec![dir.join("imgs")],
            pattern: "*.jpg,*.png".to_string(),
            recursive: false,
            output: Some(dir.join("request.json")),
        }
    }

    fn setup(dir: &Path) {
        fs::write(
            dir.join("prompt.yaml"),
            "task: classify facade\nfields:\n  - material\n  - levels\n",
        )
        .unwrap();
        fs::create_dir_all(dir.join("imgs")).unwrap();
        fs::write(dir.join("imgs/b.png"), b"world").unwrap();
        fs::write(dir.join("imgs/a.jpg"), b"hello").unwrap();
        fs::write(dir.join("imgs/notes.txt"), b"skip").unwrap();
    }

    #[test]
    fn test_payload_for_gpt() {
        let tmp = tempfile::tempdir().unwrap();
        setup(tmp.path());

        let request = build_payload(&args(tmp.path(), "gpt-4o")).unwrap();
        let content = request["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);

        let text = content[0]["text"].as_str().unwrap();
        assert!(text.contains("\"task\": \"classify facade\""));
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/jpeg;base64,aGVsbG8="
        );
        assert_eq!(
            content[2]["image_url"]["url"],
            "data:image/jpeg;base64,d29ybGQ="
        );
    }

    #[test]
    fn test_execute_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        setup(tmp.path());
        let a = args(tmp.path(), "gemini-1.5-flash");
        let global = crate::cli::GlobalArgs {
            config: None,
            data_dir: Some(tmp.path().to_path_buf()),
            api_key: None,
        };
        let settings =
            Settings::merge(&global, crate::config::FileConfig::default(), None).unwrap();

        execute(a, &settings).unwrap();
        let written: Value = json::read_json(&tmp.path().join("request.json")).unwrap();
        assert_eq!(written["model"], "gemini-1.5-flash");
        assert!(written["messages"][0]["content"][1]["image_url"].is_string());
    }

    #[test]
    fn test_unsupported_model() {
        let tmp = tempfile::tempdir().unwrap();
        setup(tmp.path());
        assert!(matches!(
            build_payload(&args(tmp.path(), "llava")),
            Err(FacadesetError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_no_matching_images() {
        let tmp = tempfile::tempdir().unwrap();
        setup(tmp.path());
        let mut a = args(tmp.path(), "claude-3-opus");
        a.pattern = "*.webp".to_string();
        assert!(build_payload(&a).is_err());
    }
}

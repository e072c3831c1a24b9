//! # images 命令实现
//!
//! 为 processed.json 中的建筑下载街景图片，生成 processed_with_images.json。
//!
//! ## 功能
//! - 固定俯仰与按楼高俯仰两种图片，可同时获取
//! - 已存在的图片文件直接复用，不发请求
//! - 续跑：读取已有输出，按 osm_id 更新或追加记录
//! - 无任何图片的建筑只计数，不写入输出
//!
//! ## 依赖关系
//! - 使用 `cli/images.rs` 定义的参数
//! - 使用 `maps/streetview.rs`, `batch/runner.rs`
//! - 使用 `utils/output.rs`, `utils/json.rs`

use crate::batch::{BatchRunner, ProcessResult};
use crate::cli::images::ImagesArgs;
use crate::config::Settings;
use crate::error::{FacadesetError, Result};
use crate::geo::Coord;
use crate::maps::{HttpClient, PitchMode, StreetView};
use crate::models::{BuildingWithImages, ProcessedBuilding};
use crate::utils::{json, output};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 本次运行要获取的图片种类与存放位置
#[derive(Debug, Clone)]
struct ImagePlan {
    fixed_dir: Option<PathBuf>,
    height_dir: Option<PathBuf>,
    /// 固定俯仰图片的角度
    pitch: f64,
    /// 按楼高计算失败时的角度，不受 `--pitch` 影响
    height_fallback: f64,
}

impl ImagePlan {
    fn new(images_dir: &Path, fixed: bool, height: bool, pitch: f64, height_fallback: f64) -> Self {
        ImagePlan {
            fixed_dir: fixed.then(|| images_dir.join("fixed_pitch")),
            height_dir: height.then(|| images_dir.join("height_pitch")),
            pitch,
            height_fallback,
        }
    }
}

/// 执行 images 命令
pub fn execute(args: ImagesArgs, settings: &Settings) -> Result<()> {
    output::print_header("Fetching Street View Images");
    let api_key = settings.require_api_key()?;
    settings.layout.ensure()?;

    let input = args.input.clone().unwrap_or_else(|| settings.layout.processed());
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| settings.layout.processed_with_images());

    let interval = match args.interval {
        Some(secs) if !secs.is_finite() || secs < 0.0 => {
            return Err(FacadesetError::InvalidArgument(format!(
                "--interval must be >= 0, got {}",
                secs
            )));
        }
        Some(secs) => Duration::from_secs_f64(secs),
        None => settings.request_interval,
    };

    let buildings = apply_limit(json::read_json(&input)?, args.limit);

    let existing: Vec<BuildingWithImages> = if output_path.is_file() {
        json::read_json(&output_path)?
    } else {
        Vec::new()
    };
    if !existing.is_empty() {
        output::print_info(&format!(
            "Loaded {} existing records from {}",
            existing.len(),
            output_path.display()
        ));
    }

    let (fixed, height) = args.modes();
    let pitch = args.pitch.unwrap_or(settings.streetview.default_pitch);
    let plan = ImagePlan::new(
        &settings.layout.images_dir(),
        fixed,
        height,
        pitch,
        settings.streetview.default_pitch,
    );

    let http = HttpClient::new(settings.timeout, interval)?;
    let streetview = StreetView::new(&http, api_key, settings.streetview.clone());
    let runner = BatchRunner::new(args.jobs).with_label("Downloading");

    output::print_info(&format!(
        "Processing {} buildings with {} worker(s)",
        buildings.len(),
        runner.jobs()
    ));
    tracing::info!(
        count = buildings.len(),
        jobs = runner.jobs(),
        fixed,
        height,
        pitch,
        "Starting Street View download"
    );

    let (results, summary) =
        runner.run(&buildings, |building| fetch_building(&streetview, building, &plan))?;

    let fetched: Vec<BuildingWithImages> = results
        .into_iter()
        .filter_map(|r| match r {
            ProcessResult::Success(record) => Some(record),
            _ => None,
        })
        .collect();

    let merged = merge_records(existing, fetched);
    json::write_json_pretty(&output_path, &merged)?;
    let (fixed_count, height_count) = image_counts(&merged);

    output::print_section("Summary:");
    output::print_kv("Buildings processed", summary.total());
    output::print_kv("With images (this run)", summary.success);
    output::print_kv("Records in output", merged.len());
    output::print_kv("Fixed pitch images", fixed_count);
    output::print_kv("Height pitch images", height_count);
    output::print_kv("No imagery", summary.skipped);
    if summary.failed > 0 {
        output::print_kv("Failed", summary.failed);
        for (id, err) in &summary.failures {
            output::print_warning(&format!("Building {}: {}", id, err));
        }
    }
    println!();

    tracing::info!(
        with_images = summary.success,
        no_imagery = summary.skipped,
        failed = summary.failed,
        records = merged.len(),
        "Street View download finished"
    );
    output::print_done(&format!(
        "Saved {} records to {}",
        merged.len(),
        output_path.display()
    ));
    Ok(())
}

/// 获取单栋建筑的图片。至少一张为 Success，无图像为 Skipped
fn fetch_building(
    streetview: &StreetView,
    building: &ProcessedBuilding,
    plan: &ImagePlan,
) -> ProcessResult<BuildingWithImages> {
    let location = Coord::new(building.longitude, building.latitude);
    let file_name = format!("{}.jpg", building.osm_id);
    let mut record = BuildingWithImages::new(building.clone());
    let mut errors: Vec<String> = Vec::new();

    // 两种俯仰相互独立，一种出错不影响另一种
    if let Some(dir) = &plan.fixed_dir {
        match fetch_one(streetview, location, PitchMode::Fixed(plan.pitch), &dir.join(&file_name)) {
            Ok(path) => record.fixed_pitch_image = path,
            Err(e) => errors.push(format!("fixed pitch: {}", e)),
        }
    }

    if let Some(dir) = &plan.height_dir {
        let mode = PitchMode::BuildingHeight {
            height: building.building_height,
            fallback: plan.height_fallback,
        };
        match fetch_one(streetview, location, mode, &dir.join(&file_name)) {
            Ok(path) => record.height_pitch_image = path,
            Err(e) => errors.push(format!("height pitch: {}", e)),
        }
    }

    if record.has_any_image() {
        for err in &errors {
            tracing::warn!(osm_id = building.osm_id, error = %err, "Partial Street View failure");
        }
        ProcessResult::Success(record)
    } else if !errors.is_empty() {
        ProcessResult::Failed(building.osm_id.to_string(), errors.join("; "))
    } else {
        ProcessResult::Skipped(record)
    }
}

/// 复用已有文件，否则下载；返回图片路径
fn fetch_one(
    streetview: &StreetView,
    location: Coord,
    mode: PitchMode,
    path: &Path,
) -> Result<Option<String>> {
    if path.is_file() || streetview.download_image(location, mode, path)? {
        Ok(Some(path.display().to_string()))
    } else {
        Ok(None)
    }
}

/// 取前 N 栋；None 或 0 表示全部
fn apply_limit(mut buildings: Vec<ProcessedBuilding>, limit: Option<usize>) -> Vec<ProcessedBuilding> {
    if let Some(n) = limit.filter(|&n| n > 0) {
        buildings.truncate(n);
    }
    buildings
}

/// 输出中固定俯仰与按楼高俯仰的图片数量
fn image_counts(records: &[BuildingWithImages]) -> (usize, usize) {
    records.iter().fold((0, 0), |(fixed, height), r| {
        (
            fixed + r.fixed_pitch_image.is_some() as usize,
            height + r.height_pitch_image.is_some() as usize,
        )
    })
}

/// 按 osm_id 合并：已有记录保持原顺序并被新记录替换，新建筑追加在末尾
fn merge_records(
    existing: Vec<BuildingWithImages>,
    fetched: Vec<BuildingWithImages>,
) -> Vec<BuildingWithImages> {
    let mut merged = existing;
    let mut index: HashMap<i64, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, r)| (r.building.osm_id, i))
        .collect();

    for record in fetched {
        match index.get(&record.building.osm_id) {
            Some(&i) => merged[i] = record,
            None => {
                index.insert(record.building.osm_id, merged.len());
                merged.push(record);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreetViewSettings;
    use crate::maps::client::testing::{image, json as json_response, FakeHttp};
    use crate::maps::client::HttpResponse;
    use crate::models::building::fixtures::building;
    use reqwest::Url;
    use std::fs;

    const METADATA_PATH: &str = "/maps/api/streetview/metadata";
    const IMAGE_PATH: &str = "/maps/api/streetview";

    fn with_image(osm_id: i64, path: &str) -> BuildingWithImages {
        let mut record = BuildingWithImages::new(building(osm_id));
        record.fixed_pitch_image = Some(path.to_string());
        record
    }

    #[test]
    fn test_merge_replaces_and_appends() {
        let existing = vec![with_image(1, "old/1.jpg"), with_image(2, "old/2.jpg")];
        let fetched = vec![with_image(3, "new/3.jpg"), with_image(1, "new/1.jpg")];

        let merged = merge_records(existing, fetched);
        let ids: Vec<i64> = merged.iter().map(|r| r.building.osm_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(merged[0].fixed_pitch_image.as_deref(), Some("new/1.jpg"));
        assert_eq!(merged[1].fixed_pitch_image.as_deref(), Some("old/2.jpg"));
    }

    #[test]
    fn test_fetch_building_both_pitches() {
        let http = FakeHttp::default()
            .route(
                METADATA_PATH,
                json_response(r#"{"status":"OK","location":{"lat":51.5073,"lng":-0.1275}}"#),
            )
            .route(IMAGE_PATH, image(6000));
        let sv = StreetView::new(&http, "KEY", StreetViewSettings::default());
        let tmp = tempfile::tempdir().unwrap();
        let plan = ImagePlan::new(tmp.path(), true, true, 30.0, 30.0);

        match fetch_building(&sv, &building(9), &plan) {
            ProcessResult::Success(record) => {
                let fixed = record.fixed_pitch_image.unwrap();
                let height = record.height_pitch_image.unwrap();
                assert!(fixed.ends_with("fixed_pitch/9.jpg"));
                assert!(height.ends_with("height_pitch/9.jpg"));
                assert!(Path::new(&fixed).is_file());
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(http.requests_to(IMAGE_PATH).len(), 2);
    }

    #[test]
    fn test_fetch_building_reuses_existing_file() {
        let http = FakeHttp::default();
        let sv = StreetView::new(&http, "KEY", StreetViewSettings::default());
        let tmp = tempfile::tempdir().unwrap();
        let plan = ImagePlan::new(tmp.path(), true, false, 30.0, 30.0);

        fs::create_dir_all(tmp.path().join("fixed_pitch")).unwrap();
        fs::write(tmp.path().join("fixed_pitch/5.jpg"), b"jpeg").unwrap();

        assert!(matches!(
            fetch_building(&sv, &building(5), &plan),
            ProcessResult::Success(_)
        ));
        assert_eq!(http.request_count(), 0);
    }

    #[test]
    fn test_fetch_building_without_imagery_is_skipped() {
        let http = FakeHttp::default().route(IMAGE_PATH, image(100));
        let sv = StreetView::new(&http, "KEY", StreetViewSettings::default());
        let tmp = tempfile::tempdir().unwrap();
        let plan = ImagePlan::new(tmp.path(), true, false, 30.0, 30.0);

        match fetch_building(&sv, &building(4), &plan) {
            ProcessResult::Skipped(record) => assert!(!record.has_any_image()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    fn pitch_of(url: &Url) -> String {
        url.query_pairs()
            .find(|(k, _)| k == "pitch")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default()
    }

    #[test]
    fn test_height_fallback_ignores_fixed_pitch_flag() {
        // 无元数据路由：找不到相机，按楼高俯仰退回默认角度
        let http = FakeHttp::default().route(IMAGE_PATH, image(6000));
        let sv = StreetView::new(&http, "KEY", StreetViewSettings::default());
        let tmp = tempfile::tempdir().unwrap();
        let plan = ImagePlan::new(tmp.path(), false, true, 10.0, 30.0);

        assert!(matches!(
            fetch_building(&sv, &building(11), &plan),
            ProcessResult::Success(_)
        ));
        let requests = http.requests_to(IMAGE_PATH);
        assert_eq!(requests.len(), 1);
        assert_eq!(pitch_of(&requests[0]), "30");
    }

    #[test]
    fn test_fixed_pitch_uses_flag() {
        let http = FakeHttp::default().route(IMAGE_PATH, image(6000));
        let sv = StreetView::new(&http, "KEY", StreetViewSettings::default());
        let tmp = tempfile::tempdir().unwrap();
        let plan = ImagePlan::new(tmp.path(), true, false, 10.0, 30.0);

        fetch_building(&sv, &building(12), &plan);
        assert_eq!(pitch_of(&http.requests_to(IMAGE_PATH)[0]), "10");
    }

    #[test]
    fn test_one_pitch_error_keeps_other_image() {
        let bad_metadata = HttpResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: b"<html>".to_vec(),
        };
        let http = FakeHttp::default()
            .route(METADATA_PATH, bad_metadata)
            .route(IMAGE_PATH, image(6000));
        let sv = StreetView::new(&http, "KEY", StreetViewSettings::default());
        let tmp = tempfile::tempdir().unwrap();
        let plan = ImagePlan::new(tmp.path(), true, true, 30.0, 30.0);

        match fetch_building(&sv, &building(13), &plan) {
            ProcessResult::Success(record) => {
                assert!(record.fixed_pitch_image.is_some());
                assert!(record.height_pitch_image.is_none());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_all_pitches_failing_is_failure() {
        let bad_metadata = HttpResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: b"not json".to_vec(),
        };
        let http = FakeHttp::default().route(METADATA_PATH, bad_metadata);
        let sv = StreetView::new(&http, "KEY", StreetViewSettings::default());
        let tmp = tempfile::tempdir().unwrap();
        let plan = ImagePlan::new(tmp.path(), false, true, 30.0, 30.0);

        match fetch_building(&sv, &building(14), &plan) {
            ProcessResult::Failed(id, err) => {
                assert_eq!(id, "14");
                assert!(err.starts_with("height pitch:"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_limit_zero_means_all() {
        let all = || vec![building(1), building(2), building(3)];
        assert_eq!(apply_limit(all(), None).len(), 3);
        assert_eq!(apply_limit(all(), Some(0)).len(), 3);
        assert_eq!(apply_limit(all(), Some(2)).len(), 2);
        assert_eq!(apply_limit(all(), Some(10)).len(), 3);
    }

    #[test]
    fn test_image_counts_over_merged_records() {
        let mut both = with_image(2, "f/2.jpg");
        both.height_pitch_image = Some("h/2.jpg".to_string());
        let records = vec![with_image(1, "f/1.jpg"), both, BuildingWithImages::new(building(3))];
        assert_eq!(image_counts(&records), (2, 1));
    }
}

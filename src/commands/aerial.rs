//! # aerial 命令实现
//!
//! 通过 Google Static Maps 获取卫星图。
//!
//! ## 模式
//! - 单点：`--lat/--lon`，写出一个文件并打印地面分辨率
//! - 批量：读取 processed.json，每栋建筑一张 `<images>/aerial/<osm_id>.<fmt>`，
//!   已存在的文件跳过（`--overwrite` 除外）
//!
//! ## 依赖关系
//! - 使用 `cli/aerial.rs` 定义的参数
//! - 使用 `maps/static_map.rs`, `batch/runner.rs`

use crate::batch::{BatchRunner, ProcessResult};
use crate::cli::aerial::AerialArgs;
use crate::config::Settings;
use crate::error::{FacadesetError, Result};
use crate::geo::Coord;
use crate::maps::static_map::{self, AerialRequest};
use crate::maps::HttpFetch;
use crate::models::ProcessedBuilding;
use crate::utils::{json, output};

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 aerial 命令
pub fn execute(args: AerialArgs, settings: &Settings) -> Result<()> {
    output::print_header("Fetching Aerial Imagery");
    let api_key = settings.require_api_key()?;
    let template = request_template(&args)?;
    let http = super::http_client(settings)?;

    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => single(&http, &args, template, Coord::new(lon, lat), api_key, settings),
        _ => batch(&http, &args, template, api_key, settings),
    }
}

/// 由参数构建请求模板（中心点待填）
fn request_template(args: &AerialArgs) -> Result<AerialRequest> {
    let (width, height) = static_map::parse_size(&args.size)?;
    let request = AerialRequest {
        zoom: args.zoom,
        width,
        height,
        scale: args.scale,
        format: args.format,
        marker: args.marker.clone(),
        ..AerialRequest::new(Coord::new(0.0, 0.0))
    };
    request.validate()?;
    Ok(request)
}

/// 填入中心点；marker 为 "center" 时标记图片中心
fn centred(template: &AerialRequest, center: Coord) -> AerialRequest {
    let marker = template.marker.as_deref().map(|m| {
        if m.eq_ignore_ascii_case("center") {
            format!("color:red|{},{}", center.lat, center.lon)
        } else {
            m.to_string()
        }
    });
    AerialRequest {
        center,
        marker,
        ..template.clone()
    }
}

fn single(
    http: &dyn HttpFetch,
    args: &AerialArgs,
    template: AerialRequest,
    center: Coord,
    api_key: &str,
    settings: &Settings,
) -> Result<()> {
    let request = centred(&template, center);
    let path = match &args.output {
        Some(path) => path.clone(),
        None => settings.layout.images_dir().join("aerial").join(format!(
            "{}_{}.{}",
            center.lat,
            center.lon,
            request.format.extension()
        )),
    };

    let bytes = static_map::fetch_aerial(http, &request, api_key)?;
    write_bytes(&path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved aerial image");

    output::print_success(&format!("Saved {} ({} bytes)", path.display(), bytes.len()));
    output::print_kv("Zoom", request.zoom);
    output::print_kv("Scale", request.scale);
    output::print_kv(
        "Resolution",
        format!("{:.3} m/px", request.meters_per_pixel()),
    );
    Ok(())
}

fn batch(
    http: &dyn HttpFetch,
    args: &AerialArgs,
    template: AerialRequest,
    api_key: &str,
    settings: &Settings,
) -> Result<()> {
    let input = args.input.clone().unwrap_or_else(|| settings.layout.processed());
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| settings.layout.images_dir().join("aerial"));

    let mut buildings: Vec<ProcessedBuilding> = json::read_json(&input)?;
    if let Some(limit) = args.limit.filter(|&n| n > 0) {
        buildings.truncate(limit);
    }
    output::print_info(&format!(
        "Fetching aerial images for {} buildings into {}",
        buildings.len(),
        output_dir.display()
    ));

    let runner = BatchRunner::new(args.jobs).with_label("Aerial");
    let (_, summary) = runner.run(&buildings, |building| {
        fetch_for_building(http, &template, building, &output_dir, api_key, args.overwrite)
    })?;

    output::print_section("Summary:");
    output::print_kv("Downloaded", summary.success);
    output::print_kv("Skipped (exists)", summary.skipped);
    output::print_kv("Failed", summary.failed);
    for (id, err) in &summary.failures {
        output::print_warning(&format!("Building {}: {}", id, err));
    }
    println!();

    output::print_done(&format!("Aerial images in {}", output_dir.display()));
    Ok(())
}

fn fetch_for_building(
    http: &dyn HttpFetch,
    template: &AerialRequest,
    building: &ProcessedBuilding,
    output_dir: &Path,
    api_key: &str,
    overwrite: bool,
) -> ProcessResult<PathBuf> {
    let path = output_dir.join(format!(
        "{}.{}",
        building.osm_id,
        template.format.extension()
    ));
    if path.exists() && !overwrite {
        return ProcessResult::Skipped(path);
    }

    let request = centred(template, Coord::new(building.longitude, building.latitude));
    let result = static_map::fetch_aerial(http, &request, api_key)
        .and_then(|bytes| write_bytes(&path, &bytes));
    match result {
        Ok(()) => ProcessResult::Success(path),
        Err(e) => ProcessResult::Failed(building.osm_id.to_string(), e.to_string()),
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FacadesetError::FileWriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    fs::write(path, bytes).map_err(|e| FacadesetError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

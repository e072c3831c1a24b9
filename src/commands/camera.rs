//! # camera 命令实现
//!
//! 查询给定位置附近的街景相机实际位置。
//!
//! ## 依赖关系
//! - 使用 `cli/camera.rs` 定义的参数
//! - 使用 `maps/streetview.rs`

use crate::cli::camera::CameraArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::geo::Coord;
use crate::maps::StreetView;
use crate::utils::output;

/// 执行 camera 命令
pub fn execute(args: CameraArgs, settings: &Settings) -> Result<()> {
    let api_key = settings.require_api_key()?;
    let http = super::http_client(settings)?;
    let streetview = StreetView::new(&http, api_key, settings.streetview.clone());

    let requested = Coord::new(args.longitude, args.latitude);
    match streetview.camera_position(requested)? {
        Some(camera) => {
            output::print_success("Camera position found");
            output::print_kv("Requested", format_coord(requested));
            output::print_kv("Camera", format_coord(camera));
        }
        None => output::print_warning("No Street View available at this location"),
    }
    Ok(())
}

fn format_coord(c: Coord) -> String {
    format!("lon={:.6}, lat={:.6}", c.lon, c.lat)
}

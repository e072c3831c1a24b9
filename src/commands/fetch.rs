//! # fetch 命令实现
//!
//! 查询 Overpass API 并保存原始响应。
//!
//! ## 功能
//! - 构建查询（包围盒、建筑类型、必需标签、数量上限）
//! - 获取并原样保存为 raw.json
//!
//! ## 依赖关系
//! - 使用 `cli/fetch.rs` 定义的参数
//! - 使用 `osm/overpass.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::fetch::FetchArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::maps::HttpClient;
use crate::osm::overpass::{self, BoundingBox, OverpassQuery};
use crate::utils::{output, progress};

use std::time::Duration;

/// 执行 fetch 命令
pub fn execute(args: FetchArgs, settings: &Settings) -> Result<()> {
    output::print_header("Fetching Buildings from OpenStreetMap");

    let query = build_query(&args)?;

    if args.dry_run {
        println!("{}", query);
        return Ok(());
    }

    settings.layout.ensure()?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.layout.osm_dir());
    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| settings.overpass_url.clone());

    match args.num_buildings {
        Some(n) => output::print_info(&format!("Fetching {} buildings from OpenStreetMap...", n)),
        None => output::print_info("Fetching all buildings from OpenStreetMap..."),
    }

    // Overpass 查询可能运行到服务端超时，客户端超时需更长
    let timeout = Duration::from_secs(query.timeout_secs as u64 + 60).max(settings.timeout);
    let client = HttpClient::new(timeout, Duration::ZERO)?;

    let spinner = progress::create_spinner("Waiting for Overpass API");
    let result = overpass::fetch_raw(&client, &endpoint, &query);
    spinner.finish_and_clear();
    let data = result?;

    let saved = overpass::save_raw(&data, &output_dir)?;
    let count = overpass::element_count(&data);
    tracing::info!(path = %saved.display(), count, "Saved raw OSM data");

    output::print_success(&format!("Data saved to: {}", saved.display()));
    output::print_done(&format!("Number of buildings fetched: {}", count));
    Ok(())
}

/// 由参数构建查询
fn build_query(args: &FetchArgs) -> Result<OverpassQuery> {
    let mut query = OverpassQuery::default().with_limit(args.num_buildings);
    query.timeout_secs = args.server_timeout;

    if let Some(bbox) = &args.bbox {
        query.bbox = BoundingBox::parse(bbox)?;
    }
    if let Some(types) = &args.building_types {
        query.building_types = clean_list(types);
    }
    if let Some(tags) = &args.require_tags {
        query.required_tags = clean_list(tags);
    }
    Ok(query)
}

fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> FetchArgs {
        FetchArgs {
            num_buildings: None,
            bbox: None,
            building_types: None,
            require_tags: None,
            server_timeout: 500,
            endpoint: None,
            output_dir: None,
            dry_run: true,
        }
    }

    #[test]
    fn test_default_args_give_default_query() {
        assert_eq!(build_query(&args()).unwrap(), OverpassQuery::default());
    }

    #[test]
    fn test_overrides() {
        let mut a = args();
        a.num_buildings = Some(10);
        a.bbox = Some("51.4,-0.2,51.6,0.0".to_string());
        a.building_types = Some(vec!["office".to_string(), " ".to_string()]);
        a.require_tags = Some(vec![]);
        a.server_timeout = 60;

        let query = build_query(&a).unwrap();
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.building_types, vec!["office"]);
        assert!(query.required_tags.is_empty());
        assert_eq!(query.timeout_secs, 60);
        assert_eq!(query.bbox.north, 51.6);
    }

    #[test]
    fn test_bad_bbox() {
        let mut a = args();
        a.bbox = Some("nope".to_string());
        assert!(build_query(&a).is_err());
    }
}

//! # process 命令实现
//!
//! 读取 raw.json，按街道去重，提取几何与属性，写出 processed.json。
//!
//! ## 功能
//! - 过滤前后建筑类型分布报告
//! - 并行几何处理
//! - 可选 CSV 导出
//!
//! ## 依赖关系
//! - 使用 `cli/process.rs` 定义的参数
//! - 使用 `osm/filter.rs`, `osm/processor.rs`
//! - 使用 `utils/output.rs`, `utils/json.rs`

use crate::cli::process::ProcessArgs;
use crate::config::Settings;
use crate::error::{FacadesetError, Result};
use crate::models::{OsmElement, OsmResponse, ProcessedBuilding};
use crate::osm::filter::{self, FilterStats};
use crate::osm::processor;
use crate::utils::{json, output};

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tabled::{Table, Tabled};

/// 建筑类型分布行
#[derive(Debug, Clone, Tabled)]
struct TypeRow {
    #[tabled(rename = "Building type")]
    building_type: String,
    #[tabled(rename = "Count")]
    count: usize,
}

/// 执行 process 命令
pub fn execute(args: ProcessArgs, settings: &Settings) -> Result<()> {
    output::print_header("Processing OSM Buildings");
    settings.layout.ensure()?;

    let input = args.input.clone().unwrap_or_else(|| settings.layout.raw_osm());
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| settings.layout.processed());

    let raw: OsmResponse = json::read_json(&input)?;
    output::print_info(&format!(
        "Loaded {} buildings from {}",
        raw.elements.len(),
        input.display()
    ));

    let exclude: HashSet<String> = args
        .exclude_type
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let candidates: Vec<OsmElement> = if args.all_streets {
        raw.elements
            .into_iter()
            .filter(|e| {
                e.tags.is_some() && !exclude.contains(e.tag("building").unwrap_or_default())
            })
            .collect()
    } else {
        let (kept, stats) = filter::filter_by_street(raw.elements, &exclude);
        report_filter(&stats, &exclude, kept.len());
        output::print_info(&format!(
            "Filtered to {} buildings (one per street)",
            kept.len()
        ));
        kept
    };

    let (processed, failures) = processor::process_all(&candidates);
    for (id, err) in &failures {
        tracing::warn!(osm_id = id, error = %err, "Failed to process building");
        output::print_warning(&format!("Error processing building {}: {}", id, err));
    }
    output::print_success(&format!(
        "Successfully processed {} buildings",
        processed.len()
    ));

    json::write_json_pretty(&output_path, &processed)?;
    tracing::info!(path = %output_path.display(), count = processed.len(), "Saved processed buildings");

    if let Some(csv_path) = &args.csv {
        write_csv(&processed, csv_path)?;
        output::print_success(&format!("CSV exported to '{}'", csv_path.display()));
    }

    output::print_done(&format!("Saved filtered data to {}", output_path.display()));
    Ok(())
}

/// 打印过滤统计与类型分布
fn report_filter(stats: &FilterStats, exclude: &HashSet<String>, kept: usize) {
    output::print_section("Building types before filtering:");
    println!("{}", type_table(&stats.types_before));

    output::print_section("Filtering stats:");
    output::print_kv("Total buildings", stats.total);
    if stats.no_tags > 0 {
        output::print_kv("Buildings without tags", stats.no_tags);
    }
    if !exclude.is_empty() {
        let mut names: Vec<&str> = exclude.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        output::print_kv(
            &format!("Excluded types ({})", names.join(", ")),
            stats.excluded_type,
        );
    }
    output::print_kv("No street (kept)", stats.no_street);
    output::print_kv("Duplicate streets (removed)", stats.duplicate_street);
    output::print_kv("Unique streets (kept)", stats.unique_streets(kept));

    output::print_section("Building types after filtering:");
    println!("{}\n", type_table(&stats.types_after));
}

fn type_table(histogram: &BTreeMap<String, usize>) -> Table {
    let rows: Vec<TypeRow> = filter::sorted_by_count(histogram)
        .into_iter()
        .map(|(building_type, count)| TypeRow {
            building_type,
            count,
        })
        .collect();
    Table::new(rows)
}

/// 导出扁平 CSV，列与 processed.json 字段一致
fn write_csv(buildings: &[ProcessedBuilding], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(FacadesetError::CsvError)?;
    for building in buildings {
        wtr.serialize(building)?;
    }
    wtr.flush().map_err(|e| FacadesetError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GlobalArgs;
    use crate::config::FileConfig;
    use std::fs;

    const RAW: &str = r#"{
        "elements": [
            {"type": "way", "id": 1,
             "geometry": [{"lat": 51.507, "lon": -0.128}, {"lat": 51.507, "lon": -0.127},
                          {"lat": 51.508, "lon": -0.127}, {"lat": 51.508, "lon": -0.128}],
             "tags": {"building": "office", "height": "20", "addr:street": "Strand"}},
            {"type": "way", "id": 2,
             "geometry": [{"lat": 51.507, "lon": -0.128}, {"lat": 51.507, "lon": -0.127},
                          {"lat": 51.508, "lon": -0.127}],
             "tags": {"building": "retail", "addr:street": "Strand"}},
            {"type": "way", "id": 3,
             "geometry": [{"lat": 51.507, "lon": -0.128}, {"lat": 51.507, "lon": -0.127},
                          {"lat": 51.508, "lon": -0.127}],
             "tags": {"building": "house", "addr:street": "Mill Lane"}},
            {"type": "way", "id": 4, "geometry": [],
             "tags": {"building": "apartments"}}
        ]
    }"#;

    fn settings(root: &Path) -> Settings {
        let global = GlobalArgs {
            config: None,
            data_dir: Some(root.to_path_buf()),
            api_key: None,
        };
        Settings::merge(&global, FileConfig::default(), None).unwrap()
    }

    fn args() -> ProcessArgs {
        ProcessArgs {
            input: None,
            output: None,
            exclude_type: vec!["house".to_string()],
            all_streets: false,
            csv: None,
        }
    }

    #[test]
    fn test_process_pipeline() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        settings.layout.ensure().unwrap();
        fs::write(settings.layout.raw_osm(), RAW).unwrap();

        let mut a = args();
        a.csv = Some(tmp.path().join("buildings.csv"));
        execute(a, &settings).unwrap();

        let processed: Vec<ProcessedBuilding> =
            json::read_json(&settings.layout.processed()).unwrap();
        // 2 与 1 同街被去重，3 是 house 被排除，4 无几何处理失败
        let ids: Vec<i64> = processed.iter().map(|b| b.osm_id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(processed[0].building_height, Some(20.0));

        let csv_text = fs::read_to_string(tmp.path().join("buildings.csv")).unwrap();
        assert!(csv_text.starts_with("osm_id,longitude,latitude,building_height"));
        assert_eq!(csv_text.lines().count(), 2);
    }

    #[test]
    fn test_all_streets_keeps_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        settings.layout.ensure().unwrap();
        fs::write(settings.layout.raw_osm(), RAW).unwrap();

        let mut a = args();
        a.all_streets = true;
        execute(a, &settings).unwrap();

        let processed: Vec<ProcessedBuilding> =
            json::read_json(&settings.layout.processed()).unwrap();
        let ids: Vec<i64> = processed.iter().map(|b| b.osm_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(execute(args(), &settings(tmp.path())).is_err());
    }
}

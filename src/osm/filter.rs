//! # 按街道去重
//!
//! 同一条街上的建筑外观高度相似，每条街只保留第一栋，提高数据集多样性。
//!
//! ## 规则
//! - 无标签元素丢弃
//! - 建筑类型在排除集合中的丢弃
//! - 无 `addr:street` 的保留
//! - 每条街保留首次出现的建筑，其余丢弃
//! - 保持输入顺序
//!
//! ## 依赖关系
//! - 被 `commands/process.rs` 调用
//! - 使用 `models/osm.rs`

use crate::models::OsmElement;

use std::collections::{BTreeMap, HashSet};

/// 过滤统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterStats {
    pub total: usize,
    pub no_tags: usize,
    pub excluded_type: usize,
    /// 无街道地址（保留）
    pub no_street: usize,
    pub duplicate_street: usize,
    /// 过滤前建筑类型分布
    pub types_before: BTreeMap<String, usize>,
    /// 过滤后建筑类型分布
    pub types_after: BTreeMap<String, usize>,
}

impl FilterStats {
    /// 因街道唯一而保留的数量
    pub fn unique_streets(&self, kept: usize) -> usize {
        kept - self.no_street
    }
}

/// 每条街保留一栋建筑
pub fn filter_by_street(
    elements: Vec<OsmElement>,
    exclude_types: &HashSet<String>,
) -> (Vec<OsmElement>, FilterStats) {
    let mut stats = FilterStats {
        total: elements.len(),
        types_before: type_histogram(&elements, "unknown"),
        ..FilterStats::default()
    };

    let mut seen_streets: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();

    for element in elements {
        if element.tags.is_none() {
            stats.no_tags += 1;
            continue;
        }

        let building_type = element.tag("building").unwrap_or_default();
        if exclude_types.contains(building_type) {
            stats.excluded_type += 1;
            continue;
        }

        match element.tag("addr:street").filter(|s| !s.is_empty()) {
            None => {
                stats.no_street += 1;
                kept.push(element);
            }
            Some(street) => {
                if seen_streets.insert(street.to_string()) {
                    kept.push(element);
                } else {
                    stats.duplicate_street += 1;
                }
            }
        }
    }

    stats.types_after = type_histogram(&kept, "");
    (kept, stats)
}

fn type_histogram(elements: &[OsmElement], missing: &str) -> BTreeMap<String, usize> {
    let mut histogram = BTreeMap::new();
    for element in elements.iter().filter(|e| e.tags.is_some()) {
        let building_type = element.tag("building").unwrap_or(missing).to_string();
        *histogram.entry(building_type).or_insert(0) += 1;
    }
    histogram
}

/// 按数量降序排列的分布（报告用）
pub fn sorted_by_count(histogram: &BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> =
        histogram.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

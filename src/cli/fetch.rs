//! # fetch 子命令 CLI 定义
//!
//! 从 Overpass API 获取带几何的建筑 way
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/fetch.rs`

use clap::Args;
use std::path::PathBuf;

/// fetch 子命令参数
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Number of buildings to fetch (default: all matches)
    #[arg(short = 'n', long)]
    pub num_buildings: Option<usize>,

    /// Bounding box "south,west,north,east" (default: Great Britain)
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<String>,

    /// Building types to match (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub building_types: Option<Vec<String>>,

    /// Tags every building must carry (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub require_tags: Option<Vec<String>>,

    /// Overpass server-side timeout in seconds
    #[arg(long, default_value_t = 500)]
    pub server_timeout: u32,

    /// Overpass interpreter endpoint (overrides config)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Output directory (default: <data-dir>/osm)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the query without sending it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

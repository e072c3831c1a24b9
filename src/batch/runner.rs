//! # 批量执行器
//!
//! 并行执行逐建筑的下载任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代（线程池大小可配置）
//! - 进度条显示
//! - 结果按输入顺序返回，统计成功 / 跳过 / 失败
//!
//! 网络类任务的总请求速率由 `maps::client::RateLimiter` 约束，
//! 此处的并行只用于重叠请求延迟。
//!
//! ## 依赖关系
//! - 被 `commands/images.rs`, `commands/aerial.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{FacadesetError, Result};
use crate::utils::progress;

use rayon::prelude::*;

/// 单个任务处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult<T> {
    /// 处理成功
    Success(T),
    /// 跳过（如文件已存在）
    Skipped(T),
    /// 处理失败
    Failed(String, String), // (任务标识, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge<T>(&mut self, result: &ProcessResult<T>) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(id, err) => {
                self.failed += 1;
                self.failures.push((id.clone(), err.clone()));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    /// 进度条标签
    label: String,
}

impl BatchRunner {
    /// 创建新的批量执行器；jobs 为 0 时使用 CPU 核数
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            label: "Processing".to_string(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理，结果顺序与输入一致
    pub fn run<I, T, F>(&self, items: &[I], processor: F) -> Result<(Vec<ProcessResult<T>>, BatchResult)>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> ProcessResult<T> + Sync + Send,
    {
        let pb = progress::create_progress_bar(items.len() as u64, &self.label);

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| FacadesetError::Other(format!("Failed to build thread pool: {}", e)))?;

        let results: Vec<ProcessResult<T>> = pool.install(|| {
            items
                .par_iter()
                .map(|item| {
                    let result = processor(item);
                    if let ProcessResult::Failed(id, err) = &result {
                        pb.suspend(|| tracing::warn!(item = %id, error = %err, "Task failed"));
                    }
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        // 汇总结果
        let mut summary = BatchResult::default();
        for result in &results {
            summary.merge(result);
        }

        Ok((results, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_preserves_order_and_counts() {
        let items: Vec<u32> = (0..50).collect();
        let runner = BatchRunner::new(4);
        let (results, summary) = runner
            .run(&items, |&n| match n % 3 {
                0 => ProcessResult::Success(n),
                1 => ProcessResult::Skipped(n),
                _ => ProcessResult::Failed(n.to_string(), "boom".to_string()),
            })
            .unwrap();

        assert_eq!(results.len(), 50);
        assert_eq!(results[3], ProcessResult::Success(3));
        assert_eq!(results[4], ProcessResult::Skipped(4));
        assert_eq!(summary.success, 17);
        assert_eq!(summary.skipped, 17);
        assert_eq!(summary.failed, 16);
        assert_eq!(summary.total(), 50);
        assert_eq!(summary.failures[0], ("2".to_string(), "boom".to_string()));
    }

    #[test]
    fn test_zero_jobs_means_auto() {
        assert!(BatchRunner::new(0).jobs() >= 1);
        assert_eq!(BatchRunner::new(3).jobs(), 3);
    }
}

//! 批量评分处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量提交的评分和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：检查 API 密钥、创建 LLM 客户端和评分流程、初始化报告文件
//! 2. **批量加载**：加载题库并扫描所有提交（`Vec<Submission>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：每批完成后再开始下一批
//! 5. **全局统计**：汇总成功/失败数量和累计费用
//!
//! 每个任务独立执行一次评分流程，任务之间只共享无状态的 [`GradingFlow`]。

use crate::clients::{Generator, LlmClient};
use crate::config::Config;
use crate::models::{self, QuestionBank, Submission};
use crate::orchestrator::submission_processor::{self, SubmissionOutcome};
use crate::services::ReportWriter;
use crate::utils::logging;
use crate::workflow::GradingFlow;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<GradingFlow>,
    writer: Arc<ReportWriter>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.require_api_key()?;
        let client: Arc<dyn Generator> = Arc::new(LlmClient::new(&config));
        Self::with_generator(config, client)
    }

    /// 使用指定的生成能力初始化
    pub fn with_generator(config: Config, generator: Arc<dyn Generator>) -> Result<Self> {
        logging::init_report_file(&config.output_report_file)?;
        logging::log_startup(config.max_concurrent_submissions);

        let flow = Arc::new(GradingFlow::from_config(generator, &config));
        let writer = Arc::new(ReportWriter::new(&config.output_report_file));

        Ok(Self {
            config,
            flow,
            writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunStats> {
        let bank = Arc::new(self.load_question_bank().await?);
        let submissions = self.load_submissions().await?;

        if submissions.is_empty() {
            warn!("⚠️ 没有找到待评分的提交，程序结束");
            return Ok(RunStats::default());
        }

        logging::log_submissions_loaded(submissions.len(), self.config.max_concurrent_submissions);

        let stats = self.process_all_submissions(bank, submissions).await?;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            stats.total_cost,
            &self.config.output_report_file,
        );

        Ok(stats)
    }

    async fn load_question_bank(&self) -> Result<QuestionBank> {
        info!("📚 正在加载题库: {}", self.config.question_bank_file);
        let bank = models::load_question_bank(Path::new(&self.config.question_bank_file)).await?;
        info!("✓ 题库共 {} 道题", bank.len());
        Ok(bank)
    }

    async fn load_submissions(&self) -> Result<Vec<Submission>> {
        info!("📁 正在扫描待评分的提交...");
        models::load_all_submissions(&self.config.submissions_folder).await
    }

    /// 处理所有提交
    async fn process_all_submissions(
        &self,
        bank: Arc<QuestionBank>,
        submissions: Vec<Submission>,
    ) -> Result<RunStats> {
        let batch_size = self.config.max_concurrent_submissions.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = submissions.len();
        let total_batches = total.div_ceil(batch_size);
        let mut stats = RunStats {
            total,
            ..Default::default()
        };

        for (batch_idx, batch) in submissions.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;

            logging::log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let batch_result = self
                .process_batch(batch, batch_start, &bank, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;
            stats.total_cost += batch_result.cost;

            logging::log_batch_complete(
                batch_num,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch: &[Submission],
        batch_start: usize,
        bank: &Arc<QuestionBank>,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut handles = Vec::with_capacity(batch.len());

        for (idx, submission) in batch.iter().enumerate() {
            let submission_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let flow = self.flow.clone();
            let writer = self.writer.clone();
            let bank = bank.clone();
            let submission = submission.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                submission_processor::process_submission(
                    &flow,
                    &bank,
                    submission,
                    submission_index,
                    &writer,
                )
                .await
            });
            handles.push((submission_index, handle));
        }

        let mut result = BatchResult::default();

        for (submission_index, handle) in handles {
            match handle.await {
                Ok(Ok(SubmissionOutcome { success, cost })) => {
                    result.cost += cost;
                    if success {
                        result.success += 1;
                    } else {
                        result.failed += 1;
                    }
                }
                Ok(Err(e)) => {
                    error!("[提交 {}] ❌ 写入报告失败: {:#}", submission_index, e);
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[提交 {}] 任务执行失败: {}", submission_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 评分统计
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    /// 累计费用（美元）
    pub total_cost: f64,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
    cost: f64,
}

//! 评分报告写入服务 - 业务能力层
//!
//! 只负责"追加一行评分结果"能力，不关心流程

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::GradingResponse;

/// 报告中的一行
#[derive(Debug, Serialize)]
pub struct ReportEntry<'a> {
    pub submission: &'a str,
    pub question_id: &'a str,
    pub graded_at: String,
    #[serde(flatten)]
    pub response: &'a GradingResponse,
}

/// 评分报告写入服务
///
/// 职责：
/// - 每份提交写一行 JSON（JSONL）
/// - 并发任务共用一个实例，写入串行化，行之间不会交错
pub struct ReportWriter {
    report_file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            report_file_path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 追加一份提交的评分结果
    pub async fn write(
        &self,
        submission: &str,
        question_id: &str,
        response: &GradingResponse,
    ) -> Result<()> {
        let entry = ReportEntry {
            submission,
            question_id,
            graded_at: chrono::Local::now().to_rfc3339(),
            response,
        };
        let mut line = serde_json::to_string(&entry).context("无法序列化评分结果")?;
        line.push('\n');

        debug!(
            "写入报告: 提交 {} | 题目 {} | 成功 {}",
            submission, question_id, response.success
        );

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .await
            .with_context(|| format!("无法打开报告文件: {}", self.report_file_path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_response() -> GradingResponse {
        GradingResponse::failure("Extraction failed: timeout")
    }

    #[tokio::test]
    async fn test_write_appends_one_json_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.jsonl");
        let writer = ReportWriter::new(&path);

        writer.write("alice/q1", "q1", &failed_response()).await.unwrap();
        writer.write("bob/q1", "q1", &failed_response()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["submission"], "bob/q1");
        assert_eq!(lines[0]["success"], false);
        assert_eq!(lines[0]["error_message"], "Extraction failed: timeout");
    }
}

//! 单份提交处理器 - 编排层
//!
//! 查找题目 → 构建评分请求 → 执行一次评分流程 → 写入报告

use anyhow::Result;
use tracing::{error, info, warn};

use crate::models::{GradingRequest, GradingResponse, QuestionBank, Submission};
use crate::services::ReportWriter;
use crate::workflow::GradingFlow;

/// 单份提交的处理结果
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub cost: f64,
}

/// 处理单份提交
///
/// # 参数
/// - `flow`: 共享的评分流程
/// - `bank`: 题库
/// - `submission`: 学生提交
/// - `submission_index`: 提交编号（仅用于日志）
/// - `writer`: 报告写入服务
///
/// # 返回
/// 评分是否成功以及本次费用；只有写报告失败才返回错误
pub async fn process_submission(
    flow: &GradingFlow,
    bank: &QuestionBank,
    submission: Submission,
    submission_index: usize,
    writer: &ReportWriter,
) -> Result<SubmissionOutcome> {
    let label = submission.label();
    info!("[提交 {}] 开始评分: {}", submission_index, label);

    let response = match bank.find(&submission.question_id) {
        Some(question) => {
            let request = GradingRequest::new(question.clone(), submission.answer);
            flow.run(request).await
        }
        None => {
            warn!(
                "[提交 {}] ⚠️ 题库中没有题目 {}",
                submission_index, submission.question_id
            );
            GradingResponse::failure(format!(
                "Unknown question id: {}",
                submission.question_id
            ))
        }
    };

    writer
        .write(&label, &submission.question_id, &response)
        .await?;

    log_submission_complete(submission_index, &response);

    Ok(SubmissionOutcome {
        success: response.success,
        cost: response.cost,
    })
}

fn log_submission_complete(submission_index: usize, response: &GradingResponse) {
    if response.success {
        info!(
            "[提交 {}] ✅ 得分 {}，费用 ${:.6}（输入 {} / 输出 {} token）",
            submission_index,
            response
                .mark
                .map(|mark| mark.to_string())
                .unwrap_or_else(|| "-".to_string()),
            response.cost,
            response.input_tokens,
            response.output_tokens
        );
    } else {
        error!(
            "[提交 {}] ❌ 评分失败: {}",
            submission_index,
            response.error_message.as_deref().unwrap_or("unknown error")
        );
    }
}

//! 评分反馈
//!
//! 按 [`GradingVariant`] 选择提示词和 schema，结果末尾追加 "Total" 行

use tracing::info;

use crate::error::StepFailure;
use crate::models::schemas::FeedbackReply;
use crate::models::GradingVariant;
use crate::prompts;
use crate::workflow::model_tier::ModelTier;
use crate::workflow::state::{GradingState, StateUpdate};
use crate::workflow::steps::{generation_failed, parse_structured, StepContext, StepResult};
use crate::workflow::Stage;

const STAGE: Stage = Stage::FeedbackGeneration;

pub async fn run(ctx: &StepContext<'_>, state: &GradingState) -> StepResult {
    let request = &state.request;
    let variant = GradingVariant::select(request.question_type(), state.solution_pathway)
        .ok_or_else(|| StepFailure::new(STAGE, "no feedback variant for the classified pathway"))?;
    let tier = ModelTier::for_analysis(request.question.complexity, state.solution_pathway);

    if state.retry_attempt > 0 {
        info!("🔁 重新生成评分反馈（第 {} 次）...", state.retry_attempt + 1);
    } else {
        info!("🧾 正在生成评分反馈...");
    }

    let prompt = prompts::feedback(
        variant,
        &request.question,
        state.content_analysis.as_deref().unwrap_or_default(),
        state.reason_for_classification.as_deref(),
    );

    let generation = ctx
        .generator
        .generate_structured(ctx.request(STAGE, tier, prompt), &variant.feedback_schema())
        .await
        .map_err(generation_failed(STAGE))?;

    let reply: FeedbackReply = parse_structured(STAGE, generation.content)?;
    let (feedback, mark) = reply
        .into_feedback()
        .map_err(|message| StepFailure::new(STAGE, message))?;

    info!("✓ 评分完成: {} / {}", mark, request.question.max_marks);

    Ok(StateUpdate::FeedbackGenerated {
        feedback,
        mark,
        usage: generation.usage,
    })
}

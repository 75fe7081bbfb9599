//! 内容分析

use tracing::{debug, info};

use crate::error::StepFailure;
use crate::models::GradingVariant;
use crate::prompts;
use crate::utils::truncate_text;
use crate::workflow::model_tier::ModelTier;
use crate::workflow::state::{GradingState, StateUpdate};
use crate::workflow::steps::{generation_failed, StepContext, StepResult};
use crate::workflow::Stage;

const STAGE: Stage = Stage::ContentAnalysis;

pub async fn run(ctx: &StepContext<'_>, state: &GradingState) -> StepResult {
    let request = &state.request;
    let variant = GradingVariant::select(request.question_type(), state.solution_pathway)
        .ok_or_else(|| StepFailure::new(STAGE, "no analysis variant for the classified pathway"))?;
    let tier = ModelTier::for_analysis(request.question.complexity, state.solution_pathway);

    info!("🔬 正在分析答案内容（{:?}，{:?} 档模型）...", variant, tier);

    let student_answer = request.student_answer_text(state.extracted_answer.as_deref());
    let prompt = prompts::content_analysis(
        variant,
        &request.question,
        &student_answer,
        state.reason_for_classification.as_deref(),
    );

    let generation = ctx
        .generator
        .generate(ctx.request(STAGE, tier, prompt))
        .await
        .map_err(generation_failed(STAGE))?;

    debug!(
        "内容分析（{}）: {}",
        generation.model,
        truncate_text(&generation.content, 120)
    );

    Ok(StateUpdate::Analyzed {
        analysis: generation.content,
        usage: generation.usage,
    })
}

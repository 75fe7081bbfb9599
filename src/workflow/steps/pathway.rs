//! 解题路径分类，只对数值题调用模型

use tracing::info;

use crate::clients::Usage;
use crate::error::StepFailure;
use crate::models::schemas::{pathway_classification_schema, PathwayClassification};
use crate::models::SolutionPathway;
use crate::prompts;
use crate::workflow::model_tier::ModelTier;
use crate::workflow::state::{GradingState, StateUpdate};
use crate::workflow::steps::{generation_failed, parse_structured, StepContext, StepResult};
use crate::workflow::Stage;

const STAGE: Stage = Stage::SolutionPathwayAnalysis;

pub async fn run(ctx: &StepContext<'_>, state: &GradingState) -> StepResult {
    let request = &state.request;

    if !request.question_type().is_numerical() {
        return Ok(StateUpdate::Classified {
            pathway: SolutionPathway::NotApplicable,
            reason: None,
            usage: Usage::default(),
        });
    }

    info!("🧭 正在分析解题路径...");

    let student_answer = request.student_answer_text(state.extracted_answer.as_deref());
    let prompt = prompts::pathway_classification(&request.question, &student_answer);
    let generation = ctx
        .generator
        .generate_structured(
            ctx.request(STAGE, ModelTier::for_classification(), prompt),
            &pathway_classification_schema(),
        )
        .await
        .map_err(generation_failed(STAGE))?;

    let classification: PathwayClassification = parse_structured(STAGE, generation.content)?;
    if classification.solution_pathway == SolutionPathway::NotApplicable {
        return Err(StepFailure::new(
            STAGE,
            "numerical answer was classified as NA",
        ));
    }

    info!(
        "✓ 解题路径: {}（{}）",
        classification.solution_pathway, classification.reason_for_classification
    );

    Ok(StateUpdate::Classified {
        pathway: classification.solution_pathway,
        reason: Some(classification.reason_for_classification),
        usage: generation.usage,
    })
}

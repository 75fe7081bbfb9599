//! 能力点评估，只对数值题调用模型，固定使用基础档位

use tracing::info;

use crate::clients::Usage;
use crate::models::schemas::value_point_schema;
use crate::models::ValuePoints;
use crate::prompts;
use crate::workflow::model_tier::ModelTier;
use crate::workflow::state::{GradingState, StateUpdate};
use crate::workflow::steps::{generation_failed, parse_structured, StepContext, StepResult};
use crate::workflow::Stage;

const STAGE: Stage = Stage::ValuePointAnalysis;

pub async fn run(ctx: &StepContext<'_>, state: &GradingState) -> StepResult {
    let request = &state.request;

    if !request.question_type().is_numerical() {
        return Ok(StateUpdate::ValuePointsAssessed {
            value_points: ValuePoints::NOT_APPLICABLE,
            usage: Usage::default(),
        });
    }

    info!("📐 正在评估能力点...");

    let prompt = prompts::value_points(
        &request.question,
        state.content_analysis.as_deref().unwrap_or_default(),
    );
    let generation = ctx
        .generator
        .generate_structured(
            ctx.request(STAGE, ModelTier::for_value_points(), prompt),
            &value_point_schema(),
        )
        .await
        .map_err(generation_failed(STAGE))?;

    let value_points: ValuePoints = parse_structured(STAGE, generation.content)?;

    Ok(StateUpdate::ValuePointsAssessed {
        value_points,
        usage: generation.usage,
    })
}

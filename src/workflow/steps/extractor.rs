//! 答案提取
//!
//! 键入作答原样返回；手写作答调用视觉模型转写图片

use tracing::info;

use crate::clients::Usage;
use crate::prompts;
use crate::utils::truncate_text;
use crate::workflow::model_tier::ModelTier;
use crate::workflow::state::{GradingState, StateUpdate};
use crate::workflow::steps::{generation_failed, StepContext, StepResult};
use crate::workflow::Stage;

const STAGE: Stage = Stage::Extraction;

pub async fn run(ctx: &StepContext<'_>, state: &GradingState) -> StepResult {
    let request = &state.request;

    if !request.answer.handwritten {
        return Ok(StateUpdate::Extracted {
            answer: request.answer.student_answer_typed.clone(),
            usage: Usage::default(),
        });
    }

    let question_type = request.question_type();
    info!(
        "📝 正在提取手写答案（{} 张图片）...",
        request.answer.student_answer_image_urls.len()
    );

    let generation_request = ctx
        .request(
            STAGE,
            ModelTier::for_extraction(question_type),
            prompts::extraction(question_type),
        )
        .with_images(request.answer.student_answer_image_urls.clone());

    let generation = ctx
        .generator
        .generate(generation_request)
        .await
        .map_err(generation_failed(STAGE))?;

    info!("✓ 提取完成: {}", truncate_text(&generation.content, 80));

    Ok(StateUpdate::Extracted {
        answer: generation.content,
        usage: generation.usage,
    })
}

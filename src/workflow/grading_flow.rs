//! 评分流程驱动器
//!
//! 核心职责：按固定顺序执行步骤，合并部分更新，处理唯一一条回边（重新评分）。
//!
//! - 请求不合法时直接返回失败响应，不调用任何步骤
//! - 任一步骤失败后，后续步骤全部跳过，不再产生费用
//! - 分数校验失败时最多重跑一次评分反馈

use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::clients::{Generator, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
use crate::config::Config;
use crate::models::{GradingRequest, GradingResponse};
use crate::workflow::model_tier::ModelRoster;
use crate::workflow::router::{route_after_validation, Route};
use crate::workflow::state::{GradingState, StateUpdate};
use crate::workflow::steps::{self, StepContext};
use crate::workflow::Stage;

/// 采样参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl GenerationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_output_tokens: config.llm_max_output_tokens,
            temperature: config.llm_temperature,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// 评分流程
///
/// 本身不持有任何评分状态，可以通过 `Arc` 在多个并发任务间共享；
/// 每次 [`GradingFlow::run`] 都新建独立的 [`GradingState`]。
pub struct GradingFlow {
    generator: Arc<dyn Generator>,
    roster: ModelRoster,
    settings: GenerationSettings,
}

impl GradingFlow {
    pub fn new(generator: Arc<dyn Generator>, roster: ModelRoster) -> Self {
        Self {
            generator,
            roster,
            settings: GenerationSettings::default(),
        }
    }

    pub fn from_config(generator: Arc<dyn Generator>, config: &Config) -> Self {
        Self::new(generator, ModelRoster::from_config(config))
            .with_settings(GenerationSettings::from_config(config))
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 评分一份作答，总是返回完整响应
    pub async fn run(&self, request: GradingRequest) -> GradingResponse {
        let question_id = request.question.id.clone();
        self.run_to_state(request)
            .instrument(info_span!("grading", question = %question_id))
            .await
            .into_response()
    }

    /// 执行流程并返回最终状态
    pub async fn run_to_state(&self, request: GradingRequest) -> GradingState {
        if let Err(e) = request.validate() {
            warn!("⚠️ 评分请求不合法: {}", e);
            return GradingState::rejected(request, e);
        }

        let ctx = StepContext {
            generator: self.generator.as_ref(),
            roster: &self.roster,
            settings: self.settings,
        };
        let mut state = GradingState::new(request);
        let mut next = Some(Stage::Extraction);

        while let Some(stage) = next {
            if !state.success {
                debug!("⏭️ {} 已跳过（前序步骤失败）", stage);
                next = stage.successor();
                continue;
            }

            let update = run_stage(&ctx, stage, &state)
                .await
                .unwrap_or_else(StateUpdate::Failed);
            if let StateUpdate::Failed(failure) = &update {
                error!("❌ {}", failure);
            }
            state.apply(update);

            next = match stage {
                Stage::MarkValidation if state.success => match route_after_validation(&state) {
                    Route::Pass => Some(Stage::ValuePointAnalysis),
                    Route::Rerun => {
                        info!("🔁 分数越界，重新生成评分反馈");
                        Some(Stage::FeedbackGeneration)
                    }
                },
                other => other.successor(),
            };
        }

        if state.success {
            info!(
                "✅ 评分完成: 得分 {:?}，费用 ${:.6}",
                state.mark, state.usage.cost
            );
        }
        state
    }
}

async fn run_stage(ctx: &StepContext<'_>, stage: Stage, state: &GradingState) -> steps::StepResult {
    match stage {
        Stage::Extraction => steps::extractor::run(ctx, state).await,
        Stage::SolutionPathwayAnalysis => steps::pathway::run(ctx, state).await,
        Stage::ContentAnalysis => steps::content::run(ctx, state).await,
        Stage::FeedbackGeneration => steps::feedback::run(ctx, state).await,
        Stage::MarkValidation => Ok(steps::validation::run(state)),
        Stage::ValuePointAnalysis => steps::value_points::run(ctx, state).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{MockGenerator, MockReply};
    use crate::clients::Usage;
    use crate::test_support::{classification_json, feedback_json, typed_numerical_request, value_points_json};

    fn flow(mock: Arc<MockGenerator>) -> GradingFlow {
        GradingFlow::new(mock, ModelRoster::default())
    }

    #[tokio::test]
    async fn test_validation_and_retry_state_after_single_overshoot() {
        let usage = Usage::new(10, 10, 0.001);
        let mock = Arc::new(MockGenerator::with_replies([
            MockReply::structured(classification_json("standard_approach"), usage),
            MockReply::text("analysis", usage),
            MockReply::structured(feedback_json(5.0, 2.0), usage),
            MockReply::structured(feedback_json(2.0, 2.0), usage),
            MockReply::structured(value_points_json(), usage),
        ]));

        let state = flow(mock.clone()).run_to_state(typed_numerical_request()).await;

        assert!(state.success);
        assert!(state.validation_passed);
        assert_eq!(state.retry_attempt, 1);
        assert_eq!(state.mark, Some(2.0));
        assert_eq!(mock.calls_for("feedback_generator"), 2);
        assert_eq!(mock.remaining_replies(), 0);
    }

    #[tokio::test]
    async fn test_settings_flow_into_requests() {
        let mock = Arc::new(MockGenerator::new());
        let flow = flow(mock.clone()).with_settings(GenerationSettings {
            max_output_tokens: 512,
            temperature: 0.0,
        });

        let state = flow.run_to_state(typed_numerical_request()).await;

        // 队列为空，第一次调用（路径分类）即失败
        assert!(!state.success);
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, 512);
        assert_eq!(calls[0].temperature, 0.0);
        assert!(state
            .error_message
            .unwrap()
            .starts_with("Solution Pathway Analysis failed:"));
    }
}

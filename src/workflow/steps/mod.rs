//! 流程中的各个步骤
//!
//! 每个步骤都是 (上下文, 状态) → 部分更新，可以独立失败。
//! 驱动器只在此前全部成功时调用步骤，步骤内部不再检查 `success`。

pub mod content;
pub mod extractor;
pub mod feedback;
pub mod pathway;
pub mod validation;
pub mod value_points;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::clients::{GenerationRequest, Generator};
use crate::error::{GenerationError, StepFailure};
use crate::prompts::Prompt;
use crate::workflow::grading_flow::GenerationSettings;
use crate::workflow::model_tier::{ModelRoster, ModelTier};
use crate::workflow::state::StateUpdate;
use crate::workflow::Stage;

/// 步骤结果：失败时由驱动器转为 [`StateUpdate::Failed`]
pub type StepResult = Result<StateUpdate, StepFailure>;

/// 步骤运行所需的能力，每次评分构造一次
pub struct StepContext<'a> {
    pub generator: &'a dyn Generator,
    pub roster: &'a ModelRoster,
    pub settings: GenerationSettings,
}

impl<'a> StepContext<'a> {
    /// 按档位和提示词组装生成请求
    pub fn request(&self, stage: Stage, tier: ModelTier, prompt: Prompt) -> GenerationRequest {
        GenerationRequest::new(stage.label(), self.roster.model(tier), prompt.user)
            .with_system_prompt(prompt.system)
            .with_sampling(self.settings.max_output_tokens, self.settings.temperature)
    }
}

/// 生成错误 → 步骤失败
pub(crate) fn generation_failed(stage: Stage) -> impl FnOnce(GenerationError) -> StepFailure {
    move |err| StepFailure::new(stage, err.to_string())
}

/// 把结构化输出解析为具体类型
pub(crate) fn parse_structured<T: DeserializeOwned>(
    stage: Stage,
    content: JsonValue,
) -> Result<T, StepFailure> {
    serde_json::from_value(content)
        .map_err(|e| StepFailure::new(stage, format!("unexpected structured output: {}", e)))
}

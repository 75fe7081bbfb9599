//! 评分状态
//!
//! 每次评分新建一个 [`GradingState`]，由驱动器独占；
//! 每个步骤读取状态并返回一个 [`StateUpdate`]，由 [`GradingState::apply`] 合并。

use tracing::debug;

use crate::clients::Usage;
use crate::error::{RequestError, StepFailure};
use crate::models::{Feedback, GradingRequest, GradingResponse, SolutionPathway, ValuePoints};
use crate::workflow::Stage;

/// 步骤产生的部分更新
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    Extracted {
        answer: String,
        usage: Usage,
    },
    Classified {
        pathway: SolutionPathway,
        reason: Option<String>,
        usage: Usage,
    },
    Analyzed {
        analysis: String,
        usage: Usage,
    },
    FeedbackGenerated {
        feedback: Feedback,
        mark: f64,
        usage: Usage,
    },
    Validated {
        passed: bool,
        retry_attempt: u8,
    },
    ValuePointsAssessed {
        value_points: ValuePoints,
        usage: Usage,
    },
    Failed(StepFailure),
}

impl StateUpdate {
    /// 本次更新带来的用量增量，失败为零
    pub fn usage(&self) -> Usage {
        match self {
            StateUpdate::Extracted { usage, .. }
            | StateUpdate::Classified { usage, .. }
            | StateUpdate::Analyzed { usage, .. }
            | StateUpdate::FeedbackGenerated { usage, .. }
            | StateUpdate::ValuePointsAssessed { usage, .. } => *usage,
            StateUpdate::Validated { .. } | StateUpdate::Failed(_) => Usage::default(),
        }
    }
}

/// 一次评分的完整状态
#[derive(Debug, Clone)]
pub struct GradingState {
    pub request: GradingRequest,
    pub extracted_answer: Option<String>,
    pub solution_pathway: Option<SolutionPathway>,
    pub reason_for_classification: Option<String>,
    pub content_analysis: Option<String>,
    pub feedback: Option<Feedback>,
    pub mark: Option<f64>,
    pub value_points: Option<ValuePoints>,
    pub validation_passed: bool,
    /// 分数越界的次数，最多到 2
    pub retry_attempt: u8,
    /// 累计用量，只增不减
    pub usage: Usage,
    pub success: bool,
    pub error_message: Option<String>,
}

impl GradingState {
    pub fn new(request: GradingRequest) -> Self {
        Self {
            request,
            extracted_answer: None,
            solution_pathway: None,
            reason_for_classification: None,
            content_analysis: None,
            feedback: None,
            mark: None,
            value_points: None,
            validation_passed: true,
            retry_attempt: 0,
            usage: Usage::default(),
            success: true,
            error_message: None,
        }
    }

    /// 请求本身不合法，不进入任何步骤
    pub fn rejected(request: GradingRequest, error: RequestError) -> Self {
        let mut state = Self::new(request);
        state.success = false;
        state.error_message = Some(format!("Invalid request: {}", error));
        state
    }

    /// 合并一个步骤的更新
    pub fn apply(&mut self, update: StateUpdate) {
        let delta = update.usage();
        self.usage += delta;
        if delta != Usage::default() {
            debug!(
                "用量增量: 输入 {} / 输出 {} token，费用 ${:.6}（累计 ${:.6}）",
                delta.input_tokens, delta.output_tokens, delta.cost, self.usage.cost
            );
        }

        match update {
            StateUpdate::Extracted { answer, .. } => {
                self.extracted_answer = Some(answer);
            }
            StateUpdate::Classified { pathway, reason, .. } => {
                self.solution_pathway = Some(pathway);
                self.reason_for_classification = reason;
            }
            StateUpdate::Analyzed { analysis, .. } => {
                self.content_analysis = Some(analysis);
            }
            StateUpdate::FeedbackGenerated { feedback, mark, .. } => {
                self.feedback = Some(feedback);
                self.mark = Some(mark);
            }
            StateUpdate::Validated {
                passed,
                retry_attempt,
            } => {
                self.validation_passed = passed;
                self.retry_attempt = retry_attempt;
            }
            StateUpdate::ValuePointsAssessed { value_points, .. } => {
                self.value_points = Some(value_points);
            }
            StateUpdate::Failed(failure) => {
                self.clear_outputs_of(failure.stage);
                self.success = false;
                self.error_message = Some(failure.to_string());
            }
        }
    }

    /// 失败步骤自己的输出置空，之前步骤的结果保留
    fn clear_outputs_of(&mut self, stage: Stage) {
        match stage {
            Stage::Extraction => self.extracted_answer = None,
            Stage::SolutionPathwayAnalysis => {
                self.solution_pathway = None;
                self.reason_for_classification = None;
            }
            Stage::ContentAnalysis => self.content_analysis = None,
            Stage::FeedbackGeneration => {
                self.feedback = None;
                self.mark = None;
            }
            Stage::MarkValidation => {}
            Stage::ValuePointAnalysis => self.value_points = None,
        }
    }

    /// 生成对外响应，状态随之丢弃
    pub fn into_response(self) -> GradingResponse {
        GradingResponse {
            solution_pathway: self.solution_pathway,
            feedback: self.feedback,
            value_points: self.value_points,
            mark: self.mark,
            extracted_answer: self.extracted_answer,
            content_analysis: self.content_analysis,
            cost: self.usage.cost,
            input_tokens: self.usage.input_tokens,
            output_tokens: self.usage.output_tokens,
            success: self.success,
            error_message: self.error_message,
        }
    }
}

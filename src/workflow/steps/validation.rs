//! 分数校验：得分不能超过满分

use tracing::warn;

use crate::workflow::state::{GradingState, StateUpdate};

pub fn run(state: &GradingState) -> StateUpdate {
    let max_marks = state.request.question.max_marks;

    match state.mark {
        Some(mark) if mark > max_marks => {
            let retry_attempt = state.retry_attempt.saturating_add(1);
            warn!(
                "⚠️ 得分 {} 超过满分 {}（第 {} 次越界）",
                mark, max_marks, retry_attempt
            );
            StateUpdate::Validated {
                passed: false,
                retry_attempt,
            }
        }
        _ => StateUpdate::Validated {
            passed: true,
            retry_attempt: state.retry_attempt,
        },
    }
}

//! 分数校验后的路由

use crate::workflow::state::GradingState;

/// 评分反馈最多执行的次数（首次 + 一次重跑）
pub const MAX_FEEDBACK_ATTEMPTS: u8 = 2;

/// 校验后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// 继续到能力点评估
    Pass,
    /// 回到评分反馈重新生成
    Rerun,
}

/// 根据校验结果和重试计数决定去向
///
/// 校验失败且次数已用完时接受越界分数，继续往下走
pub fn route_after_validation(state: &GradingState) -> Route {
    decide(state.validation_passed, state.retry_attempt)
}

fn decide(validation_passed: bool, retry_attempt: u8) -> Route {
    if validation_passed || retry_attempt >= MAX_FEEDBACK_ATTEMPTS {
        Route::Pass
    } else {
        Route::Rerun
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_validation_always_passes() {
        for attempt in 0..=MAX_FEEDBACK_ATTEMPTS {
            assert_eq!(decide(true, attempt), Route::Pass);
        }
    }

    #[test]
    fn test_first_overshoot_reruns() {
        assert_eq!(decide(false, 1), Route::Rerun);
    }

    #[test]
    fn test_exhausted_retries_pass_despite_failure() {
        assert_eq!(decide(false, 2), Route::Pass);
        assert_eq!(decide(false, 3), Route::Pass);
    }
}

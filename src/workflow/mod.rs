//! 评分流程 - 流程层
//!
//! 固定拓扑，只有一条回边：
//!
//! ```text
//! Extraction → SolutionPathwayAnalysis → ContentAnalysis → FeedbackGeneration
//!     → MarkValidation ─(pass)→ ValuePointAnalysis → 结束
//!                     └(rerun)→ FeedbackGeneration
//! ```

pub mod grading_flow;
pub mod model_tier;
pub mod router;
pub mod state;
pub mod steps;

use std::fmt;

pub use grading_flow::{GenerationSettings, GradingFlow};
pub use model_tier::{ModelRoster, ModelTier};
pub use router::{route_after_validation, Route, MAX_FEEDBACK_ATTEMPTS};
pub use state::{GradingState, StateUpdate};

/// 流程中的步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extraction,
    SolutionPathwayAnalysis,
    ContentAnalysis,
    FeedbackGeneration,
    MarkValidation,
    ValuePointAnalysis,
}

impl Stage {
    /// 生成请求中的调用方标识
    pub fn label(self) -> &'static str {
        match self {
            Stage::Extraction => "extractor",
            Stage::SolutionPathwayAnalysis => "solution_pathway_analyzer",
            Stage::ContentAnalysis => "content_analyzer",
            Stage::FeedbackGeneration => "feedback_generator",
            Stage::MarkValidation => "mark_validator",
            Stage::ValuePointAnalysis => "value_point_analyzer",
        }
    }

    /// 顺序上的下一步（不含回边）
    pub fn successor(self) -> Option<Stage> {
        match self {
            Stage::Extraction => Some(Stage::SolutionPathwayAnalysis),
            Stage::SolutionPathwayAnalysis => Some(Stage::ContentAnalysis),
            Stage::ContentAnalysis => Some(Stage::FeedbackGeneration),
            Stage::FeedbackGeneration => Some(Stage::MarkValidation),
            Stage::MarkValidation => Some(Stage::ValuePointAnalysis),
            Stage::ValuePointAnalysis => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extraction => "Extraction",
            Stage::SolutionPathwayAnalysis => "Solution Pathway Analysis",
            Stage::ContentAnalysis => "Content Analysis",
            Stage::FeedbackGeneration => "Feedback Generation",
            Stage::MarkValidation => "Mark Validation",
            Stage::ValuePointAnalysis => "Value Point Analysis",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_chain_is_linear() {
        let mut stage = Some(Stage::Extraction);
        let mut visited = Vec::new();
        while let Some(current) = stage {
            visited.push(current);
            stage = current.successor();
        }
        assert_eq!(visited.len(), 6);
        assert_eq!(visited.last(), Some(&Stage::ValuePointAnalysis));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Stage::SolutionPathwayAnalysis.to_string(), "Solution Pathway Analysis");
        assert_eq!(Stage::FeedbackGeneration.label(), "feedback_generator");
    }
}

//! 模型档位选择
//!
//! 所有步骤都通过这里选模型，保证"其他解法至少用中档模型"的规则一致生效

use crate::config::Config;
use crate::models::{Complexity, QuestionType, SolutionPathway};

/// 模型档位，按能力从低到高排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelTier {
    Baseline,
    Mid,
    Top,
}

impl ModelTier {
    /// 内容分析和评分反馈使用的档位
    pub fn for_analysis(complexity: Complexity, pathway: Option<SolutionPathway>) -> Self {
        let tier = match complexity {
            Complexity::Basic => ModelTier::Baseline,
            Complexity::Moderate => ModelTier::Mid,
            Complexity::Advanced => ModelTier::Top,
        };
        if pathway == Some(SolutionPathway::AcceptableAlternativeApproach) {
            tier.max(ModelTier::Mid)
        } else {
            tier
        }
    }

    /// 答案提取使用的档位，以图作答的题目需要最强的视觉能力
    pub fn for_extraction(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::ImageAnswer => ModelTier::Top,
            QuestionType::NumericalProblem | QuestionType::TextualAnswer => ModelTier::Baseline,
        }
    }

    /// 解题路径分类固定使用基础档位
    pub fn for_classification() -> Self {
        ModelTier::Baseline
    }

    /// 能力点评估固定使用基础档位
    pub fn for_value_points() -> Self {
        ModelTier::Baseline
    }
}

/// 档位到具体模型 ID 的映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoster {
    pub baseline: String,
    pub mid: String,
    pub top: String,
}

impl ModelRoster {
    pub fn from_config(config: &Config) -> Self {
        Self {
            baseline: config.baseline_model.clone(),
            mid: config.mid_model.clone(),
            top: config.top_model.clone(),
        }
    }

    pub fn model(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Baseline => &self.baseline,
            ModelTier::Mid => &self.mid,
            ModelTier::Top => &self.top,
        }
    }
}

impl Default for ModelRoster {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_maps_to_tier() {
        assert_eq!(ModelTier::for_analysis(Complexity::Basic, None), ModelTier::Baseline);
        assert_eq!(ModelTier::for_analysis(Complexity::Moderate, None), ModelTier::Mid);
        assert_eq!(ModelTier::for_analysis(Complexity::Advanced, None), ModelTier::Top);
    }

    #[test]
    fn test_alternative_pathway_raises_to_at_least_mid() {
        let alternative = Some(SolutionPathway::AcceptableAlternativeApproach);
        assert_eq!(ModelTier::for_analysis(Complexity::Basic, alternative), ModelTier::Mid);
        assert_eq!(ModelTier::for_analysis(Complexity::Moderate, alternative), ModelTier::Mid);
        assert_eq!(ModelTier::for_analysis(Complexity::Advanced, alternative), ModelTier::Top);
        assert_eq!(
            ModelTier::for_analysis(Complexity::Basic, Some(SolutionPathway::IrrelevantApproach)),
            ModelTier::Baseline
        );
    }

    #[test]
    fn test_extraction_tier_by_question_type() {
        assert_eq!(ModelTier::for_extraction(QuestionType::ImageAnswer), ModelTier::Top);
        assert_eq!(ModelTier::for_extraction(QuestionType::NumericalProblem), ModelTier::Baseline);
        assert_eq!(ModelTier::for_extraction(QuestionType::TextualAnswer), ModelTier::Baseline);
    }

    #[test]
    fn test_default_roster_models() {
        let roster = ModelRoster::default();
        assert_eq!(roster.model(ModelTier::Baseline), "gemini-2.0-flash");
        assert_eq!(roster.model(ModelTier::Mid), "gemini-2.5-flash");
        assert_eq!(roster.model(ModelTier::Top), "gemini-2.5-pro");
    }
}

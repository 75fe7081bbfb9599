//! 结构化输出的 JSON Schema 定义
//!
//! 每个需要结构化输出的步骤都在这里取 schema；
//! 评分反馈的四种形态由 [`GradingVariant`] 统一分派。

use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::grading::{CriterionRow, Feedback, SolutionPathway};
use crate::models::question::QuestionType;

/// 结构化输出 schema
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: Value,
}

/// 按题型和解题路径区分的评分形态
///
/// 内容分析和评分反馈都按它选择提示词，评分反馈还按它选择 schema。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradingVariant {
    NumericalStandard,
    NumericalIrrelevant,
    NumericalAlternative,
    Textual,
}

impl GradingVariant {
    /// 根据题型和分类结果选择形态
    ///
    /// 数值题必须已有 标准/其他/无关 三者之一的分类，否则返回 `None`
    pub fn select(question_type: QuestionType, pathway: Option<SolutionPathway>) -> Option<Self> {
        match question_type {
            QuestionType::TextualAnswer | QuestionType::ImageAnswer => Some(GradingVariant::Textual),
            QuestionType::NumericalProblem => match pathway? {
                SolutionPathway::StandardApproach => Some(GradingVariant::NumericalStandard),
                SolutionPathway::IrrelevantApproach => Some(GradingVariant::NumericalIrrelevant),
                SolutionPathway::AcceptableAlternativeApproach => {
                    Some(GradingVariant::NumericalAlternative)
                }
                SolutionPathway::NotApplicable => None,
            },
        }
    }

    /// 对应的评分反馈 schema
    pub fn feedback_schema(self) -> OutputSchema {
        match self {
            GradingVariant::NumericalStandard | GradingVariant::NumericalAlternative => {
                feedback_schema(
                    "numerical_feedback",
                    "Contains array of steps mentioned in the content analysis",
                    "Contains details about grading each step [Concise Step, Marks Given/Total Marks, ONE LINE CALLOUT of specific error if any or comment on correctness]",
                    "Contains Total marks and concise overall feedback for the student answer [Total_Marks_Scored/Max_Marks, Overall Feedback]",
                )
            }
            GradingVariant::NumericalIrrelevant => feedback_schema(
                "numerical_feedback_irrelevant",
                "Contains array with One or Zero Criteria mentioned in the content analysis",
                "Contains details about grading for criteria [Criteria, Partial Marks Given, ONE LINE CALL OUT against the Criteria on correctness/understanding]",
                "Contains Total marks and concise overall feedback for the student answer [Total_Marks_Scored/Max_Marks, Overall Feedback(Reason of Incorrect solution)]",
            ),
            GradingVariant::Textual => feedback_schema(
                "textual_feedback",
                "Contains array of criteria mentioned in the GOLDEN STANDARD SOLUTION, focusing on the student's approach and understanding",
                "Contains details about each criteria for grading [Criteria, Marks Given/Total Marks, Student's Approach and Feedback]",
                "Contains Total marks and concise overall feedback for the student answer [Total_Marks_Scored/Max_Marks, Overall Feedback]",
            ),
        }
    }
}

fn feedback_schema(
    name: &'static str,
    criteria_description: &str,
    row_description: &str,
    total_description: &str,
) -> OutputSchema {
    OutputSchema {
        name,
        description: "Per-criterion grading, total points and numeric mark",
        schema: json!({
            "type": "object",
            "properties": {
                "criteria": {
                    "type": "array",
                    "description": criteria_description,
                    "items": {
                        "type": "array",
                        "description": row_description,
                        "items": { "type": "string" }
                    },
                    "minItems": 1,
                    "maxItems": 6
                },
                "total_points": {
                    "type": "array",
                    "description": total_description,
                    "items": { "type": "string" },
                    "minItems": 2,
                    "maxItems": 2
                },
                "mark": { "type": "number" }
            },
            "required": ["criteria", "total_points", "mark"]
        }),
    }
}

/// 解题路径分类 schema
pub fn pathway_classification_schema() -> OutputSchema {
    OutputSchema {
        name: "solution_pathway_classification",
        description: "Classification of the student's solution approach",
        schema: json!({
            "type": "object",
            "properties": {
                "solution_pathway": {
                    "type": "string",
                    "enum": [
                        "standard_approach",
                        "acceptable_alternative_approach",
                        "irrelevant_approach"
                    ]
                },
                "reason_for_classification": {
                    "type": "string",
                    "description": "Concise reason for classification"
                }
            },
            "required": ["solution_pathway", "reason_for_classification"]
        }),
    }
}

/// 能力点评估 schema
pub fn value_point_schema() -> OutputSchema {
    let competence = json!({
        "type": "string",
        "enum": [
            "Demonstrated Competence",
            "Did Not Demonstrate Competence",
            "Not Applicable"
        ]
    });
    OutputSchema {
        name: "value_point_assessment",
        description: "Competence demonstrated on the three value point dimensions",
        schema: json!({
            "type": "object",
            "properties": {
                "formulating": competence.clone(),
                "employing": competence.clone(),
                "interpreting_evaluating": competence
            },
            "required": ["formulating", "employing", "interpreting_evaluating"]
        }),
    }
}

/// 解题路径分类的结构化回复
#[derive(Debug, Clone, Deserialize)]
pub struct PathwayClassification {
    pub solution_pathway: SolutionPathway,
    pub reason_for_classification: String,
}

/// 评分反馈的结构化回复（原始形态，还没有 Total 行）
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackReply {
    pub criteria: Vec<Vec<String>>,
    pub total_points: Vec<String>,
    pub mark: f64,
}

impl FeedbackReply {
    /// 转换为对外的反馈表，并在末尾追加 "Total" 行
    ///
    /// `total_points` 必须恰好两项（总分、总评）
    pub fn into_feedback(self) -> Result<(Feedback, f64), String> {
        let [total, overall]: [String; 2] = self.total_points.try_into().map_err(|points: Vec<String>| {
            format!("total_points must have exactly 2 entries, got {}", points.len())
        })?;

        let mut criteria: Vec<CriterionRow> = self
            .criteria
            .into_iter()
            .map(CriterionRow::from_cells)
            .collect();
        criteria.push(CriterionRow::new(CriterionRow::TOTAL_LABEL, total, overall));

        Ok((Feedback { criteria }, self.mark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numerical_variants_follow_pathway() {
        let numerical = QuestionType::NumericalProblem;
        assert_eq!(
            GradingVariant::select(numerical, Some(SolutionPathway::StandardApproach)),
            Some(GradingVariant::NumericalStandard)
        );
        assert_eq!(
            GradingVariant::select(numerical, Some(SolutionPathway::IrrelevantApproach)),
            Some(GradingVariant::NumericalIrrelevant)
        );
        assert_eq!(
            GradingVariant::select(
                numerical,
                Some(SolutionPathway::AcceptableAlternativeApproach)
            ),
            Some(GradingVariant::NumericalAlternative)
        );
        assert_eq!(GradingVariant::select(numerical, None), None);
        assert_eq!(
            GradingVariant::select(numerical, Some(SolutionPathway::NotApplicable)),
            None
        );
    }

    #[test]
    fn test_non_numerical_types_are_textual() {
        for question_type in [QuestionType::TextualAnswer, QuestionType::ImageAnswer] {
            assert_eq!(
                GradingVariant::select(question_type, Some(SolutionPathway::NotApplicable)),
                Some(GradingVariant::Textual)
            );
        }
    }

    #[test]
    fn test_irrelevant_schema_differs_from_standard() {
        let standard = GradingVariant::NumericalStandard.feedback_schema();
        let alternative = GradingVariant::NumericalAlternative.feedback_schema();
        let irrelevant = GradingVariant::NumericalIrrelevant.feedback_schema();
        assert_eq!(standard, alternative);
        assert_ne!(standard.name, irrelevant.name);
    }

    #[test]
    fn test_feedback_schemas_require_all_fields() {
        for variant in [
            GradingVariant::NumericalStandard,
            GradingVariant::NumericalIrrelevant,
            GradingVariant::Textual,
        ] {
            let schema = variant.feedback_schema().schema;
            assert_eq!(schema["required"], json!(["criteria", "total_points", "mark"]));
            assert_eq!(schema["properties"]["total_points"]["maxItems"], 2);
        }
    }

    #[test]
    fn test_into_feedback_appends_total_row() {
        let reply = FeedbackReply {
            criteria: vec![
                vec!["Step 1".into(), "1/1".into(), "Correct dr/dt".into()],
                vec!["Step 2".into(), "0/1".into(), "Wrong substitution".into()],
            ],
            total_points: vec!["1/2".into(), "Good start".into()],
            mark: 1.0,
        };

        let (feedback, mark) = reply.into_feedback().unwrap();

        assert_eq!(mark, 1.0);
        assert_eq!(feedback.criteria.len(), 3);
        assert_eq!(
            feedback.total(),
            Some(&CriterionRow::new("Total", "1/2", "Good start"))
        );
    }

    #[test]
    fn test_into_feedback_rejects_malformed_total_points() {
        let reply = FeedbackReply {
            criteria: vec![vec!["Step 1".into(), "1/1".into(), "ok".into()]],
            total_points: vec!["1/2".into()],
            mark: 1.0,
        };
        let err = reply.into_feedback().unwrap_err();
        assert!(err.contains("exactly 2"));
    }
}

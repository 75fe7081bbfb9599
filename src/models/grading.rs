//! 评分结果模型

use serde::{Deserialize, Serialize};

/// 解题路径分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionPathway {
    /// 与评分细则一致的标准解法
    StandardApproach,
    /// 可接受的其他解法
    AcceptableAlternativeApproach,
    /// 与题目无关的解法
    IrrelevantApproach,
    /// 非数值题不做分类
    #[serde(rename = "NA")]
    NotApplicable,
}

impl SolutionPathway {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionPathway::StandardApproach => "standard_approach",
            SolutionPathway::AcceptableAlternativeApproach => "acceptable_alternative_approach",
            SolutionPathway::IrrelevantApproach => "irrelevant_approach",
            SolutionPathway::NotApplicable => "NA",
        }
    }
}

impl std::fmt::Display for SolutionPathway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 能力点评估结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Competence {
    #[serde(rename = "Demonstrated Competence")]
    Demonstrated,
    #[serde(rename = "Did Not Demonstrate Competence")]
    NotDemonstrated,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
}

/// 三个固定能力维度的诊断结果（不计分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePoints {
    pub formulating: Competence,
    pub employing: Competence,
    pub interpreting_evaluating: Competence,
}

impl ValuePoints {
    /// 非数值题使用的固定结果
    pub const NOT_APPLICABLE: ValuePoints = ValuePoints {
        formulating: Competence::NotApplicable,
        employing: Competence::NotApplicable,
        interpreting_evaluating: Competence::NotApplicable,
    };
}

/// 评分表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionRow {
    /// 评分点（简短）
    pub criterion: String,
    /// 得分，形如 "1/2"
    pub marks: String,
    /// 一句话点评
    pub comment: String,
}

impl CriterionRow {
    pub const TOTAL_LABEL: &'static str = "Total";

    pub fn new(
        criterion: impl Into<String>,
        marks: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            criterion: criterion.into(),
            marks: marks.into(),
            comment: comment.into(),
        }
    }

    /// 从模型返回的字符串数组构造
    ///
    /// 不足三项补空字符串，多出的部分并入点评
    pub fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        let criterion = cells.next().unwrap_or_default();
        let marks = cells.next().unwrap_or_default();
        let comment = cells.collect::<Vec<_>>().join(" ");
        Self {
            criterion,
            marks,
            comment,
        }
    }

    pub fn is_total(&self) -> bool {
        self.criterion == Self::TOTAL_LABEL
    }
}

/// 逐项评分反馈，最后一行是合成的 "Total" 行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub criteria: Vec<CriterionRow>,
}

impl Feedback {
    /// 合成的总分行
    pub fn total(&self) -> Option<&CriterionRow> {
        self.criteria.last().filter(|row| row.is_total())
    }
}

/// 评分流程对外的最终响应
///
/// 失败时依然是完整结构：未产生的字段为 `None`，`error_message` 说明失败步骤。
/// 调用方必须先检查 `success`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResponse {
    pub solution_pathway: Option<SolutionPathway>,
    pub feedback: Option<Feedback>,
    pub value_points: Option<ValuePoints>,
    pub mark: Option<f64>,
    pub extracted_answer: Option<String>,
    pub content_analysis: Option<String>,
    pub cost: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub success: bool,
    pub error_message: Option<String>,
}

impl GradingResponse {
    /// 没有进入评分流程的失败响应
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            solution_pathway: None,
            feedback: None,
            value_points: None,
            mark: None,
            extracted_answer: None,
            content_analysis: None,
            cost: 0.0,
            input_tokens: 0,
            output_tokens: 0,
            success: false,
            error_message: Some(message.into()),
        }
    }
}

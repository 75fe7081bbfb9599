//! 题目与评分请求模型

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 数值计算题
    NumericalProblem,
    /// 文字作答题
    TextualAnswer,
    /// 以图作答题（画图、作图）
    ImageAnswer,
}

impl QuestionType {
    /// 是否为数值计算题（只有数值题需要解题路径分类和能力点评估）
    pub fn is_numerical(self) -> bool {
        matches!(self, QuestionType::NumericalProblem)
    }
}

/// 题目复杂度，决定分析和评分使用的模型档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    #[default]
    Basic,
    Moderate,
    Advanced,
}

fn default_question_type() -> QuestionType {
    QuestionType::NumericalProblem
}

fn default_grade() -> u8 {
    12
}

fn default_max_marks() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

/// 题库中的一道题
///
/// 题目元数据、题干和两份评分细则（一份用于提取，一份用于评分）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    /// 题目 ID（题库内唯一）
    pub id: String,
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: QuestionType,
    #[serde(default = "default_grade")]
    pub grade: u8,
    #[serde(default = "default_max_marks")]
    pub max_marks: f64,
    #[serde(default = "default_true")]
    pub partial_marks_allowed: bool,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub chapter: String,
    pub question: String,
    #[serde(default)]
    pub question_contains_figure: bool,
    #[serde(default)]
    pub image_description_for_question: String,
    #[serde(default)]
    pub rubrics_for_extraction: String,
    #[serde(default)]
    pub rubrics_for_evaluation: String,
    #[serde(default)]
    pub complexity: Complexity,
}

impl QuestionSpec {
    /// 用于提示词的题干
    ///
    /// 题目带图时把图的文字描述附在题干后面
    pub fn question_text(&self) -> String {
        if self.question_contains_figure {
            format!(
                "{}\nQuestion also contains a figure/image which can be described as follows.\n{}",
                self.question, self.image_description_for_question
            )
        } else {
            self.question.clone()
        }
    }
}

/// 学生作答
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentAnswer {
    /// 键入的答案文本（非手写时以此为准）
    #[serde(default)]
    pub student_answer_typed: String,
    /// 是否以图片形式提交（手写）
    #[serde(default)]
    pub handwritten: bool,
    /// 手写答案图片 URL
    #[serde(default)]
    pub student_answer_image_urls: Vec<String>,
}

/// 评分请求（流程内只读）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingRequest {
    pub question: QuestionSpec,
    pub answer: StudentAnswer,
}

impl GradingRequest {
    pub fn new(question: QuestionSpec, answer: StudentAnswer) -> Self {
        Self { question, answer }
    }

    /// 校验请求
    ///
    /// - 手写提交必须带至少一张图片
    /// - 满分必须是正的有限数
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.answer.handwritten && self.answer.student_answer_image_urls.is_empty() {
            return Err(RequestError::MissingAnswerImages);
        }
        let max_marks = self.question.max_marks;
        if !max_marks.is_finite() || max_marks <= 0.0 {
            return Err(RequestError::InvalidMaxMarks(max_marks));
        }
        Ok(())
    }

    pub fn question_type(&self) -> QuestionType {
        self.question.question_type
    }

    /// 用于提示词的学生答案
    ///
    /// 手写时使用提取结果并注明来源，否则直接使用键入文本
    pub fn student_answer_text(&self, extracted: Option<&str>) -> String {
        if self.answer.handwritten {
            format!(
                "Here is the extracted content from the student's handwritten work,\n{}",
                extracted.unwrap_or_default()
            )
        } else {
            self.answer.student_answer_typed.clone()
        }
    }
}

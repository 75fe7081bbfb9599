//! 测试夹具
//!
//! 单元测试和 `tests/` 下的集成测试共用

use serde_json::{json, Value as JsonValue};

use crate::models::{
    Complexity, GradingRequest, QuestionSpec, QuestionType, StudentAnswer,
};

/// 数值题：球体半径变化率
pub fn numerical_question() -> QuestionSpec {
    QuestionSpec {
        id: "rates-1".to_string(),
        question_type: QuestionType::NumericalProblem,
        grade: 12,
        max_marks: 2.0,
        partial_marks_allowed: true,
        subject: "Maths".to_string(),
        chapter: "Applications of Derivatives".to_string(),
        question: "The radius of a sphere increases at 0.5 cm/s. Find the rate of change of its surface area when r = 2 cm.".to_string(),
        question_contains_figure: false,
        image_description_for_question: String::new(),
        rubrics_for_extraction: "Step 1: S = 4πr², dS/dt = 8πr dr/dt\nStep 2: substitute r = 2, dr/dt = 0.5".to_string(),
        rubrics_for_evaluation: "Step 1: differentiate (1 mark)\nStep 2: dS/dt = 8π cm²/s (1 mark)".to_string(),
        complexity: Complexity::Basic,
    }
}

/// 文字题：光合作用定义
pub fn textual_question() -> QuestionSpec {
    QuestionSpec {
        id: "bio-1".to_string(),
        question_type: QuestionType::TextualAnswer,
        grade: 10,
        max_marks: 3.0,
        partial_marks_allowed: true,
        subject: "Biology".to_string(),
        chapter: "Life Processes".to_string(),
        question: "Define photosynthesis and name its two main products.".to_string(),
        question_contains_figure: false,
        image_description_for_question: String::new(),
        rubrics_for_extraction: String::new(),
        rubrics_for_evaluation: "Definition (1 mark)\nGlucose (1 mark)\nOxygen (1 mark)".to_string(),
        complexity: Complexity::Moderate,
    }
}

pub fn typed_answer(text: &str) -> StudentAnswer {
    StudentAnswer {
        student_answer_typed: text.to_string(),
        handwritten: false,
        student_answer_image_urls: Vec::new(),
    }
}

pub fn handwritten_answer(urls: &[&str]) -> StudentAnswer {
    StudentAnswer {
        student_answer_typed: String::new(),
        handwritten: true,
        student_answer_image_urls: urls.iter().map(|url| url.to_string()).collect(),
    }
}

/// 键入作答的数值题请求
pub fn typed_numerical_request() -> GradingRequest {
    GradingRequest::new(
        numerical_question(),
        typed_answer("dS/dt = 8πr dr/dt = 8π(2)(0.5) = 8π cm²/s"),
    )
}

/// 手写作答的数值题请求
pub fn handwritten_numerical_request() -> GradingRequest {
    GradingRequest::new(
        numerical_question(),
        handwritten_answer(&["https://storage.example.com/answers/page-1.jpg"]),
    )
}

pub fn typed_textual_request() -> GradingRequest {
    GradingRequest::new(
        textual_question(),
        typed_answer("Plants make food from sunlight, producing glucose and oxygen."),
    )
}

/// 解题路径分类的结构化回复
pub fn classification_json(pathway: &str) -> JsonValue {
    json!({
        "solution_pathway": pathway,
        "reason_for_classification": "Differentiates the surface area formula as in the rubric.",
    })
}

/// 评分反馈的结构化回复
pub fn feedback_json(mark: f64, max_marks: f64) -> JsonValue {
    json!({
        "criteria": [
            ["Differentiate S = 4πr²", "1/1", "Correct derivative."],
            ["Substitute values", format!("{}/1", (mark - 1.0).max(0.0)), "Substitution shown."],
        ],
        "total_points": [format!("{}/{}", mark, max_marks), "Clear and complete working."],
        "mark": mark,
    })
}

/// 能力点评估的结构化回复
pub fn value_points_json() -> JsonValue {
    json!({
        "formulating": "Demonstrated Competence",
        "employing": "Demonstrated Competence",
        "interpreting_evaluating": "Did Not Demonstrate Competence",
    })
}

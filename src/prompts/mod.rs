//! 提示词组装
//!
//! 每个步骤一个入口，返回系统提示词和用户提示词；
//! 分析与评分按 [`GradingVariant`] 选择对应的提示词。

pub mod system;

use crate::models::{GradingVariant, QuestionSpec, QuestionType};

/// 一次调用使用的提示词
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

impl Prompt {
    fn new(system: &'static str, user: String) -> Self {
        Self { system, user }
    }
}

/// 题目背景，所有评分相关提示词共用
fn context_header(question: &QuestionSpec) -> String {
    format!(
        "Grade level: {}\nSubject: {}\nChapter: {}\n\nQUESTION:\n{}\n",
        question.grade,
        question.subject,
        question.chapter,
        question.question_text()
    )
}

/// 答案提取
pub fn extraction(question_type: QuestionType) -> Prompt {
    match question_type {
        QuestionType::NumericalProblem => Prompt::new(
            system::EXTRACTION_NUMERICAL,
            "Transcribe the student's complete working from the attached images.".to_string(),
        ),
        QuestionType::TextualAnswer => Prompt::new(
            system::EXTRACTION_TEXTUAL,
            "Transcribe the student's complete answer from the attached images.".to_string(),
        ),
        QuestionType::ImageAnswer => Prompt::new(
            system::EXTRACTION_IMAGE_ANSWER,
            "Describe the student's drawn answer in the attached images, including all labels and annotations."
                .to_string(),
        ),
    }
}

/// 解题路径分类
pub fn pathway_classification(question: &QuestionSpec, student_answer: &str) -> Prompt {
    let user = format!(
        "{}\nEXPECTED SOLUTION STEPS:\n{}\n\nSTUDENT ANSWER:\n{}\n\nClassify the student's solution pathway.",
        context_header(question),
        question.rubrics_for_extraction,
        student_answer
    );
    Prompt::new(system::PATHWAY_CLASSIFICATION, user)
}

/// 内容分析
///
/// 数值题附带分类理由
pub fn content_analysis(
    variant: GradingVariant,
    question: &QuestionSpec,
    student_answer: &str,
    reason_for_classification: Option<&str>,
) -> Prompt {
    let header = context_header(question);
    let reason = reason_for_classification.unwrap_or_default();

    match variant {
        GradingVariant::Textual => Prompt::new(
            system::CONTENT_ANALYSIS_TEXTUAL,
            format!(
                "{header}\nGOLDEN STANDARD SOLUTION WITH MARK BREAKDOWN:\n{}\n\nSTUDENT ANSWER:\n{student_answer}\n\n\
                 Analyse the student's answer against each criterion.",
                question.rubrics_for_evaluation
            ),
        ),
        GradingVariant::NumericalStandard => Prompt::new(
            system::CONTENT_ANALYSIS_NUMERICAL,
            format!(
                "{header}\nEXPECTED SOLUTION STEPS:\n{}\n\nSAMPLE SOLUTION WITH STEPS:\n{}\n\nSTUDENT ANSWER:\n{student_answer}\n\n\
                 The student followed the standard approach ({reason}).\n\
                 Analyse each expected step in order and identify where the student's working deviates.",
                question.rubrics_for_extraction, question.rubrics_for_evaluation
            ),
        ),
        GradingVariant::NumericalIrrelevant => Prompt::new(
            system::CONTENT_ANALYSIS_NUMERICAL,
            format!(
                "{header}\nEXPECTED SOLUTION STEPS:\n{}\n\nSAMPLE SOLUTION WITH STEPS:\n{}\n\nSTUDENT ANSWER:\n{student_answer}\n\n\
                 The student's approach was classified as irrelevant ({reason}).\n\
                 Explain why the approach cannot answer the question and identify at most one criterion \
                 for which partial credit could still be justified.",
                question.rubrics_for_extraction, question.rubrics_for_evaluation
            ),
        ),
        GradingVariant::NumericalAlternative => Prompt::new(
            system::CONTENT_ANALYSIS_NUMERICAL,
            format!(
                "{header}\nEXPECTED SOLUTION STEPS:\n{}\n\nSAMPLE SOLUTION WITH STEPS:\n{}\n\nSTUDENT ANSWER:\n{student_answer}\n\n\
                 The student used an acceptable alternative approach ({reason}).\n\
                 Map the student's own steps onto the expected steps by purpose, check each for \
                 mathematical validity, and judge whether the final answer is correct.",
                question.rubrics_for_extraction, question.rubrics_for_evaluation
            ),
        ),
    }
}

/// 评分反馈
///
/// 无关解法附带分类理由
pub fn feedback(
    variant: GradingVariant,
    question: &QuestionSpec,
    content_analysis: &str,
    reason_for_classification: Option<&str>,
) -> Prompt {
    let system = match variant {
        GradingVariant::Textual => system::FEEDBACK_TEXTUAL,
        _ => system::FEEDBACK_NUMERICAL,
    };

    let partial = if question.partial_marks_allowed {
        "Partial marks are allowed."
    } else {
        "Partial marks are NOT allowed: award either full or zero marks for each criterion."
    };

    let instructions = match variant {
        GradingVariant::NumericalStandard => {
            "Grade each step from the content analysis against the standard solution.".to_string()
        }
        GradingVariant::NumericalAlternative => {
            "The student used an acceptable alternative method. Grade each of the student's steps on its own \
             merit; do not penalise for departing from the standard method."
                .to_string()
        }
        GradingVariant::NumericalIrrelevant => format!(
            "The student's approach was classified as irrelevant: {}\n\
             Use at most one criterion and explain in the overall feedback why the solution is incorrect.",
            reason_for_classification.unwrap_or_default()
        ),
        GradingVariant::Textual => {
            "Grade each criterion of the golden standard solution using the content analysis.".to_string()
        }
    };

    let user = format!(
        "{}\nMAXIMUM MARKS: {}\n{}\n\nCONTENT ANALYSIS:\n{}\n\n{}",
        context_header(question),
        question.max_marks,
        partial,
        content_analysis,
        instructions
    );
    Prompt::new(system, user)
}

/// 能力点评估
pub fn value_points(question: &QuestionSpec, content_analysis: &str) -> Prompt {
    let user = format!(
        "{}\nMAXIMUM MARKS: {}\n\nCONTENT ANALYSIS:\n{}\n\nAssess the three competency dimensions.",
        context_header(question),
        question.max_marks,
        content_analysis
    );
    Prompt::new(system::VALUE_POINTS, user)
}

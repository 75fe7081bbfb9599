use serde::{Deserialize, Serialize};

use crate::models::question::{QuestionSpec, StudentAnswer};

/// 题库文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

impl QuestionBank {
    /// 按 ID 查找题目
    pub fn find(&self, question_id: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// 一份学生提交（对应 submissions 目录下的一个 TOML 文件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub question_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(flatten)]
    pub answer: StudentAnswer,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl Submission {
    /// 用于日志和报告的提交标识
    ///
    /// 优先使用学生 ID，其次使用文件名
    pub fn label(&self) -> String {
        if let Some(student_id) = &self.student_id {
            return format!("{}/{}", student_id, self.question_id);
        }
        self.file_path
            .as_deref()
            .and_then(|p| std::path::Path::new(p).file_stem())
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| self.question_id.clone())
    }

    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

use thiserror::Error;

use crate::workflow::Stage;

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// LLM 生成错误
///
/// 由 [`crate::clients::Generator`] 的实现返回，步骤层会把它转换成 [`StepFailure`]。
#[derive(Debug, Error)]
pub enum GenerationError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 模型不在价格表中
    #[error("模型 {model} 没有价格配置，拒绝调用")]
    UnpricedModel { model: String },
    /// 结构化输出无法解析为 JSON
    #[error("结构化输出解析失败 (模型: {model}): {source}")]
    InvalidStructuredOutput {
        model: String,
        #[source]
        source: serde_json::Error,
    },
    /// 构建请求失败
    #[error("构建LLM请求失败: {0}")]
    RequestBuild(String),
}

impl GenerationError {
    /// 创建 API 调用失败错误
    pub fn api_call_failed(
        model: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        GenerationError::ApiCallFailed {
            model: model.into(),
            source: source.into(),
        }
    }
}

/// 评分请求校验错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// 手写答案但没有图片
    #[error("handwritten answer has no image references")]
    MissingAnswerImages,
    /// 满分不合法
    #[error("max marks must be a positive number, got {0}")]
    InvalidMaxMarks(f64),
}

/// 单个步骤失败
///
/// 唯一会出现在 `GradingResponse.error_message` 中的错误，
/// 消息以失败步骤的名称开头。
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{stage} failed: {message}")]
pub struct StepFailure {
    pub stage: Stage,
    pub message: String,
}

impl StepFailure {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

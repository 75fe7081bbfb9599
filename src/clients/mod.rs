//! 生成能力 - 基础设施层
//!
//! 对流程层只暴露两种能力：
//! - 非结构化生成：提示词 + 可选图片 → 文本
//! - 结构化生成：提示词 + schema → 符合 schema 的 JSON
//!
//! 两者都返回 token 数和按价格表计算的费用

pub mod llm_client;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;
pub mod pricing;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::GenerationError;
use crate::models::OutputSchema;

pub use llm_client::LlmClient;
pub use pricing::{price_for, ModelPrice};

/// 默认最大输出 token 数
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4048;
/// 默认采样温度
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// 一次生成请求
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// 调用方标识（步骤名，仅用于日志）
    pub label: &'static str,
    pub model: String,
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    /// 图片 URL，会放在提示词之前
    pub images: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(label: &'static str, model: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            label,
            model: model.into(),
            system_prompt: None,
            user_prompt: user_prompt.into(),
            images: Vec::new(),
            max_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

/// token 用量与费用
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// 美元
    pub cost: f64,
}

impl Usage {
    pub fn new(input_tokens: u64, output_tokens: u64, cost: f64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            cost,
        }
    }

    /// 按模型价格计算费用
    pub fn priced(input_tokens: u64, output_tokens: u64, price: ModelPrice) -> Self {
        Self::new(input_tokens, output_tokens, price.cost(input_tokens, output_tokens))
    }
}

impl std::ops::AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        self.input_tokens += rhs.input_tokens;
        self.output_tokens += rhs.output_tokens;
        self.cost += rhs.cost;
    }
}

/// 一次成功生成的结果
#[derive(Debug, Clone)]
pub struct Generation<T> {
    pub content: T,
    pub usage: Usage,
    /// 实际使用的模型
    pub model: String,
}

/// 生成能力
///
/// 实现方负责调用模型、统计 token 和计算费用；
/// 不做任何自动重试，失败直接返回错误。
#[async_trait]
pub trait Generator: Send + Sync {
    /// 非结构化生成
    async fn generate(&self, request: GenerationRequest) -> Result<Generation<String>, GenerationError>;

    /// 结构化生成，返回值符合 `schema`
    async fn generate_structured(
        &self,
        request: GenerationRequest,
        schema: &OutputSchema,
    ) -> Result<Generation<JsonValue>, GenerationError>;
}

//! LLM 客户端 - 基础设施层
//!
//! 基于 `async-openai` 实现 [`Generator`]，兼容 OpenAI API 的服务
//! （默认是 Gemini 的 OpenAI 兼容端点）都可以使用。

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs,
        ImageDetail, ImageUrl, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::clients::{price_for, Generation, GenerationRequest, Generator, Usage};
use crate::config::Config;
use crate::error::GenerationError;
use crate::models::OutputSchema;

/// LLM 客户端
///
/// 职责：
/// - 组装消息（系统消息、图片、用户消息）并调用 API
/// - 统计 token、按价格表计算费用
/// - 不关心评分流程，不做重试
pub struct LlmClient {
    client: Client<OpenAIConfig>,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
        }
    }

    /// 构建消息列表
    ///
    /// 有图片时使用 Vision 格式，图片放在文字之前
    fn build_messages(
        request: &GenerationRequest,
    ) -> Result<Vec<ChatCompletionRequestMessage>, GenerationError> {
        let mut messages = Vec::new();

        if let Some(sys_msg) = &request.system_prompt {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg.as_str())
                .build()
                .map_err(|e| GenerationError::RequestBuild(e.to_string()))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg_result = if request.images.is_empty() {
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user_prompt.as_str())
                .build()
        } else {
            let mut content_parts: Vec<ChatCompletionRequestUserMessageContentPart> = request
                .images
                .iter()
                .map(|url| {
                    ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: url.clone(),
                                detail: Some(ImageDetail::High),
                            },
                        },
                    )
                })
                .collect();

            content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: request.user_prompt.clone(),
                },
            ));

            debug!("使用 Vision API，包含 {} 张图片", request.images.len());

            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
                .build()
        };
        let user_msg =
            user_msg_result.map_err(|e| GenerationError::RequestBuild(e.to_string()))?;

        messages.push(ChatCompletionRequestMessage::User(user_msg));
        Ok(messages)
    }

    /// 通用的调用函数，两种生成能力都基于它
    async fn complete(
        &self,
        request: &GenerationRequest,
        response_format: Option<ResponseFormat>,
    ) -> Result<Generation<String>, GenerationError> {
        // 没有价格的模型不调用，避免产生无法统计的费用
        let price = price_for(&request.model).ok_or_else(|| GenerationError::UnpricedModel {
            model: request.model.clone(),
        })?;

        debug!(
            "[{}] 调用 LLM API，模型: {}，提示词长度: {} 字符",
            request.label,
            request.model,
            request.user_prompt.len()
        );

        let messages = Self::build_messages(request)?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens);
        if let Some(format) = response_format {
            args.response_format(format);
        }
        let chat_request = args
            .build()
            .map_err(|e| GenerationError::RequestBuild(e.to_string()))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("[{}] LLM API 调用失败: {}", request.label, e);
            GenerationError::api_call_failed(&request.model, e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::EmptyContent {
                model: request.model.clone(),
            })?;

        // 输出 token 按 total - prompt 计算，思考 token 也计入输出
        let (input_tokens, output_tokens) = match &response.usage {
            Some(usage) => (
                u64::from(usage.prompt_tokens),
                u64::from(usage.total_tokens.saturating_sub(usage.prompt_tokens)),
            ),
            None => {
                warn!("[{}] LLM 响应缺少 usage 信息，按 0 计费", request.label);
                (0, 0)
            }
        };
        let usage = Usage::priced(input_tokens, output_tokens, price);

        debug!(
            "[{}] LLM API 调用成功: 输入 {} / 输出 {} token，费用 ${:.6}",
            request.label, usage.input_tokens, usage.output_tokens, usage.cost
        );

        Ok(Generation {
            content: content.trim().to_string(),
            usage,
            model: request.model.clone(),
        })
    }
}

#[async_trait]
impl Generator for LlmClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation<String>, GenerationError> {
        self.complete(&request, None).await
    }

    async fn generate_structured(
        &self,
        request: GenerationRequest,
        schema: &OutputSchema,
    ) -> Result<Generation<JsonValue>, GenerationError> {
        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some(schema.description.to_string()),
                name: schema.name.to_string(),
                schema: Some(schema.schema.clone()),
                strict: None,
            },
        };

        let generation = self.complete(&request, Some(response_format)).await?;
        let content = parse_json_content(&generation.content).map_err(|source| {
            GenerationError::InvalidStructuredOutput {
                model: generation.model.clone(),
                source,
            }
        })?;

        Ok(Generation {
            content,
            usage: generation.usage,
            model: generation.model,
        })
    }
}

/// 解析结构化输出
///
/// 部分模型会用 ```json 代码块包裹输出，先去掉再解析
fn parse_json_content(content: &str) -> Result<JsonValue, serde_json::Error> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced.trim())
}

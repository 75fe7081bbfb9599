//! 可编排的生成能力，用于测试
//!
//! 按顺序返回预先设定的回复，并记录每一次调用

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::clients::{Generation, GenerationRequest, Generator, Usage};
use crate::error::GenerationError;
use crate::models::OutputSchema;

/// 预设回复
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String, Usage),
    Structured(JsonValue, Usage),
    Error(String),
}

impl MockReply {
    pub fn text(content: impl Into<String>, usage: Usage) -> Self {
        MockReply::Text(content.into(), usage)
    }

    pub fn structured(content: JsonValue, usage: Usage) -> Self {
        MockReply::Structured(content, usage)
    }

    pub fn error(message: impl Into<String>) -> Self {
        MockReply::Error(message.into())
    }
}

/// 一次被记录的调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub label: &'static str,
    pub model: String,
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub images: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// 结构化调用时的 schema 名称
    pub schema_name: Option<&'static str>,
}

pub struct MockGenerator {
    replies: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let mock = Self::new();
        mock.add_replies(replies);
        mock
    }

    pub fn add_reply(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn add_replies(&self, replies: impl IntoIterator<Item = MockReply>) {
        let mut queue = self.replies.lock().unwrap();
        queue.extend(replies);
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// 某个步骤被调用的次数
    pub fn calls_for(&self, label: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.label == label)
            .count()
    }

    fn record(&self, request: &GenerationRequest, schema_name: Option<&'static str>) {
        self.calls.lock().unwrap().push(RecordedCall {
            label: request.label,
            model: request.model.clone(),
            system_prompt: request.system_prompt.clone(),
            user_prompt: request.user_prompt.clone(),
            images: request.images.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            schema_name,
        });
    }

    fn next_reply(&self, model: &str) -> Result<MockReply, GenerationError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GenerationError::api_call_failed(model, "mock reply queue exhausted"))
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation<String>, GenerationError> {
        self.record(&request, None);
        match self.next_reply(&request.model)? {
            MockReply::Text(content, usage) => Ok(Generation {
                content,
                usage,
                model: request.model,
            }),
            MockReply::Structured(..) => Err(GenerationError::api_call_failed(
                request.model,
                "structured reply queued for a text call",
            )),
            MockReply::Error(message) => Err(GenerationError::api_call_failed(request.model, message)),
        }
    }

    async fn generate_structured(
        &self,
        request: GenerationRequest,
        schema: &OutputSchema,
    ) -> Result<Generation<JsonValue>, GenerationError> {
        self.record(&request, Some(schema.name));
        match self.next_reply(&request.model)? {
            MockReply::Structured(content, usage) => Ok(Generation {
                content,
                usage,
                model: request.model,
            }),
            MockReply::Text(..) => Err(GenerationError::api_call_failed(
                request.model,
                "text reply queued for a structured call",
            )),
            MockReply::Error(message) => Err(GenerationError::api_call_failed(request.model, message)),
        }
    }
}

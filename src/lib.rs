//! # Smart Grading
//!
//! 基于多步 LLM 流程的自动评分程序：
//! 提取答案 → 解题路径分类 → 内容分析 → 评分反馈 → 分数校验（最多重跑一次）→ 能力点评估
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 生成能力，只暴露"生成文本 / 生成结构化数据"
//! - `Generator` - 生成能力 trait，返回 token 数和费用
//! - `LlmClient` - 基于 async-openai 的实现
//!
//! ### ② 模型与提示词（Models / Prompts）
//! - `models/` - 评分请求、评分结果、结构化输出 schema、TOML 加载
//! - `prompts/` - 各步骤的系统提示词与用户提示词
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份作答"的完整评分流程
//! - `GradingState` - 单次评分的状态，由驱动器独占
//! - `GradingFlow` - 流程驱动（含唯一一条重新评分的回边）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量评分，管理并发
//! - `orchestrator/submission_processor` - 单份提交：查题 → 评分 → 写报告
//! - `services/` - 报告写入能力
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod services;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{Generator, LlmClient, Usage};
pub use config::Config;
pub use error::StepFailure;
pub use models::{GradingRequest, GradingResponse, QuestionSpec, StudentAnswer};
pub use orchestrator::{App, RunStats};
pub use workflow::{GradingFlow, GradingState, Stage};

//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量评分和调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量评分处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载题库和所有提交（Vec<Submission>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息（含累计费用）
//!
//! ### `submission_processor` - 单份提交处理器
//! - 查找题目并构建评分请求
//! - 执行一次评分流程
//! - 写入评分报告
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Submission>)
//!     ↓
//! submission_processor (处理单份 Submission)
//!     ↓
//! workflow::GradingFlow (一次评分：提取 → 分类 → 分析 → 评分 → 校验 → 能力点)
//!     ↓
//! clients (基础设施：Generator / LlmClient)
//! ```

pub mod batch_processor;
pub mod submission_processor;

// 重新导出主要类型
pub use batch_processor::{App, RunStats};
pub use submission_processor::{process_submission, SubmissionOutcome};

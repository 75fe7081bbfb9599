use std::str::FromStr;

use crate::error::ConfigError;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时评分的提交数量
    pub max_concurrent_submissions: usize,
    /// 题库 TOML 文件
    pub question_bank_file: String,
    /// 学生提交 TOML 文件存放目录
    pub submissions_folder: String,
    /// 评分结果输出文件（每行一个 JSON）
    pub output_report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_max_output_tokens: u32,
    pub llm_temperature: f32,
    // --- 模型分级 ---
    pub baseline_model: String,
    pub mid_model: String,
    pub top_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_submissions: 4,
            question_bank_file: "questions.toml".to_string(),
            submissions_folder: "submissions".to_string(),
            output_report_file: "grading_report.jsonl".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_max_output_tokens: 4048,
            llm_temperature: 0.1,
            baseline_model: "gemini-2.0-flash".to_string(),
            mid_model: "gemini-2.5-flash".to_string(),
            top_model: "gemini-2.5-pro".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            max_concurrent_submissions: parse_env("MAX_CONCURRENT_SUBMISSIONS", "usize")?
                .unwrap_or(default.max_concurrent_submissions)
                .max(1),
            question_bank_file: std::env::var("QUESTION_BANK_FILE").unwrap_or(default.question_bank_file),
            submissions_folder: std::env::var("SUBMISSIONS_FOLDER").unwrap_or(default.submissions_folder),
            output_report_file: std::env::var("OUTPUT_REPORT_FILE").unwrap_or(default.output_report_file),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_max_output_tokens: parse_env("LLM_MAX_OUTPUT_TOKENS", "u32")?
                .unwrap_or(default.llm_max_output_tokens),
            llm_temperature: parse_env("LLM_TEMPERATURE", "f32")?.unwrap_or(default.llm_temperature),
            baseline_model: std::env::var("BASELINE_MODEL").unwrap_or(default.baseline_model),
            mid_model: std::env::var("MID_MODEL").unwrap_or(default.mid_model),
            top_model: std::env::var("TOP_MODEL").unwrap_or(default.top_model),
        })
    }

    /// 确认 API 密钥已配置
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            });
        }
        Ok(&self.llm_api_key)
    }
}

/// 读取并解析环境变量，未设置时返回 `None`
fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

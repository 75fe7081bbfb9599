//! 模型价格表
//!
//! 价格单位：美元 / 百万 token

use phf::phf_map;

/// 单个模型的价格
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrice {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPrice {
    /// 费用 = 输入 token × 输入单价 + 输出 token × 输出单价
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        input_tokens as f64 * (self.input_per_million / 1_000_000.0)
            + output_tokens as f64 * (self.output_per_million / 1_000_000.0)
    }
}

static MODEL_PRICES: phf::Map<&'static str, ModelPrice> = phf_map! {
    "gemini-2.0-flash" => ModelPrice { input_per_million: 0.10, output_per_million: 0.40 },
    "gemini-2.5-flash" => ModelPrice { input_per_million: 0.30, output_per_million: 2.50 },
    "gemini-2.5-pro" => ModelPrice { input_per_million: 1.25, output_per_million: 10.00 },
};

/// 查询模型价格，不在价格表中的模型返回 `None`
pub fn price_for(model: &str) -> Option<ModelPrice> {
    MODEL_PRICES.get(model).copied()
}

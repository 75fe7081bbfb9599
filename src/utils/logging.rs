use anyhow::{Context, Result};
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 `debug` 或 `info`。
/// 重复调用是安全的（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化评分报告文件
///
/// # 参数
/// - `report_file_path`: 报告文件路径
pub fn init_report_file(report_file_path: &str) -> Result<()> {
    // 首行也是 JSON，保证整个文件可按行解析
    let header = format!(
        "{}\n",
        serde_json::json!({
            "report": "smart-grading",
            "started_at": chrono::Local::now().to_rfc3339(),
        })
    );
    fs::write(report_file_path, header)
        .with_context(|| format!("无法初始化报告文件: {}", report_file_path))?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 最大并发数
pub fn log_startup(max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 自动评分模式");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录提交加载信息
pub fn log_submissions_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 份待评分的提交", total);
    info!("📋 将以每批 {} 份的方式处理", max_concurrent);
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始提交编号
/// - `end`: 结束提交编号
/// - `total`: 提交总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批提交: {}-{} / 共 {} 份", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `total_cost`: 累计费用（美元）
/// - `report_file_path`: 报告文件路径
pub fn print_final_stats(
    success: usize,
    failed: usize,
    total: usize,
    total_cost: f64,
    report_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部评分完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("💰 累计费用: ${:.6}", total_cost);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

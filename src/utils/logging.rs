/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use crate::config::Config;
use crate::models::question::ExtractedTest;
use crate::orchestrator::RunStats;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// 初始化日志：终端 + 追加写入日志文件
///
/// # 参数
/// - `verbose`: 是否输出 debug 级别日志（`RUST_LOG` 优先）
/// - `log_file_path`: 日志文件路径
pub fn init(verbose: bool, log_file_path: &str) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("日志系统已初始化")?;
    Ok(())
}

/// 初始化日志文件（写入文件头）
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n试卷抽取日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - PDF 试题批量抽取模式");
    info!("📊 每批并发页数: {}", config.page_batch_size);
    info!("{}", "=".repeat(60));
}

/// 记录文件加载信息
pub fn log_files_loaded(total: usize, batch_size: usize) {
    info!("✓ 找到 {} 个待处理的PDF文件", total);
    info!("📋 文件逐个处理，每个文件内以每批 {} 页的方式处理", batch_size);
    info!("💡 每批完成后再开始下一批\n");
}

/// 记录文件开始处理
pub fn log_file_start(file_index: u64, file_name: &str, page_count: usize, content_pages: usize) {
    info!("\n{}", "=".repeat(60));
    info!("[文件 {}] 开始处理: {}", file_index, truncate_text(file_name, 60));
    info!(
        "[文件 {}] 总页数: {}，内容页: {}（跳过首页）",
        file_index, page_count, content_pages
    );
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
pub fn log_batch_start(file_index: u64, batch_num: usize, total_batches: usize, pages: &[usize]) {
    info!(
        "[文件 {}] 📦 第 {}/{} 批，页码: {:?}",
        file_index, batch_num, total_batches, pages
    );
}

/// 记录批次完成信息
pub fn log_batch_complete(file_index: u64, batch_num: usize, success: usize, total: usize) {
    info!(
        "[文件 {}] ✓ 第 {} 批完成: 成功 {}/{}",
        file_index, batch_num, success, total
    );
}

/// 记录文件完成信息
pub fn log_file_complete(file_index: u64, test: &ExtractedTest) {
    info!("\n{}", "─".repeat(60));
    info!(
        "[文件 {}] 题目统计: 抽取 {}, 答案未知 {}",
        file_index,
        test.questions.len(),
        test.unknown_count()
    );
    info!("[文件 {}] ✅ 文件处理完成", file_index);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &RunStats, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.completed, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("📝 题目总数: {}", stats.questions);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

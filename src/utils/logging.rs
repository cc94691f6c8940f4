/// 日志工具模块
///
/// 提供日志初始化以及面向操作者的格式化输出
use crate::config::Config;
use crate::models::{AttendanceStatus, AttendanceSummary};
use crate::services::Thresholds;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先读取 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info 级别。
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

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 出勤查询程序启动");
    info!("🌐 登录页: {}", config.login_url);
    info!(
        "📊 阈值: 良好 ≥{}%, 警告 ≥{}%",
        config.good_threshold, config.warning_threshold
    );
    info!("{}", "=".repeat(60));
}

/// 提示操作者手动完成登录
pub fn log_login_instructions() {
    info!("请手动完成以下步骤:");
    info!("  1. 输入 College ID");
    info!("  2. 输入出生日期 (Date of Birth)");
    info!("  3. 完成验证码 (CAPTCHA)");
    info!("  4. 点击 Login 按钮");
}

/// 打印汇总结果
pub fn log_summary(summary: &AttendanceSummary, thresholds: &Thresholds) {
    info!("\n{}", "=".repeat(60));
    info!("📊 出勤统计结果");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));

    info!("各科明细:");
    for subject in &summary.subjects {
        info!(
            "  科目 {}: {}/{} ({:.2}%)",
            subject.index, subject.attended, subject.conducted, subject.percentage
        );
    }

    info!("{}", "─".repeat(60));
    info!("总出勤率: {:.2}%", summary.overall_percentage);
    info!("总开课数: {}", summary.total_conducted);
    info!("总出勤数: {}", summary.total_attended);

    let good = thresholds.good();
    let warning = thresholds.warning();
    match summary.status {
        AttendanceStatus::Good => info!("✅ 出勤状态: GOOD (≥{}%)", good),
        AttendanceStatus::Warning => {
            warn!("⚠️ 出勤状态: WARNING ({}-{}%)", warning, good - 1.0)
        }
        AttendanceStatus::Critical => warn!("❌ 出勤状态: CRITICAL (<{}%)", warning),
    }
    info!("{}", "=".repeat(60));
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

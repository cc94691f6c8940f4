//! 应用生命周期 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：获取浏览器会话、创建 JsExecutor
//! 2. **人工登录**：打开登录页，等待登录完成并由操作者确认
//! 3. **提取与汇总**：打开出勤页，委托 extraction 逐行提取，再交给汇总服务
//! 4. **资源管理**：唯一持有 BrowserSession，无论结果如何都经由 `shutdown` 释放

use anyhow::Result;
use std::future::Future;
use std::process::ExitCode;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::browser::{self, BrowserSession};
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::wait::{wait_for_element, wait_for_url_without};
use crate::infrastructure::{JsExecutor, OperatorPrompt, PageSession, StdinPrompt};
use crate::models::{AttendanceSummary, SummaryOutcome};
use crate::orchestrator::extraction::extract_attendance;
use crate::services::{summarize, Thresholds};
use crate::utils::logging::{log_login_instructions, log_summary};
use crate::workflow::RowFlow;

/// 页面就绪判定所用的元素
const PAGE_READY_XPATH: &str = "//body";

/// 一次运行的结局
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// 得到了汇总结果
    Completed(AttendanceSummary),
    /// 页面上找不到任何可展开的行
    NoRowsDiscovered,
    /// 找到了行，但没有任何一行提取成功
    NoRecords,
    /// 操作者中断
    Interrupted,
}

impl RunOutcome {
    /// 没有提取到数据视为失败；操作者中断属于正常退出
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed(_) | RunOutcome::Interrupted)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    session: BrowserSession,
    executor: JsExecutor,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let session = browser::acquire_session(&config).await?;

        // 创建 JsExecutor（持有 page）
        // chromiumoxide 的 Page 内部使用 Arc，可以安全地 clone
        let executor = JsExecutor::new(session.page().clone());

        Ok(Self {
            config,
            session,
            executor,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunOutcome> {
        run_checker(&self.executor, &self.config, &StdinPrompt).await
    }

    /// 释放浏览器会话
    pub async fn shutdown(self) {
        drop(self.executor);
        self.session.release().await;
    }
}

/// 执行 `work`，`interrupt` 先完成时放弃并返回 `None`
///
/// 被放弃的 `work` 会被立即 drop，其中已获取的资源随之释放。
pub async fn until_interrupted<F, I>(work: F, interrupt: I) -> Option<F::Output>
where
    F: Future,
    I: Future<Output = ()>,
{
    tokio::select! {
        biased;
        output = work => Some(output),
        _ = interrupt => None,
    }
}

/// 完整的查询流程：登录 → 出勤页 → 提取 → 汇总
pub async fn run_checker<S, O>(session: &S, config: &Config, operator: &O) -> Result<RunOutcome>
where
    S: PageSession,
    O: OperatorPrompt,
{
    let thresholds = Thresholds::new(config.warning_threshold, config.good_threshold)?;

    navigate_to_login(session, config).await?;
    wait_for_manual_login(session, config, operator).await?;
    navigate_to_attendance_page(session, config).await?;

    info!("\n正在提取出勤数据...");
    sleep(config.page_settle_delay()).await;
    log_page_identity(session).await;

    let flow = RowFlow::new(config);
    let report = extract_attendance(session, &flow).await;

    if report.no_rows_discovered() {
        warn!("⚠️ 没有找到任何科目行，请检查页面结构并更新 PLUS_ICON_XPATH");
        return Ok(RunOutcome::NoRowsDiscovered);
    }

    match summarize(&report.records, &thresholds) {
        SummaryOutcome::Computed(summary) => {
            log_summary(&summary, &thresholds);
            Ok(RunOutcome::Completed(summary))
        }
        SummaryOutcome::Empty => {
            error!("❌ 没有成功提取任何出勤数据");
            Ok(RunOutcome::NoRecords)
        }
    }
}

async fn navigate_to_login<S: PageSession>(session: &S, config: &Config) -> Result<()> {
    info!("正在打开登录页...");
    session.navigate(&config.login_url).await?;
    info!("✓ 已打开: {}", config.login_url);
    log_login_instructions();
    Ok(())
}

async fn wait_for_manual_login<S, O>(session: &S, config: &Config, operator: &O) -> Result<()>
where
    S: PageSession,
    O: OperatorPrompt,
{
    info!("\n等待人工登录完成...");
    if wait_for_url_without(session, &config.login_url_marker, config.wait_timeout()).await {
        info!("✓ 检测到登录成功");
    } else {
        warn!("⚠️ 登录检测超时，继续执行...");
    }

    operator
        .confirm("登录完成并准备好继续后，请按回车...")
        .await
}

async fn navigate_to_attendance_page<S: PageSession>(session: &S, config: &Config) -> Result<()> {
    info!("\n正在打开课程出勤页...");
    session.navigate(&config.attendance_url).await?;

    if wait_for_element(session, PAGE_READY_XPATH, config.wait_timeout()).await {
        info!("✓ 出勤页加载完成");
    } else {
        warn!("⚠️ 页面加载超时，继续执行...");
    }
    Ok(())
}

async fn log_page_identity<S: PageSession>(session: &S) {
    match session.current_url().await {
        Ok(url) => info!("当前页面 URL: {}", url),
        Err(e) => warn!("读取页面 URL 失败: {}", e),
    }
    match session.title().await {
        Ok(title) => info!("页面标题: {}", title),
        Err(e) => warn!("读取页面标题失败: {}", e),
    }
}

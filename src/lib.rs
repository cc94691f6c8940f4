//! # Attendance Checker
//!
//! 驱动浏览器打开学生门户，等待人工登录后自动展开每个科目行，
//! 读取开课数与出勤数并汇总成总出勤率。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! 各层共用的数据类型（出勤记录、策略、`RowCtx` 行上下文）放在 `models/`。
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageSession` - 查询 / 点击 / 导航能力的抽象
//! - `JsExecutor` - 唯一的 page owner，通过 eval() 实现 `PageSession`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个行或单个字段
//! - `RowExpander` - 发现并展开科目行
//! - `FieldExtractor` - 按策略链提取字段
//! - `aggregator` - 出勤率汇总与状态判定
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个科目行"的完整处理流程
//! - `RowFlow` - 流程编排（展开 → conducted → attended → 记录）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用生命周期，管理浏览器资源
//! - `orchestrator/extraction` - 遍历所有科目行，隔离单行故障
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{JsExecutor, PageSession};
pub use models::{
    AttendanceRecord, AttendanceSummary, ExtractionOutcome, RowCtx, SummaryOutcome,
};
pub use orchestrator::{App, RunOutcome};
pub use workflow::RowFlow;

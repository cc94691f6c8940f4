//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用生命周期
//! - 获取与释放浏览器会话
//! - 登录 → 出勤页 → 提取 → 汇总
//!
//! ### `extraction` - 批量行处理
//! - 发现科目行
//! - 逐行委托 RowFlow，隔离单行故障
//!
//! ## 层次关系
//!
//! ```text
//! app (一次运行)
//!     ↓
//! extraction (处理 Vec<RowCtx>)
//!     ↓
//! workflow::RowFlow (处理单个科目行)
//!     ↓
//! services (能力层：展开 / 提取 / 汇总)
//!     ↓
//! infrastructure (基础设施：JsExecutor)
//! ```

pub mod app;
pub mod extraction;

// 重新导出主要类型
pub use app::{run_checker, until_interrupted, App, RunOutcome};
pub use extraction::{extract_attendance, ExtractionReport, SkippedRow};

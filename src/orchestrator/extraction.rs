//! 批量行处理 - 编排层
//!
//! ## 职责
//!
//! 发现所有科目行，按发现顺序逐行委托 `RowFlow` 处理，并把结果汇总成一个
//! 不可变的 `ExtractionReport` 返回给调用方。
//!
//! ## 设计特点
//!
//! - **故障隔离**：单行的任何失败都在行边界被吸收，不会中断整批
//! - **无隐藏状态**：结果通过返回值传递，不使用共享的累积列表

use tracing::{debug, error, info};

use crate::infrastructure::PageSession;
use crate::models::AttendanceRecord;
use crate::services::ElementSnapshot;
use crate::workflow::{RowFlow, RowResult, SkipReason};

/// 被跳过的行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRow {
    pub subject_index: usize,
    pub reason: SkipReason,
}

/// 一次提取的完整结果
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// 发现的行数
    pub discovered: usize,
    /// 成功记录（按发现顺序）
    pub records: Vec<AttendanceRecord>,
    pub skipped: Vec<SkippedRow>,
    /// 没有发现任何行时的页面诊断信息
    pub diagnostics: Vec<ElementSnapshot>,
}

impl ExtractionReport {
    pub fn no_rows_discovered(&self) -> bool {
        self.discovered == 0
    }
}

/// 提取阶段（仅用于调试日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionPhase {
    Discovering,
    PerRow,
    Done,
}

/// 提取所有科目行的出勤数据
pub async fn extract_attendance<S: PageSession>(session: &S, flow: &RowFlow) -> ExtractionReport {
    debug!("提取阶段: {:?}", ExtractionPhase::Discovering);
    let discovery = flow.expander().discover_rows(session).await;

    if discovery.is_empty() {
        debug!("提取阶段: {:?}", ExtractionPhase::Done);
        return ExtractionReport {
            diagnostics: discovery.diagnostics,
            ..Default::default()
        };
    }

    info!("共发现 {} 个科目待处理", discovery.rows.len());
    debug!("提取阶段: {:?}", ExtractionPhase::PerRow);

    let mut report = ExtractionReport {
        discovered: discovery.rows.len(),
        ..Default::default()
    };

    for row in &discovery.rows {
        match flow.run(session, row).await {
            Ok(RowResult::Recorded(record)) => report.records.push(record),
            Ok(RowResult::Skipped(reason)) => report.skipped.push(SkippedRow {
                subject_index: row.subject_index,
                reason,
            }),
            Err(e) => {
                error!("[科目 #{}] ❌ 处理出错: {:#}", row.subject_index, e);
                report.skipped.push(SkippedRow {
                    subject_index: row.subject_index,
                    reason: SkipReason::Failed,
                });
            }
        }
    }

    debug!("提取阶段: {:?}", ExtractionPhase::Done);
    info!(
        "✓ 提取完成: 成功 {}/{}，跳过 {}",
        report.records.len(),
        report.discovered,
        report.skipped.len()
    );
    report
}

//! 单行处理流程 - 流程层
//!
//! 核心职责：定义"一个科目行"的完整处理流程
//!
//! 流程顺序：
//! 1. 乐观展开
//! 2. 提取 conducted
//! 3. 提取 attended
//! 4. 两者都找到才记录

use anyhow::Result;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::PageSession;
use crate::models::{AttendanceRecord, ExtractionOutcome, Field, RowCtx};
use crate::services::{FieldExtractor, RowExpander};

/// 单行处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowResult {
    /// 两个字段都提取成功
    Recorded(AttendanceRecord),
    /// 跳过
    Skipped(SkipReason),
}

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ConductedNotFound,
    AttendedNotFound,
    BothNotFound,
    /// 处理过程中出现意外错误（例如行元素已失效）
    Failed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::ConductedNotFound => "未找到 conducted",
            SkipReason::AttendedNotFound => "未找到 attended",
            SkipReason::BothNotFound => "conducted 与 attended 均未找到",
            SkipReason::Failed => "处理出错",
        };
        f.write_str(text)
    }
}

/// 行处理阶段（仅用于调试日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPhase {
    Expanding,
    ExtractingConducted,
    ExtractingAttended,
    Recording,
}

/// 单行处理流程
///
/// - 编排展开与两次字段提取
/// - 不持有任何资源（page）
/// - 只依赖业务能力（services）
pub struct RowFlow {
    expander: RowExpander,
    extractor: FieldExtractor,
}

impl RowFlow {
    /// 创建新的行处理流程
    pub fn new(config: &Config) -> Self {
        Self::with_services(
            RowExpander::new(&config.selectors, config.interaction_delay()),
            FieldExtractor::new(config.selectors.strategy_table()),
        )
    }

    pub fn with_services(expander: RowExpander, extractor: FieldExtractor) -> Self {
        Self {
            expander,
            extractor,
        }
    }

    pub fn expander(&self) -> &RowExpander {
        &self.expander
    }

    /// 处理一行
    ///
    /// 字段缺失是正常的跳过结果；只有浏览器层面的意外故障才返回错误。
    pub async fn run<S: PageSession>(&self, session: &S, ctx: &RowCtx) -> Result<RowResult> {
        info!("{} 正在处理...", ctx);

        log_phase(ctx, RowPhase::Expanding);
        self.expander.expand(session, ctx).await?;

        log_phase(ctx, RowPhase::ExtractingConducted);
        let conducted = self.extractor.extract(session, Field::Conducted, ctx).await;

        log_phase(ctx, RowPhase::ExtractingAttended);
        let attended = self.extractor.extract(session, Field::Attended, ctx).await;

        let result = match (conducted, attended) {
            (ExtractionOutcome::Found(c), ExtractionOutcome::Found(a)) => {
                log_phase(ctx, RowPhase::Recording);
                RowResult::Recorded(AttendanceRecord::new(ctx.subject_index, c, a))
            }
            (ExtractionOutcome::NotFound, ExtractionOutcome::Found(_)) => {
                RowResult::Skipped(SkipReason::ConductedNotFound)
            }
            (ExtractionOutcome::Found(_), ExtractionOutcome::NotFound) => {
                RowResult::Skipped(SkipReason::AttendedNotFound)
            }
            (ExtractionOutcome::NotFound, ExtractionOutcome::NotFound) => {
                RowResult::Skipped(SkipReason::BothNotFound)
            }
        };

        match &result {
            RowResult::Recorded(record) => info!(
                "{} ✓ Conducted={}, Attended={}",
                ctx, record.conducted, record.attended
            ),
            RowResult::Skipped(reason) => warn!("{} ⚠️ 无法提取数据: {}", ctx, reason),
        }

        Ok(result)
    }
}

fn log_phase(ctx: &RowCtx, phase: RowPhase) {
    debug!("{} 阶段: {:?}", ctx, phase);
}

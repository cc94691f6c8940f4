//! 出勤数据模型
//!
//! 所有类型都只在一次运行期间存在于内存中，运行结束即丢弃。

use serde::Serialize;
use std::fmt;

/// 单个科目成功提取后的出勤记录
///
/// 不要求 `attended <= conducted`，门户数据本身可能不一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    /// 科目序号（按发现顺序，从1开始）
    pub subject_index: usize,
    /// 已开课次数
    pub conducted: u32,
    /// 出勤次数
    pub attended: u32,
}

impl AttendanceRecord {
    pub fn new(subject_index: usize, conducted: u32, attended: u32) -> Self {
        Self {
            subject_index,
            conducted,
            attended,
        }
    }
}

/// 单个字段的提取结果
///
/// 找不到是正常结果，不是错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Found(u32),
    NotFound,
}

/// 出勤状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Good,
    Warning,
    Critical,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttendanceStatus::Good => "GOOD",
            AttendanceStatus::Warning => "WARNING",
            AttendanceStatus::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// 单科汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectSummary {
    pub index: usize,
    pub conducted: u32,
    pub attended: u32,
    pub percentage: f64,
}

/// 全部科目的汇总结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub total_conducted: u64,
    pub total_attended: u64,
    pub overall_percentage: f64,
    pub status: AttendanceStatus,
    pub subjects: Vec<SubjectSummary>,
}

/// 汇总结果：要么是真实的统计，要么明确标记为"没有数据"
///
/// 没有数据时绝不返回一个看起来像真实数据的 0%。
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Computed(AttendanceSummary),
    Empty,
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&AttendanceSummary> {
        match self {
            SummaryOutcome::Computed(summary) => Some(summary),
            SummaryOutcome::Empty => None,
        }
    }
}

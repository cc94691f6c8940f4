//! 出勤汇总 - 业务能力层

use crate::error::ConfigError;
use crate::models::{
    AttendanceRecord, AttendanceStatus, AttendanceSummary, SubjectSummary, SummaryOutcome,
};

/// 出勤率：开课数为 0 时返回 0
pub fn percentage(conducted: u64, attended: u64) -> f64 {
    if conducted == 0 {
        0.0
    } else {
        100.0 * attended as f64 / conducted as f64
    }
}

/// 出勤状态阈值，保证 `warning < good`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    warning: f64,
    good: f64,
}

impl Thresholds {
    pub fn new(warning: f64, good: f64) -> Result<Self, ConfigError> {
        if warning < good {
            Ok(Self { warning, good })
        } else {
            Err(ConfigError::InvalidThresholds { warning, good })
        }
    }

    pub fn warning(&self) -> f64 {
        self.warning
    }

    pub fn good(&self) -> f64 {
        self.good
    }

    /// 下界都是闭区间：`>= good` 为良好，`[warning, good)` 为警告
    pub fn classify(&self, percentage: f64) -> AttendanceStatus {
        if percentage >= self.good {
            AttendanceStatus::Good
        } else if percentage >= self.warning {
            AttendanceStatus::Warning
        } else {
            AttendanceStatus::Critical
        }
    }
}

/// 汇总出勤记录
///
/// 没有记录时返回 `SummaryOutcome::Empty`，而不是 0%。
pub fn summarize(records: &[AttendanceRecord], thresholds: &Thresholds) -> SummaryOutcome {
    if records.is_empty() {
        return SummaryOutcome::Empty;
    }

    let total_conducted: u64 = records.iter().map(|r| u64::from(r.conducted)).sum();
    let total_attended: u64 = records.iter().map(|r| u64::from(r.attended)).sum();
    let overall_percentage = percentage(total_conducted, total_attended);

    let subjects = records
        .iter()
        .map(|r| SubjectSummary {
            index: r.subject_index,
            conducted: r.conducted,
            attended: r.attended,
            percentage: percentage(r.conducted.into(), r.attended.into()),
        })
        .collect();

    SummaryOutcome::Computed(AttendanceSummary {
        total_conducted,
        total_attended,
        overall_percentage,
        status: thresholds.classify(overall_percentage),
        subjects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds::new(65.0, 75.0).unwrap()
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(40, 30), 75.0);
        assert_eq!(percentage(3, 1), 100.0 / 3.0);
        // 数据不一致时允许超过 100%
        assert_eq!(percentage(10, 12), 120.0);
    }

    #[test]
    fn test_percentage_zero_conducted() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(0, 5), 0.0);
    }

    #[test]
    fn test_classify() {
        let t = thresholds();
        assert_eq!(t.classify(80.0), AttendanceStatus::Good);
        assert_eq!(t.classify(70.0), AttendanceStatus::Warning);
        assert_eq!(t.classify(50.0), AttendanceStatus::Critical);
    }

    #[test]
    fn test_classify_inclusive_lower_bounds() {
        let t = thresholds();
        assert_eq!(t.classify(75.0), AttendanceStatus::Good);
        assert_eq!(t.classify(65.0), AttendanceStatus::Warning);
        assert_eq!(t.classify(64.99), AttendanceStatus::Critical);
    }

    #[test]
    fn test_thresholds_must_be_ordered() {
        assert!(Thresholds::new(75.0, 65.0).is_err());
        assert!(Thresholds::new(70.0, 70.0).is_err());
    }

    #[test]
    fn test_summarize_empty_is_explicit() {
        assert_eq!(summarize(&[], &thresholds()), SummaryOutcome::Empty);
    }

    #[test]
    fn test_summarize_totals() {
        let records = [
            AttendanceRecord::new(1, 34, 30),
            AttendanceRecord::new(3, 20, 18),
        ];

        let outcome = summarize(&records, &thresholds());
        let summary = outcome.summary().unwrap();

        assert_eq!(summary.total_conducted, 54);
        assert_eq!(summary.total_attended, 48);
        assert!((summary.overall_percentage - 88.89).abs() < 0.01);
        assert_eq!(summary.status, AttendanceStatus::Good);
        assert_eq!(summary.subjects.len(), 2);
        assert_eq!(summary.subjects[1].index, 3);
        assert!((summary.subjects[1].percentage - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_zero_conducted_subject() {
        let records = [
            AttendanceRecord::new(1, 0, 0),
            AttendanceRecord::new(2, 10, 6),
        ];

        let summary = summarize(&records, &thresholds());
        let summary = summary.summary().unwrap();

        assert_eq!(summary.subjects[0].percentage, 0.0);
        assert_eq!(summary.overall_percentage, 60.0);
        assert_eq!(summary.status, AttendanceStatus::Critical);
    }
}

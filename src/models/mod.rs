pub mod attendance;
pub mod row;
pub mod strategy;

pub use attendance::{
    AttendanceRecord, AttendanceStatus, AttendanceSummary, ExtractionOutcome, SubjectSummary,
    SummaryOutcome,
};
pub use row::RowCtx;
pub use strategy::{Field, Strategy, StrategyTable};

pub mod row_flow;

pub use row_flow::{RowFlow, RowResult, SkipReason};

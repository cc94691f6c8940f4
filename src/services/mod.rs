pub mod aggregator;
pub mod field_extractor;
pub mod field_parser;
pub mod row_expander;

pub use aggregator::{percentage, summarize, Thresholds};
pub use field_extractor::FieldExtractor;
pub use row_expander::{Discovery, ElementSnapshot, RowExpander};

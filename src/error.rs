// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Outbreak Simulation Suite - Error Types

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by the outbreak pipeline.
///
/// Structural violations (`UnknownEntity`, `DuplicateKey`) abort the component
/// that raised them. Numeric edge cases such as zero denominators never show
/// up here: they resolve to `0` or `None` at the call site.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OutbreakError {
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("duplicate observation for ({date}, {entity_id})")]
    DuplicateKey { date: NaiveDate, entity_id: String },

    #[error("aggregation requested on an empty table")]
    EmptyTable,

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("invalid date range: {start} .. {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, OutbreakError>;

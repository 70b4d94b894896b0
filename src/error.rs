//! Common errors across the cloudnet-rs crate

/// Errors related to working with datetimes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DateTimeError {
    #[error("Year {0}, month {1}, day {2} is not a valid date")]
    InvalidYearMonthDay(i32, u32, u32),
    #[error("Could not parse '{0}' as a YYYY-MM-DD date")]
    UnparseableDate(String),
}

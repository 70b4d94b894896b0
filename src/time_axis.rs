//! Time axes for daily measurement records.
//!
//! Cloudnet products put every instrument on a common time axis expressed as
//! decimal hours of the day. This module builds that axis ([`build_time_grid`])
//! and converts the raw "seconds since the start of the day" timestamps that
//! instruments record into the same units ([`epoch_to_decimal_hour`]).
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike};
use itertools::Itertools;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::DateTimeError;

/// Smallest allowed time grid resolution, in seconds.
pub const MIN_RESOLUTION_SECONDS: i64 = 1;
/// Largest allowed time grid resolution, in seconds.
pub const MAX_RESOLUTION_SECONDS: i64 = 60;
/// Resolution used when none is configured, in seconds.
pub const DEFAULT_RESOLUTION_SECONDS: u32 = 30;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeAxisError {
    #[error(
        "Time resolution should be between {min} and {max} [s], got {0}",
        min = MIN_RESOLUTION_SECONDS,
        max = MAX_RESOLUTION_SECONDS
    )]
    ResolutionOutOfRange(i64),
    #[error("Cannot convert an empty time series to decimal hours")]
    EmptyTimes,
    #[error("Time offset {offset} s from {epoch} cannot be represented as a UTC datetime")]
    UnrepresentableTime { epoch: DayEpoch, offset: f64 },
}

/// Midnight UTC of the day a measurement record belongs to.
///
/// Sample times in the raw files are offsets in seconds from this point.
/// No timezone handling is done: the epoch is always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayEpoch {
    date: NaiveDate,
}

impl DayEpoch {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateTimeError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(DateTimeError::InvalidYearMonthDay(year, month, day))?;
        Ok(Self { date })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Seconds between the Unix epoch and midnight UTC of this day.
    pub fn unix_seconds(&self) -> i64 {
        self.date.and_time(NaiveTime::MIN).and_utc().timestamp()
    }
}

impl From<NaiveDate> for DayEpoch {
    fn from(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl FromStr for DayEpoch {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| DateTimeError::UnparseableDate(s.to_string()))?;
        Ok(Self { date })
    }
}

impl TryFrom<String> for DayEpoch {
    type Error = DateTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayEpoch> for String {
    fn from(value: DayEpoch) -> Self {
        value.to_string()
    }
}

impl Display for DayEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// A time grid resolution in whole seconds, guaranteed to be within
/// [`MIN_RESOLUTION_SECONDS`] and [`MAX_RESOLUTION_SECONDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TimeResolution(u32);

impl TimeResolution {
    pub fn new(seconds: i64) -> Result<Self, TimeAxisError> {
        if !(MIN_RESOLUTION_SECONDS..=MAX_RESOLUTION_SECONDS).contains(&seconds) {
            return Err(TimeAxisError::ResolutionOutOfRange(seconds));
        }
        let seconds =
            u32::try_from(seconds).map_err(|_| TimeAxisError::ResolutionOutOfRange(seconds))?;
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Half the grid spacing, in hours. This is also the first grid point.
    pub fn step_hours(&self) -> f64 {
        self.0 as f64 / 7200.0
    }

    /// Distance between consecutive grid points, in hours.
    pub fn spacing_hours(&self) -> f64 {
        2.0 * self.step_hours()
    }

    /// Compute the decimal hour grid for one day at this resolution.
    ///
    /// Points start half a spacing after midnight and stop before
    /// `24 - step`, so neither 0 nor 24 is ever part of the grid. The number
    /// of points follows the usual half-open range convention,
    /// `ceil((stop - start) / spacing)`.
    pub fn grid(&self) -> Array1<f64> {
        let start = self.step_hours();
        let stop = 24.0 - start;
        let spacing = self.spacing_hours();
        let n = ((stop - start) / spacing).ceil().max(0.0) as usize;
        Array1::from_shape_fn(n, |i| start + i as f64 * spacing)
    }
}

impl Default for TimeResolution {
    fn default() -> Self {
        Self(DEFAULT_RESOLUTION_SECONDS)
    }
}

impl TryFrom<i64> for TimeResolution {
    type Error = TimeAxisError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimeResolution> for i64 {
    fn from(value: TimeResolution) -> Self {
        value.0 as i64
    }
}

impl Display for TimeResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} s", self.0)
    }
}

/// Compute the fractional hour time vector for one day.
///
/// `resolution_seconds` must be between 1 and 60 (inclusive); anything else
/// returns [`TimeAxisError::ResolutionOutOfRange`] before any computation.
/// See [`TimeResolution::grid`] for the layout of the returned points.
pub fn build_time_grid(resolution_seconds: i64) -> Result<Array1<f64>, TimeAxisError> {
    let resolution = TimeResolution::new(resolution_seconds)?;
    let grid = resolution.grid();
    log::debug!("Built {} point time grid at {resolution}", grid.len());
    Ok(grid)
}

/// Convert seconds since `epoch` into the decimal hour of that day.
///
/// Each offset is floored to whole seconds before conversion, so sub-second
/// information is lost. If the last value comes out as exactly 0 it is
/// replaced by 24: a record that ends on the following midnight should end
/// at "hour 24", not wrap back to the start of the day. No other value is
/// remapped.
///
/// # Errors
/// - [`TimeAxisError::EmptyTimes`] if `times` is empty,
/// - [`TimeAxisError::UnrepresentableTime`] if an offset is NaN, infinite, or
///   falls outside the range chrono can represent.
pub fn epoch_to_decimal_hour(epoch: &DayEpoch, times: &[f64]) -> Result<Vec<f64>, TimeAxisError> {
    if times.is_empty() {
        return Err(TimeAxisError::EmptyTimes);
    }

    let epoch_seconds = epoch.unix_seconds();
    let mut hours: Vec<f64> = times
        .iter()
        .map(|&offset| {
            offset_to_decimal_hour(epoch_seconds, offset)
                .ok_or(TimeAxisError::UnrepresentableTime { epoch: *epoch, offset })
        })
        .try_collect()?;

    if let Some(last) = hours.last_mut() {
        if *last == 0.0 {
            *last = 24.0;
        }
    }

    Ok(hours)
}

fn offset_to_decimal_hour(epoch_seconds: i64, offset: f64) -> Option<f64> {
    let whole = offset.floor();
    // Anything beyond this is far outside chrono's supported years anyway.
    if !whole.is_finite() || whole.abs() > 1e15 {
        return None;
    }

    let seconds = epoch_seconds.checked_add(whole as i64)?;
    let dt = DateTime::from_timestamp(seconds, 0)?;
    let minutes_and_seconds = dt.minute() * 60 + dt.second();
    Some(dt.hour() as f64 + minutes_and_seconds as f64 / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn jan1() -> DayEpoch {
        DayEpoch::new(2020, 1, 1).unwrap()
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(30)]
    #[case(60)]
    fn test_time_grid_layout(#[case] reso: i64) {
        let grid = build_time_grid(reso).unwrap();
        let spacing = 2.0 * reso as f64 / 7200.0;

        assert!(!grid.is_empty());
        assert_abs_diff_eq!(grid[0], spacing / 2.0, epsilon = 1e-12);
        assert!(grid.iter().all(|&h| h > 0.0 && h < 24.0), "grid must lie in (0, 24)");
        for (a, b) in grid.iter().tuple_windows() {
            assert!(b > a, "grid must be strictly increasing");
            assert_abs_diff_eq!(b - a, spacing, epsilon = 1e-9);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(61)]
    #[case(-30)]
    fn test_time_grid_out_of_range(#[case] reso: i64) {
        let err = build_time_grid(reso).unwrap_err();
        assert_eq!(err, TimeAxisError::ResolutionOutOfRange(reso));
        assert!(err.to_string().contains("between 1 and 60"));
    }

    #[test]
    fn test_default_resolution() {
        let reso = TimeResolution::default();
        assert_eq!(reso.seconds(), 30);
        assert_abs_diff_eq!(reso.step_hours(), 30.0 / 7200.0);
    }

    #[test]
    fn test_single_midnight_sample_becomes_24() {
        let hours = epoch_to_decimal_hour(&jan1(), &[0.0]).unwrap();
        assert_eq!(hours, vec![24.0]);
    }

    #[test]
    fn test_whole_hours() {
        let hours = epoch_to_decimal_hour(&jan1(), &[3600.0, 7200.0]).unwrap();
        assert_eq!(hours, vec![1.0, 2.0]);
    }

    #[test]
    fn test_only_last_value_remapped() {
        // Starts at midnight and ends on the next midnight
        let hours = epoch_to_decimal_hour(&jan1(), &[0.0, 43200.0, 86400.0]).unwrap();
        assert_eq!(hours, vec![0.0, 12.0, 24.0]);
    }

    #[test]
    fn test_minutes_seconds_and_truncation() {
        // 01:30:36 plus a fraction of a second that should be dropped
        let hours = epoch_to_decimal_hour(&jan1(), &[5436.9]).unwrap();
        assert_abs_diff_eq!(hours[0], 1.0 + 1836.0 / 3600.0, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_offsets_wrap_to_previous_day() {
        let hours = epoch_to_decimal_hour(&jan1(), &[-1800.0, 3600.0]).unwrap();
        assert_abs_diff_eq!(hours[0], 23.5);
        assert_abs_diff_eq!(hours[1], 1.0);
    }

    #[test]
    fn test_empty_times() {
        let err = epoch_to_decimal_hour(&jan1(), &[]).unwrap_err();
        assert_eq!(err, TimeAxisError::EmptyTimes);
    }

    #[test]
    fn test_non_finite_offset() {
        let err = epoch_to_decimal_hour(&jan1(), &[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, TimeAxisError::UnrepresentableTime { .. }));
    }

    #[test]
    fn test_day_epoch_parsing() {
        let epoch: DayEpoch = "2020-01-01".parse().unwrap();
        assert_eq!(epoch, jan1());
        assert_eq!(epoch.unix_seconds(), 1577836800);
        assert_eq!(epoch.to_string(), "2020-01-01");

        assert_eq!(
            DayEpoch::new(2021, 2, 29).unwrap_err(),
            DateTimeError::InvalidYearMonthDay(2021, 2, 29)
        );
        assert!("01/01/2020".parse::<DayEpoch>().is_err());
    }
}

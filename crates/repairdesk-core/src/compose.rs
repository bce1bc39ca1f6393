//! Derived metrics with safe division.
//!
//! Every helper here returns a finite number for any input: zero
//! denominators and zero reference values produce 0.

use std::ops::AddAssign;

use serde::Serialize;

use crate::series::{densify, Granularity, SeriesPoint, SeriesRange};

/// `round((current - previous) / previous * 100)`, or 0 when `previous <= 0`.
pub fn percent_change(current: f64, previous: f64) -> i64 {
    if previous <= 0.0 || !previous.is_finite() || !current.is_finite() {
        return 0;
    }
    ((current - previous) / previous * 100.0).round() as i64
}

/// `round(part / whole * 100)`, or 0 when `whole <= 0`.
pub fn percent_of(part: f64, whole: f64) -> i64 {
    if whole <= 0.0 || !whole.is_finite() || !part.is_finite() {
        return 0;
    }
    (part / whole * 100.0).round() as i64
}

/// `total / count` rounded to cents, or 0 when `count <= 0`.
pub fn average(total: f64, count: f64) -> f64 {
    if count <= 0.0 || !count.is_finite() || !total.is_finite() {
        return 0.0;
    }
    round2(total / count)
}

pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// A metric and its value over the previous, equal-length window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison<V> {
    pub current: V,
    pub previous: V,
    pub change: i64,
}

/// Without a previous window (all-time) the previous value is zero and so is
/// the change.
pub fn compare<V>(current: V, previous: Option<V>) -> Comparison<V>
where
    V: Copy + Default + Into<f64>,
{
    let previous = previous.unwrap_or_default();
    Comparison {
        current,
        previous,
        change: percent_change(current.into(), previous.into()),
    }
}

/// Count comparison; `i64` has no lossless `Into<f64>`.
pub fn compare_counts(current: i64, previous: Option<i64>) -> Comparison<i64> {
    let previous = previous.unwrap_or(0);
    Comparison {
        current,
        previous,
        change: percent_change(current as f64, previous as f64),
    }
}

/// A densified trend ready for the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend<V> {
    pub granularity: Granularity,
    pub points: Vec<SeriesPoint<V>>,
    /// `false` when the source query returned no rows and `points` is the
    /// zero-filled placeholder.
    pub has_data: bool,
}

pub fn trend<V>(raw: &[SeriesPoint<V>], range: &SeriesRange) -> Trend<V>
where
    V: Copy + Default + AddAssign,
{
    if raw.is_empty() {
        return empty_trend(range);
    }
    Trend {
        granularity: range.granularity,
        points: densify(raw, range),
        has_data: true,
    }
}

/// Zero-valued series with the same buckets a populated trend would have.
pub fn empty_trend<V>(range: &SeriesRange) -> Trend<V>
where
    V: Default,
{
    Trend {
        granularity: range.granularity,
        points: range
            .buckets()
            .into_iter()
            .map(|bucket| SeriesPoint::new(bucket, V::default()))
            .collect(),
        has_data: false,
    }
}

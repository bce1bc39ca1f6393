//! Calendar bucketing and gap-filling for trend series.

use std::collections::HashMap;
use std::ops::AddAssign;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::period::DateWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// DuckDB `date_trunc` part for this granularity.
    pub fn trunc_part(&self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
        }
    }

    /// `strftime` pattern producing this granularity's bucket key.
    pub fn key_format(&self) -> &'static str {
        match self {
            Self::Daily | Self::Weekly => "%Y-%m-%d",
            Self::Monthly => "%Y-%m",
        }
    }

    /// First day of the bucket containing `date`. Weeks start on Monday.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Weekly => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
            Self::Monthly => date.with_day(1).unwrap_or(date),
        }
    }

    pub fn key_for(&self, date: NaiveDate) -> String {
        self.bucket_start(date).format(self.key_format()).to_string()
    }

    /// Start of the bucket `n` buckets before the one starting at `start`.
    fn step_back(&self, start: NaiveDate, n: u32) -> NaiveDate {
        match self {
            Self::Daily => start - Duration::days(i64::from(n)),
            Self::Weekly => start - Duration::weeks(i64::from(n)),
            Self::Monthly => start
                .checked_sub_months(chrono::Months::new(n))
                .unwrap_or(start),
        }
    }

    fn step_forward(&self, start: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => start + Duration::days(1),
            Self::Weekly => start + Duration::weeks(1),
            Self::Monthly => start
                .checked_add_months(chrono::Months::new(1))
                .unwrap_or(start),
        }
    }
}

/// Target shape of a trend: `span` consecutive buckets ending with the
/// bucket that contains `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesRange {
    pub granularity: Granularity,
    pub span: u32,
    pub end: NaiveDate,
    /// Earliest day the raw query may read. The first bucket is partial when
    /// this falls inside it.
    pub floor: Option<NaiveDate>,
}

impl SeriesRange {
    pub fn new(granularity: Granularity, span: u32, end: NaiveDate) -> Self {
        Self {
            granularity,
            span,
            end,
            floor: None,
        }
    }

    /// Restrict the raw query to `window` so the trend sums to the same
    /// totals as the window's scalar queries.
    pub fn within(mut self, window: &DateWindow) -> Self {
        self.floor = window.start;
        self
    }

    /// First calendar day covered by the range.
    pub fn start_date(&self) -> NaiveDate {
        let last = self.granularity.bucket_start(self.end);
        self.granularity.step_back(last, self.span.saturating_sub(1))
    }

    /// `(start, end_exclusive)` strings for the raw series query.
    pub fn bounds(&self) -> (String, String) {
        let start = match self.floor {
            Some(floor) => floor.max(self.start_date()),
            None => self.start_date(),
        };
        (
            start.format("%Y-%m-%d").to_string(),
            (self.end + Duration::days(1)).format("%Y-%m-%d").to_string(),
        )
    }

    /// Every bucket key in the range, oldest first.
    pub fn buckets(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.span as usize);
        let mut cursor = self.start_date();
        for _ in 0..self.span {
            keys.push(cursor.format(self.granularity.key_format()).to_string());
            cursor = self.granularity.step_forward(cursor);
        }
        keys
    }

    /// Map a raw bucket label (`2026-02-10`, `2026-02-10 00:00:00`, `2026-02`)
    /// onto this range's key format.
    pub fn normalize_key(&self, raw: &str) -> Option<String> {
        let date = raw
            .get(..10)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .or_else(|| {
                raw.get(..7)
                    .and_then(|s| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok())
            })?;
        Some(self.granularity.key_for(date))
    }
}

/// One bucket of a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<V> {
    pub bucket: String,
    pub value: V,
}

impl<V> SeriesPoint<V> {
    pub fn new(bucket: impl Into<String>, value: V) -> Self {
        Self {
            bucket: bucket.into(),
            value,
        }
    }
}

/// Produce exactly `range.span` points in ascending bucket order. Buckets
/// missing from `raw` are zero; raw points outside the range are dropped and
/// duplicate keys are summed.
pub fn densify<V>(raw: &[SeriesPoint<V>], range: &SeriesRange) -> Vec<SeriesPoint<V>>
where
    V: Copy + Default + AddAssign,
{
    let mut lookup: HashMap<String, V> = HashMap::with_capacity(raw.len());
    for point in raw {
        if let Some(key) = range.normalize_key(&point.bucket) {
            *lookup.entry(key).or_default() += point.value;
        }
    }

    range
        .buckets()
        .into_iter()
        .map(|key| {
            let value = lookup.get(&key).copied().unwrap_or_default();
            SeriesPoint { bucket: key, value }
        })
        .collect()
}

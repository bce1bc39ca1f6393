//! Period resolution: symbolic range tokens to concrete date windows.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::series::{Granularity, SeriesRange};

/// Lower and upper sentinels bound into SQL when a window is open-ended.
const OPEN_START: &str = "0001-01-01";
const OPEN_END: &str = "9999-12-31";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodToken {
    Week,
    Month,
    Year,
    All,
}

impl PeriodToken {
    /// Anything that is not `week`, `month` or `year` selects all-time.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("week") => Self::Week,
            Some("month") => Self::Month,
            Some("year") => Self::Year,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    /// Window length in days, `None` for all-time.
    pub fn span_days(&self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Year => Some(365),
            Self::All => None,
        }
    }
}

/// Half-open date window `[start, end_exclusive)`. `None` on either side
/// means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end_exclusive: Option<NaiveDate>,
}

impl DateWindow {
    pub fn unbounded() -> Self {
        Self {
            start: None,
            end_exclusive: None,
        }
    }

    pub fn between(start: NaiveDate, end_exclusive: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end_exclusive: Some(end_exclusive),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end_exclusive.map_or(true, |e| date < e)
    }

    pub fn span_days(&self) -> Option<i64> {
        match (self.start, self.end_exclusive) {
            (Some(s), Some(e)) => Some((e - s).num_days()),
            _ => None,
        }
    }

    /// `(start, end_exclusive)` as `YYYY-MM-DD` strings for
    /// `created_at >= ?start AND created_at < ?end` predicates.
    pub fn bounds(&self) -> (String, String) {
        let start = self
            .start
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| OPEN_START.to_string());
        let end = self
            .end_exclusive
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| OPEN_END.to_string());
        (start, end)
    }

    /// Inclusive display form, `None` when unbounded.
    pub fn to_range(&self) -> Option<DateRange> {
        match (self.start, self.end_exclusive) {
            (Some(start), Some(end)) => Some(DateRange {
                start,
                end: end - Duration::days(1),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A resolved period, shared by every query of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub token: PeriodToken,
    pub current: DateWindow,
    pub previous: Option<DateWindow>,
}

impl Period {
    /// The current window is the last N days including `today`; the previous
    /// window is the N days immediately before it.
    pub fn resolve(token: PeriodToken, today: NaiveDate) -> Self {
        let Some(span) = token.span_days() else {
            return Self {
                token,
                current: DateWindow::unbounded(),
                previous: None,
            };
        };

        let current_start = today - Duration::days(span - 1);
        let previous_start = current_start - Duration::days(span);
        Self {
            token,
            current: DateWindow::between(current_start, today + Duration::days(1)),
            previous: Some(DateWindow::between(previous_start, current_start)),
        }
    }

    /// Trend shape for this period, read through the current window. Week
    /// and month are daily. A year spans 13 calendar months, the first one
    /// partial. All-time shows the last twelve months.
    pub fn series_range(&self, today: NaiveDate) -> SeriesRange {
        let range = match self.token {
            PeriodToken::Week => SeriesRange::new(Granularity::Daily, 7, today),
            PeriodToken::Month => SeriesRange::new(Granularity::Daily, 30, today),
            PeriodToken::Year => SeriesRange::new(Granularity::Monthly, 13, today),
            PeriodToken::All => SeriesRange::new(Granularity::Monthly, 12, today),
        };
        range.within(&self.current)
    }

    pub fn summary(&self) -> PeriodSummary {
        PeriodSummary {
            token: self.token,
            current: self.current.to_range(),
            previous: self.previous.and_then(|w| w.to_range()),
        }
    }
}

/// Serialized echo of the period a report was computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub token: PeriodToken,
    pub current: Option<DateRange>,
    pub previous: Option<DateRange>,
}

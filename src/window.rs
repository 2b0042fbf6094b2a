//! Time windows for planner queries
//!
//! Maps a symbolic range (`Day`, `Week`, `Month`, `Semester`) to a concrete
//! date pair. Every window is padded by one day on each side before it is
//! sent, so a due date near midnight is not lost to a local/UTC offset.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Date format used by the planner endpoint
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Symbolic range around "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangeSelector {
    /// Today only
    Day,
    /// One week either side of today
    Week,
    /// Thirty days either side of today
    Month,
    /// The configured semester
    #[default]
    Semester,
}

impl RangeSelector {
    /// All selectors
    pub const ALL: [RangeSelector; 4] = [Self::Day, Self::Week, Self::Month, Self::Semester];

    /// Parse a selector name (case-insensitive). Absent or unknown names
    /// fall back to `Semester`.
    pub fn parse_lenient(name: Option<&str>) -> Self {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Self::Semester;
        };

        match name.to_ascii_lowercase().as_str() {
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            "semester" => Self::Semester,
            _ => {
                warn!("Unknown range '{name}', using Semester");
                Self::Semester
            }
        }
    }

    /// Selector name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Semester => "Semester",
        }
    }
}

impl fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed institutional date range used for `Semester`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSemester")]
pub struct SemesterRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawSemester {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawSemester> for SemesterRange {
    type Error = Error;

    fn try_from(raw: RawSemester) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl SemesterRange {
    /// Create a semester range; `start` must not be after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_value(
                "semester",
                format!("start {start} is after end {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// First day of the semester
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the semester
    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl Default for SemesterRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 8, 23).expect("valid date"),
            end: NaiveDate::from_ymd_opt(2024, 12, 19).expect("valid date"),
        }
    }
}

/// Concrete, padded date window. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl RequestWindow {
    /// First day (inclusive)
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `start` as `YYYY-MM-DD`
    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// `end` as `YYYY-MM-DD`
    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// Days between `start` and `end`
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Resolves range selectors into request windows
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindowResolver {
    semester: SemesterRange,
}

impl TimeWindowResolver {
    /// Create a resolver for the given semester
    pub fn new(semester: SemesterRange) -> Self {
        Self { semester }
    }

    /// The configured semester
    pub fn semester(&self) -> SemesterRange {
        self.semester
    }

    /// Resolve against the current time; `None` means `Semester`
    pub fn resolve(&self, selector: Option<RangeSelector>) -> RequestWindow {
        self.resolve_at(selector.unwrap_or_default(), Utc::now())
    }

    /// Resolve against a fixed "now"
    pub fn resolve_at(&self, selector: RangeSelector, now: DateTime<Utc>) -> RequestWindow {
        let (start, end) = match selector {
            RangeSelector::Day => (now.date_naive(), now.date_naive()),
            RangeSelector::Week => (
                (now - Duration::days(7)).date_naive(),
                (now + Duration::days(7)).date_naive(),
            ),
            RangeSelector::Month => (
                (now - Duration::days(30)).date_naive(),
                (now + Duration::days(30)).date_naive(),
            ),
            RangeSelector::Semester => (self.semester.start, self.semester.end),
        };

        // One day of padding on each side absorbs timezone offsets
        RequestWindow {
            start: start - Duration::days(1),
            end: end + Duration::days(1),
        }
    }
}

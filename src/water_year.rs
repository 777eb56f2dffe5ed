/// Water-year calendar conversions.
///
/// A water year is named for the calendar year in which it ends. Under the
/// standard USGS convention it runs October 1 through September 30; the
/// snow-model convention used by SnowModel runs September 1 through
/// August 31. All functions work on the calendar date only; callers holding
/// a `DateTime` should pass `dt.date_naive()`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Conventions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterYearConvention {
    /// Year begins the day after September 30.
    #[default]
    Standard,
    /// Year begins the day after August 31.
    SnowModel,
}

impl WaterYearConvention {
    /// Calendar month of the last day of the water year.
    pub fn end_month(self) -> u32 {
        match self {
            WaterYearConvention::Standard => 9,
            WaterYearConvention::SnowModel => 8,
        }
    }

    /// Day of the calendar year of the boundary day (September 30 or
    /// August 31) in `year`.
    fn boundary_ordinal(self, year: i32) -> u32 {
        let leap = u32::from(is_leap_year(year));
        match self {
            WaterYearConvention::Standard => 273 + leap,
            WaterYearConvention::SnowModel => 243 + leap,
        }
    }

    /// Days from the boundary day to December 31, boundary excluded.
    fn days_after_boundary(self) -> u32 {
        match self {
            WaterYearConvention::Standard => 92,
            WaterYearConvention::SnowModel => 122,
        }
    }

    /// `true` once `date` is past this year's boundary day.
    fn is_after_boundary(self, date: NaiveDate) -> bool {
        date.month() > self.end_month()
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Days since the most recent boundary day.
///
/// The first day of the water year is 1 and the last is 365 (366 when the
/// water year contains a February 29).
///
/// Computed from day-of-year offsets within `date`'s own calendar year, so
/// every date chrono can represent is valid, including `NaiveDate::MIN`.
pub fn day_of_water_year(date: NaiveDate, convention: WaterYearConvention) -> u32 {
    if convention.is_after_boundary(date) {
        date.ordinal() - convention.boundary_ordinal(date.year())
    } else {
        date.ordinal() + convention.days_after_boundary()
    }
}

/// Water year containing `date`.
pub fn water_year(date: NaiveDate, convention: WaterYearConvention) -> i32 {
    if convention.is_after_boundary(date) {
        date.year() + 1
    } else {
        date.year()
    }
}

/// Water year under the snow-model convention.
pub fn snow_model_water_year(date: NaiveDate) -> i32 {
    water_year(date, WaterYearConvention::SnowModel)
}

/// Month of the water year, 1..=12.
///
/// October is month 1 under the standard convention; September is month 1
/// under the snow-model convention.
pub fn month_of_water_year(date: NaiveDate, convention: WaterYearConvention) -> u32 {
    let end = convention.end_month();
    if convention.is_after_boundary(date) {
        date.month() - end
    } else {
        date.month() + (12 - end)
    }
}

/// Fractional calendar year: `year + (day_of_year - 1) / days_in_year`.
///
/// January 1 maps to the integer year; December 31 of a leap year maps to
/// `year + 365/366`.
pub fn decimal_year(date: NaiveDate) -> f64 {
    let year = date.year();
    let days_in_year = if is_leap_year(year) { 366.0 } else { 365.0 };
    year as f64 + f64::from(date.ordinal0()) / days_in_year
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

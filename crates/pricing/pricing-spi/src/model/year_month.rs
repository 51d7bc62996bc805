//! Calendar month key

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// A calendar month, rendered canonically as `YYYY-MM`.
///
/// Used as the key of the month ordinal table and as trend labels.
///
/// # Example
///
/// ```rust
/// use pricing_spi::YearMonth;
///
/// let feb: YearMonth = "2022-02".parse().unwrap();
/// assert_eq!(feb.shift(-2).unwrap().to_string(), "2021-12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Create from a year and a 1-based month
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based month of year
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Move by `months` calendar months (negative moves backwards)
    pub fn shift(&self, months: i32) -> Option<Self> {
        let step = Months::new(months.unsigned_abs());
        let date = if months >= 0 {
            self.0.checked_add_months(step)
        } else {
            self.0.checked_sub_months(step)
        };
        date.map(Self)
    }

    /// Number of months from `self` to `other` (negative if `other` is earlier)
    pub fn months_until(&self, other: &YearMonth) -> i64 {
        let from = i64::from(self.year()) * 12 + i64::from(self.month());
        let to = i64::from(other.year()) * 12 + i64::from(other.month());
        to - from
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for YearMonth {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PricingError::InvalidParameter {
            name: "month".to_string(),
            reason: format!("expected YYYY-MM, got '{}'", s),
        };

        let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map_err(|_| invalid())?;
        let parsed = Self(date);

        // Reject non-canonical spellings such as "2022-2"
        if parsed.to_string() != s {
            return Err(invalid());
        }
        Ok(parsed)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = PricingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

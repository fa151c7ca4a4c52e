use chrono::{Datelike, NaiveDate};

/// A statement billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Resolve a requested period against `today`.
    ///
    /// A missing year or month, a month outside 1-12, a non-positive year,
    /// or a year in the future all collapse to the current year/month.
    pub fn resolve(year: Option<i32>, month: Option<i32>, today: NaiveDate) -> Self {
        match (year, month) {
            (Some(y), Some(m)) if (1..=12).contains(&m) && y > 0 && y <= today.year() => Self {
                year: y,
                month: m as u32,
            },
            _ => Self {
                year: today.year(),
                month: today.month(),
            },
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// `YYYYMM`, the statement endpoint's `p01` value and the prefix of
    /// every export file name.
    pub fn label(&self) -> String {
        format!("{}{:02}", self.year, self.month)
    }
}

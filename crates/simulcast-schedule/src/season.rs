//! Broadcast seasons and the slugs listing sites use for them.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Quarter of the broadcast year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Quarter {
    /// Quarter containing `month` (1-12).
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Self::Winter,
            4..=6 => Self::Spring,
            7..=9 => Self::Summer,
            _ => Self::Fall,
        }
    }

    /// First month of the quarter.
    pub fn start_month(&self) -> u32 {
        match self {
            Self::Winter => 1,
            Self::Spring => 4,
            Self::Summer => 7,
            Self::Fall => 10,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winter => write!(f, "winter"),
            Self::Spring => write!(f, "spring"),
            Self::Summer => write!(f, "summer"),
            Self::Fall => write!(f, "fall"),
        }
    }
}

/// A broadcast season, e.g. fall 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Season {
    pub year: i32,
    pub quarter: Quarter,
}

impl Season {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: Quarter::from_month(date.month()),
        }
    }

    /// The season airing today, by local date.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Path-style slug: `2024/fall`.
    pub fn path_slug(&self) -> String {
        format!("{}/{}", self.year, self.quarter)
    }

    /// Compact slug: `202410`.
    pub fn compact_slug(&self) -> String {
        format!("{}{:02}", self.year, self.quarter.start_month())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quarter, self.year)
    }
}

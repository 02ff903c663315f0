//! Per-run values passed explicitly into every component

use crate::error::{DeltaError, Result};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Date stamp format embedded in file names
pub const DATE_STAMP_FORMAT: &str = "%Y%m%d";

/// Identity and dates of one delta run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub run_id: Uuid,
    pub run_date: NaiveDate,
    pub previous_date: NaiveDate,
}

impl RunContext {
    pub fn new(run_date: NaiveDate) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_date,
            previous_date: run_date - Duration::days(1),
        }
    }

    /// Context for today's local date
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// Context from an optional `YYYYMMDD` argument, defaulting to today
    pub fn from_arg(date: Option<&str>) -> Result<Self> {
        match date {
            Some(s) => Ok(Self::new(parse_date_stamp(s)?)),
            None => Ok(Self::today()),
        }
    }

    pub fn run_stamp(&self) -> String {
        date_stamp(self.run_date)
    }

    pub fn previous_stamp(&self) -> String {
        date_stamp(self.previous_date)
    }
}

pub fn date_stamp(date: NaiveDate) -> String {
    date.format(DATE_STAMP_FORMAT).to_string()
}

pub fn parse_date_stamp(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.len() != 8 {
        return Err(DeltaError::invalid_input(format!(
            "Invalid date: '{}'. Use YYYYMMDD",
            s
        )));
    }
    NaiveDate::parse_from_str(trimmed, DATE_STAMP_FORMAT)
        .map_err(|_| DeltaError::invalid_input(format!("Invalid date: '{}'. Use YYYYMMDD", s)))
}

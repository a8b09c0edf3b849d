//! Analysis window configuration.
//!
//! Balances are computed over `[start, today]`. The start comes from the
//! household settings; without one the engine looks back
//! [`DEFAULT_LOOKBACK_DAYS`].

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOOKBACK_DAYS: u64 = 180;

/// Date format accepted for the configured start date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Transactions and obligations before this date are ignored.
    pub start_date: Option<NaiveDate>,
}

impl AnalysisConfig {
    /// Build from the raw settings value.
    ///
    /// A blank or unparsable value is ignored and the default lookback applies.
    pub fn from_setting(raw: Option<&str>) -> Self {
        let start_date = raw.map(str::trim).filter(|s| !s.is_empty()).and_then(|raw| {
            match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(err) => {
                    tracing::warn!("ignoring invalid analysis start date {raw:?}: {err}");
                    None
                }
            }
        });
        Self { start_date }
    }

    /// Window ending on `today`.
    pub fn window(&self, today: NaiveDate) -> AnalysisWindow {
        let from = self.start_date.unwrap_or_else(|| {
            today
                .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
                .unwrap_or(NaiveDate::MIN)
        });
        AnalysisWindow { from, to: today }
    }
}

/// Inclusive date range a reconciliation runs over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl AnalysisWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of days in the window, both ends included; 0 when inverted.
    pub fn days(&self) -> i64 {
        ((self.to - self.from).num_days() + 1).max(0)
    }
}

use super::types::{JobType, ReviewInput, Role, Trade};
use anyhow::{bail, Result};
use chrono::NaiveDate;

/// Per-field values given on the command line. `None` keeps the base value.
#[derive(Debug, Clone, Default)]
pub struct ReviewOverrides {
    pub worker_name: Option<String>,
    pub trade: Option<Trade>,
    pub role: Option<Role>,
    pub job_date: Option<NaiveDate>,
    pub job_type: Option<JobType>,
    pub minutes_late: Option<i64>,
    pub no_show: bool,
    pub callback_occurred: bool,
    pub punchlist_open: bool,
    pub workmanship: Option<i32>,
    pub safety_incident: bool,
    pub ppe_adherence: Option<i32>,
    pub professionalism: Option<i32>,
    pub customer_rating: Option<i32>,
    pub notes: Option<String>,
}

impl ReviewOverrides {
    /// Layer these overrides on top of `base`. Boolean flags only ever set
    /// their condition; they cannot clear one loaded from a file.
    pub fn apply(self, mut base: ReviewInput) -> ReviewInput {
        if let Some(name) = self.worker_name {
            base.worker_name = name;
        }
        if let Some(trade) = self.trade {
            base.trade = trade;
        }
        if let Some(role) = self.role {
            base.role = role;
        }
        if let Some(date) = self.job_date {
            base.job_date = date;
        }
        if let Some(job_type) = self.job_type {
            base.job_type = job_type;
        }
        if let Some(minutes) = self.minutes_late {
            base.minutes_late = minutes;
        }
        if self.no_show {
            base.no_show = true;
        }
        if self.callback_occurred {
            base.callback_occurred = true;
        }
        if self.punchlist_open {
            base.punchlist_resolved = false;
        }
        if let Some(v) = self.workmanship {
            base.workmanship = v;
        }
        if self.safety_incident {
            base.safety_incident = true;
        }
        if let Some(v) = self.ppe_adherence {
            base.ppe_adherence = v;
        }
        if let Some(v) = self.professionalism {
            base.professionalism = v;
        }
        if let Some(v) = self.customer_rating {
            base.customer_rating = v;
        }
        if let Some(notes) = self.notes {
            base.notes = Some(notes);
        }
        base
    }
}

/// Parse a lateness value: whole minutes ("12", "-3") or a duration ("1h 5m", "90s").
/// Durations are truncated to whole minutes.
pub fn parse_minutes_late(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(minutes) = s.parse::<i64>() {
        return Ok(minutes);
    }
    match humantime::parse_duration(s) {
        Ok(duration) => Ok((duration.as_secs() / 60) as i64),
        Err(e) => bail!("invalid lateness '{}': expected minutes or a duration like '1h 5m' ({})", s, e),
    }
}

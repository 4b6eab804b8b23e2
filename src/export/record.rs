use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::review::ReviewInput;
use crate::scoring::{Band, CompositeResult};

pub const SCHEMA: &str = "reverse-glassdoor.v1";
pub const ATTESTATION: &str = "Submitted in good faith; job record on file.";
pub const NOTES_MAX_CHARS: usize = 240;

/// Canonical machine-readable scorecard. Field order is part of the format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub meta: Meta,
    pub job: Job,
    pub worker: Worker,
    pub metrics: Metrics,
    pub composite: Composite,
    pub notes: String,
    pub attestation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub schema: &'static str,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub date: String,
    pub trade: String,
    pub role: String,
    #[serde(rename = "type")]
    pub job_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Worker {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub reliability: ReliabilityMetrics,
    pub quality: QualityMetrics,
    pub safety: SafetyMetrics,
    pub communication: CommunicationMetrics,
    pub customer: CustomerMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityMetrics {
    pub minutes_late: i64,
    pub no_show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub workmanship: i32,
    pub callback: bool,
    pub punchlist_resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyMetrics {
    pub incident: bool,
    pub ppe_adherence: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunicationMetrics {
    pub professionalism: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerMetrics {
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composite {
    pub score: u8,
    pub band: Band,
}

impl ExportRecord {
    /// Render with two-space indentation.
    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// First `NOTES_MAX_CHARS` characters of the notes, or "" when there are none.
/// Counts Unicode scalar values, so an emoji is one character, not two UTF-16 units.
pub fn truncate_notes(notes: Option<&str>) -> String {
    notes
        .unwrap_or("")
        .chars()
        .take(NOTES_MAX_CHARS)
        .collect()
}

/// Build the export record. `now` is supplied by the caller so the output is
/// fully determined by the arguments.
pub fn to_export_record(
    input: &ReviewInput,
    result: &CompositeResult,
    now: DateTime<Utc>,
) -> ExportRecord {
    ExportRecord {
        meta: Meta {
            schema: SCHEMA,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        job: Job {
            date: input.job_date.format("%Y-%m-%d").to_string(),
            trade: input.trade.label().to_string(),
            role: input.role.label().to_string(),
            job_type: input.job_type.label().to_string(),
        },
        worker: Worker {
            name: input.worker_name.clone(),
        },
        metrics: Metrics {
            reliability: ReliabilityMetrics {
                minutes_late: input.minutes_late,
                no_show: input.no_show,
            },
            quality: QualityMetrics {
                workmanship: input.workmanship,
                callback: input.callback_occurred,
                punchlist_resolved: input.punchlist_resolved,
            },
            safety: SafetyMetrics {
                incident: input.safety_incident,
                ppe_adherence: input.ppe_adherence,
            },
            communication: CommunicationMetrics {
                professionalism: input.professionalism,
            },
            customer: CustomerMetrics {
                rating: input.customer_rating,
            },
        },
        composite: Composite {
            score: result.percent,
            band: result.band,
        },
        notes: truncate_notes(input.notes.as_deref()),
        attestation: ATTESTATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{JobType, Role, Trade};
    use crate::scoring::compute_composite;
    use chrono::{NaiveDate, TimeZone};

    fn sample_review() -> ReviewInput {
        let mut review = ReviewInput::sample(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        review.worker_name = "Dana Ruiz".to_string();
        review.trade = Trade::GeneralContractor;
        review.role = Role::Journeyman;
        review.job_type = JobType::RoughIn;
        review.minutes_late = 7;
        review.notes = Some("Clean rough-in, labeled every circuit.".to_string());
        review
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 9, 30, 5).unwrap()
    }

    #[test]
    fn test_export_shape_matches_format() {
        let review = sample_review();
        let result = compute_composite(&review);
        let record = to_export_record(&review, &result, fixed_now());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["meta"]["schema"], "reverse-glassdoor.v1");
        assert_eq!(value["meta"]["createdAt"], "2026-03-15T09:30:05.000Z");
        assert_eq!(value["job"]["date"], "2026-03-14");
        assert_eq!(value["job"]["trade"], "General Contractor");
        assert_eq!(value["job"]["role"], "Journeyman");
        assert_eq!(value["job"]["type"], "Rough-In");
        assert_eq!(value["worker"]["name"], "Dana Ruiz");
        assert_eq!(value["metrics"]["reliability"]["minutesLate"], 7);
        assert_eq!(value["metrics"]["reliability"]["noShow"], false);
        assert_eq!(value["metrics"]["quality"]["workmanship"], 4);
        assert_eq!(value["metrics"]["quality"]["callback"], false);
        assert_eq!(value["metrics"]["quality"]["punchlistResolved"], true);
        assert_eq!(value["metrics"]["safety"]["incident"], false);
        assert_eq!(value["metrics"]["safety"]["ppeAdherence"], 5);
        assert_eq!(value["metrics"]["communication"]["professionalism"], 4);
        assert_eq!(value["metrics"]["customer"]["rating"], 5);
        assert_eq!(value["composite"]["score"], result.percent);
        assert_eq!(value["composite"]["band"], result.band.as_str());
        assert_eq!(value["notes"], "Clean rough-in, labeled every circuit.");
        assert_eq!(value["attestation"], ATTESTATION);
    }

    #[test]
    fn test_top_level_key_order() {
        let review = sample_review();
        let record = to_export_record(&review, &compute_composite(&review), fixed_now());
        let json = record.to_json_pretty().unwrap();

        let keys = ["\"meta\"", "\"job\"", "\"worker\"", "\"metrics\"", "\"composite\"", "\"notes\"", "\"attestation\""];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.starts_with("{\n  \"meta\": {"));
    }

    #[test]
    fn test_long_notes_truncated_to_240_chars() {
        let mut review = sample_review();
        review.notes = Some("a".repeat(300));
        let record = to_export_record(&review, &compute_composite(&review), fixed_now());
        assert_eq!(record.notes.chars().count(), 240);
    }

    #[test]
    fn test_short_notes_pass_through() {
        assert_eq!(truncate_notes(Some("Swept up after")), "Swept up after");
        assert_eq!(truncate_notes(None), "");
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let notes = "é".repeat(250);
        let truncated = truncate_notes(Some(&notes));
        assert_eq!(truncated.chars().count(), 240);
        assert_eq!(truncated.len(), 480);
    }

    #[test]
    fn test_emoji_counts_as_one_character() {
        let notes = format!("{}{}", "a".repeat(239), "🔧🔧");
        let truncated = truncate_notes(Some(&notes));
        assert_eq!(truncated.chars().count(), 240);
        assert!(truncated.ends_with("a🔧"));
    }

    #[test]
    fn test_export_is_deterministic_for_fixed_time() {
        let review = sample_review();
        let result = compute_composite(&review);
        let a = to_export_record(&review, &result, fixed_now());
        let b = to_export_record(&review, &result, fixed_now());
        assert_eq!(a, b);
    }
}

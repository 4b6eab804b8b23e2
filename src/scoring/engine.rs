use super::factors::{
    clamp_rating, quality_score, safety_score, score_lateness, Band, CALLBACK_PENALTY,
    COMMS_WEIGHT, MAX_SUBSCORE, OPEN_PUNCHLIST_PENALTY, QUALITY_WEIGHT, RELIABILITY_WEIGHT,
    SAFETY_INCIDENT_PENALTY, SAFETY_WEIGHT,
};
use crate::review::ReviewInput;
use serde::Serialize;

/// One dimension's share of the composite, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionContribution {
    pub label: &'static str, // "Reliability", "Quality", "Safety", "Communication"
    pub score: f64,          // Sub-score in [0, 5]
    pub weight: f64,
    pub contribution: f64, // score * weight
    pub description: String,
}

/// Derived scorecard for one review. Recomputed from scratch on every input change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResult {
    pub reliability_score: f64,
    pub quality_score: f64,
    pub safety_score: f64,
    pub comms_score: f64,
    /// Weighted sum of the four sub-scores, in [0, 5].
    pub weighted: f64,
    pub percent: u8,
    pub band: Band,
    #[serde(skip)]
    descriptions: [String; 4],
}

impl CompositeResult {
    /// Per-dimension contributions in formula order. Contributions sum to `weighted`.
    pub fn breakdown(&self) -> Vec<DimensionContribution> {
        let dims = [
            ("Reliability", self.reliability_score, RELIABILITY_WEIGHT),
            ("Quality", self.quality_score, QUALITY_WEIGHT),
            ("Safety", self.safety_score, SAFETY_WEIGHT),
            ("Communication", self.comms_score, COMMS_WEIGHT),
        ];
        dims.iter()
            .zip(self.descriptions.iter())
            .map(|(&(label, score, weight), description)| DimensionContribution {
                label,
                score,
                weight,
                contribution: score * weight,
                description: description.clone(),
            })
            .collect()
    }
}

/// Compute the composite score for a review.
///
/// Pure and total: the same input always yields the same result, and any
/// input (including out-of-range ratings) produces a result in range.
/// `customer_rating` is informational and does not enter the formula.
pub fn compute_composite(input: &ReviewInput) -> CompositeResult {
    let reliability = if input.no_show {
        0.0
    } else {
        score_lateness(input.minutes_late as f64) as f64
    };
    let quality = quality_score(
        input.workmanship,
        input.callback_occurred,
        input.punchlist_resolved,
    );
    let safety = safety_score(input.ppe_adherence, input.safety_incident);
    let comms = clamp_rating(input.professionalism);

    // Evaluation order matters for bit-identical results.
    let weighted = reliability * RELIABILITY_WEIGHT
        + quality * QUALITY_WEIGHT
        + safety * SAFETY_WEIGHT
        + comms * COMMS_WEIGHT;

    // f64::round is half-away-from-zero, which is half-up for non-negative values.
    let percent = (weighted / MAX_SUBSCORE * 100.0).round().clamp(0.0, 100.0) as u8;

    CompositeResult {
        reliability_score: reliability,
        quality_score: quality,
        safety_score: safety,
        comms_score: comms,
        weighted,
        percent,
        band: Band::from_percent(percent),
        descriptions: describe(input),
    }
}

fn describe(input: &ReviewInput) -> [String; 4] {
    let reliability = if input.no_show {
        "no-show".to_string()
    } else if input.minutes_late <= 0 {
        "on time".to_string()
    } else {
        format!("{} min late", input.minutes_late)
    };

    let mut quality = format!("workmanship {}", input.workmanship);
    if input.callback_occurred {
        quality.push_str(&format!(", callback -{}", CALLBACK_PENALTY));
    }
    if !input.punchlist_resolved {
        quality.push_str(&format!(", punchlist open -{}", OPEN_PUNCHLIST_PENALTY));
    }

    let mut safety = format!("PPE {}", input.ppe_adherence);
    if input.safety_incident {
        safety.push_str(&format!(", incident -{}", SAFETY_INCIDENT_PENALTY));
    }

    let comms = format!("professionalism {}", input.professionalism);

    [reliability, quality, safety, comms]
}

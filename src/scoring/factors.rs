use serde::{Serialize, Serializer};
use std::fmt;

pub const RELIABILITY_WEIGHT: f64 = 0.30;
pub const QUALITY_WEIGHT: f64 = 0.35;
pub const SAFETY_WEIGHT: f64 = 0.15;
pub const COMMS_WEIGHT: f64 = 0.20;

pub const MAX_SUBSCORE: f64 = 5.0;

pub const CALLBACK_PENALTY: f64 = 1.5;
pub const OPEN_PUNCHLIST_PENALTY: f64 = 0.5;
pub const SAFETY_INCIDENT_PENALTY: f64 = 3.0;

/// Lateness thresholds in minutes, highest first, with the score each earns.
const LATENESS_STEPS: [(f64, u8); 4] = [(45.0, 1), (30.0, 2), (15.0, 3), (5.0, 4)];

/// Score punctuality on a 1-5 scale.
///
/// Thresholds are inclusive at their lower bound: 45 minutes scores 1,
/// 44 scores 2. Non-finite, zero and negative values score 5.
pub fn score_lateness(minutes_late: f64) -> u8 {
    if !minutes_late.is_finite() || minutes_late <= 0.0 {
        return 5;
    }
    LATENESS_STEPS
        .iter()
        .find(|(threshold, _)| minutes_late >= *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(5)
}

/// Clamp a raw rating into the sub-score range [0, 5].
pub fn clamp_rating(rating: i32) -> f64 {
    (rating as f64).clamp(0.0, MAX_SUBSCORE)
}

/// Workmanship less callback and open-punchlist penalties, clamped to [0, 5].
pub fn quality_score(workmanship: i32, callback_occurred: bool, punchlist_resolved: bool) -> f64 {
    let mut score = clamp_rating(workmanship);
    if callback_occurred {
        score -= CALLBACK_PENALTY;
    }
    if !punchlist_resolved {
        score -= OPEN_PUNCHLIST_PENALTY;
    }
    score.clamp(0.0, MAX_SUBSCORE)
}

/// PPE adherence less the incident penalty, floored at 0 and capped at 5.
pub fn safety_score(ppe_adherence: i32, safety_incident: bool) -> f64 {
    let mut score = clamp_rating(ppe_adherence);
    if safety_incident {
        score = (score - SAFETY_INCIDENT_PENALTY).max(0.0);
    }
    score.clamp(0.0, MAX_SUBSCORE)
}

/// Qualitative label for a composite percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Elite,
    Strong,
    Solid,
    Developing,
    AtRisk,
}

impl Band {
    /// Thresholds are inclusive lower bounds, checked top-down; first match wins.
    pub fn from_percent(percent: u8) -> Self {
        if percent >= 90 {
            Band::Elite
        } else if percent >= 75 {
            Band::Strong
        } else if percent >= 60 {
            Band::Solid
        } else if percent >= 40 {
            Band::Developing
        } else {
            Band::AtRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Elite => "Elite",
            Band::Strong => "Strong",
            Band::Solid => "Solid",
            Band::Developing => "Developing",
            Band::AtRisk => "At Risk",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Band {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total = RELIABILITY_WEIGHT + QUALITY_WEIGHT + SAFETY_WEIGHT + COMMS_WEIGHT;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lateness_bands() {
        for minutes in [45.0, 46.0, 60.0, 500.0] {
            assert_eq!(score_lateness(minutes), 1, "{} minutes", minutes);
        }
        for minutes in [30.0, 37.0, 44.0] {
            assert_eq!(score_lateness(minutes), 2, "{} minutes", minutes);
        }
        for minutes in [15.0, 22.0, 29.0] {
            assert_eq!(score_lateness(minutes), 3, "{} minutes", minutes);
        }
        for minutes in [5.0, 9.0, 14.0] {
            assert_eq!(score_lateness(minutes), 4, "{} minutes", minutes);
        }
        for minutes in [0.0, 1.0, 4.0] {
            assert_eq!(score_lateness(minutes), 5, "{} minutes", minutes);
        }
    }

    #[test]
    fn test_lateness_exact_thresholds() {
        assert_eq!(score_lateness(45.0), 1);
        assert_eq!(score_lateness(44.0), 2);
        assert_eq!(score_lateness(4.9), 5);
    }

    #[test]
    fn test_lateness_invalid_defaults_to_best() {
        assert_eq!(score_lateness(-10.0), 5);
        assert_eq!(score_lateness(f64::NAN), 5);
        assert_eq!(score_lateness(f64::INFINITY), 5);
        assert_eq!(score_lateness(f64::NEG_INFINITY), 5);
    }

    #[test]
    fn test_quality_penalties_stack() {
        assert_eq!(quality_score(5, true, false), 3.0);
        assert_eq!(quality_score(5, true, true), 3.5);
        assert_eq!(quality_score(5, false, false), 4.5);
        assert_eq!(quality_score(4, false, true), 4.0);
    }

    #[test]
    fn test_quality_clamped_at_zero() {
        // 1 - 1.5 - 0.5 = -1
        assert_eq!(quality_score(1, true, false), 0.0);
    }

    #[test]
    fn test_safety_incident_floors_at_zero() {
        assert_eq!(safety_score(2, true), 0.0);
        assert_eq!(safety_score(5, true), 2.0);
        assert_eq!(safety_score(5, false), 5.0);
    }

    #[test]
    fn test_out_of_domain_ratings_are_clamped() {
        assert_eq!(clamp_rating(9), 5.0);
        assert_eq!(clamp_rating(-2), 0.0);
        assert_eq!(quality_score(12, false, true), 5.0);
        assert_eq!(safety_score(-4, false), 0.0);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(Band::from_percent(100), Band::Elite);
        assert_eq!(Band::from_percent(90), Band::Elite);
        assert_eq!(Band::from_percent(89), Band::Strong);
        assert_eq!(Band::from_percent(75), Band::Strong);
        assert_eq!(Band::from_percent(74), Band::Solid);
        assert_eq!(Band::from_percent(60), Band::Solid);
        assert_eq!(Band::from_percent(59), Band::Developing);
        assert_eq!(Band::from_percent(40), Band::Developing);
        assert_eq!(Band::from_percent(39), Band::AtRisk);
        assert_eq!(Band::from_percent(0), Band::AtRisk);
    }

    #[test]
    fn test_band_labels() {
        assert_eq!(Band::AtRisk.to_string(), "At Risk");
        assert_eq!(serde_json::to_string(&Band::Elite).unwrap(), "\"Elite\"");
    }
}

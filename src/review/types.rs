use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Lowercase and drop separators so "General Contractor", "general-contractor"
/// and "GeneralContractor" all compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Implements label/parse/serde for a fieldless enum whose text form is its display label.
macro_rules! labeled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Next variant in declaration order, wrapping around.
            pub fn next(&self) -> Self {
                let idx = Self::ALL.iter().position(|v| v == self).unwrap_or(0);
                Self::ALL[(idx + 1) % Self::ALL.len()]
            }

            /// Previous variant in declaration order, wrapping around.
            pub fn previous(&self) -> Self {
                let idx = Self::ALL.iter().position(|v| v == self).unwrap_or(0);
                Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                $(
                    if wanted == normalize($label) || wanted == normalize(stringify!($variant)) {
                        return Ok($name::$variant);
                    }
                )+
                let known: Vec<&str> = Self::ALL.iter().map(|v| v.label()).collect();
                Err(format!("unknown {} '{}' (expected one of: {})", $kind, s, known.join(", ")))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trade {
    Hvac,
    Electrical,
    Plumbing,
    GeneralContractor,
    Carpentry,
    Roofing,
}

labeled_enum!(Trade, "trade", {
    Hvac => "HVAC",
    Electrical => "Electrical",
    Plumbing => "Plumbing",
    GeneralContractor => "General Contractor",
    Carpentry => "Carpentry",
    Roofing => "Roofing",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Tech,
    Apprentice,
    Journeyman,
    Master,
    Installer,
    Foreman,
}

labeled_enum!(Role, "role", {
    Tech => "Tech",
    Apprentice => "Apprentice",
    Journeyman => "Journeyman",
    Master => "Master",
    Installer => "Installer",
    Foreman => "Foreman",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobType {
    ServiceCall,
    Install,
    RoughIn,
    Finish,
    Emergency,
    Maintenance,
}

labeled_enum!(JobType, "job type", {
    ServiceCall => "Service Call",
    Install => "Install",
    RoughIn => "Rough-In",
    Finish => "Finish",
    Emergency => "Emergency",
    Maintenance => "Maintenance",
});

/// One job review as entered on the scorecard form.
///
/// Ratings are nominally 1-5 but are stored as entered; the scoring engine
/// clamps them. `minutes_late` may be negative, which scores as on time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub worker_name: String,
    pub trade: Trade,
    pub role: Role,
    pub job_date: NaiveDate,
    pub job_type: JobType,
    pub minutes_late: i64,
    pub no_show: bool,
    pub callback_occurred: bool,
    pub punchlist_resolved: bool,
    pub workmanship: i32,
    pub safety_incident: bool,
    pub ppe_adherence: i32,
    pub professionalism: i32,
    pub customer_rating: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ReviewInput {
    /// Initial form state: an on-time, clean job with good ratings.
    pub fn sample(job_date: NaiveDate) -> Self {
        Self {
            worker_name: String::new(),
            trade: Trade::Hvac,
            role: Role::Tech,
            job_date,
            job_type: JobType::ServiceCall,
            minutes_late: 0,
            no_show: false,
            callback_occurred: false,
            punchlist_resolved: true,
            workmanship: 4,
            safety_incident: false,
            ppe_adherence: 5,
            professionalism: 4,
            customer_rating: 5,
            notes: None,
        }
    }

    pub fn notes_str(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

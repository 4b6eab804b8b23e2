use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::review::{JobType, Role, Trade};

/// How `score` prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Tsv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "tsv" => Ok(OutputFormat::Tsv),
            other => Err(format!("unknown format '{}' (expected table, json or tsv)", other)),
        }
    }
}

/// Form color theme. `Auto` detects the terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeConfig {
    #[default]
    Auto,
    Dark,
    Light,
}

/// Values the form and CLI start from when a review doesn't set them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<Trade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
}

/// Config file contents.
///
/// Example YAML:
/// ```yaml
/// output_format: table
/// theme: auto
/// export_dir: ./exports
/// defaults:
///   trade: Electrical
///   role: Journeyman
///   job_type: Service Call
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output_format: OutputFormat,

    #[serde(default)]
    pub theme: ThemeConfig,

    /// Directory the form writes exports into when no --out is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    #[serde(default)]
    pub defaults: ReviewDefaults,
}

pub mod init;
mod schema;

pub use schema::{Config, OutputFormat, ReviewDefaults, ThemeConfig};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::review::ReviewInput;

/// Get the config directory path (~/.config/reverse-glassdoor/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("reverse-glassdoor"))
}

/// Get the default config file path (~/.config/reverse-glassdoor/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path.
///
/// A missing file at the default path yields `Config::default()`; a missing
/// file at an explicit path is an error.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed or has unknown keys
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => match get_config_path() {
            Ok(p) => p,
            Err(_) => return Ok(Config::default()),
        },
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

impl Config {
    /// Starting review for a new scorecard: the sample job with configured defaults applied.
    pub fn base_review(&self, today: NaiveDate) -> ReviewInput {
        let mut review = ReviewInput::sample(today);
        if let Some(trade) = self.defaults.trade {
            review.trade = trade;
        }
        if let Some(role) = self.defaults.role {
            review.role = role;
        }
        if let Some(job_type) = self.defaults.job_type {
            review.job_type = job_type;
        }
        review
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{JobType, Role, Trade};
    use std::env;

    #[test]
    fn test_explicit_missing_path_errors() {
        let temp_path = env::temp_dir().join("reverse_glassdoor_test_missing_config.yaml");
        let _ = fs::remove_file(&temp_path);

        let err = load_config(Some(temp_path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_file() {
        let temp_path = env::temp_dir().join("reverse_glassdoor_test_config.yaml");
        fs::write(&temp_path, "output_format: tsv\ndefaults:\n  role: Master\n").unwrap();

        let config = load_config(Some(temp_path.clone())).unwrap();
        assert_eq!(config.output_format, OutputFormat::Tsv);
        assert_eq!(config.defaults.role, Some(Role::Master));

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let temp_path = env::temp_dir().join("reverse_glassdoor_test_bad_config.yaml");
        fs::write(&temp_path, "theme: [unterminated\n").unwrap();

        let err = load_config(Some(temp_path.clone())).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_base_review_applies_defaults() {
        let config = Config {
            defaults: ReviewDefaults {
                trade: Some(Trade::Roofing),
                role: None,
                job_type: Some(JobType::Finish),
            },
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let review = config.base_review(today);
        assert_eq!(review.trade, Trade::Roofing);
        assert_eq!(review.role, Role::Tech);
        assert_eq!(review.job_type, JobType::Finish);
        assert_eq!(review.job_date, today);
    }
}

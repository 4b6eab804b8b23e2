use super::types::ReviewInput;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Review file formats, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFormat {
    Yaml,
    Json,
}

impl ReviewFormat {
    /// `.yaml`/`.yml` are YAML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ReviewFormat::Yaml,
            _ => ReviewFormat::Json,
        }
    }
}

/// Parse review text in the given format and layer it over `base`.
///
/// The file may set any subset of fields; the rest keep their `base` values.
/// A `null` value leaves the base value in place.
pub fn parse_review(content: &str, format: ReviewFormat, base: ReviewInput) -> Result<ReviewInput> {
    let partial: Value = match format {
        ReviewFormat::Yaml => {
            serde_saphyr::from_str(content).context("Failed to parse review: invalid YAML")?
        }
        ReviewFormat::Json => {
            serde_json::from_str(content).context("Failed to parse review: invalid JSON")?
        }
    };

    let fields = match partial {
        Value::Object(fields) => fields,
        // An empty YAML document
        Value::Null => return Ok(base),
        other => anyhow::bail!(
            "Failed to parse review: expected a mapping of fields, found {}",
            other
        ),
    };

    let mut merged = match serde_json::to_value(&base).context("Failed to serialize base review")? {
        Value::Object(map) => map,
        _ => anyhow::bail!("Failed to serialize base review"),
    };
    for (key, value) in fields {
        if !value.is_null() {
            merged.insert(key, value);
        }
    }

    serde_json::from_value(Value::Object(merged)).context("Failed to parse review: invalid field value")
}

/// Load a review from a YAML or JSON file, layered over `base`.
pub fn load_review(path: &Path, base: ReviewInput) -> Result<ReviewInput> {
    if !path.exists() {
        anyhow::bail!("Review file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read review file at {}", path.display()))?;

    parse_review(&content, ReviewFormat::from_path(path), base)
        .with_context(|| format!("Failed to load review from {}", path.display()))
}

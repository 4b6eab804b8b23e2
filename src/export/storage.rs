use super::record::ExportRecord;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::review::ReviewInput;

/// Default export file name: `scorecard-<date>-<worker-slug>.json`.
pub fn default_export_file_name(input: &ReviewInput) -> String {
    let slug: String = input
        .worker_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let slug = if slug.is_empty() { "worker".to_string() } else { slug };
    format!("scorecard-{}-{}.json", input.job_date.format("%Y-%m-%d"), slug)
}

/// Where the form writes its export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// A file path given explicitly; used as is.
    File(PathBuf),
    /// A directory; the file name follows the review at export time.
    /// An empty path means the current directory.
    Directory(PathBuf),
}

impl ExportTarget {
    pub fn path_for(&self, input: &ReviewInput) -> PathBuf {
        match self {
            ExportTarget::File(path) => path.clone(),
            ExportTarget::Directory(dir) => dir.join(default_export_file_name(input)),
        }
    }
}

/// Write an export record to a JSON file atomically
///
/// The file is either fully written or left untouched.
/// Creates the parent directory if it doesn't exist.
pub fn write_export(path: &Path, record: &ExportRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let json = record.to_json_pretty().context("Failed to serialize export")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(json.as_bytes())
        .and_then(|_| file.write_all(b"\n"))
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::to_export_record;
    use crate::scoring::compute_composite;
    use chrono::{NaiveDate, Utc};
    use std::env;

    fn sample_review() -> ReviewInput {
        let mut review = ReviewInput::sample(NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        review.worker_name = "  Mary-Kate O'Neil ".to_string();
        review
    }

    #[test]
    fn test_default_file_name_slugifies_worker() {
        assert_eq!(
            default_export_file_name(&sample_review()),
            "scorecard-2026-08-03-mary-kate-o-neil.json"
        );
    }

    #[test]
    fn test_default_file_name_without_worker() {
        let mut review = sample_review();
        review.worker_name.clear();
        assert_eq!(
            default_export_file_name(&review),
            "scorecard-2026-08-03-worker.json"
        );
    }

    #[test]
    fn test_directory_target_follows_worker_name() {
        let target = ExportTarget::Directory(PathBuf::from("cards"));
        let mut review = sample_review();
        review.worker_name.clear();
        assert_eq!(
            target.path_for(&review),
            PathBuf::from("cards").join("scorecard-2026-08-03-worker.json")
        );

        review.worker_name = "Rae Chen".to_string();
        assert_eq!(
            target.path_for(&review),
            PathBuf::from("cards").join("scorecard-2026-08-03-rae-chen.json")
        );
    }

    #[test]
    fn test_file_target_is_fixed() {
        let target = ExportTarget::File(PathBuf::from("out/card.json"));
        assert_eq!(target.path_for(&sample_review()), PathBuf::from("out/card.json"));
    }

    #[test]
    fn test_empty_directory_target_is_relative_file_name() {
        let target = ExportTarget::Directory(PathBuf::new());
        assert_eq!(
            target.path_for(&sample_review()),
            PathBuf::from("scorecard-2026-08-03-mary-kate-o-neil.json")
        );
    }

    #[test]
    fn test_write_export_creates_dirs_and_json() {
        let dir = env::temp_dir().join("reverse_glassdoor_test_exports");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("card.json");

        let review = sample_review();
        let record = to_export_record(&review, &compute_composite(&review), Utc::now());
        write_export(&path, &record).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["meta"]["schema"], "reverse-glassdoor.v1");
        assert_eq!(value["worker"]["name"], "  Mary-Kate O'Neil ");

        let _ = std::fs::remove_dir_all(&dir);
    }
}

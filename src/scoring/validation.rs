use crate::export::NOTES_MAX_CHARS;
use crate::review::ReviewInput;

/// Check a review for out-of-domain values.
/// Returns all problems at once (not just the first). Scoring still works on
/// an invalid review; these are warnings unless the caller asks for strictness.
pub fn validate_review(input: &ReviewInput) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if input.worker_name.trim().is_empty() {
        errors.push("workerName: empty".to_string());
    }

    if input.minutes_late < 0 {
        errors.push(format!(
            "minutesLate: {} is negative, scored as on time",
            input.minutes_late
        ));
    }

    let ratings = [
        ("workmanship", input.workmanship),
        ("ppeAdherence", input.ppe_adherence),
        ("professionalism", input.professionalism),
        ("customerRating", input.customer_rating),
    ];
    for (field, value) in ratings {
        if !(1..=5).contains(&value) {
            errors.push(format!("{}: {} is outside 1-5, clamped", field, value));
        }
    }

    let notes_len = input.notes_str().chars().count();
    if notes_len > NOTES_MAX_CHARS {
        errors.push(format!(
            "notes: {} characters, export keeps the first {}",
            notes_len, NOTES_MAX_CHARS
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use std::time::Instant;

use crate::export::{to_export_record, write_export, ExportTarget, NOTES_MAX_CHARS};
use crate::review::ReviewInput;
use crate::scoring::{compute_composite, CompositeResult};
use crate::tui::theme::ThemeColors;

/// UI clamp for the lateness stepper; the engine itself accepts any value.
pub const MAX_FORM_MINUTES_LATE: i64 = 60;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
const WORKER_NAME_MAX_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    WorkerName,
    Trade,
    Role,
    JobDate,
    JobType,
    MinutesLate,
    NoShow,
    CallbackOccurred,
    PunchlistResolved,
    Workmanship,
    SafetyIncident,
    PpeAdherence,
    Professionalism,
    CustomerRating,
    Notes,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::WorkerName,
        Field::Trade,
        Field::Role,
        Field::JobDate,
        Field::JobType,
        Field::MinutesLate,
        Field::NoShow,
        Field::CallbackOccurred,
        Field::PunchlistResolved,
        Field::Workmanship,
        Field::SafetyIncident,
        Field::PpeAdherence,
        Field::Professionalism,
        Field::CustomerRating,
        Field::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::WorkerName => "Worker",
            Field::Trade => "Trade",
            Field::Role => "Role",
            Field::JobDate => "Job date",
            Field::JobType => "Job type",
            Field::MinutesLate => "Minutes late",
            Field::NoShow => "No-show",
            Field::CallbackOccurred => "Callback",
            Field::PunchlistResolved => "Punchlist resolved",
            Field::Workmanship => "Workmanship",
            Field::SafetyIncident => "Safety incident",
            Field::PpeAdherence => "PPE adherence",
            Field::Professionalism => "Professionalism",
            Field::CustomerRating => "Customer rating",
            Field::Notes => "Notes",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Field::WorkerName | Field::Notes)
    }

    pub fn is_toggle(&self) -> bool {
        matches!(
            self,
            Field::NoShow | Field::CallbackOccurred | Field::PunchlistResolved | Field::SafetyIncident
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    EditText,
    Help,
    JsonPreview,
}

pub struct App {
    pub review: ReviewInput,
    pub result: CompositeResult,
    initial: ReviewInput,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub text_input: String,
    pub preview_scroll: u16,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub export_target: ExportTarget,
    pub colors: ThemeColors,
}

impl App {
    pub fn new(review: ReviewInput, export_target: ExportTarget, colors: ThemeColors) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        table_state.select(Some(0));
        let result = compute_composite(&review);

        Self {
            initial: review.clone(),
            review,
            result,
            table_state,
            input_mode: InputMode::Normal,
            text_input: String::new(),
            preview_scroll: 0,
            flash_message: None,
            should_quit: false,
            export_target,
            colors,
        }
    }

    /// Recompute the composite from the current review. Called after every edit.
    pub fn recompute(&mut self) {
        self.result = compute_composite(&self.review);
    }

    pub fn selected_field(&self) -> Field {
        let idx = self.table_state.selected().unwrap_or(0);
        Field::ALL[idx.min(Field::ALL.len() - 1)]
    }

    pub fn next_field(&mut self) {
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < Field::ALL.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_field(&mut self) {
        let i = match self.table_state.selected() {
            Some(0) | None => Field::ALL.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Step the selected field up (`delta > 0`) or down. Enums cycle, numbers
    /// stay inside the form's ranges, booleans toggle, text is left alone.
    pub fn adjust(&mut self, delta: i32) {
        let up = delta > 0;
        let field = self.selected_field();
        let review = &mut self.review;
        match field {
            Field::Trade => {
                review.trade = if up { review.trade.next() } else { review.trade.previous() }
            }
            Field::Role => review.role = if up { review.role.next() } else { review.role.previous() },
            Field::JobType => {
                review.job_type = if up {
                    review.job_type.next()
                } else {
                    review.job_type.previous()
                }
            }
            Field::JobDate => {
                if let Some(date) = review
                    .job_date
                    .checked_add_signed(Duration::days(delta as i64))
                {
                    review.job_date = date;
                }
            }
            Field::MinutesLate => {
                review.minutes_late =
                    (review.minutes_late + delta as i64).clamp(0, MAX_FORM_MINUTES_LATE)
            }
            Field::Workmanship => review.workmanship = step_rating(review.workmanship, delta),
            Field::PpeAdherence => review.ppe_adherence = step_rating(review.ppe_adherence, delta),
            Field::Professionalism => {
                review.professionalism = step_rating(review.professionalism, delta)
            }
            Field::CustomerRating => {
                review.customer_rating = step_rating(review.customer_rating, delta)
            }
            Field::NoShow
            | Field::CallbackOccurred
            | Field::PunchlistResolved
            | Field::SafetyIncident => {
                self.toggle();
                return;
            }
            Field::WorkerName | Field::Notes => return,
        }
        self.recompute();
    }

    /// Flip the selected boolean field
    pub fn toggle(&mut self) {
        let field = self.selected_field();
        let review = &mut self.review;
        match field {
            Field::NoShow => review.no_show = !review.no_show,
            Field::CallbackOccurred => review.callback_occurred = !review.callback_occurred,
            Field::PunchlistResolved => review.punchlist_resolved = !review.punchlist_resolved,
            Field::SafetyIncident => review.safety_incident = !review.safety_incident,
            _ => return,
        }
        self.recompute();
    }

    /// Enter/space on the selected row: edit text, toggle booleans, else nothing
    pub fn activate_selected(&mut self) {
        let field = self.selected_field();
        if field.is_text() {
            self.start_text_input();
        } else if field.is_toggle() {
            self.toggle();
        }
    }

    pub fn start_text_input(&mut self) {
        self.text_input = match self.selected_field() {
            Field::WorkerName => self.review.worker_name.clone(),
            Field::Notes => self.review.notes_str().to_string(),
            _ => return,
        };
        self.input_mode = InputMode::EditText;
    }

    /// Character limit for the field being edited
    pub fn text_limit(&self) -> usize {
        match self.selected_field() {
            Field::Notes => NOTES_MAX_CHARS,
            _ => WORKER_NAME_MAX_CHARS,
        }
    }

    pub fn push_text_char(&mut self, c: char) {
        if self.text_input.chars().count() < self.text_limit() {
            self.text_input.push(c);
        }
    }

    pub fn confirm_text_input(&mut self) {
        let value = std::mem::take(&mut self.text_input);
        match self.selected_field() {
            Field::WorkerName => self.review.worker_name = value.trim().to_string(),
            Field::Notes => {
                self.review.notes = if value.trim().is_empty() { None } else { Some(value) }
            }
            _ => {}
        }
        self.input_mode = InputMode::Normal;
        self.recompute();
    }

    pub fn cancel_text_input(&mut self) {
        self.text_input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Restore the review the form was opened with
    pub fn reset(&mut self) {
        self.review = self.initial.clone();
        self.recompute();
        self.show_flash("Form reset".to_string());
    }

    /// Display value for a field
    pub fn field_value(&self, field: Field) -> String {
        let review = &self.review;
        let yes_no = |b: bool| (if b { "Yes" } else { "No" }).to_string();
        match field {
            Field::WorkerName => {
                if review.worker_name.is_empty() {
                    "(enter name)".to_string()
                } else {
                    review.worker_name.clone()
                }
            }
            Field::Trade => review.trade.to_string(),
            Field::Role => review.role.to_string(),
            Field::JobDate => review.job_date.format("%Y-%m-%d").to_string(),
            Field::JobType => review.job_type.to_string(),
            Field::MinutesLate => review.minutes_late.to_string(),
            Field::NoShow => yes_no(review.no_show),
            Field::CallbackOccurred => yes_no(review.callback_occurred),
            Field::PunchlistResolved => yes_no(review.punchlist_resolved),
            Field::Workmanship => format!("{}/5", review.workmanship),
            Field::SafetyIncident => yes_no(review.safety_incident),
            Field::PpeAdherence => format!("{}/5", review.ppe_adherence),
            Field::Professionalism => format!("{}/5", review.professionalism),
            Field::CustomerRating => format!("{}/5", review.customer_rating),
            Field::Notes => {
                let notes = review.notes_str();
                if notes.is_empty() {
                    "(none)".to_string()
                } else {
                    format!("{} chars", notes.chars().count())
                }
            }
        }
    }

    /// Export JSON for the preview popup
    pub fn export_preview(&self, now: DateTime<Utc>) -> String {
        let record = to_export_record(&self.review, &self.result, now);
        record
            .to_json_pretty()
            .unwrap_or_else(|e| format!("Failed to render export: {}", e))
    }

    pub fn toggle_preview(&mut self) {
        self.input_mode = match self.input_mode {
            InputMode::JsonPreview => InputMode::Normal,
            _ => {
                self.preview_scroll = 0;
                InputMode::JsonPreview
            }
        };
    }

    /// Scroll the preview by one line, stopping at its last line.
    pub fn scroll_preview(&mut self, down: bool) {
        self.preview_scroll = if down {
            let last_line = self.export_preview(Utc::now()).lines().count().saturating_sub(1);
            let max = u16::try_from(last_line).unwrap_or(u16::MAX);
            self.preview_scroll.saturating_add(1).min(max)
        } else {
            self.preview_scroll.saturating_sub(1)
        };
    }

    /// Export file for the review as it stands now
    pub fn export_path(&self) -> PathBuf {
        self.export_target.path_for(&self.review)
    }

    /// Write the export file and report the outcome as a flash message.
    /// A failed write never touches the review or the score.
    pub fn export(&mut self, now: DateTime<Utc>) {
        let record = to_export_record(&self.review, &self.result, now);
        let path = self.export_path();
        match write_export(&path, &record) {
            Ok(()) => {
                crate::verbose_eprintln!("Exported scorecard to {}", path.display());
                self.show_flash(format!("Exported: {}", path.display()));
            }
            Err(e) => {
                crate::buffered_eprintln!("Export failed: {:#}", e);
                self.show_flash(format!("Failed to export: {}", e));
            }
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }
}

fn step_rating(value: i32, delta: i32) -> i32 {
    (value + delta).clamp(MIN_RATING, MAX_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::Trade;
    use crate::scoring::Band;
    use chrono::NaiveDate;
    use std::env;

    fn sample_app() -> App {
        let review = ReviewInput::sample(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        App::new(
            review,
            ExportTarget::File(env::temp_dir().join("reverse_glassdoor_test_app_export.json")),
            ThemeColors::dark(),
        )
    }

    fn select(app: &mut App, field: Field) {
        let idx = Field::ALL.iter().position(|f| *f == field).unwrap();
        app.table_state.select(Some(idx));
    }

    #[test]
    fn test_new_computes_initial_score() {
        let app = sample_app();
        assert_eq!(app.result.percent, 89);
        assert_eq!(app.result.band, Band::Strong);
        assert_eq!(app.selected_field(), Field::WorkerName);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = sample_app();
        app.previous_field();
        assert_eq!(app.selected_field(), Field::Notes);
        app.next_field();
        assert_eq!(app.selected_field(), Field::WorkerName);
    }

    #[test]
    fn test_adjust_recomputes_score() {
        let mut app = sample_app();
        select(&mut app, Field::Workmanship);
        app.adjust(1);
        assert_eq!(app.review.workmanship, 5);
        // 5*.3 + 5*.35 + 5*.15 + 4*.2 = 4.8 -> 96%
        assert_eq!(app.result.percent, 96);
        assert_eq!(app.result.band, Band::Elite);
    }

    #[test]
    fn test_ratings_stay_in_form_range() {
        let mut app = sample_app();
        select(&mut app, Field::PpeAdherence);
        app.adjust(1);
        app.adjust(1);
        assert_eq!(app.review.ppe_adherence, 5);
        for _ in 0..10 {
            app.adjust(-1);
        }
        assert_eq!(app.review.ppe_adherence, 1);
    }

    #[test]
    fn test_minutes_late_clamped_to_sixty() {
        let mut app = sample_app();
        select(&mut app, Field::MinutesLate);
        app.adjust(-1);
        assert_eq!(app.review.minutes_late, 0);
        app.review.minutes_late = 59;
        app.adjust(1);
        app.adjust(1);
        assert_eq!(app.review.minutes_late, 60);
        assert_eq!(app.result.reliability_score, 1.0);
    }

    #[test]
    fn test_enum_cycles_and_date_steps() {
        let mut app = sample_app();
        select(&mut app, Field::Trade);
        app.adjust(-1);
        assert_eq!(app.review.trade, Trade::Roofing);

        select(&mut app, Field::JobDate);
        app.adjust(1);
        assert_eq!(app.review.job_date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn test_toggle_no_show() {
        let mut app = sample_app();
        select(&mut app, Field::NoShow);
        app.activate_selected();
        assert!(app.review.no_show);
        assert_eq!(app.result.reliability_score, 0.0);
        app.adjust(1);
        assert!(!app.review.no_show);
    }

    #[test]
    fn test_edit_worker_name() {
        let mut app = sample_app();
        app.activate_selected();
        assert_eq!(app.input_mode, InputMode::EditText);
        for c in "Rae Chen ".chars() {
            app.push_text_char(c);
        }
        app.confirm_text_input();
        assert_eq!(app.review.worker_name, "Rae Chen");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_notes_input_stops_at_limit() {
        let mut app = sample_app();
        select(&mut app, Field::Notes);
        app.start_text_input();
        for _ in 0..300 {
            app.push_text_char('n');
        }
        app.confirm_text_input();
        assert_eq!(app.review.notes_str().chars().count(), NOTES_MAX_CHARS);
    }

    #[test]
    fn test_cancel_edit_keeps_value() {
        let mut app = sample_app();
        app.review.worker_name = "Kim".to_string();
        app.start_text_input();
        app.push_text_char('!');
        app.cancel_text_input();
        assert_eq!(app.review.worker_name, "Kim");
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut app = sample_app();
        select(&mut app, Field::SafetyIncident);
        app.toggle();
        assert!(app.review.safety_incident);
        app.reset();
        assert!(!app.review.safety_incident);
        assert_eq!(app.result.percent, 89);
    }

    #[test]
    fn test_export_preview_contains_schema() {
        let app = sample_app();
        let preview = app.export_preview(Utc::now());
        assert!(preview.contains("\"schema\": \"reverse-glassdoor.v1\""));
        assert!(preview.contains("\"band\": \"Strong\""));
    }

    #[test]
    fn test_export_failure_flashes_and_keeps_score() {
        let mut app = sample_app();
        // Parent "directory" is a regular file, so the export cannot be written
        let blocker = env::temp_dir().join("reverse_glassdoor_test_blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        app.export_target = ExportTarget::File(blocker.join("card.json"));
        let before = app.result.clone();
        app.export(Utc::now());

        let (msg, _) = app.flash_message.clone().unwrap();
        assert!(msg.starts_with("Failed to export"));
        assert_eq!(app.result, before);
        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn test_export_writes_file() {
        let mut app = sample_app();
        let _ = std::fs::remove_file(app.export_path());
        app.export(Utc::now());

        let (msg, _) = app.flash_message.clone().unwrap();
        assert!(msg.starts_with("Exported:"));
        assert!(app.export_path().exists());
        let _ = std::fs::remove_file(app.export_path());
    }

    #[test]
    fn test_export_name_follows_name_typed_in_form() {
        let dir = env::temp_dir().join("reverse_glassdoor_test_form_exports");
        let _ = std::fs::remove_dir_all(&dir);
        let mut app = sample_app();
        app.export_target = ExportTarget::Directory(dir.clone());
        assert_eq!(app.export_path(), dir.join("scorecard-2026-10-17-worker.json"));

        app.start_text_input();
        for c in "Rae Chen".chars() {
            app.push_text_char(c);
        }
        app.confirm_text_input();
        app.export(Utc::now());

        let expected = dir.join("scorecard-2026-10-17-rae-chen.json");
        assert_eq!(app.export_path(), expected);
        assert!(expected.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_preview_scroll_stops_at_last_line() {
        let mut app = sample_app();
        app.toggle_preview();
        let lines = app.export_preview(Utc::now()).lines().count() as u16;
        for _ in 0..(lines + 20) {
            app.scroll_preview(true);
        }
        assert_eq!(app.preview_scroll, lines - 1);
        app.scroll_preview(false);
        assert_eq!(app.preview_scroll, lines - 2);
    }
}

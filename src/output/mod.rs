pub mod formatter;

pub use formatter::{
    format_band, format_breakdown, format_job_line, format_review_problems, format_scorecard,
    format_subscore, format_tsv,
    score_bar, should_use_colors,
};

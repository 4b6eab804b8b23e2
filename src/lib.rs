pub mod config;
pub mod diagnostics;
pub mod export;
pub mod output;
pub mod review;
pub mod scoring;
pub mod tui;

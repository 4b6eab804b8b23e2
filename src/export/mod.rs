pub mod record;
pub mod storage;

pub use record::{to_export_record, truncate_notes, ExportRecord, ATTESTATION, NOTES_MAX_CHARS, SCHEMA};
pub use storage::{default_export_file_name, write_export, ExportTarget};

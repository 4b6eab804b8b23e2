pub mod overrides;
pub mod storage;
pub mod types;

pub use overrides::{parse_minutes_late, ReviewOverrides};
pub use storage::{load_review, parse_review, ReviewFormat};
pub use types::{JobType, ReviewInput, Role, Trade};

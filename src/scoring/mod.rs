pub mod engine;
pub mod factors;
pub mod validation;

pub use engine::{compute_composite, CompositeResult, DimensionContribution};
pub use factors::{score_lateness, Band};
pub use validation::validate_review;

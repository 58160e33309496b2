//! Outcome prediction
//!
//! Training-example assembly, the seeded tree ensemble, and the
//! trained/fallback predictor that scores generated schedules.

pub mod forest;
pub mod inference;
pub mod scaler;
pub mod training;

pub use inference::{export_csv, OutcomePredictor};

//! Model evaluators.
//!
//! Pure functions from a patient record and a parameter bundle to a result.
//! None of them perform I/O or touch shared state.

pub mod framingham;
pub mod pooled_cohort;
pub mod score2;

pub use score2::{Score2Estimate, Score2Input};

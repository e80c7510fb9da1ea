//! Domain layer: Core clinical types and risk arithmetic.
//!
//! This module contains pure Rust types with no I/O.
//! Parameter structures validate themselves on construction from payloads.

mod assessment;
pub mod categorize;
pub mod embedded;
pub mod models;
pub mod normalize;
mod params;
mod patient;

pub use assessment::{
    AgeTier, BandIndices, Method, RiskAssessment, RiskCategory, RiskModel, RiskReport,
    Score2Provenance, Score2Tier,
};
pub use params::{
    find_cutpoint, find_interval, FraminghamParams, PooledCohortParams, Score2CoefficientSet,
    Score2Coefficients, Score2Key, Score2Table, Score2TableSet, SmokingGrids, ValueGrid,
    SCORE2_FEATURES,
};
pub use patient::{PatientInput, PatientRecord, Region, Sex};

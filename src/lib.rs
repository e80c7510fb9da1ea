//! # Cardiorisk
//!
//! 10-year cardiovascular risk estimation for adult patients.
//!
//! This crate provides:
//! - Framingham General CVD (D'Agostino 2008)
//! - ESC SCORE2 / SCORE2-OP (2021) with chart, equation and approximation tiers
//! - ACC/AHA Pooled Cohort Equations (Goff 2013)
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Patient record, result types, model arithmetic, embedded constants
//! - `ports`: Trait definitions for optional parameter payloads
//! - `adapters`: JSON payload loader
//! - `application`: Coefficient store, SCORE2 tier resolver, scoring service

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{acc_aha, framingham, score2, CoefficientStore, RiskConfig, RiskService};
pub use domain::{
    Method, PatientInput, PatientRecord, Region, RiskAssessment, RiskCategory, RiskModel,
    RiskReport, Score2Tier, Sex,
};

/// Result type for cardiorisk operations
pub type Result<T> = std::result::Result<T, RiskError>;

/// Main error type for cardiorisk
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {0} is not a finite number")]
    NonFinite(&'static str),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

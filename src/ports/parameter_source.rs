//! Parameter source port: Trait for optional external model parameters.
//!
//! This trait abstracts where SCORE2 coefficient and chart overrides come
//! from (JSON files, embedded-only) from the coefficient store.

use std::fmt;
use std::path::PathBuf;

use crate::domain::{Score2CoefficientSet, Score2TableSet};

/// Outcome of an attempt to load an optional payload.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// Payload found and validated.
    Loaded(Loaded<T>),
    /// No usable payload; embedded constants stay in effect.
    Absent(AbsentReason),
}

impl<T> LoadOutcome<T> {
    #[must_use]
    pub fn loaded(self) -> Option<Loaded<T>> {
        match self {
            Self::Loaded(l) => Some(l),
            Self::Absent(_) => None,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// A validated payload with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub provenance: ParameterProvenance,
}

/// Where a loaded payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterProvenance {
    pub path: PathBuf,
    /// SHA-256 of the raw payload bytes, hex encoded
    pub sha256: String,
}

impl fmt::Display for ParameterProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (sha256={})", self.path.display(), self.sha256)
    }
}

/// Why a payload was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsentReason {
    /// The source is configured not to supply this payload.
    Disabled,
    /// No file at the expected location.
    NotFound(PathBuf),
    /// The payload held only zero-weight placeholder bundles.
    Placeholder,
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "external parameters disabled"),
            Self::NotFound(path) => write!(f, "{} not found", path.display()),
            Self::Placeholder => write!(f, "payload contains placeholder coefficients"),
        }
    }
}

/// Trait for loading optional SCORE2 parameter payloads.
///
/// Called once per process by the coefficient store.
pub trait ParameterSource: Send + Sync {
    /// Error type for unreadable or malformed payloads.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the SCORE2 / SCORE2-OP coefficient payload.
    ///
    /// # Errors
    /// Returns error if the payload exists but cannot be read or parsed.
    fn load_score2_coefficients(&self) -> Result<LoadOutcome<Score2CoefficientSet>, Self::Error>;

    /// Load the SCORE2 / SCORE2-OP risk-chart payload.
    ///
    /// # Errors
    /// Returns error if the payload exists but cannot be read or parsed.
    fn load_score2_tables(&self) -> Result<LoadOutcome<Score2TableSet>, Self::Error>;
}

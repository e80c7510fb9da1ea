//! Adapters layer: Concrete implementations of ports.
//!
//! - `json_params`: SCORE2 coefficient and chart payloads read from JSON files

pub mod json_params;

pub use json_params::{EmbeddedOnly, JsonParameterSource, ParameterError};

//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the scoring core and where its optional parameters come from.

mod parameter_source;

pub use parameter_source::{AbsentReason, LoadOutcome, Loaded, ParameterProvenance, ParameterSource};

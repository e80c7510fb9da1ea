//! Application layer: Use cases and services.
//!
//! This module wires the domain evaluators to the parameter store and
//! exposes the scoring entry points.

mod config;
mod resolver;
mod service;
mod store;

pub use config::{RiskConfig, DEFAULT_PARAMS_DIR};
pub use resolver::{CoefficientStrategy, Score2Resolver, Score2Strategy, TableStrategy};
pub use service::{acc_aha, framingham, score2, RiskService};
pub use store::CoefficientStore;

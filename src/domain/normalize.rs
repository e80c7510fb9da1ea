//! Input normalization shared by every evaluator.
//!
//! Clamping here is silent: the core always produces an estimate and leaves
//! range warnings to the caller's validator.

/// Floor applied before taking a logarithm.
pub const LN_EPSILON: f64 = 1e-6;

/// mg/dL per mmol/L for cholesterol.
pub const CHOLESTEROL_MGDL_PER_MMOL: f64 = 38.67;

/// Natural log with the argument floored at `LN_EPSILON`.
///
/// NaN arguments are floored as well, since `f64::max` ignores NaN.
#[inline]
#[must_use]
pub fn safe_ln(value: f64) -> f64 {
    value.max(LN_EPSILON).ln()
}

/// Clamp into `[low, high]`; NaN maps to `low`.
#[inline]
#[must_use]
pub fn clamp(value: f64, low: f64, high: f64) -> f64 {
    if value.is_nan() {
        low
    } else {
        value.clamp(low, high)
    }
}

/// Map a boolean risk factor to its 0/1 indicator.
#[inline]
#[must_use]
pub fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Convert a cholesterol concentration from mg/dL to mmol/L.
#[inline]
#[must_use]
pub fn mgdl_to_mmol(mg_dl: f64) -> f64 {
    mg_dl / CHOLESTEROL_MGDL_PER_MMOL
}

/// Non-HDL cholesterol in mmol/L, preferring an explicit non-HDL value.
#[must_use]
pub fn non_hdl_mmol(total_cholesterol: f64, hdl: f64, non_hdl: Option<f64>) -> f64 {
    let mg_dl = non_hdl.unwrap_or_else(|| (total_cholesterol - hdl).max(0.0));
    mgdl_to_mmol(mg_dl)
}

/// Round to one decimal place.
#[inline]
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Proportional-hazards risk: `1 - S0^exp(L - mean)`, as a fraction.
#[inline]
#[must_use]
pub fn survival_risk(baseline_survival: f64, linear_predictor: f64, mean_predictor: f64) -> f64 {
    1.0 - baseline_survival.powf((linear_predictor - mean_predictor).exp())
}

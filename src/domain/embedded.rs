//! Built-in model constants.
//!
//! Framingham: D'Agostino RB et al. General cardiovascular risk profile for use
//! in primary care. Circulation. 2008;117:743-753.
//!
//! ACC/AHA: Goff DC Jr et al. 2013 ACC/AHA guideline on the assessment of
//! cardiovascular risk. Pooled cohort equations, white men and white women.
//!
//! SCORE2 coefficients are not embedded. The built-in bundles are zero-weight
//! placeholders; the official values must be supplied through the coefficient
//! payload (see `adapters::json_params`).

use super::params::{FraminghamParams, PooledCohortParams, Score2Coefficients};

pub const FRAMINGHAM_MEN: FraminghamParams = FraminghamParams {
    ln_age: 3.06117,
    ln_total_cholesterol: 1.12370,
    ln_hdl: -0.93263,
    ln_sbp_treated: 1.99881,
    ln_sbp_untreated: 1.93303,
    smoker: 0.65451,
    diabetes: 0.57367,
    baseline_survival: 0.88936,
    mean_predictor: 23.9802,
};

pub const FRAMINGHAM_WOMEN: FraminghamParams = FraminghamParams {
    ln_age: 2.32888,
    ln_total_cholesterol: 1.20904,
    ln_hdl: -0.70833,
    ln_sbp_treated: 2.82263,
    ln_sbp_untreated: 2.76157,
    smoker: 0.52873,
    diabetes: 0.69154,
    baseline_survival: 0.95012,
    mean_predictor: 26.1931,
};

pub const POOLED_COHORT_WHITE_MEN: PooledCohortParams = PooledCohortParams {
    ln_age: 12.344,
    ln_age_squared: 0.0,
    ln_total_cholesterol: 11.853,
    ln_hdl: -7.990,
    ln_sbp_treated: 1.797,
    ln_sbp_untreated: 1.764,
    smoker: 7.837,
    diabetes: 0.658,
    ln_age_x_ln_total_cholesterol: -2.664,
    ln_age_x_ln_hdl: 1.769,
    ln_age_x_smoker: -1.795,
    baseline_survival: 0.9144,
    mean_predictor: 61.18,
};

pub const POOLED_COHORT_WHITE_WOMEN: PooledCohortParams = PooledCohortParams {
    ln_age: -29.799,
    ln_age_squared: 4.884,
    ln_total_cholesterol: 13.540,
    ln_hdl: -13.578,
    ln_sbp_treated: 2.019,
    ln_sbp_untreated: 1.957,
    smoker: 7.574,
    diabetes: 0.661,
    ln_age_x_ln_total_cholesterol: -3.114,
    ln_age_x_ln_hdl: 3.149,
    ln_age_x_smoker: -1.665,
    baseline_survival: 0.9665,
    mean_predictor: -29.18,
};

/// Built-in SCORE2 / SCORE2-OP bundle for every key.
pub const SCORE2_PLACEHOLDER: Score2Coefficients = Score2Coefficients::placeholder();

// === SCORE2 calibrated approximation ===

/// Weight on ln(age / 40)
pub const APPROX_AGE_WEIGHT: f64 = 8.0;
pub const APPROX_AGE_FLOOR: f64 = 40.0;
pub const APPROX_AGE_CEILING: f64 = 89.0;

/// Percentage points per mmol/L of non-HDL above the baseline
pub const APPROX_CHOLESTEROL_WEIGHT: f64 = 0.8;
pub const APPROX_CHOLESTEROL_BASELINE: f64 = 4.0;
pub const APPROX_NON_HDL_RANGE: (f64, f64) = (3.0, 7.9);

/// Percentage points per mmHg above the baseline
pub const APPROX_SBP_WEIGHT: f64 = 0.05;
pub const APPROX_SBP_BASELINE: f64 = 120.0;
pub const APPROX_SBP_RANGE: (f64, f64) = (100.0, 179.0);

pub const APPROX_SMOKING_ADDEND: f64 = 2.0;

/// Upper bound of the approximation, in percent
pub const APPROX_CAP: f64 = 25.0;

/// Regional calibration: low, moderate, high, very high.
pub const APPROX_REGION_SCALE: [f64; 4] = [0.90, 1.00, 1.30, 1.60];

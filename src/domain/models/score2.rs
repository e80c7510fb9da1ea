//! ESC SCORE2 / SCORE2-OP evaluation strategies.
//!
//! Three ways of producing a SCORE2 estimate, ordered by authority:
//! exact chart lookup, the official equation with loaded coefficients, and a
//! calibrated closed-form approximation. The first two may yield nothing;
//! the approximation is total. Ordering lives in `application::resolver`.

use crate::domain::assessment::{AgeTier, RiskCategory, Score2Provenance, Score2Tier};
use crate::domain::categorize;
use crate::domain::embedded::{
    APPROX_AGE_CEILING, APPROX_AGE_FLOOR, APPROX_AGE_WEIGHT, APPROX_CAP,
    APPROX_CHOLESTEROL_BASELINE, APPROX_CHOLESTEROL_WEIGHT, APPROX_NON_HDL_RANGE,
    APPROX_REGION_SCALE, APPROX_SBP_BASELINE, APPROX_SBP_RANGE, APPROX_SBP_WEIGHT,
    APPROX_SMOKING_ADDEND,
};
use crate::domain::normalize::{clamp, indicator, non_hdl_mmol, round1, safe_ln, survival_risk};
use crate::domain::params::{Score2Coefficients, Score2Key, Score2Table, SCORE2_FEATURES};
use crate::domain::patient::{PatientRecord, Region, Sex};

/// Upper bound for chart and equation results, in percent.
pub const CAP_PERCENT: f64 = 50.0;

pub const AGE_RANGE: (f64, f64) = (40.0, 89.0);
pub const SBP_RANGE: (f64, f64) = (90.0, 200.0);
/// mmol/L
pub const NON_HDL_RANGE: (f64, f64) = (2.5, 8.0);

/// The subset of a patient record SCORE2 looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score2Input {
    pub age: f64,
    pub sex: Sex,
    pub region: Region,
    pub systolic_bp: f64,
    /// Non-HDL cholesterol in mmol/L
    pub non_hdl_mmol: f64,
    pub smoker: bool,
}

impl Score2Input {
    #[must_use]
    pub fn from_patient(patient: &PatientRecord) -> Self {
        Self {
            age: patient.age,
            sex: patient.sex,
            region: patient.region,
            systolic_bp: patient.systolic_bp,
            non_hdl_mmol: non_hdl_mmol(patient.total_cholesterol, patient.hdl, patient.non_hdl),
            smoker: patient.smoker,
        }
    }

    #[must_use]
    pub fn age_tier(&self) -> AgeTier {
        AgeTier::for_age(self.age)
    }

    /// Store key for the chart / coefficient bundle that applies.
    #[must_use]
    pub fn key(&self) -> Score2Key {
        Score2Key::new(self.age_tier(), self.region, self.sex)
    }
}

/// A SCORE2 result together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score2Estimate {
    pub percent: f64,
    pub category: RiskCategory,
    pub provenance: Score2Provenance,
}

/// Tier 1: exact lookup in a risk chart.
///
/// Yields nothing when any band fails to match or the cell is empty.
#[must_use]
pub fn table_lookup(table: &Score2Table, input: &Score2Input) -> Option<Score2Estimate> {
    let bands = table.bands_for(input.age, input.systolic_bp, input.non_hdl_mmol)?;
    let value = table.value(input.smoker, bands)?;
    let percent = round1(clamp(value, 0.0, CAP_PERCENT));

    Some(Score2Estimate {
        percent,
        category: categorize::score2_chart(percent),
        provenance: Score2Provenance {
            tier: Score2Tier::Table,
            age_group: input.age_tier(),
            bands: Some(bands),
        },
    })
}

/// Covariates of the official equation: ln(age), ln(age)^2, ln(SBP), ln(non-HDL), smoking.
#[must_use]
pub fn features(input: &Score2Input) -> [f64; SCORE2_FEATURES] {
    let ln_age = safe_ln(clamp(input.age, AGE_RANGE.0, AGE_RANGE.1));
    let ln_sbp = safe_ln(clamp(input.systolic_bp, SBP_RANGE.0, SBP_RANGE.1));
    let ln_chol = safe_ln(clamp(input.non_hdl_mmol, NON_HDL_RANGE.0, NON_HDL_RANGE.1));
    [ln_age, ln_age * ln_age, ln_sbp, ln_chol, indicator(input.smoker)]
}

/// Tier 2: official model structure with a loaded coefficient bundle.
///
/// Yields nothing for placeholder bundles or a non-finite result.
#[must_use]
pub fn coefficient_model(
    coefficients: &Score2Coefficients,
    input: &Score2Input,
) -> Option<Score2Estimate> {
    if coefficients.is_placeholder() {
        return None;
    }

    let lp: f64 = coefficients
        .beta
        .iter()
        .zip(features(input))
        .map(|(b, x)| b * x)
        .sum();
    let risk = survival_risk(coefficients.baseline_survival, lp, coefficients.mean_predictor);
    if !risk.is_finite() {
        return None;
    }

    let percent = round1(clamp(risk * 100.0, 0.0, CAP_PERCENT));
    Some(Score2Estimate {
        percent,
        category: categorize::score2_chart(percent),
        provenance: Score2Provenance {
            tier: Score2Tier::Coefficients,
            age_group: input.age_tier(),
            bands: None,
        },
    })
}

fn region_scale(region: Region) -> f64 {
    match region {
        Region::Low => APPROX_REGION_SCALE[0],
        Region::Moderate => APPROX_REGION_SCALE[1],
        Region::High => APPROX_REGION_SCALE[2],
        Region::VeryHigh => APPROX_REGION_SCALE[3],
    }
}

/// Raw (unrounded, uncapped) approximation in percent.
fn approximate_percent(input: &Score2Input) -> f64 {
    let age = clamp(input.age, APPROX_AGE_FLOOR, APPROX_AGE_CEILING);
    let sbp = clamp(input.systolic_bp, APPROX_SBP_RANGE.0, APPROX_SBP_RANGE.1);
    let chol = clamp(input.non_hdl_mmol, APPROX_NON_HDL_RANGE.0, APPROX_NON_HDL_RANGE.1);

    let age_part = APPROX_AGE_WEIGHT * (safe_ln(age) - APPROX_AGE_FLOOR.ln());
    let chol_part = APPROX_CHOLESTEROL_WEIGHT * (chol - APPROX_CHOLESTEROL_BASELINE).max(0.0);
    let sbp_part = APPROX_SBP_WEIGHT * (sbp - APPROX_SBP_BASELINE).max(0.0);
    let smoking_part = APPROX_SMOKING_ADDEND * indicator(input.smoker);

    (age_part + chol_part + sbp_part + smoking_part) * region_scale(input.region)
}

/// Tier 3: calibrated approximation. Always produces a value in [0, 25].
#[must_use]
pub fn approximation(input: &Score2Input) -> Score2Estimate {
    let percent = round1(clamp(approximate_percent(input), 0.0, APPROX_CAP));
    Score2Estimate {
        percent,
        category: categorize::score2_by_age(percent, input.age),
        provenance: Score2Provenance {
            tier: Score2Tier::Approximation,
            age_group: input.age_tier(),
            bands: None,
        },
    }
}

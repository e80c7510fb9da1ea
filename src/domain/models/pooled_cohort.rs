//! ACC/AHA Pooled Cohort Equations (Goff 2013), white men and women.

use crate::domain::assessment::{RiskAssessment, RiskModel};
use crate::domain::categorize;
use crate::domain::normalize::{clamp, indicator, round1, safe_ln, survival_risk};
use crate::domain::params::PooledCohortParams;
use crate::domain::patient::{PatientRecord, Sex};

pub const AGE_RANGE: (f64, f64) = (40.0, 79.0);
pub const TOTAL_CHOLESTEROL_RANGE: (f64, f64) = (130.0, 320.0);
pub const HDL_RANGE: (f64, f64) = (20.0, 90.0);
pub const SBP_RANGE: (f64, f64) = (90.0, 200.0);

/// Upper bound of the reported percentage.
pub const CAP_PERCENT: f64 = 40.0;

/// Linear predictor including the interaction terms.
///
/// Inputs are clamped to the validated domain of the equations. The
/// squared-age term is applied for female patients only.
#[must_use]
pub fn linear_predictor(params: &PooledCohortParams, patient: &PatientRecord) -> f64 {
    let ln_age = safe_ln(clamp(patient.age, AGE_RANGE.0, AGE_RANGE.1));
    let ln_tc = safe_ln(clamp(
        patient.total_cholesterol,
        TOTAL_CHOLESTEROL_RANGE.0,
        TOTAL_CHOLESTEROL_RANGE.1,
    ));
    let ln_hdl = safe_ln(clamp(patient.hdl, HDL_RANGE.0, HDL_RANGE.1));
    let ln_sbp = safe_ln(clamp(patient.systolic_bp, SBP_RANGE.0, SBP_RANGE.1));
    let smoker = indicator(patient.smoker);

    let sbp_weight = if patient.treated_hypertension {
        params.ln_sbp_treated
    } else {
        params.ln_sbp_untreated
    };

    let mut lp = params.ln_age * ln_age
        + params.ln_total_cholesterol * ln_tc
        + params.ln_hdl * ln_hdl
        + sbp_weight * ln_sbp
        + params.smoker * smoker
        + params.diabetes * indicator(patient.diabetic);

    if patient.sex == Sex::Female {
        lp += params.ln_age_squared * ln_age * ln_age;
    }

    lp + params.ln_age_x_ln_total_cholesterol * ln_age * ln_tc
        + params.ln_age_x_ln_hdl * ln_age * ln_hdl
        + params.ln_age_x_smoker * ln_age * smoker
}

/// 10-year ASCVD risk in percent, clamped to [0, 40] and rounded to one decimal.
#[must_use]
pub fn risk_percent(params: &PooledCohortParams, patient: &PatientRecord) -> f64 {
    let lp = linear_predictor(params, patient);
    let risk = survival_risk(params.baseline_survival, lp, params.mean_predictor);
    round1(clamp(risk * 100.0, 0.0, CAP_PERCENT))
}

#[must_use]
pub fn assess(params: &PooledCohortParams, patient: &PatientRecord) -> RiskAssessment {
    let percent = risk_percent(params, patient);
    RiskAssessment::new(RiskModel::AccAha, percent, categorize::acc_aha(percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::RiskCategory;
    use crate::domain::embedded::{POOLED_COHORT_WHITE_MEN, POOLED_COHORT_WHITE_WOMEN};
    use crate::domain::patient::Region;
    use approx::assert_abs_diff_eq;

    fn female_diabetic_65() -> PatientRecord {
        PatientRecord {
            age: 65.0,
            sex: Sex::Female,
            total_cholesterol: 250.0,
            hdl: 35.0,
            non_hdl: None,
            systolic_bp: 160.0,
            smoker: false,
            diabetic: true,
            treated_hypertension: true,
            region: Region::High,
        }
    }

    #[test]
    fn test_female_includes_squared_age_term() {
        let female = female_diabetic_65();
        let lp = linear_predictor(&POOLED_COHORT_WHITE_WOMEN, &female);

        // Same parameters evaluated as if male drops only the ln(age)^2 term.
        let as_male = PatientRecord {
            sex: Sex::Male,
            ..female_diabetic_65()
        };
        let lp_without = linear_predictor(&POOLED_COHORT_WHITE_WOMEN, &as_male);
        let ln_age = 65.0_f64.ln();
        assert_abs_diff_eq!(
            lp - lp_without,
            POOLED_COHORT_WHITE_WOMEN.ln_age_squared * ln_age * ln_age,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_reference_female_is_deterministic_and_bounded() {
        let patient = female_diabetic_65();
        let first = assess(&POOLED_COHORT_WHITE_WOMEN, &patient);
        let second = assess(&POOLED_COHORT_WHITE_WOMEN, &patient);
        assert_eq!(first, second);
        assert_eq!(first.percent.to_bits(), second.percent.to_bits());
        assert!((0.0..=CAP_PERCENT).contains(&first.percent));
        assert_eq!(first.category, RiskCategory::High);
    }

    #[test]
    fn test_inputs_are_clamped() {
        let young = PatientRecord {
            age: 30.0,
            sex: Sex::Male,
            smoker: true,
            diabetic: false,
            ..female_diabetic_65()
        };
        let at_floor = PatientRecord { age: 40.0, ..young.clone() };
        assert_eq!(
            risk_percent(&POOLED_COHORT_WHITE_MEN, &young),
            risk_percent(&POOLED_COHORT_WHITE_MEN, &at_floor)
        );

        let extreme = PatientRecord {
            total_cholesterol: 1000.0,
            systolic_bp: 400.0,
            hdl: 1.0,
            ..young
        };
        let pct = risk_percent(&POOLED_COHORT_WHITE_MEN, &extreme);
        assert!((0.0..=CAP_PERCENT).contains(&pct));
    }

    #[test]
    fn test_healthy_male_is_low() {
        let patient = PatientRecord {
            age: 45.0,
            sex: Sex::Male,
            total_cholesterol: 180.0,
            hdl: 55.0,
            non_hdl: None,
            systolic_bp: 120.0,
            smoker: false,
            diabetic: false,
            treated_hypertension: false,
            region: Region::Low,
        };
        let assessment = assess(&POOLED_COHORT_WHITE_MEN, &patient);
        assert_eq!(assessment.category, RiskCategory::Low);
    }
}

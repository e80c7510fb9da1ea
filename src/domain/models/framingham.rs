//! Framingham General CVD 10-year risk (D'Agostino 2008).

use crate::domain::assessment::{RiskAssessment, RiskModel};
use crate::domain::categorize;
use crate::domain::normalize::{indicator, round1, safe_ln, survival_risk};
use crate::domain::params::FraminghamParams;
use crate::domain::patient::PatientRecord;

/// Upper bound of the reported percentage.
pub const CAP_PERCENT: f64 = 100.0;

/// Sex-specific linear predictor over log-transformed risk factors.
#[must_use]
pub fn linear_predictor(params: &FraminghamParams, patient: &PatientRecord) -> f64 {
    let ln_sbp = safe_ln(patient.systolic_bp);
    let sbp_weight = if patient.treated_hypertension {
        params.ln_sbp_treated
    } else {
        params.ln_sbp_untreated
    };

    params.ln_age * safe_ln(patient.age)
        + params.ln_total_cholesterol * safe_ln(patient.total_cholesterol)
        + params.ln_hdl * safe_ln(patient.hdl)
        + sbp_weight * ln_sbp
        + params.smoker * indicator(patient.smoker)
        + params.diabetes * indicator(patient.diabetic)
}

/// 10-year risk in percent, rounded to one decimal and clamped to [0, 100].
#[must_use]
pub fn risk_percent(params: &FraminghamParams, patient: &PatientRecord) -> f64 {
    let lp = linear_predictor(params, patient);
    let risk = survival_risk(params.baseline_survival, lp, params.mean_predictor);
    round1(risk * 100.0).clamp(0.0, CAP_PERCENT)
}

#[must_use]
pub fn assess(params: &FraminghamParams, patient: &PatientRecord) -> RiskAssessment {
    let percent = risk_percent(params, patient);
    RiskAssessment::new(
        RiskModel::Framingham,
        percent,
        categorize::framingham(percent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::RiskCategory;
    use crate::domain::embedded::{FRAMINGHAM_MEN, FRAMINGHAM_WOMEN};
    use crate::domain::patient::{Region, Sex};
    use approx::assert_abs_diff_eq;

    fn male_smoker_55() -> PatientRecord {
        PatientRecord {
            age: 55.0,
            sex: Sex::Male,
            total_cholesterol: 200.0,
            hdl: 45.0,
            non_hdl: None,
            systolic_bp: 140.0,
            smoker: true,
            diabetic: false,
            treated_hypertension: false,
            region: Region::Moderate,
        }
    }

    #[test]
    fn test_reference_male_smoker() {
        let patient = male_smoker_55();
        let lp = linear_predictor(&FRAMINGHAM_MEN, &patient);
        assert_abs_diff_eq!(lp, 24.88, epsilon = 0.01);

        let assessment = assess(&FRAMINGHAM_MEN, &patient);
        assert!(
            (24.9..=25.0).contains(&assessment.percent),
            "got {}",
            assessment.percent
        );
        assert_eq!(assessment.category, RiskCategory::High);
        assert!(assessment.score2.is_none());
    }

    #[test]
    fn test_treatment_selects_sbp_weight() {
        let untreated = male_smoker_55();
        let treated = PatientRecord {
            treated_hypertension: true,
            ..male_smoker_55()
        };
        let delta = linear_predictor(&FRAMINGHAM_MEN, &treated)
            - linear_predictor(&FRAMINGHAM_MEN, &untreated);
        let expected = (FRAMINGHAM_MEN.ln_sbp_treated - FRAMINGHAM_MEN.ln_sbp_untreated)
            * 140.0_f64.ln();
        assert_abs_diff_eq!(delta, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_female_profile_is_lower() {
        let female = PatientRecord {
            sex: Sex::Female,
            ..male_smoker_55()
        };
        let pct = risk_percent(&FRAMINGHAM_WOMEN, &female);
        assert!(pct > 0.0 && pct < risk_percent(&FRAMINGHAM_MEN, &male_smoker_55()));
    }

    #[test]
    fn test_degenerate_inputs_stay_in_range() {
        let patient = PatientRecord {
            hdl: 0.0,
            total_cholesterol: -10.0,
            ..male_smoker_55()
        };
        let pct = risk_percent(&FRAMINGHAM_MEN, &patient);
        assert!((0.0..=CAP_PERCENT).contains(&pct));
    }
}

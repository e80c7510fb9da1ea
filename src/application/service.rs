//! Risk service: per-model and bulk scoring entry points.
//!
//! Every evaluation is a pure function of the patient record and the store.
//! Nothing is cached between calls.

use std::sync::Arc;

use crate::application::{CoefficientStore, Score2Resolver};
use crate::domain::models::{framingham as framingham_model, pooled_cohort, Score2Input};
use crate::domain::{Method, PatientInput, PatientRecord, RiskAssessment, RiskModel, RiskReport};

/// Scores patients against a coefficient store.
#[derive(Debug)]
pub struct RiskService {
    store: Arc<CoefficientStore>,
    resolver: Score2Resolver,
}

impl RiskService {
    #[must_use]
    pub fn new(store: Arc<CoefficientStore>) -> Self {
        Self::with_resolver(store, Score2Resolver::default())
    }

    #[must_use]
    pub fn with_resolver(store: Arc<CoefficientStore>, resolver: Score2Resolver) -> Self {
        Self { store, resolver }
    }

    /// Service over the process-wide store.
    #[must_use]
    pub fn global() -> Self {
        Self::new(CoefficientStore::global())
    }

    #[must_use]
    pub fn store(&self) -> &CoefficientStore {
        &self.store
    }

    /// Framingham General CVD 10-year risk.
    #[must_use]
    pub fn framingham(&self, patient: &PatientRecord) -> RiskAssessment {
        framingham_model::assess(self.store.framingham(patient.sex), patient)
    }

    /// SCORE2 / SCORE2-OP 10-year risk, resolved through the tier chain.
    #[must_use]
    pub fn score2(&self, patient: &PatientRecord) -> RiskAssessment {
        let estimate = self
            .resolver
            .resolve(&self.store, &Score2Input::from_patient(patient));
        RiskAssessment::new(RiskModel::Score2, estimate.percent, estimate.category)
            .with_score2(estimate.provenance)
    }

    /// ACC/AHA Pooled Cohort 10-year ASCVD risk.
    #[must_use]
    pub fn acc_aha(&self, patient: &PatientRecord) -> RiskAssessment {
        pooled_cohort::assess(self.store.pooled_cohort(patient.sex), patient)
    }

    /// Evaluate the models selected by `method`.
    #[must_use]
    pub fn assess(&self, patient: &PatientRecord, method: Method) -> RiskReport {
        let report = RiskReport {
            framingham: method
                .includes(RiskModel::Framingham)
                .then(|| self.framingham(patient)),
            score2: method
                .includes(RiskModel::Score2)
                .then(|| self.score2(patient)),
            acc_aha: method
                .includes(RiskModel::AccAha)
                .then(|| self.acc_aha(patient)),
        };

        for assessment in report.assessments() {
            tracing::debug!(
                model = %assessment.model,
                percent = assessment.percent,
                category = %assessment.category,
                "Risk assessed"
            );
        }
        report
    }

    /// Convert a raw record and evaluate it.
    ///
    /// # Errors
    /// Returns `RiskError::MissingField` or `RiskError::NonFinite` if the
    /// record is incomplete.
    pub fn assess_input(&self, input: PatientInput, method: Method) -> crate::Result<RiskReport> {
        let patient = PatientRecord::try_from(input)?;
        Ok(self.assess(&patient, method))
    }
}

/// Framingham risk using the process-wide store.
#[must_use]
pub fn framingham(patient: &PatientRecord) -> RiskAssessment {
    RiskService::global().framingham(patient)
}

/// SCORE2 risk using the process-wide store.
#[must_use]
pub fn score2(patient: &PatientRecord) -> RiskAssessment {
    RiskService::global().score2(patient)
}

/// ACC/AHA risk using the process-wide store.
#[must_use]
pub fn acc_aha(patient: &PatientRecord) -> RiskAssessment {
    RiskService::global().acc_aha(patient)
}

//! Coefficient store: every parameter the evaluators read.
//!
//! Built once per process from the embedded constants plus whatever the
//! configured `ParameterSource` supplies, then shared read-only. A source
//! error never reaches callers; it is logged and the embedded constants stay
//! in effect.

use std::sync::{Arc, OnceLock};

use crate::adapters::{EmbeddedOnly, JsonParameterSource};
use crate::application::RiskConfig;
use crate::domain::embedded::{
    FRAMINGHAM_MEN, FRAMINGHAM_WOMEN, POOLED_COHORT_WHITE_MEN, POOLED_COHORT_WHITE_WOMEN,
    SCORE2_PLACEHOLDER,
};
use crate::domain::{
    FraminghamParams, PooledCohortParams, Score2CoefficientSet, Score2Coefficients, Score2Key,
    Score2Table, Score2TableSet, Sex,
};
use crate::ports::{LoadOutcome, ParameterProvenance, ParameterSource};

static GLOBAL_STORE: OnceLock<Arc<CoefficientStore>> = OnceLock::new();

/// Read-only parameter registry.
#[derive(Debug, Clone)]
pub struct CoefficientStore {
    score2_coefficients: Score2CoefficientSet,
    score2_tables: Score2TableSet,
    coefficients_provenance: Option<ParameterProvenance>,
    tables_provenance: Option<ParameterProvenance>,
}

impl CoefficientStore {
    /// Store holding only the embedded constants.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            score2_coefficients: Score2CoefficientSet::default(),
            score2_tables: Score2TableSet::default(),
            coefficients_provenance: None,
            tables_provenance: None,
        }
    }

    /// Build a store from embedded constants and a parameter source.
    pub fn from_source<S: ParameterSource>(source: &S) -> Self {
        let mut store = Self::embedded();

        match source.load_score2_coefficients() {
            Ok(LoadOutcome::Loaded(loaded)) => {
                tracing::info!(
                    "Loaded {} SCORE2 coefficient bundles from {}",
                    loaded.data.len(),
                    loaded.provenance
                );
                store.score2_coefficients = loaded.data;
                store.coefficients_provenance = Some(loaded.provenance);
            }
            Ok(LoadOutcome::Absent(reason)) => {
                tracing::info!("SCORE2 coefficients not loaded: {}", reason);
            }
            Err(e) => {
                tracing::warn!("Ignoring SCORE2 coefficient payload: {}", e);
            }
        }

        match source.load_score2_tables() {
            Ok(LoadOutcome::Loaded(loaded)) => {
                tracing::info!(
                    "Loaded {} SCORE2 risk charts from {}",
                    loaded.data.len(),
                    loaded.provenance
                );
                store.score2_tables = loaded.data;
                store.tables_provenance = Some(loaded.provenance);
            }
            Ok(LoadOutcome::Absent(reason)) => {
                tracing::info!("SCORE2 risk charts not loaded: {}", reason);
            }
            Err(e) => {
                tracing::warn!("Ignoring SCORE2 risk chart payload: {}", e);
            }
        }

        store
    }

    #[must_use]
    pub fn from_config(config: &RiskConfig) -> Self {
        if config.overrides_enabled {
            Self::from_source(&JsonParameterSource::from_config(config))
        } else {
            Self::from_source(&EmbeddedOnly)
        }
    }

    /// Process-wide store, initialised from the environment on first use.
    ///
    /// Concurrent first calls observe a single fully built store.
    pub fn global() -> Arc<Self> {
        GLOBAL_STORE
            .get_or_init(|| Arc::new(Self::from_config(&RiskConfig::from_env_or_default())))
            .clone()
    }

    #[must_use]
    pub fn framingham(&self, sex: Sex) -> &FraminghamParams {
        match sex {
            Sex::Male => &FRAMINGHAM_MEN,
            Sex::Female => &FRAMINGHAM_WOMEN,
        }
    }

    #[must_use]
    pub fn pooled_cohort(&self, sex: Sex) -> &PooledCohortParams {
        match sex {
            Sex::Male => &POOLED_COHORT_WHITE_MEN,
            Sex::Female => &POOLED_COHORT_WHITE_WOMEN,
        }
    }

    /// SCORE2 bundle for a key; the zero-weight placeholder when none was loaded.
    #[must_use]
    pub fn score2_coefficients(&self, key: &Score2Key) -> &Score2Coefficients {
        self.score2_coefficients
            .get(key)
            .unwrap_or(&SCORE2_PLACEHOLDER)
    }

    #[must_use]
    pub fn score2_table(&self, key: &Score2Key) -> Option<&Score2Table> {
        self.score2_tables.get(key)
    }

    #[must_use]
    pub fn coefficients_provenance(&self) -> Option<&ParameterProvenance> {
        self.coefficients_provenance.as_ref()
    }

    #[must_use]
    pub fn tables_provenance(&self) -> Option<&ParameterProvenance> {
        self.tables_provenance.as_ref()
    }
}

impl Default for CoefficientStore {
    fn default() -> Self {
        Self::embedded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json_params::{COEFFICIENTS_FILE, TABLES_FILE};
    use crate::domain::{AgeTier, Region};
    use tempfile::tempdir;

    #[test]
    fn test_embedded_store_has_placeholders_only() {
        let store = CoefficientStore::embedded();
        let key = Score2Key::new(AgeTier::Standard, Region::Moderate, Sex::Male);
        assert!(store.score2_coefficients(&key).is_placeholder());
        assert!(store.score2_table(&key).is_none());
        assert!(store.coefficients_provenance().is_none());
        assert_eq!(store.framingham(Sex::Female).baseline_survival, 0.95012);
        assert_eq!(store.pooled_cohort(Sex::Male).mean_predictor, 61.18);
    }

    #[test]
    fn test_malformed_payload_keeps_embedded_constants() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join(COEFFICIENTS_FILE), b"[1, 2").expect("write");
        std::fs::write(temp.path().join(TABLES_FILE), b"{}").expect("write");

        let store = CoefficientStore::from_source(&JsonParameterSource::new(temp.path()));
        let key = Score2Key::new(AgeTier::Standard, Region::Moderate, Sex::Male);
        assert!(store.score2_coefficients(&key).is_placeholder());
        assert!(store.score2_table(&key).is_none());
        assert!(store.tables_provenance().is_none());
    }

    #[test]
    fn test_loaded_coefficients_are_exposed_with_provenance() {
        let temp = tempdir().expect("tempdir");
        let payload = serde_json::json!({
            "SCORE2": { "moderate": { "men": { "beta": [0.6, 0.0, 0.5, 0.4, 0.6], "S0": 0.95, "meanXB": 5.5 } } }
        });
        std::fs::write(
            temp.path().join(COEFFICIENTS_FILE),
            serde_json::to_vec(&payload).expect("serialize"),
        )
        .expect("write");

        let store = CoefficientStore::from_source(&JsonParameterSource::new(temp.path()));
        let key = Score2Key::new(AgeTier::Standard, Region::Moderate, Sex::Male);
        assert!(!store.score2_coefficients(&key).is_placeholder());

        let other = Score2Key::new(AgeTier::Elderly, Region::Moderate, Sex::Male);
        assert!(store.score2_coefficients(&other).is_placeholder());

        let provenance = store.coefficients_provenance().expect("Provenance recorded");
        assert!(provenance.path.ends_with(COEFFICIENTS_FILE));
    }

    #[test]
    fn test_disabled_overrides_ignore_files() {
        let temp = tempdir().expect("tempdir");
        let payload = serde_json::json!({
            "SCORE2": { "moderate": { "men": { "beta": [1, 1, 1, 1, 1], "S0": 0.9, "meanXB": 1.0 } } }
        });
        std::fs::write(
            temp.path().join(COEFFICIENTS_FILE),
            serde_json::to_vec(&payload).expect("serialize"),
        )
        .expect("write");

        let config = RiskConfig {
            params_dir: temp.path().to_path_buf(),
            overrides_enabled: false,
            ..RiskConfig::default()
        };
        let store = CoefficientStore::from_config(&config);
        assert!(store.coefficients_provenance().is_none());
    }
}

//! Model parameter structures.
//!
//! Every bundle is immutable once built. Construction from external payloads
//! goes through the `validate` methods so that malformed or placeholder data
//! is rejected at load time rather than at scoring time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::assessment::{AgeTier, BandIndices};
use super::patient::{Region, Sex};

/// Sum of absolute weights below which a bundle counts as a placeholder.
pub const PLACEHOLDER_WEIGHT_SUM: f64 = 1e-12;

/// Framingham General CVD parameters for one sex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FraminghamParams {
    pub ln_age: f64,
    pub ln_total_cholesterol: f64,
    pub ln_hdl: f64,
    pub ln_sbp_treated: f64,
    pub ln_sbp_untreated: f64,
    pub smoker: f64,
    pub diabetes: f64,
    pub baseline_survival: f64,
    pub mean_predictor: f64,
}

/// ACC/AHA Pooled Cohort parameters for one sex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PooledCohortParams {
    pub ln_age: f64,
    /// ln(age)^2, only applied to female patients
    pub ln_age_squared: f64,
    pub ln_total_cholesterol: f64,
    pub ln_hdl: f64,
    pub ln_sbp_treated: f64,
    pub ln_sbp_untreated: f64,
    pub smoker: f64,
    pub diabetes: f64,
    pub ln_age_x_ln_total_cholesterol: f64,
    pub ln_age_x_ln_hdl: f64,
    pub ln_age_x_smoker: f64,
    pub baseline_survival: f64,
    pub mean_predictor: f64,
}

/// Number of SCORE2 covariates: ln(age), ln(age)^2, ln(SBP), ln(non-HDL), smoking.
pub const SCORE2_FEATURES: usize = 5;

/// One SCORE2 coefficient bundle (age tier x region x sex).
///
/// Field names follow the published payload schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score2Coefficients {
    pub beta: [f64; SCORE2_FEATURES],
    #[serde(rename = "S0")]
    pub baseline_survival: f64,
    #[serde(rename = "meanXB")]
    pub mean_predictor: f64,
}

impl Score2Coefficients {
    /// A bundle whose weights are all zero.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self {
            beta: [0.0; SCORE2_FEATURES],
            baseline_survival: 1.0,
            mean_predictor: 0.0,
        }
    }

    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.beta.iter().map(|b| b.abs()).sum()
    }

    /// True when every weight is effectively zero.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.weight_sum() < PLACEHOLDER_WEIGHT_SUM
    }

    /// Check that the bundle can be evaluated.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.beta.iter().any(|b| !b.is_finite()) {
            return Err("non-finite weight".into());
        }
        if self.is_placeholder() {
            return Err("zero-weight placeholder bundle".into());
        }
        if !self.mean_predictor.is_finite() {
            return Err("non-finite meanXB".into());
        }
        if !(self.baseline_survival > 0.0 && self.baseline_survival < 1.0) {
            return Err(format!(
                "S0 {} outside the open interval (0, 1)",
                self.baseline_survival
            ));
        }
        Ok(())
    }
}

/// Key for region/sex/age-tier specific SCORE2 data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Score2Key {
    pub age_tier: AgeTier,
    pub region: Region,
    pub sex: Sex,
}

impl Score2Key {
    #[must_use]
    pub fn new(age_tier: AgeTier, region: Region, sex: Sex) -> Self {
        Self {
            age_tier,
            region,
            sex,
        }
    }
}

/// All SCORE2 coefficient bundles known to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score2CoefficientSet {
    bundles: HashMap<Score2Key, Score2Coefficients>,
}

impl Score2CoefficientSet {
    pub fn insert(&mut self, key: Score2Key, coefficients: Score2Coefficients) {
        self.bundles.insert(key, coefficients);
    }

    #[must_use]
    pub fn get(&self, key: &Score2Key) -> Option<&Score2Coefficients> {
        self.bundles.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

/// Risk-chart value grid indexed `[age band][sbp band][non-HDL band]`.
pub type ValueGrid = Vec<Vec<Vec<Option<f64>>>>;

/// One SCORE2 risk chart (region x sex x age tier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score2Table {
    /// Closed age intervals
    pub ages: Vec<[f64; 2]>,
    /// Closed systolic BP intervals
    pub sbp_bands: Vec<[f64; 2]>,
    /// Ascending non-HDL upper cutpoints in mmol/L
    pub non_hdl_bands: Vec<f64>,
    pub values: SmokingGrids,
}

/// Value grids keyed by smoking status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokingGrids {
    pub non_smoker: ValueGrid,
    pub smoker: ValueGrid,
}

/// Index of the closed interval containing `value`, first match wins.
#[must_use]
pub fn find_interval(value: f64, bands: &[[f64; 2]]) -> Option<usize> {
    bands
        .iter()
        .position(|[low, high]| value >= *low && value <= *high)
}

/// Index of the first cutpoint `>= value`; values above every cutpoint use the last band.
#[must_use]
pub fn find_cutpoint(value: f64, cutpoints: &[f64]) -> Option<usize> {
    if cutpoints.is_empty() {
        return None;
    }
    Some(
        cutpoints
            .iter()
            .position(|upper| value <= *upper)
            .unwrap_or(cutpoints.len() - 1),
    )
}

impl Score2Table {
    /// Check band shapes and that both grids agree with the bands.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.ages.is_empty() || self.sbp_bands.is_empty() || self.non_hdl_bands.is_empty() {
            return Err("empty band list".into());
        }
        for [low, high] in self.ages.iter().chain(self.sbp_bands.iter()) {
            if !(low.is_finite() && high.is_finite()) || low > high {
                return Err(format!("invalid band [{low}, {high}]"));
            }
        }
        if self.non_hdl_bands.windows(2).any(|w| w[0] > w[1]) {
            return Err("non-HDL cutpoints are not ascending".into());
        }

        for (name, grid) in [
            ("non_smoker", &self.values.non_smoker),
            ("smoker", &self.values.smoker),
        ] {
            if grid.len() != self.ages.len() {
                return Err(format!(
                    "{name} grid has {} age rows, expected {}",
                    grid.len(),
                    self.ages.len()
                ));
            }
            for row in grid {
                if row.len() != self.sbp_bands.len() {
                    return Err(format!("{name} grid SBP dimension mismatch"));
                }
                for cells in row {
                    if cells.len() != self.non_hdl_bands.len() {
                        return Err(format!("{name} grid non-HDL dimension mismatch"));
                    }
                    if cells.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("{name} grid holds a negative or non-finite value"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Match all three bands for a patient profile.
    #[must_use]
    pub fn bands_for(&self, age: f64, sbp: f64, non_hdl_mmol: f64) -> Option<BandIndices> {
        Some(BandIndices {
            age: find_interval(age, &self.ages)?,
            sbp: find_interval(sbp, &self.sbp_bands)?,
            non_hdl: find_cutpoint(non_hdl_mmol, &self.non_hdl_bands)?,
        })
    }

    /// Stored percentage for the matched cell, if the cell is populated.
    #[must_use]
    pub fn value(&self, smoker: bool, bands: BandIndices) -> Option<f64> {
        let grid = if smoker {
            &self.values.smoker
        } else {
            &self.values.non_smoker
        };
        grid.get(bands.age)?
            .get(bands.sbp)?
            .get(bands.non_hdl)
            .copied()
            .flatten()
    }
}

/// All SCORE2 risk charts known to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score2TableSet {
    tables: HashMap<Score2Key, Score2Table>,
}

impl Score2TableSet {
    pub fn insert(&mut self, key: Score2Key, table: Score2Table) {
        self.tables.insert(key, table);
    }

    #[must_use]
    pub fn get(&self, key: &Score2Key) -> Option<&Score2Table> {
        self.tables.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

//! Risk result types.
//!
//! Represents the output of a single model evaluation and the bulk report
//! assembled when several models are requested at once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RiskError;

/// The published risk models this crate evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskModel {
    /// Framingham General CVD (D'Agostino 2008)
    Framingham,
    /// ESC SCORE2 / SCORE2-OP (2021)
    Score2,
    /// ACC/AHA Pooled Cohort Equations (2013)
    AccAha,
}

impl fmt::Display for RiskModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Framingham => write!(f, "Framingham"),
            Self::Score2 => write!(f, "SCORE2"),
            Self::AccAha => write!(f, "ACC/AHA"),
        }
    }
}

/// Risk category label. Each model uses its own subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "borderline")]
    Borderline,
    #[serde(rename = "intermediate")]
    Intermediate,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl RiskCategory {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Borderline => "borderline",
            Self::Intermediate => "intermediate",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which SCORE2 strategy produced a result, ordered by authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Score2Tier {
    /// Exact lookup in the published risk charts
    Table = 1,
    /// Official model structure with loaded coefficients
    Coefficients = 2,
    /// Calibrated closed-form approximation
    Approximation = 3,
}

impl Score2Tier {
    #[must_use]
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Short confidence note for display next to the result.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Table => "Exact ESC risk chart lookup",
            Self::Coefficients => "Official SCORE2 equation with loaded coefficients",
            Self::Approximation => "Calibrated approximation, interpret with caution",
        }
    }
}

/// Age tier splitting SCORE2 (40-69) from SCORE2-OP (70-89).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeTier {
    #[serde(rename = "40-69")]
    Standard,
    #[serde(rename = "70+")]
    Elderly,
}

impl AgeTier {
    /// First age handled by the elderly (OP) model.
    pub const ELDERLY_FROM: f64 = 70.0;

    #[must_use]
    pub fn for_age(age: f64) -> Self {
        if age >= Self::ELDERLY_FROM {
            Self::Elderly
        } else {
            Self::Standard
        }
    }

    /// Top-level key used by the SCORE2 payloads.
    #[must_use]
    pub fn payload_key(&self) -> &'static str {
        match self {
            Self::Standard => "SCORE2",
            Self::Elderly => "SCORE2_OP",
        }
    }
}

/// Band indices matched by a SCORE2 table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandIndices {
    pub age: usize,
    pub sbp: usize,
    pub non_hdl: usize,
}

/// How a SCORE2 result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score2Provenance {
    pub tier: Score2Tier,
    pub age_group: AgeTier,
    /// Set for table lookups only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bands: Option<BandIndices>,
}

/// Result of one model evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub model: RiskModel,

    /// 10-year risk in percent, one decimal place
    pub percent: f64,

    pub category: RiskCategory,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score2: Option<Score2Provenance>,
}

impl RiskAssessment {
    #[must_use]
    pub fn new(model: RiskModel, percent: f64, category: RiskCategory) -> Self {
        Self {
            model,
            percent,
            category,
            score2: None,
        }
    }

    #[must_use]
    pub fn with_score2(mut self, provenance: Score2Provenance) -> Self {
        self.score2 = Some(provenance);
        self
    }

    /// SCORE2 resolution tier, if this is a SCORE2 result.
    #[must_use]
    pub fn tier(&self) -> Option<Score2Tier> {
        self.score2.map(|p| p.tier)
    }
}

/// Which models a bulk request should evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Framingham,
    Score2,
    AccAha,
    All,
}

impl Method {
    #[must_use]
    pub fn includes(&self, model: RiskModel) -> bool {
        match (self, model) {
            (Self::All, _) => true,
            (Self::Framingham, RiskModel::Framingham) => true,
            (Self::Score2, RiskModel::Score2) => true,
            (Self::AccAha, RiskModel::AccAha) => true,
            _ => false,
        }
    }
}

impl FromStr for Method {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "framingham" => Ok(Self::Framingham),
            "score" | "score2" => Ok(Self::Score2),
            "acc-aha" | "acc_aha" | "accaha" => Ok(Self::AccAha),
            "all" => Ok(Self::All),
            other => Err(RiskError::UnknownMethod(other.to_string())),
        }
    }
}

/// Results of a bulk request; models not requested are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framingham: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score2: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acc_aha: Option<RiskAssessment>,
}

impl RiskReport {
    /// Iterate over the assessments present in the report.
    pub fn assessments(&self) -> impl Iterator<Item = &RiskAssessment> {
        [&self.framingham, &self.score2, &self.acc_aha]
            .into_iter()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_tier_boundary() {
        assert_eq!(AgeTier::for_age(69.9), AgeTier::Standard);
        assert_eq!(AgeTier::for_age(70.0), AgeTier::Elderly);
        assert_eq!(AgeTier::for_age(89.0), AgeTier::Elderly);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("score".parse::<Method>().expect("parse"), Method::Score2);
        assert_eq!("acc-aha".parse::<Method>().expect("parse"), Method::AccAha);
        assert_eq!("ALL".parse::<Method>().expect("parse"), Method::All);
        assert!(matches!(
            "qrisk".parse::<Method>(),
            Err(RiskError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&RiskCategory::VeryHigh).expect("serialize");
        assert_eq!(json, "\"very high\"");
    }

    #[test]
    fn test_assessment_serialization_omits_absent_provenance() {
        let assessment = RiskAssessment::new(RiskModel::Framingham, 12.3, RiskCategory::Intermediate);
        let json = serde_json::to_value(&assessment).expect("serialize");
        assert_eq!(json["model"], "framingham");
        assert_eq!(json["category"], "intermediate");
        assert!(json.get("score2").is_none());

        let scored = RiskAssessment::new(RiskModel::Score2, 4.0, RiskCategory::Moderate).with_score2(
            Score2Provenance {
                tier: Score2Tier::Table,
                age_group: AgeTier::Elderly,
                bands: None,
            },
        );
        let json = serde_json::to_value(&scored).expect("serialize");
        assert_eq!(json["score2"]["tier"], "table");
        assert_eq!(json["score2"]["age_group"], "70+");
        assert_eq!(scored.tier(), Some(Score2Tier::Table));
    }
}

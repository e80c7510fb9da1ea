//! Patient record types for cardiovascular risk estimation.
//!
//! `PatientInput` is the loosely-typed record received from callers (every
//! field optional, serde-friendly). `PatientRecord` is the checked, immutable
//! record the scoring core works on.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RiskError;

/// Biological sex, selecting the sex-specific coefficient sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Key used by the SCORE2 payloads ("men" / "women").
    #[must_use]
    pub fn payload_key(&self) -> &'static str {
        match self {
            Self::Male => "men",
            Self::Female => "women",
        }
    }
}

impl FromStr for Sex {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "man" | "men" | "m" | "hombre" => Ok(Self::Male),
            "female" | "woman" | "women" | "f" | "mujer" => Ok(Self::Female),
            _ => Err(RiskError::InvalidValue {
                field: "sex",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// ESC cardiovascular risk region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Low,
    #[default]
    Moderate,
    High,
    VeryHigh,
}

impl Region {
    pub const ALL: [Region; 4] = [Self::Low, Self::Moderate, Self::High, Self::VeryHigh];

    /// Key used by the SCORE2 payloads.
    #[must_use]
    pub fn payload_key(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }

    /// Parse a region name, falling back to `Moderate` for anything unrecognised.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Region {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "low" | "bajo" => Ok(Self::Low),
            "moderate" | "moderado" => Ok(Self::Moderate),
            "high" | "alto" => Ok(Self::High),
            "very_high" | "muy_alto" => Ok(Self::VeryHigh),
            _ => Err(RiskError::InvalidValue {
                field: "region",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.payload_key())
    }
}

/// Raw patient fields as supplied by a caller.
///
/// Every field is optional so that an incomplete record can be deserialized
/// and then rejected with a precise `RiskError::MissingField`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientInput {
    /// Age in years
    #[serde(alias = "edad")]
    pub age: Option<f64>,

    /// "male" / "female" (Spanish "hombre" / "mujer" accepted)
    #[serde(alias = "sexo")]
    pub sex: Option<String>,

    /// Total cholesterol in mg/dL
    #[serde(alias = "colesterol_total")]
    pub total_cholesterol: Option<f64>,

    /// HDL cholesterol in mg/dL
    pub hdl: Option<f64>,

    /// Non-HDL cholesterol in mg/dL; overrides total - HDL when present
    #[serde(alias = "no_hdl")]
    pub non_hdl: Option<f64>,

    /// Systolic blood pressure in mmHg
    #[serde(alias = "presion_sistolica")]
    pub systolic_bp: Option<f64>,

    #[serde(alias = "fumador")]
    pub smoker: Option<bool>,

    #[serde(alias = "diabetes")]
    pub diabetic: Option<bool>,

    /// On antihypertensive treatment
    #[serde(alias = "tratamiento_hipertension")]
    pub treated_hypertension: Option<bool>,

    /// ESC risk region, defaults to moderate
    #[serde(alias = "region_riesgo")]
    pub region: Option<String>,
}

/// Validation ranges applied by `PatientInput::validate`.
const VALIDATION_RANGES: [(&str, f64, f64); 4] = [
    ("age", 20.0, 79.0),
    ("systolic_bp", 90.0, 200.0),
    ("total_cholesterol", 100.0, 400.0),
    ("hdl", 20.0, 100.0),
];

impl PatientInput {
    /// Parse a raw record from JSON text.
    ///
    /// # Errors
    /// Returns `RiskError::Serialization` if the text is not a patient object.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a raw record from a JSON file.
    ///
    /// # Errors
    /// Returns `RiskError::Io` if the file cannot be read and
    /// `RiskError::Serialization` if it is not a patient object.
    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "age" => self.age,
            "systolic_bp" => self.systolic_bp,
            "total_cholesterol" => self.total_cholesterol,
            "hdl" => self.hdl,
            _ => None,
        }
    }

    /// Check field presence and clinical ranges.
    ///
    /// Scoring never calls this; it is offered to the collaborator that gates
    /// requests before they reach the core.
    ///
    /// # Errors
    /// Returns the list of errors if any required field is missing or out of range.
    /// On success returns warnings for values sitting exactly on a range limit.
    pub fn validate(&self) -> Result<Vec<String>, Vec<String>> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (field, low, high) in VALIDATION_RANGES {
            match self.numeric(field) {
                None => errors.push(format!("Missing field {field}")),
                Some(v) if !v.is_finite() => errors.push(format!("{field} is not numeric")),
                Some(v) if !(low..=high).contains(&v) => {
                    errors.push(format!("{field} out of range [{low}, {high}]"));
                }
                Some(v) if v == low || v == high => {
                    warnings.push(format!("{field} at the permitted limit"));
                }
                Some(_) => {}
            }
        }

        match self.sex.as_deref() {
            None => errors.push("Missing field sex".to_string()),
            Some(s) if s.parse::<Sex>().is_err() => {
                errors.push("sex must be 'male' or 'female'".to_string());
            }
            Some(_) => {}
        }

        for (field, value) in [
            ("smoker", self.smoker),
            ("diabetic", self.diabetic),
            ("treated_hypertension", self.treated_hypertension),
        ] {
            if value.is_none() {
                errors.push(format!("Missing field {field}"));
            }
        }

        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(errors)
        }
    }
}

/// Checked patient record consumed by every evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: f64,
    pub sex: Sex,
    /// mg/dL
    pub total_cholesterol: f64,
    /// mg/dL
    pub hdl: f64,
    /// mg/dL
    pub non_hdl: Option<f64>,
    /// mmHg
    pub systolic_bp: f64,
    pub smoker: bool,
    pub diabetic: bool,
    pub treated_hypertension: bool,
    pub region: Region,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, RiskError> {
    value.ok_or(RiskError::MissingField(field))
}

fn finite(value: f64, field: &'static str) -> Result<f64, RiskError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RiskError::NonFinite(field))
    }
}

impl TryFrom<PatientInput> for PatientRecord {
    type Error = RiskError;

    fn try_from(input: PatientInput) -> crate::Result<Self> {
        let age = finite(required(input.age, "age")?, "age")?;
        let sex: Sex = required(input.sex, "sex")?.parse()?;
        let total_cholesterol = finite(
            required(input.total_cholesterol, "total_cholesterol")?,
            "total_cholesterol",
        )?;
        let hdl = finite(required(input.hdl, "hdl")?, "hdl")?;
        let systolic_bp = finite(required(input.systolic_bp, "systolic_bp")?, "systolic_bp")?;
        let non_hdl = input
            .non_hdl
            .map(|v| finite(v, "non_hdl"))
            .transpose()?;

        Ok(Self {
            age,
            sex,
            total_cholesterol,
            hdl,
            non_hdl,
            systolic_bp,
            smoker: required(input.smoker, "smoker")?,
            diabetic: required(input.diabetic, "diabetic")?,
            treated_hypertension: required(input.treated_hypertension, "treated_hypertension")?,
            region: input
                .region
                .as_deref()
                .map(Region::parse_lenient)
                .unwrap_or_default(),
        })
    }
}

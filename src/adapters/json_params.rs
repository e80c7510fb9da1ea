//! JSON adapter: Implementation of ParameterSource over payload files.
//!
//! Reads two optional files from a parameter directory:
//!
//! - `score2_coeffs.json`:
//!   `{ "SCORE2": { region: { "men"|"women": { "beta": [5], "S0": n, "meanXB": n } } }, "SCORE2_OP": { ... } }`
//! - `score2_risk_tables.json`:
//!   `{ "SCORE2": { region: { sex: { "ages", "sbp_bands", "non_hdl_bands", "values": { "non_smoker", "smoker" } } } }, "SCORE2_OP": { ... } }`
//!
//! A missing file is not an error. A file that cannot be read or parsed is
//! reported as `ParameterError`; the coefficient store logs it and keeps its
//! embedded constants. Individual malformed bundles or charts are dropped
//! with a warning while the rest of the payload is kept.
//!
//! Each file is read once, in full, and closed before parsing.

use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::application::RiskConfig;
use crate::domain::{
    AgeTier, Region, Score2CoefficientSet, Score2Coefficients, Score2Key, Score2Table,
    Score2TableSet, Sex,
};
use crate::ports::{AbsentReason, LoadOutcome, Loaded, ParameterProvenance, ParameterSource};

/// Default file name of the coefficient payload.
pub const COEFFICIENTS_FILE: &str = "score2_coeffs.json";

/// Default file name of the risk-chart payload.
pub const TABLES_FILE: &str = "score2_risk_tables.json";

/// Error type for parameter payloads.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed payload {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Read a payload file; `Ok(None)` when the file does not exist.
fn read_payload(path: &Path) -> Result<Option<(Value, ParameterProvenance)>, ParameterError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ParameterError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let value: Value = serde_json::from_slice(&bytes).map_err(|e| ParameterError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let provenance = ParameterProvenance {
        path: path.to_path_buf(),
        sha256: sha256_hex_bytes(&bytes),
    };
    Ok(Some((value, provenance)))
}

/// Walk `{ "SCORE2"|"SCORE2_OP": { region: { sex: entry } } }`, yielding each
/// entry with its key. Unknown region or sex keys are skipped with a warning.
fn for_each_entry<F>(root: &Map<String, Value>, path: &Path, mut visit: F)
where
    F: FnMut(Score2Key, &Value),
{
    for age_tier in [AgeTier::Standard, AgeTier::Elderly] {
        let Some(regions) = root.get(age_tier.payload_key()).and_then(Value::as_object) else {
            continue;
        };
        for (region_name, sexes) in regions {
            let Ok(region) = region_name.parse::<Region>() else {
                tracing::warn!(
                    "Skipping unknown region {:?} in {}",
                    region_name,
                    path.display()
                );
                continue;
            };
            let Some(sexes) = sexes.as_object() else {
                continue;
            };
            for (sex_name, entry) in sexes {
                let Ok(sex) = sex_name.parse::<Sex>() else {
                    tracing::warn!("Skipping unknown sex {:?} in {}", sex_name, path.display());
                    continue;
                };
                visit(Score2Key::new(age_tier, region, sex), entry);
            }
        }
    }
}

fn root_object<'a>(value: &'a Value, path: &Path) -> Result<&'a Map<String, Value>, ParameterError> {
    value.as_object().ok_or_else(|| ParameterError::Malformed {
        path: path.to_path_buf(),
        reason: "top level is not an object".into(),
    })
}

/// Parse and validate a coefficient payload.
///
/// The sampled bundle `SCORE2.moderate.men` must exist and carry non-zero
/// weights, otherwise the whole payload is treated as a placeholder.
///
/// # Errors
/// Returns `ParameterError::Malformed` if the payload is not a JSON object.
pub fn parse_coefficients(
    value: &Value,
    path: &Path,
) -> Result<LoadOutcome<Score2CoefficientSet>, ParameterError> {
    let root = root_object(value, path)?;

    let sample_weight: f64 = root
        .get("SCORE2")
        .and_then(|v| v.get("moderate"))
        .and_then(|v| v.get("men"))
        .and_then(|v| v.get("beta"))
        .and_then(Value::as_array)
        .map(|beta| beta.iter().filter_map(Value::as_f64).map(f64::abs).sum())
        .unwrap_or(0.0);
    if sample_weight == 0.0 {
        return Ok(LoadOutcome::Absent(AbsentReason::Placeholder));
    }

    let mut set = Score2CoefficientSet::default();
    for_each_entry(root, path, |key, entry| {
        match serde_json::from_value::<Score2Coefficients>(entry.clone()) {
            Ok(coefficients) => match coefficients.validate() {
                Ok(()) => set.insert(key, coefficients),
                Err(reason) => tracing::warn!(
                    "Dropping SCORE2 coefficients {:?}: {}",
                    key,
                    reason
                ),
            },
            Err(e) => tracing::warn!("Dropping SCORE2 coefficients {:?}: {}", key, e),
        }
    });

    if set.is_empty() {
        return Err(ParameterError::Malformed {
            path: path.to_path_buf(),
            reason: "no valid coefficient bundles".into(),
        });
    }

    Ok(LoadOutcome::Loaded(Loaded {
        data: set,
        provenance: ParameterProvenance {
            path: path.to_path_buf(),
            sha256: String::new(),
        },
    }))
}

/// Parse and validate a risk-chart payload.
///
/// # Errors
/// Returns `ParameterError::Malformed` if the `SCORE2` section is missing or
/// empty, or if no chart survives validation.
pub fn parse_tables(
    value: &Value,
    path: &Path,
) -> Result<LoadOutcome<Score2TableSet>, ParameterError> {
    let root = root_object(value, path)?;

    let has_standard = root
        .get("SCORE2")
        .and_then(Value::as_object)
        .is_some_and(|m| !m.is_empty());
    if !has_standard {
        return Err(ParameterError::Malformed {
            path: path.to_path_buf(),
            reason: "missing SCORE2 section".into(),
        });
    }

    let mut set = Score2TableSet::default();
    for_each_entry(root, path, |key, entry| {
        match serde_json::from_value::<Score2Table>(entry.clone()) {
            Ok(table) => match table.validate() {
                Ok(()) => set.insert(key, table),
                Err(reason) => tracing::warn!("Dropping SCORE2 chart {:?}: {}", key, reason),
            },
            Err(e) => tracing::warn!("Dropping SCORE2 chart {:?}: {}", key, e),
        }
    });

    if set.is_empty() {
        return Err(ParameterError::Malformed {
            path: path.to_path_buf(),
            reason: "no valid risk charts".into(),
        });
    }

    Ok(LoadOutcome::Loaded(Loaded {
        data: set,
        provenance: ParameterProvenance {
            path: path.to_path_buf(),
            sha256: String::new(),
        },
    }))
}

/// Attach the file fingerprint to a parsed outcome.
fn with_provenance<T>(outcome: LoadOutcome<T>, provenance: ParameterProvenance) -> LoadOutcome<T> {
    match outcome {
        LoadOutcome::Loaded(loaded) => LoadOutcome::Loaded(Loaded {
            data: loaded.data,
            provenance,
        }),
        absent => absent,
    }
}

/// Parameter source reading JSON payloads from a directory.
#[derive(Debug, Clone)]
pub struct JsonParameterSource {
    dir: PathBuf,
    coefficients_file: String,
    tables_file: String,
}

impl JsonParameterSource {
    /// Source reading the default file names from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            coefficients_file: COEFFICIENTS_FILE.to_string(),
            tables_file: TABLES_FILE.to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            dir: config.params_dir.clone(),
            coefficients_file: config.coefficients_file.clone(),
            tables_file: config.tables_file.clone(),
        }
    }

    #[must_use]
    pub fn coefficients_path(&self) -> PathBuf {
        self.dir.join(&self.coefficients_file)
    }

    #[must_use]
    pub fn tables_path(&self) -> PathBuf {
        self.dir.join(&self.tables_file)
    }

    fn load<T>(
        path: &Path,
        parse: fn(&Value, &Path) -> Result<LoadOutcome<T>, ParameterError>,
    ) -> Result<LoadOutcome<T>, ParameterError> {
        match read_payload(path)? {
            None => Ok(LoadOutcome::Absent(AbsentReason::NotFound(path.to_path_buf()))),
            Some((value, provenance)) => Ok(with_provenance(parse(&value, path)?, provenance)),
        }
    }
}

impl ParameterSource for JsonParameterSource {
    type Error = ParameterError;

    fn load_score2_coefficients(&self) -> Result<LoadOutcome<Score2CoefficientSet>, Self::Error> {
        Self::load(&self.coefficients_path(), parse_coefficients)
    }

    fn load_score2_tables(&self) -> Result<LoadOutcome<Score2TableSet>, Self::Error> {
        Self::load(&self.tables_path(), parse_tables)
    }
}

/// Parameter source that never supplies overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedOnly;

impl ParameterSource for EmbeddedOnly {
    type Error = Infallible;

    fn load_score2_coefficients(&self) -> Result<LoadOutcome<Score2CoefficientSet>, Self::Error> {
        Ok(LoadOutcome::Absent(AbsentReason::Disabled))
    }

    fn load_score2_tables(&self) -> Result<LoadOutcome<Score2TableSet>, Self::Error> {
        Ok(LoadOutcome::Absent(AbsentReason::Disabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn coefficient_payload() -> Value {
        let bundle = json!({ "beta": [0.6, 0.0, 0.5, 0.4, 0.6], "S0": 0.95, "meanXB": 5.5 });
        json!({
            "SCORE2": {
                "moderate": { "men": bundle, "women": bundle },
                "high": { "men": bundle }
            },
            "SCORE2_OP": {
                "low": { "women": bundle }
            }
        })
    }

    #[test]
    fn test_missing_files_are_absent() {
        let temp = tempdir().expect("tempdir");
        let source = JsonParameterSource::new(temp.path());

        let coefficients = source.load_score2_coefficients().expect("Should not error");
        assert!(matches!(
            coefficients,
            LoadOutcome::Absent(AbsentReason::NotFound(_))
        ));
        let tables = source.load_score2_tables().expect("Should not error");
        assert!(!tables.is_loaded());
    }

    #[test]
    fn test_coefficients_loaded_with_fingerprint() {
        let temp = tempdir().expect("tempdir");
        let bytes = serde_json::to_vec(&coefficient_payload()).expect("serialize");
        std::fs::write(temp.path().join(COEFFICIENTS_FILE), &bytes).expect("write");

        let source = JsonParameterSource::new(temp.path());
        let loaded = source
            .load_score2_coefficients()
            .expect("Should parse")
            .loaded()
            .expect("Should be loaded");

        assert_eq!(loaded.data.len(), 4);
        assert_eq!(loaded.provenance.sha256, sha256_hex_bytes(&bytes));
        assert_eq!(loaded.provenance.sha256.len(), 64);
        assert!(loaded
            .data
            .get(&Score2Key::new(AgeTier::Elderly, Region::Low, Sex::Female))
            .is_some());
    }

    #[test]
    fn test_placeholder_payload_is_absent() {
        let zero = json!({ "beta": [0, 0, 0, 0, 0], "S0": 0.95, "meanXB": 0.0 });
        let payload = json!({ "SCORE2": { "moderate": { "men": zero } } });
        let outcome = parse_coefficients(&payload, Path::new("x.json")).expect("Should parse");
        assert_eq!(outcome, LoadOutcome::Absent(AbsentReason::Placeholder));

        let payload = json!({ "SCORE2": { "high": { "men": { "beta": [1, 1, 1, 1, 1], "S0": 0.9, "meanXB": 1.0 } } } });
        let outcome = parse_coefficients(&payload, Path::new("x.json")).expect("Should parse");
        assert_eq!(outcome, LoadOutcome::Absent(AbsentReason::Placeholder));
    }

    #[test]
    fn test_invalid_bundles_are_dropped() {
        let mut payload = coefficient_payload();
        payload["SCORE2"]["high"]["men"]["S0"] = json!(1.5);
        payload["SCORE2"]["moderate"]["women"] = json!({ "beta": [1.0, 2.0], "S0": 0.9, "meanXB": 0.0 });
        let valid = payload["SCORE2"]["moderate"]["men"].clone();
        payload["SCORE2"]["atlantis"] = json!({ "men": valid });

        let set = parse_coefficients(&payload, Path::new("x.json"))
            .expect("Should parse")
            .loaded()
            .expect("Should be loaded")
            .data;
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_zero_weight_bundles_dropped_at_load() {
        let mut payload = coefficient_payload();
        payload["SCORE2_OP"]["moderate"] =
            json!({ "men": { "beta": [0, 0, 0, 0, 0], "S0": 0.9, "meanXB": 0.0 } });

        let set = parse_coefficients(&payload, Path::new("x.json"))
            .expect("Should parse")
            .loaded()
            .expect("Should be loaded")
            .data;
        assert_eq!(set.len(), 4);
        assert!(set
            .get(&Score2Key::new(AgeTier::Elderly, Region::Moderate, Sex::Male))
            .is_none());
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join(TABLES_FILE), b"{ not json").expect("write");

        let err = JsonParameterSource::new(temp.path())
            .load_score2_tables()
            .expect_err("Must fail");
        assert!(matches!(err, ParameterError::Parse { .. }));
    }

    #[test]
    fn test_tables_require_standard_section() {
        let payload = json!({ "SCORE2_OP": {} });
        let err = parse_tables(&payload, Path::new("t.json")).expect_err("Must fail");
        assert!(matches!(err, ParameterError::Malformed { .. }));
    }

    #[test]
    fn test_tables_parse_and_validate() {
        let chart = json!({
            "ages": [[40, 44], [45, 49]],
            "sbp_bands": [[100, 119], [120, 139]],
            "non_hdl_bands": [3.9, 4.9],
            "values": {
                "non_smoker": [[[1.0, 1.1], [1.2, null]], [[2.0, 2.1], [2.2, 2.3]]],
                "smoker": [[[3.0, 3.1], [3.2, 3.3]], [[4.0, 4.1], [4.2, 4.3]]]
            }
        });
        let ragged = json!({
            "ages": [[40, 44]],
            "sbp_bands": [[100, 119]],
            "non_hdl_bands": [3.9],
            "values": { "non_smoker": [], "smoker": [] }
        });
        let payload = json!({ "SCORE2": { "low": { "men": chart, "women": ragged } } });

        let set = parse_tables(&payload, Path::new("t.json"))
            .expect("Should parse")
            .loaded()
            .expect("Should be loaded")
            .data;
        assert_eq!(set.len(), 1);
        assert!(set
            .get(&Score2Key::new(AgeTier::Standard, Region::Low, Sex::Male))
            .is_some());
    }

    #[test]
    fn test_embedded_only_never_loads() {
        let source = EmbeddedOnly;
        assert_eq!(
            source.load_score2_coefficients().expect("infallible"),
            LoadOutcome::Absent(AbsentReason::Disabled)
        );
    }
}

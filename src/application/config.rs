//! Runtime configuration read from the environment.

use std::path::PathBuf;

use crate::adapters::json_params::{COEFFICIENTS_FILE, TABLES_FILE};

/// Default directory searched for parameter payloads.
pub const DEFAULT_PARAMS_DIR: &str = "params";

/// Where the coefficient store looks for override payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskConfig {
    pub params_dir: PathBuf,
    pub coefficients_file: String,
    pub tables_file: String,
    /// When false, only embedded constants are used
    pub overrides_enabled: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            params_dir: PathBuf::from(DEFAULT_PARAMS_DIR),
            coefficients_file: COEFFICIENTS_FILE.to_string(),
            tables_file: TABLES_FILE.to_string(),
            overrides_enabled: true,
        }
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim(),
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes"
    )
}

impl RiskConfig {
    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - CARDIORISK_PARAMS_DIR
    /// - CARDIORISK_COEFFICIENTS_FILE
    /// - CARDIORISK_TABLES_FILE
    /// - CARDIORISK_DISABLE_OVERRIDES=1|true|yes
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(dir) = non_empty("CARDIORISK_PARAMS_DIR") {
            cfg.params_dir = PathBuf::from(dir);
        }
        if let Some(file) = non_empty("CARDIORISK_COEFFICIENTS_FILE") {
            cfg.coefficients_file = file;
        }
        if let Some(file) = non_empty("CARDIORISK_TABLES_FILE") {
            cfg.tables_file = file;
        }
        if let Some(flag) = non_empty("CARDIORISK_DISABLE_OVERRIDES") {
            cfg.overrides_enabled = !is_truthy(&flag);
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = RiskConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, RiskConfig::default());
        assert_eq!(cfg.params_dir, PathBuf::from("params"));
        assert_eq!(cfg.coefficients_file, "score2_coeffs.json");
        assert_eq!(cfg.tables_file, "score2_risk_tables.json");
        assert!(cfg.overrides_enabled);
    }

    #[test]
    fn test_overrides_from_variables() {
        let cfg = RiskConfig::from_lookup(lookup(&[
            ("CARDIORISK_PARAMS_DIR", "/srv/params"),
            ("CARDIORISK_TABLES_FILE", "charts.json"),
            ("CARDIORISK_DISABLE_OVERRIDES", "yes"),
        ]));
        assert_eq!(cfg.params_dir, PathBuf::from("/srv/params"));
        assert_eq!(cfg.coefficients_file, "score2_coeffs.json");
        assert_eq!(cfg.tables_file, "charts.json");
        assert!(!cfg.overrides_enabled);
    }

    #[test]
    fn test_empty_and_unrecognised_values_fall_back() {
        let cfg = RiskConfig::from_lookup(lookup(&[
            ("CARDIORISK_PARAMS_DIR", "   "),
            ("CARDIORISK_DISABLE_OVERRIDES", "maybe"),
        ]));
        assert_eq!(cfg.params_dir, PathBuf::from(DEFAULT_PARAMS_DIR));
        assert!(cfg.overrides_enabled);
    }
}

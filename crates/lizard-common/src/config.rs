//! Data root configuration.
//!
//! Readers build file paths below a handful of roots. They are taken from
//! the environment (a `.env` file is honoured) or from a YAML file:
//!
//! ```yaml
//! path_sat: ${PATH_SAT}
//! path_sec: /data/lizard
//! path_dat: ${PATH_DAT:-/data/lizard/dat}
//! ```
//!
//! YAML values support `${VAR}` and `${VAR:-default}` substitution.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{LizardError, LizardResult};

const DEFAULT_CAMPAIGN_ROOT: &str = "/data/obs/campaigns";

/// Process-wide data roots passed explicitly to every reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    /// Satellite archive (`$PATH_SAT`), e.g. `gpm_l1c/` lives below it.
    pub path_sat: PathBuf,
    /// Secondary data root (`$PATH_SEC`) with ERA-5, radiosondes, footprints.
    pub path_sec: PathBuf,
    /// Derived products (`$PATH_DAT`).
    pub path_dat: PathBuf,
    /// Local mirror of the campaign dataset catalog (`$PATH_CACHE_INTAKE`).
    #[serde(default)]
    pub path_cache_intake: Option<PathBuf>,
    /// Campaign archive holding per-instrument folders.
    #[serde(default = "default_campaign_root")]
    pub campaign_root: PathBuf,
    #[serde(default)]
    pub ac3_user: Option<String>,
    #[serde(default)]
    pub ac3_password: Option<String>,
}

fn default_campaign_root() -> PathBuf {
    PathBuf::from(DEFAULT_CAMPAIGN_ROOT)
}

impl DataPaths {
    /// All roots below one directory, mostly for tests.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            path_sat: root.join("sat"),
            path_sec: root.join("sec"),
            path_dat: root.join("dat"),
            path_cache_intake: Some(root.join("intake")),
            campaign_root: root.join("campaigns"),
            ac3_user: None,
            ac3_password: None,
        }
    }

    /// Load from environment variables, reading `.env` first.
    pub fn from_env() -> LizardResult<Self> {
        dotenvy::dotenv().ok();

        let required = |name: &str| -> LizardResult<PathBuf> {
            std::env::var(name)
                .map(PathBuf::from)
                .map_err(|_| LizardError::MissingEnv(name.to_string()))
        };

        let paths = Self {
            path_sat: required("PATH_SAT")?,
            path_sec: required("PATH_SEC")?,
            path_dat: required("PATH_DAT")?,
            path_cache_intake: std::env::var("PATH_CACHE_INTAKE").ok().map(PathBuf::from),
            campaign_root: std::env::var("PATH_CAMPAIGNS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_campaign_root()),
            ac3_user: std::env::var("AC3_USER").ok(),
            ac3_password: std::env::var("AC3_PASSWORD").ok(),
        };
        debug!(sat = ?paths.path_sat, sec = ?paths.path_sec, dat = ?paths.path_dat, "Loaded data paths from environment");
        Ok(paths)
    }

    /// Load from a YAML file with environment variable substitution.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> LizardResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let expanded = expand_env_vars(&content)?;
        let paths: Self = serde_yaml::from_str(&expanded)?;
        debug!(file = %path.display(), "Loaded data paths from YAML");
        Ok(paths)
    }

    /// Credentials for the campaign data server, if both parts are set.
    pub fn ac3_credentials(&self) -> Option<(&str, &str)> {
        match (&self.ac3_user, &self.ac3_password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand `${VAR}` and `${VAR:-default}` in text.
pub fn expand_env_vars(content: &str) -> LizardResult<String> {
    let mut result = String::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => {
                        return Err(LizardError::Config(format!(
                            "Unclosed variable substitution: ${{{}",
                            var_expr
                        )))
                    }
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> LizardResult<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).map_err(|_| LizardError::MissingEnv(expr.trim().to_string()))
    }
}

//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `ASSESSOR_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::fmt::Display;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::assessment::AssessmentPolicy;
use crate::nli::{DevicePreference, NliConfig};
use crate::scoring::FailurePolicy;

/// Default request body limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default number of assessments allowed to run at once.
pub const DEFAULT_MAX_CONCURRENT_ASSESSMENTS: usize = 4;

#[derive(Debug, Clone, Copy)]
enum PathKind {
    File,
    Directory,
}

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `ASSESSOR_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// JSON criterion catalog. `None` uses the built-in O-1A table.
    pub catalog_path: Option<PathBuf>,

    /// Maximum accepted request body. Default: 10 MiB.
    pub max_upload_bytes: usize,

    /// Assessments allowed to run concurrently. Default: `4`.
    pub max_concurrent_assessments: usize,

    /// Attach a permissive CORS layer. Default: `false`.
    pub cors_permissive: bool,

    /// Entailment model settings.
    pub nli: NliConfig,

    /// Pipeline thresholds and rating table.
    pub policy: AssessmentPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            catalog_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_concurrent_assessments: DEFAULT_MAX_CONCURRENT_ASSESSMENTS,
            cors_permissive: false,
            nli: NliConfig::default(),
            policy: AssessmentPolicy::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "ASSESSOR_PORT";
    const ENV_BIND_ADDR: &'static str = "ASSESSOR_BIND_ADDR";
    const ENV_CATALOG_PATH: &'static str = "ASSESSOR_CATALOG_PATH";
    const ENV_MAX_UPLOAD_BYTES: &'static str = "ASSESSOR_MAX_UPLOAD_BYTES";
    const ENV_MAX_CONCURRENT: &'static str = "ASSESSOR_MAX_CONCURRENT";
    const ENV_CORS_PERMISSIVE: &'static str = "ASSESSOR_CORS_PERMISSIVE";
    const ENV_MIN_SENTENCE_CHARS: &'static str = "ASSESSOR_MIN_SENTENCE_CHARS";
    const ENV_RELEVANCE_THRESHOLD: &'static str = "ASSESSOR_RELEVANCE_THRESHOLD";
    const ENV_TOP_EVIDENCE: &'static str = "ASSESSOR_TOP_EVIDENCE";
    const ENV_SENTENCE_BATCH: &'static str = "ASSESSOR_SENTENCE_BATCH";
    const ENV_FAILURE_POLICY: &'static str = "ASSESSOR_FAILURE_POLICY";
    const ENV_STRONG_SCORE: &'static str = "ASSESSOR_STRONG_SCORE";
    const ENV_HIGH_MIN_STRONG: &'static str = "ASSESSOR_HIGH_MIN_STRONG";
    const ENV_HIGH_MIN_AVG: &'static str = "ASSESSOR_HIGH_MIN_AVG";
    const ENV_MEDIUM_MIN_STRONG: &'static str = "ASSESSOR_MEDIUM_MIN_STRONG";
    const ENV_MEDIUM_MIN_AVG: &'static str = "ASSESSOR_MEDIUM_MIN_AVG";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let catalog_path = Self::parse_optional_path_from_env(Self::ENV_CATALOG_PATH);
        let max_upload_bytes =
            Self::parse_count_from_env(Self::ENV_MAX_UPLOAD_BYTES, defaults.max_upload_bytes)?;
        let max_concurrent_assessments = Self::parse_count_from_env(
            Self::ENV_MAX_CONCURRENT,
            defaults.max_concurrent_assessments,
        )?;
        let cors_permissive = Self::parse_bool_from_env(Self::ENV_CORS_PERMISSIVE)?
            .unwrap_or(defaults.cors_permissive);

        Ok(Self {
            port,
            bind_addr,
            catalog_path,
            max_upload_bytes,
            max_concurrent_assessments,
            cors_permissive,
            nli: Self::parse_nli_from_env(defaults.nli)?,
            policy: Self::parse_policy_from_env(defaults.policy)?,
        })
    }

    /// Checks that configured paths exist with the right kind and that the policy is coherent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.catalog_path {
            Self::check_path(Self::ENV_CATALOG_PATH, path, PathKind::File)?;
        }
        if let Some(ref path) = self.nli.model_path {
            Self::check_path(NliConfig::ENV_MODEL_PATH, path, PathKind::Directory)?;
        }

        self.policy
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                name: "assessment policy",
                value: format!("{:?}", self.policy),
                reason,
            })
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_nli_from_env(defaults: NliConfig) -> Result<NliConfig, ConfigError> {
        let mut nli = defaults;

        if let Some(path) = Self::parse_optional_path_from_env(NliConfig::ENV_MODEL_PATH) {
            nli.model_path = Some(path);
        }
        nli.batch_size = Self::parse_count_from_env(NliConfig::ENV_BATCH_SIZE, nli.batch_size)?;
        if let Some(device) = Self::parse_from_env::<DevicePreference>(NliConfig::ENV_DEVICE)? {
            nli.device = device;
        }

        Ok(nli)
    }

    fn parse_policy_from_env(defaults: AssessmentPolicy) -> Result<AssessmentPolicy, ConfigError> {
        let mut policy = defaults;

        policy.min_sentence_chars =
            Self::parse_count_from_env(Self::ENV_MIN_SENTENCE_CHARS, policy.min_sentence_chars)?;
        policy.evidence.relevance_threshold = Self::parse_fraction_from_env(
            Self::ENV_RELEVANCE_THRESHOLD,
            policy.evidence.relevance_threshold,
        )?;
        policy.evidence.top_n =
            Self::parse_count_from_env(Self::ENV_TOP_EVIDENCE, policy.evidence.top_n)?;
        policy.sentence_batch_size =
            Self::parse_count_from_env(Self::ENV_SENTENCE_BATCH, policy.sentence_batch_size)?;
        policy.failure_policy = Self::parse_from_env::<FailurePolicy>(Self::ENV_FAILURE_POLICY)?
            .unwrap_or(policy.failure_policy);

        let rating = &mut policy.rating;
        rating.strong_score =
            Self::parse_fraction_from_env(Self::ENV_STRONG_SCORE, rating.strong_score)?;
        rating.high_min_strong =
            Self::parse_count_from_env(Self::ENV_HIGH_MIN_STRONG, rating.high_min_strong)?;
        rating.high_min_avg =
            Self::parse_fraction_from_env(Self::ENV_HIGH_MIN_AVG, rating.high_min_avg)?;
        rating.medium_min_strong =
            Self::parse_count_from_env(Self::ENV_MEDIUM_MIN_STRONG, rating.medium_min_strong)?;
        rating.medium_min_avg =
            Self::parse_fraction_from_env(Self::ENV_MEDIUM_MIN_AVG, rating.medium_min_avg)?;

        Ok(policy)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        let Ok(value) = env::var(Self::ENV_PORT) else {
            return Ok(default);
        };

        match value.trim().parse::<u16>() {
            Ok(0) => Err(ConfigError::InvalidPort {
                value,
                reason: "port 0 is reserved".to_string(),
            }),
            Ok(port) => Ok(port),
            Err(e) => Err(ConfigError::InvalidPort {
                reason: e.to_string(),
                value,
            }),
        }
    }

    fn check_path(setting: &'static str, path: &Path, kind: PathKind) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                setting,
                path: path.to_path_buf(),
            });
        }

        let (ok, expected) = match kind {
            PathKind::File => (path.is_file(), "file"),
            PathKind::Directory => (path.is_dir(), "directory"),
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::WrongPathKind {
                setting,
                path: path.to_path_buf(),
                expected,
            })
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_bool_from_env(name: &'static str) -> Result<Option<bool>, ConfigError> {
        let Ok(value) = env::var(name) else {
            return Ok(None);
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                name,
                value,
                reason: "expected true/false, yes/no, on/off or 1/0".to_string(),
            }),
        }
    }

    fn parse_from_env<T>(name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name,
                    reason: e.to_string(),
                    value,
                }),
            Err(_) => Ok(None),
        }
    }

    /// A positive integer.
    fn parse_count_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        let Some(count) = Self::parse_from_env::<usize>(name)? else {
            return Ok(default);
        };
        if count == 0 {
            return Err(ConfigError::InvalidValue {
                name,
                value: count.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(count)
    }

    /// A number in `[0, 1]`.
    fn parse_fraction_from_env(name: &'static str, default: f32) -> Result<f32, ConfigError> {
        let Some(value) = Self::parse_from_env::<f32>(name)? else {
            return Ok(default);
        };
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::InvalidValue {
                name,
                value: value.to_string(),
                reason: "must be within [0, 1]".to_string(),
            });
        }
        Ok(value)
    }
}

//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CREDLENS_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CREDLENS_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Chat-completions endpoint of the scoring oracle
    /// (an Azure-OpenAI-style deployment URL).
    pub oracle_endpoint: String,

    /// Vision-capable deployment name used for OCR and scoring calls.
    pub oracle_deployment: String,

    /// API version query parameter sent with every oracle call.
    pub oracle_api_version: String,

    /// API key for the oracle. When absent, calls fail with
    /// `OracleError::MissingCredentials` unless the mock oracle is active.
    pub oracle_api_key: Option<String>,

    /// Per-oracle-call timeout. A hung call surfaces as a processing
    /// failure instead of blocking the job forever. Default: 60s.
    pub oracle_timeout: Duration,

    /// Blob storage account name.
    pub storage_account: String,

    /// SAS token appended to blob requests. Optional for mock deployments.
    pub storage_sas_token: Option<String>,

    /// Container receiving raw uploads. Default: `screenshot`.
    pub upload_container: String,

    /// Container receiving generated reports. Default: `report`.
    pub report_container: String,

    /// Upload size ceiling in bytes. Default: 10 MiB.
    pub max_upload_bytes: usize,

    /// Jobs older than this are swept from the tracker. Default: 24h.
    pub job_max_age: Duration,
}

/// Default oracle API version when `CREDLENS_ORACLE_API_VERSION` is not set.
pub const DEFAULT_ORACLE_API_VERSION: &str = "2025-01-01-preview";

/// Default upload ceiling (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            oracle_endpoint: String::new(),
            oracle_deployment: "gpt-4.1".to_string(),
            oracle_api_version: DEFAULT_ORACLE_API_VERSION.to_string(),
            oracle_api_key: None,
            oracle_timeout: Duration::from_secs(60),
            storage_account: String::new(),
            storage_sas_token: None,
            upload_container: "screenshot".to_string(),
            report_container: "report".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            job_max_age: Duration::from_secs(24 * 3600),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "CREDLENS_PORT";
    const ENV_BIND_ADDR: &'static str = "CREDLENS_BIND_ADDR";
    const ENV_ORACLE_ENDPOINT: &'static str = "CREDLENS_ORACLE_ENDPOINT";
    const ENV_ORACLE_DEPLOYMENT: &'static str = "CREDLENS_ORACLE_DEPLOYMENT";
    const ENV_ORACLE_API_VERSION: &'static str = "CREDLENS_ORACLE_API_VERSION";
    const ENV_ORACLE_API_KEY: &'static str = "CREDLENS_ORACLE_API_KEY";
    const ENV_ORACLE_TIMEOUT_SECS: &'static str = "CREDLENS_ORACLE_TIMEOUT_SECS";
    const ENV_STORAGE_ACCOUNT: &'static str = "CREDLENS_STORAGE_ACCOUNT";
    const ENV_STORAGE_SAS_TOKEN: &'static str = "CREDLENS_STORAGE_SAS_TOKEN";
    const ENV_UPLOAD_CONTAINER: &'static str = "CREDLENS_UPLOAD_CONTAINER";
    const ENV_REPORT_CONTAINER: &'static str = "CREDLENS_REPORT_CONTAINER";
    const ENV_MAX_UPLOAD_BYTES: &'static str = "CREDLENS_MAX_UPLOAD_BYTES";
    const ENV_JOB_MAX_AGE_SECS: &'static str = "CREDLENS_JOB_MAX_AGE_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let oracle_endpoint =
            Self::parse_string_from_env(Self::ENV_ORACLE_ENDPOINT, defaults.oracle_endpoint);
        let oracle_deployment =
            Self::parse_string_from_env(Self::ENV_ORACLE_DEPLOYMENT, defaults.oracle_deployment);
        let oracle_api_version =
            Self::parse_string_from_env(Self::ENV_ORACLE_API_VERSION, defaults.oracle_api_version);
        let oracle_api_key = Self::parse_optional_string_from_env(Self::ENV_ORACLE_API_KEY);
        let oracle_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_ORACLE_TIMEOUT_SECS,
            defaults.oracle_timeout.as_secs(),
        ));
        let storage_account =
            Self::parse_string_from_env(Self::ENV_STORAGE_ACCOUNT, defaults.storage_account);
        let storage_sas_token = Self::parse_optional_string_from_env(Self::ENV_STORAGE_SAS_TOKEN);
        let upload_container =
            Self::parse_string_from_env(Self::ENV_UPLOAD_CONTAINER, defaults.upload_container);
        let report_container =
            Self::parse_string_from_env(Self::ENV_REPORT_CONTAINER, defaults.report_container);
        let max_upload_bytes = Self::parse_u64_from_env(
            Self::ENV_MAX_UPLOAD_BYTES,
            defaults.max_upload_bytes as u64,
        ) as usize;
        let job_max_age = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_JOB_MAX_AGE_SECS,
            defaults.job_max_age.as_secs(),
        ));

        Ok(Self {
            port,
            bind_addr,
            oracle_endpoint,
            oracle_deployment,
            oracle_api_version,
            oracle_api_key,
            oracle_timeout,
            storage_account,
            storage_sas_token,
            upload_container,
            report_container,
            max_upload_bytes,
            job_max_age,
        })
    }

    /// Validates basic invariants. Endpoint and account may be empty only
    /// when running against mocks; the caller decides whether to require them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.oracle_endpoint.is_empty()
            && !self.oracle_endpoint.starts_with("http://")
            && !self.oracle_endpoint.starts_with("https://")
        {
            return Err(ConfigError::InvalidOracleEndpoint {
                value: self.oracle_endpoint.clone(),
            });
        }

        if self.oracle_deployment.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                var: Self::ENV_ORACLE_DEPLOYMENT,
            });
        }

        if self.upload_container.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                var: Self::ENV_UPLOAD_CONTAINER,
            });
        }

        if self.report_container.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                var: Self::ENV_REPORT_CONTAINER,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
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

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port '{value}': {source}")]
    PortParseError {
        value: String,
        source: ParseIntError,
    },

    #[error("port must be non-zero, got '{value}'")]
    InvalidPort { value: String },

    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid integer '{value}' for {var}: {source}")]
    IntParseError {
        var: &'static str,
        value: String,
        source: ParseIntError,
    },

    #[error("oracle endpoint must be an http(s) URL, got '{value}'")]
    InvalidOracleEndpoint { value: String },

    #[error("{var} must not be empty")]
    EmptyValue { var: &'static str },
}

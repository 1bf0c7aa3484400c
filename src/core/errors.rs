//! HEC-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, HecError>;

/// Top-level error type for the overseer client.
#[derive(Debug, Error)]
pub enum HecError {
    #[error("[HEC-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[HEC-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[HEC-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[HEC-2001] request to {endpoint} failed: {details}")]
    Network { endpoint: String, details: String },

    #[error("[HEC-2002] request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("[HEC-2003] {endpoint} answered with HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("[HEC-2004] malformed response from {endpoint}: {details}")]
    MalformedResponse { endpoint: String, details: String },

    #[error("[HEC-2101] simulation {command} command failed: {details}")]
    Command {
        command: &'static str,
        details: String,
    },

    #[error("[HEC-2201] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[HEC-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[HEC-3900] runtime failure: {details}")]
    Runtime { details: String },
}

/// Coarse failure taxonomy used by the sync layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A fetch could not complete: refused, timed out, non-2xx, or malformed.
    Network,
    /// A start/stop command was rejected or failed.
    Command,
    /// Anything else (configuration, local IO).
    Other,
}

impl HecError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "HEC-1001",
            Self::MissingConfig { .. } => "HEC-1002",
            Self::ConfigParse { .. } => "HEC-1003",
            Self::Network { .. } => "HEC-2001",
            Self::Timeout { .. } => "HEC-2002",
            Self::HttpStatus { .. } => "HEC-2003",
            Self::MalformedResponse { .. } => "HEC-2004",
            Self::Command { .. } => "HEC-2101",
            Self::Serialization { .. } => "HEC-2201",
            Self::Io { .. } => "HEC-3002",
            Self::Runtime { .. } => "HEC-3900",
        }
    }

    /// Which side of the failure taxonomy this error falls on.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::MalformedResponse { .. } => FailureKind::Network,
            Self::Command { .. } => FailureKind::Command,
            _ => FailureKind::Other,
        }
    }

    /// Backend URL the failure happened on, for transport errors.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Network { endpoint, .. }
            | Self::Timeout { endpoint }
            | Self::HttpStatus { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Classify a transport error against the endpoint it was issued for.
    #[must_use]
    pub fn from_transport(endpoint: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                endpoint: endpoint.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return Self::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::MalformedResponse {
                endpoint: endpoint.to_string(),
                details: err.to_string(),
            };
        }
        Self::Network {
            endpoint: endpoint.to_string(),
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for HecError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HecError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}

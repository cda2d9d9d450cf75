//! SED-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::schema::ArtifactType;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SedError>;

/// Top-level error type for the social-engineering detector.
#[derive(Debug, Error)]
pub enum SedError {
    #[error("[SED-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SED-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SED-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SED-1101] invalid scan request: {details}")]
    InvalidRequest { details: String },

    #[error("[SED-1102] no analysis engine found for artifact type: {artifact_type}")]
    UnsupportedArtifact { artifact_type: ArtifactType },

    #[error("[SED-1103] unknown artifact type: {value:?}")]
    UnknownArtifactType { value: String },

    #[error("[SED-2001] invalid keyword pattern {pattern:?}: {details}")]
    InvalidPattern { pattern: String, details: String },

    #[error("[SED-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SED-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SedError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SED-1001",
            Self::MissingConfig { .. } => "SED-1002",
            Self::ConfigParse { .. } => "SED-1003",
            Self::InvalidRequest { .. } => "SED-1101",
            Self::UnsupportedArtifact { .. } => "SED-1102",
            Self::UnknownArtifactType { .. } => "SED-1103",
            Self::InvalidPattern { .. } => "SED-2001",
            Self::Serialization { .. } => "SED-2101",
            Self::Io { .. } => "SED-3002",
        }
    }

    /// Whether the failure was caused by the caller's input rather than the
    /// environment. Front ends map these to a "bad request" style response.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::UnsupportedArtifact { .. }
                | Self::UnknownArtifactType { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SedError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

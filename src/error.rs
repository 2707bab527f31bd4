//! @ai:module:intent Define error types for policy parsing and documentation
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use crate::directive::Directive;
use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all policydoc operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No package declaration found in {0}")]
    MissingPackage(PathBuf),

    #[error("invalid {directive} annotation token: {token}")]
    InvalidAnnotation { directive: Directive, token: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// @ai:intent Build a malformed-annotation error for one directive token
    /// @ai:effects pure
    pub fn invalid_annotation(directive: Directive, token: impl Into<String>) -> Self {
        Self::InvalidAnnotation {
            directive,
            token: token.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

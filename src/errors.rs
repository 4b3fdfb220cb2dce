// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::exec::SubprocessFailure;

#[derive(Error, Debug)]
pub enum LvsError {
    /// A single ipvsadm (or helper) invocation failed.
    #[error(transparent)]
    Subprocess(#[from] SubprocessFailure),

    #[error("object already exists")]
    Conflict,

    #[error("object was not found")]
    NotFound,

    #[error("object was not deleted")]
    DeleteFailed,

    /// The external binary is not installed or not on the search path.
    #[error("unable to find the {0} command on the system")]
    ToolMissing(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LvsError {
    /// True for the sentinel outcomes a caller may want to branch on
    /// (`Conflict`, `NotFound`, `DeleteFailed`, `ToolMissing`).
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            LvsError::Conflict | LvsError::NotFound | LvsError::DeleteFailed | LvsError::ToolMissing(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LvsError>;

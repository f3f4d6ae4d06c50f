//! Crate-wide error type.
//!
//! Every component returns `Result<T, ScalpelError>`. Only the dispatcher
//! (`dispatcher::error`) translates a `ScalpelError` into the closed
//! `error_code` taxonomy that crosses the tool-protocol boundary; internal
//! code should never match on error-code strings directly.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScalpelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("analysis error: {0}")]
    Analysis(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("solver error: {0}")]
    Solver(String),

    #[error("policy error: {0}")]
    Policy(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl ScalpelError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }
    pub fn solver(msg: impl Into<String>) -> Self {
        Self::Solver(msg.into())
    }
    pub fn policy(msg: impl Into<String>) -> Self {
        Self::Policy(msg.into())
    }
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<crate::features::cache::CacheError> for ScalpelError {
    fn from(err: crate::features::cache::CacheError) -> Self {
        ScalpelError::Cache(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScalpelError>;

//! Top-level error type for telos.
//!
//! Only the store boundary and configuration can fail. The analytics layer
//! (record accessors, calendar predicates, status classification, linkage,
//! streaks, rollups) is total by design: the upstream data source offers no
//! schema guarantee, so malformed or missing data degrades to neutral
//! values instead of surfacing as errors.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Top-level error, preserving the full diagnostic chain (error codes and
/// help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum TelosError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias for functions returning telos results.
pub type TelosResult<T> = std::result::Result<T, TelosError>;

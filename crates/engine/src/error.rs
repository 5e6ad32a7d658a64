use studyforge_core::error::CoreError;

use crate::store::StoreError;

/// Engine-level error type.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, so callers can map both onto their transport's error surface.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `studyforge-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from the storage port.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for engine operation results.
pub type EngineResult<T> = Result<T, EngineError>;

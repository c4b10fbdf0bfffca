//! Engine error model.

use thiserror::Error;

use atelier_core::DomainError;
use atelier_store::StoreError;

pub type EngineResult<T> = Result<T, EngineError>;

/// Failure of an engine operation.
///
/// Domain failures are recoverable, user-facing rejections; no mutation has
/// happened when one is returned. `PartialWrite` is the documented exception:
/// a collection save failed after an earlier one succeeded, and the touched
/// records need reconciliation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error(
        "partial write: collection '{collection}' failed after earlier writes succeeded, \
         records need reconciliation: {source}"
    )]
    PartialWrite {
        collection: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Tracks whether an operation has already written a collection, so a later
/// save failure is reported as a partial write instead of a plain storage
/// error.
pub(crate) struct WriteSequence {
    wrote: bool,
}

impl WriteSequence {
    pub(crate) fn new() -> Self {
        Self { wrote: false }
    }

    pub(crate) fn step(
        &mut self,
        collection: &'static str,
        result: Result<(), StoreError>,
    ) -> EngineResult<()> {
        match result {
            Ok(()) => {
                self.wrote = true;
                Ok(())
            }
            Err(source) if self.wrote => {
                tracing::error!(
                    collection,
                    error = %source,
                    "collection save failed after earlier writes; records need reconciliation"
                );
                Err(EngineError::PartialWrite { collection, source })
            }
            Err(source) => Err(EngineError::Store(source)),
        }
    }
}

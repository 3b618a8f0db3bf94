use thiserror::Error;

use crate::models::SectionType;
use crate::pagination::cursor::{Cursor, UnitKey};

/// Failure reported by a measurement oracle.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MeasureError(pub String);

/// Errors that abort a pagination pass. No partial page list is ever returned
/// alongside one of these; callers re-run the pass instead of resuming.
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("section {index} ({section_type:?}) has no rows")]
    EmptySection {
        index: usize,
        section_type: SectionType,
    },

    #[error("singleton section {index} ({section_type:?}) must carry exactly one row, found {rows}")]
    SingletonRowCount {
        index: usize,
        section_type: SectionType,
        rows: usize,
    },

    #[error("page capacity must be a positive number, got {0}")]
    InvalidCapacity(f32),

    #[error("cursor {0} does not address a row of the document")]
    CursorOutOfRange(Cursor),

    #[error("measuring {unit} failed: {source}")]
    Measurement {
        unit: UnitKey,
        #[source]
        source: MeasureError,
    },

    #[error("oracle reported an invalid height {height} for {unit}")]
    InvalidHeight { unit: UnitKey, height: f32 },

    #[error("pagination made no progress past {0}")]
    Stalled(Cursor),
}

impl PaginationError {
    /// True for contract violations by whoever assembled the document or chose
    /// the capacity, as opposed to faults inside the oracle or the engine.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            PaginationError::EmptySection { .. }
                | PaginationError::SingletonRowCount { .. }
                | PaginationError::InvalidCapacity(_)
                | PaginationError::CursorOutOfRange(_)
        )
    }
}

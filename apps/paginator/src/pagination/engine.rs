//! Pagination Engine — builds one page from a start cursor.
//!
//! Greedy placement with a one-step backtrack:
//! 1. The row at `start` (plus its section title when it is the section's
//!    first row) is placed unconditionally.
//! 2. Each following row in document order is measured and staged. A row
//!    that opens a titled section is staged together with its title, so a
//!    title never ends up alone at the bottom of a page.
//! 3. The first staged placement that pushes the content height past
//!    capacity is rolled back and the page closes; its cursor is where the
//!    next page resumes.
//!
//! `build_page` and `build_page_async` share the builder and differ only in
//! how the oracle is called.

use tracing::{debug, warn};

use crate::models::Document;
use crate::pagination::builder::{Candidate, Heights, PageBuilder, Placement};
use crate::pagination::cursor::{Cursor, Unit};
use crate::pagination::error::{MeasureError, PaginationError};
use crate::pagination::oracle::{AsyncMeasurementOracle, MeasurementOracle};
use crate::pagination::page::PageBreak;

/// Builds the page that starts at `start`.
///
/// `start` must address an existing row. The returned `next_cursor` is
/// terminal (`section_index == document.len()`) when the document is done.
pub fn build_page<O>(
    document: &Document,
    start: Cursor,
    capacity: f32,
    oracle: &mut O,
) -> Result<PageBreak, PaginationError>
where
    O: MeasurementOracle + ?Sized,
{
    let mut builder = PageBuilder::open(document, start, capacity)?;

    while let Some(candidate) = builder.next_candidate() {
        let title = match &candidate.title {
            Some(unit) => Some(checked_height(unit, oracle.measure(unit))?),
            None => None,
        };
        let row = checked_height(&candidate.row, oracle.measure(&candidate.row))?;
        apply(&mut builder, &candidate, Heights { title, row }, capacity);
    }

    Ok(builder.finish())
}

/// Same algorithm as [`build_page`], awaiting each measurement to completion
/// before the next one is issued.
pub async fn build_page_async<O>(
    document: &Document,
    start: Cursor,
    capacity: f32,
    oracle: &mut O,
) -> Result<PageBreak, PaginationError>
where
    O: AsyncMeasurementOracle + ?Sized,
{
    let mut builder = PageBuilder::open(document, start, capacity)?;

    while let Some(candidate) = builder.next_candidate() {
        let title = match &candidate.title {
            Some(unit) => Some(checked_height(unit, oracle.measure(unit).await)?),
            None => None,
        };
        let row = checked_height(&candidate.row, oracle.measure(&candidate.row).await)?;
        apply(&mut builder, &candidate, Heights { title, row }, capacity);
    }

    Ok(builder.finish())
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn apply<'d>(builder: &mut PageBuilder<'d>, candidate: &Candidate<'d>, heights: Heights, capacity: f32) {
    match builder.place(candidate, heights) {
        Placement::Forced { overflows: true } => {
            warn!(
                cursor = %candidate.cursor,
                height = builder.content_height(),
                capacity,
                "Placement alone exceeds page capacity; placing it anyway"
            );
        }
        Placement::RolledBack => {
            debug!(
                resume_at = %candidate.cursor,
                content_height = builder.content_height(),
                capacity,
                "Page break"
            );
        }
        Placement::Forced { overflows: false } | Placement::Committed => {}
    }
}

/// Turns an oracle answer into a usable height. Faults and nonsense heights
/// are fatal to the pass.
fn checked_height(unit: &Unit<'_>, measured: Result<f32, MeasureError>) -> Result<f32, PaginationError> {
    let key = unit.key();
    let height = measured.map_err(|source| PaginationError::Measurement { unit: key, source })?;
    if !height.is_finite() || height < 0.0 {
        return Err(PaginationError::InvalidHeight { unit: key, height });
    }
    Ok(height)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

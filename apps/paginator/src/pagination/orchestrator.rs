//! Page Orchestrator — drives the engine page after page.
#![allow(dead_code)]
//!
//! Each page is a pure function of `(document, cursor, capacity)`, so the
//! sequence is restartable from any `next_cursor` a previous page returned.
//! Heights are cached per pass, so every unit reaches the oracle at most once.

use tracing::info;

use crate::models::Document;
use crate::pagination::cursor::Cursor;
use crate::pagination::engine::{build_page, build_page_async};
use crate::pagination::error::PaginationError;
use crate::pagination::oracle::{AsyncMeasurementOracle, CachedOracle, MeasurementOracle, PageCapacity};
use crate::pagination::page::{Page, PageBreak};

/// Lazy page sequence. Yields pages in order and stops after the last page
/// or after the first error.
pub struct Pages<'d, 'o, O: ?Sized> {
    document: &'d Document,
    capacity: f32,
    oracle: CachedOracle<'o, O>,
    cursor: Cursor,
    number: usize,
    failed: bool,
}

impl<'d, 'o, O: MeasurementOracle + ?Sized> Pages<'d, 'o, O> {
    /// Validates the document and starts at its first row.
    pub fn new(document: &'d Document, capacity: f32, oracle: &'o mut O) -> Result<Self, PaginationError> {
        Self::resume_from(document, Cursor::START, capacity, oracle)
    }

    /// Validates the document and starts at `cursor`, typically a
    /// `next_cursor` returned by an earlier page.
    pub fn resume_from(
        document: &'d Document,
        cursor: Cursor,
        capacity: f32,
        oracle: &'o mut O,
    ) -> Result<Self, PaginationError> {
        check_inputs(document, capacity)?;
        if !cursor.is_end(document) && !cursor.is_valid(document) {
            return Err(PaginationError::CursorOutOfRange(cursor));
        }
        Ok(Pages {
            document,
            capacity,
            oracle: CachedOracle::new(oracle),
            cursor,
            number: 1,
            failed: false,
        })
    }

    /// Numbers the next yielded page `first`. A run resumed after page N
    /// continues with N + 1.
    pub fn numbered_from(mut self, first: usize) -> Self {
        self.number = first;
        self
    }

    /// Where the next page would start.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// How many times the underlying oracle has been called so far.
    pub fn measurements(&self) -> usize {
        self.oracle.inner_calls()
    }
}

impl<O: MeasurementOracle + ?Sized> Iterator for Pages<'_, '_, O> {
    type Item = Result<Page, PaginationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_end(self.document) {
            return None;
        }
        let result = build_page(self.document, self.cursor, self.capacity, &mut self.oracle)
            .and_then(|page_break| advance(self.cursor, self.number, page_break));
        match result {
            Ok((page, next)) => {
                self.cursor = next;
                self.number += 1;
                Some(Ok(page))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Paginates the whole document. Fails fast on a malformed document or
/// capacity; any measurement fault discards every page built so far.
pub fn paginate<C, O>(document: &Document, capacity: &C, oracle: &mut O) -> Result<Vec<Page>, PaginationError>
where
    C: PageCapacity + ?Sized,
    O: MeasurementOracle + ?Sized,
{
    let mut pages = Pages::new(document, capacity.usable_height(), oracle)?;
    let result: Vec<Page> = pages.by_ref().collect::<Result<_, _>>()?;

    info!(
        pages = result.len(),
        sections = document.len(),
        rows = document.total_rows(),
        measurements = pages.measurements(),
        "Pagination complete"
    );
    Ok(result)
}

/// [`paginate`] over an asynchronous oracle. Measurements are awaited one at
/// a time.
pub async fn paginate_async<C, O>(
    document: &Document,
    capacity: &C,
    oracle: &mut O,
) -> Result<Vec<Page>, PaginationError>
where
    C: PageCapacity + ?Sized,
    O: AsyncMeasurementOracle + ?Sized,
{
    let capacity = capacity.usable_height();
    check_inputs(document, capacity)?;

    let mut cached = CachedOracle::new(oracle);
    let mut cursor = Cursor::START;
    let mut result = Vec::new();

    while !cursor.is_end(document) {
        let page_break = build_page_async(document, cursor, capacity, &mut cached).await?;
        let (page, next) = advance(cursor, result.len() + 1, page_break)?;
        result.push(page);
        cursor = next;
    }

    info!(
        pages = result.len(),
        sections = document.len(),
        rows = document.total_rows(),
        measurements = cached.inner_calls(),
        "Pagination complete"
    );
    Ok(result)
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn check_inputs(document: &Document, capacity: f32) -> Result<(), PaginationError> {
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(PaginationError::InvalidCapacity(capacity));
    }
    document.validate()
}

/// Numbers a finished page. Every page must move the cursor strictly forward.
fn advance(start: Cursor, number: usize, page_break: PageBreak) -> Result<(Page, Cursor), PaginationError> {
    if page_break.next_cursor <= start {
        return Err(PaginationError::Stalled(start));
    }
    let mut page = page_break.page;
    page.number = number;
    Ok((page, page_break.next_cursor))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Row, Section, SectionType};
    use crate::pagination::error::MeasureError;
    use crate::pagination::oracle::HeightTable;
    use crate::pagination::cursor::{Unit, UnitKey};
    use async_trait::async_trait;
    use std::sync::Arc;

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| Row::with_text(format!("row {i}"))).collect()
    }

    fn header_and_experience() -> (Document, HeightTable) {
        let doc = Document::new(vec![
            Section::new(SectionType::Header, "", rows(1)),
            Section::new(SectionType::Experience, "Experience", rows(3)),
        ]);
        let table = HeightTable::new()
            .row(0, 0, 40.0)
            .title(1, 20.0)
            .rows(1, &[30.0, 30.0, 80.0]);
        (doc, table)
    }

    /// Deterministic pseudo-random résumé: sizes and heights from a small LCG.
    fn generated(seed: u64) -> (Document, HeightTable) {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mut next = move |bound: u64| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) % bound
        };

        let mut sections = vec![
            Section::new(SectionType::Header, "", rows(1)),
            Section::new(SectionType::Summary, "", rows(1)),
        ];
        let mut table = HeightTable::new()
            .row(0, 0, 30.0 + next(40) as f32)
            .row(1, 0, 20.0 + next(60) as f32);

        let kinds = [
            SectionType::Experience,
            SectionType::Projects,
            SectionType::Education,
            SectionType::Skills,
        ];
        for (offset, kind) in kinds.iter().enumerate() {
            let index = offset + 2;
            let count = 1 + next(6) as usize;
            sections.push(Section::new(*kind, format!("{kind:?}"), rows(count)));
            table = table.title(index, 10.0 + next(15) as f32);
            for row in 0..count {
                table = table.row(index, row, 5.0 + next(90) as f32);
            }
        }
        (Document::new(sections), table)
    }

    fn boundaries(pages: &[Page]) -> Vec<Cursor> {
        pages.iter().map(|p| p.next_cursor).collect()
    }

    // ── scenarios ───────────────────────────────────────────────────────────

    #[test]
    fn test_header_and_experience_scenario() {
        let (doc, mut table) = header_and_experience();
        let pages = paginate(&doc, &100.0_f32, &mut table).unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages.iter().map(|p| p.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(pages[0].content_height, 90.0);
        assert_eq!(pages[1].content_height, 30.0);
        assert_eq!(pages[2].content_height, 80.0);
        assert_eq!(
            boundaries(&pages),
            vec![Cursor::new(1, 1), Cursor::new(1, 2), Cursor::end(&doc)]
        );
        let titles: Vec<bool> = pages
            .iter()
            .flat_map(|p| p.sections.iter().filter(|s| s.source_index == 1))
            .map(|s| s.includes_title)
            .collect();
        assert_eq!(titles, vec![true, false, false], "title only on the first page");
    }

    #[test]
    fn test_single_oversized_row_scenario() {
        let doc = Document::new(vec![Section::new(SectionType::Summary, "", rows(1))]);
        let mut table = HeightTable::new().row(0, 0, 150.0);
        let pages = paginate(&doc, &100.0_f32, &mut table).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].row_count(), 1);
        assert!(pages[0].is_oversized(100.0));
    }

    #[test]
    fn test_empty_document_has_no_pages() {
        let mut table = HeightTable::new();
        let pages = paginate(&Document::default(), &100.0_f32, &mut table).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_malformed_document_fails_before_measuring() {
        let doc = Document::new(vec![Section::new(SectionType::Projects, "Projects", vec![])]);
        let mut table = HeightTable::new();
        let err = paginate(&doc, &100.0_f32, &mut table).unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let (doc, mut table) = header_and_experience();
        assert!(matches!(
            paginate(&doc, &0.0_f32, &mut table),
            Err(PaginationError::InvalidCapacity(_))
        ));
    }

    // ── properties ──────────────────────────────────────────────────────────

    #[test]
    fn test_completeness_across_generated_documents() {
        for seed in 0..40 {
            let (doc, mut table) = generated(seed);
            let pages = paginate(&doc, &120.0_f32, &mut table).unwrap();

            for (index, source) in doc.sections.iter().enumerate() {
                let placed: Vec<Arc<Row>> = pages
                    .iter()
                    .flat_map(|p| p.sections.iter())
                    .filter(|s| s.source_index == index)
                    .flat_map(|s| s.section.rows.iter().cloned())
                    .collect();
                assert_eq!(placed.len(), source.rows.len(), "seed {seed} section {index}");
                for (a, b) in placed.iter().zip(source.rows.iter()) {
                    assert!(Arc::ptr_eq(a, b), "seed {seed}: rows reordered or duplicated");
                }
            }
        }
    }

    #[test]
    fn test_every_page_has_a_row_and_respects_capacity() {
        for seed in 0..40 {
            let (doc, mut table) = generated(seed);
            let capacity = 120.0_f32;
            let pages = paginate(&doc, &capacity, &mut table).unwrap();

            for page in &pages {
                assert!(page.row_count() >= 1, "seed {seed}: empty page");

                // Re-add the placed units from the table, not from the page.
                let placed: f32 = page
                    .sections
                    .iter()
                    .map(|partial| {
                        let section = partial.source_index;
                        let title = if partial.includes_title {
                            table.get(UnitKey::Title { section }).unwrap()
                        } else {
                            0.0
                        };
                        let rows: f32 = partial
                            .row_range()
                            .map(|row| table.get(UnitKey::Row { section, row }).unwrap())
                            .sum();
                        title + rows
                    })
                    .sum();
                assert!((placed - page.content_height).abs() < 1e-3, "seed {seed}");
                // Only a forced first placement may overflow.
                if placed > capacity {
                    assert_eq!(page.row_count(), 1, "seed {seed}: overflow beyond forced unit");
                }
            }
        }
    }

    #[test]
    fn test_titles_appear_once_and_with_first_row() {
        for seed in 0..40 {
            let (doc, mut table) = generated(seed);
            let pages = paginate(&doc, &120.0_f32, &mut table).unwrap();
            for (index, source) in doc.sections.iter().enumerate() {
                let with_title: Vec<_> = pages
                    .iter()
                    .flat_map(|p| p.sections.iter())
                    .filter(|s| s.source_index == index && s.includes_title)
                    .collect();
                let expected = usize::from(source.section_type.has_title_unit());
                assert_eq!(with_title.len(), expected, "seed {seed} section {index}");
                if let Some(partial) = with_title.first() {
                    assert_eq!(partial.first_row, 0);
                    assert!(!partial.section.rows.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_ledger_matches_content_height() {
        let (doc, mut table) = generated(7);
        for page in paginate(&doc, &120.0_f32, &mut table).unwrap() {
            let sum: f32 = page.ledger.entries().iter().map(|e| e.height).sum();
            assert!((sum - page.content_height).abs() < 1e-3);
            assert_eq!(page.ledger.bottom(), page.content_height);
        }
    }

    #[test]
    fn test_determinism() {
        let (doc, table) = generated(11);
        let first = paginate(&doc, &100.0_f32, &mut table.clone()).unwrap();
        let second = paginate(&doc, &100.0_f32, &mut table.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_restart_from_next_cursor_reproduces_remaining_pages() {
        let (doc, table) = generated(3);
        let full = paginate(&doc, &100.0_f32, &mut table.clone()).unwrap();
        assert!(full.len() >= 2, "fixture should span several pages");

        let resume_at = full[0].next_cursor;
        let mut oracle = table.clone();
        let resumed: Vec<Page> = Pages::resume_from(&doc, resume_at, 100.0, &mut oracle)
            .unwrap()
            .numbered_from(full[0].number + 1)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(resumed[0].number, 2);
        assert_eq!(resumed.as_slice(), &full[1..]);
    }

    #[test]
    fn test_pages_iterator_is_lazy() {
        let (doc, mut table) = header_and_experience();
        let mut pages = Pages::new(&doc, 100.0, &mut table).unwrap();
        assert_eq!(pages.measurements(), 0);
        let first = pages.next().unwrap().unwrap();
        assert_eq!(first.next_cursor, pages.cursor());
        assert_eq!(pages.by_ref().count(), 2);
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_rolled_back_unit_is_measured_once() {
        let (doc, mut table) = header_and_experience();
        let mut pages = Pages::new(&doc, 100.0, &mut table).unwrap();
        let all: Vec<Page> = pages.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(all.len(), 3);
        // header, title, three rows
        assert_eq!(pages.measurements(), 5);
    }

    #[test]
    fn test_resume_from_rejects_bad_cursor() {
        let (doc, mut table) = header_and_experience();
        assert!(matches!(
            Pages::resume_from(&doc, Cursor::new(1, 9), 100.0, &mut table),
            Err(PaginationError::CursorOutOfRange(_))
        ));
    }

    #[test]
    fn test_advance_requires_forward_progress() {
        let (doc, mut table) = header_and_experience();
        let page_break = build_page(&doc, Cursor::new(1, 1), 100.0, &mut table).unwrap();
        assert!(matches!(
            advance(Cursor::new(1, 2), 2, page_break),
            Err(PaginationError::Stalled(_))
        ));
    }

    // ── async ───────────────────────────────────────────────────────────────

    /// Yields to the runtime before answering, like a host waiting on layout.
    struct DeferredLayout {
        table: HeightTable,
        in_flight: bool,
    }

    #[async_trait]
    impl AsyncMeasurementOracle for DeferredLayout {
        async fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError> {
            assert!(!self.in_flight, "overlapping measurement");
            self.in_flight = true;
            tokio::task::yield_now().await;
            self.in_flight = false;
            self.table
                .get(unit.key())
                .ok_or_else(|| MeasureError(format!("unknown {}", unit.key())))
        }
    }

    #[tokio::test]
    async fn test_async_pagination_matches_sync() {
        let (doc, table) = generated(5);
        let sync = paginate(&doc, &110.0_f32, &mut table.clone()).unwrap();

        let mut oracle = DeferredLayout {
            table,
            in_flight: false,
        };
        let asynchronous = paginate_async(&doc, &110.0_f32, &mut oracle).await.unwrap();
        assert_eq!(sync, asynchronous);
    }

    #[tokio::test]
    async fn test_async_measurement_failure_is_fatal() {
        let (doc, _) = header_and_experience();
        let mut oracle = DeferredLayout {
            table: HeightTable::new().row(0, 0, 40.0),
            in_flight: false,
        };
        let err = paginate_async(&doc, &100.0_f32, &mut oracle).await.unwrap_err();
        assert!(matches!(err, PaginationError::Measurement { .. }));
    }
}

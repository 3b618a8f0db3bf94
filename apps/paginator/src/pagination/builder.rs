//! In-progress page with explicit commit / rollback.
//!
//! A placement is staged directly into the page (row appended, ledger entries
//! recorded) and then either committed or rolled back as a whole. Nothing
//! leaves the builder until `finish`, so a rolled-back row can never leak
//! into a published page.

use crate::models::Document;
use crate::pagination::cursor::{Cursor, Unit, UnitKey};
use crate::pagination::error::PaginationError;
use crate::pagination::page::{HeightLedger, Page, PageBreak, PartialSection};

/// The next placement the builder wants measured: a row, preceded by its
/// section title when the row opens a titled section.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'d> {
    pub cursor: Cursor,
    pub title: Option<Unit<'d>>,
    pub row: Unit<'d>,
}

/// Measured heights for a candidate, in the same order it listed its units.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Heights {
    pub title: Option<f32>,
    pub row: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Committed,
    /// First placement on the page; kept even if it alone overflows.
    Forced { overflows: bool },
    /// Overflowed and was undone. The page is closed.
    RolledBack,
}

/// Undo record for the placement currently staged.
struct Staged {
    ledger_mark: usize,
    opened_section: bool,
}

pub(crate) struct PageBuilder<'d> {
    document: &'d Document,
    capacity: f32,
    start: Cursor,
    next: Cursor,
    sections: Vec<PartialSection>,
    ledger: HeightLedger,
    content_height: f32,
    closed: bool,
}

impl<'d> PageBuilder<'d> {
    pub fn open(document: &'d Document, start: Cursor, capacity: f32) -> Result<Self, PaginationError> {
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(PaginationError::InvalidCapacity(capacity));
        }
        if !start.is_valid(document) {
            return Err(PaginationError::CursorOutOfRange(start));
        }
        Ok(PageBuilder {
            document,
            capacity,
            start,
            next: start,
            sections: Vec::new(),
            ledger: HeightLedger::new(),
            content_height: 0.0,
            closed: false,
        })
    }

    /// The next placement to measure, or `None` once the page is closed or
    /// the document is exhausted.
    pub fn next_candidate(&self) -> Option<Candidate<'d>> {
        if self.closed || self.next.is_end(self.document) {
            return None;
        }
        let cursor = self.next;
        let title = cursor
            .opens_titled_section(self.document)
            .then(|| Unit::title(self.document, cursor.section_index));
        Some(Candidate {
            cursor,
            title,
            row: Unit::row(self.document, cursor),
        })
    }

    /// Stages the candidate, then commits it if it fits (or is the page's
    /// first placement) and rolls it back otherwise.
    pub fn place(&mut self, candidate: &Candidate<'d>, heights: Heights) -> Placement {
        let forced = self.sections.is_empty();
        let staged = self.stage(candidate, heights);

        if forced {
            self.next = candidate.cursor.successor(self.document);
            return Placement::Forced {
                overflows: self.content_height > self.capacity,
            };
        }
        if self.content_height <= self.capacity {
            self.next = candidate.cursor.successor(self.document);
            return Placement::Committed;
        }

        self.rollback(staged);
        self.closed = true;
        Placement::RolledBack
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Publishes the page. `next_cursor` is the first unplaced row.
    pub fn finish(self) -> PageBreak {
        let page = Page {
            number: 0,
            start_cursor: self.start,
            next_cursor: self.next,
            sections: self.sections,
            ledger: self.ledger,
            content_height: self.content_height,
        };
        PageBreak {
            next_cursor: page.next_cursor,
            page,
        }
    }

    // ── staging ─────────────────────────────────────────────────────────────

    fn stage(&mut self, candidate: &Candidate<'d>, heights: Heights) -> Staged {
        let cursor = candidate.cursor;
        let document = self.document;
        let source = &document.sections[cursor.section_index];
        let ledger_mark = self.ledger.len();

        let opened_section = self
            .sections
            .last()
            .map_or(true, |s| s.source_index != cursor.section_index);
        if opened_section {
            self.sections.push(PartialSection {
                source_index: cursor.section_index,
                first_row: cursor.row_index,
                includes_title: candidate.title.is_some(),
                section: source.empty_clone(),
            });
        }

        if let Some(title_height) = heights.title {
            self.ledger.record(
                UnitKey::Title {
                    section: cursor.section_index,
                },
                title_height,
            );
        }
        self.ledger.record(candidate.row.key(), heights.row);

        if let Some(current) = self.sections.last_mut() {
            current
                .section
                .rows
                .push(source.rows[cursor.row_index].clone());
        }
        self.content_height = self.ledger.bottom();

        Staged {
            ledger_mark,
            opened_section,
        }
    }

    fn rollback(&mut self, staged: Staged) {
        if staged.opened_section {
            self.sections.pop();
        } else if let Some(current) = self.sections.last_mut() {
            current.section.rows.pop();
        }
        self.ledger.truncate(staged.ledger_mark);
        self.content_height = self.ledger.bottom();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

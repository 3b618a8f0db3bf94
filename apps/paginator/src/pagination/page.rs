//! Published page records and the per-page height ledger.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::models::Section;
use crate::pagination::cursor::{Cursor, UnitKey};

// ────────────────────────────────────────────────────────────────────────────
// Height ledger
// ────────────────────────────────────────────────────────────────────────────

/// Vertical position of one placed unit on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub unit: UnitKey,
    pub offset: f32,
    pub height: f32,
}

/// Every unit placed on the current page, top to bottom. Entries are stacked:
/// each offset is the bottom of the previous entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeightLedger {
    entries: Vec<LedgerEntry>,
}

impl HeightLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stacks `height` under the current bottom and returns the entry's offset.
    pub fn record(&mut self, unit: UnitKey, height: f32) -> f32 {
        let offset = self.bottom();
        self.entries.push(LedgerEntry {
            unit,
            offset,
            height,
        });
        offset
    }

    /// Offset just below the last entry; the page's content height.
    pub fn bottom(&self) -> f32 {
        self.entries.last().map_or(0.0, |e| e.offset + e.height)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry from `len` onwards.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pages
// ────────────────────────────────────────────────────────────────────────────

/// A page-local clone of a source section holding only the rows placed on
/// that page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialSection {
    /// Index of the source section in the document.
    pub source_index: usize,
    /// Index (in the source section) of the first row on this page.
    pub first_row: usize,
    /// True when the section title is rendered on this page.
    pub includes_title: bool,
    pub section: Section,
}

impl PartialSection {
    pub fn row_range(&self) -> std::ops::Range<usize> {
        self.first_row..self.first_row + self.section.rows.len()
    }
}

/// One finished page. Immutable once published by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based position in the pass. Assigned by the orchestrator; a page
    /// from a bare `build_page` call carries 0.
    pub number: usize,
    pub start_cursor: Cursor,
    /// Where the following page resumes; terminal on the last page.
    pub next_cursor: Cursor,
    pub sections: Vec<PartialSection>,
    pub ledger: HeightLedger,
    pub content_height: f32,
}

impl Page {
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.section.rows.len()).sum()
    }

    /// True when the committed content exceeds `capacity`. Only possible when
    /// the forced first placement alone is taller than the page.
    pub fn is_oversized(&self, capacity: f32) -> bool {
        self.content_height > capacity
    }
}

/// Result of building a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBreak {
    pub page: Page,
    pub next_cursor: Cursor,
}

//! Cursors and measurable units.
#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Document, Row, Section};

/// Points at the next unplaced row. `section_index == document.len()` is the
/// terminal cursor: everything has been placed.
///
/// Cursors order lexicographically, which is document order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub section_index: usize,
    pub row_index: usize,
}

impl Cursor {
    pub const START: Cursor = Cursor {
        section_index: 0,
        row_index: 0,
    };

    pub fn new(section_index: usize, row_index: usize) -> Self {
        Cursor {
            section_index,
            row_index,
        }
    }

    pub fn end(document: &Document) -> Self {
        Cursor::new(document.len(), 0)
    }

    pub fn is_end(self, document: &Document) -> bool {
        self.section_index >= document.len()
    }

    /// True when this cursor addresses an existing row.
    pub fn is_valid(self, document: &Document) -> bool {
        document
            .sections
            .get(self.section_index)
            .is_some_and(|s| self.row_index < s.rows.len())
    }

    /// The cursor one row further in document order, rolling into the next
    /// section's first row when this section is exhausted.
    pub fn successor(self, document: &Document) -> Cursor {
        let rows = document
            .sections
            .get(self.section_index)
            .map_or(0, |s| s.rows.len());
        if self.row_index + 1 < rows {
            Cursor::new(self.section_index, self.row_index + 1)
        } else {
            Cursor::new(self.section_index + 1, 0)
        }
    }

    /// True when placing the row at this cursor also places its section title.
    pub fn opens_titled_section(self, document: &Document) -> bool {
        self.row_index == 0
            && document
                .sections
                .get(self.section_index)
                .is_some_and(|s| s.section_type.has_title_unit())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.section_index, self.row_index)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Units
// ────────────────────────────────────────────────────────────────────────────

/// Stable identity of a unit within one document. Used to key the ledger and
/// the measurement cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitKey {
    Title { section: usize },
    Row { section: usize, row: usize },
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKey::Title { section } => write!(f, "title of section {section}"),
            UnitKey::Row { section, row } => write!(f, "row {row} of section {section}"),
        }
    }
}

/// A renderable thing the oracle can size: a section title or a single row.
/// The owning section travels along so the oracle can style by section type.
#[derive(Debug, Clone, Copy)]
pub enum Unit<'a> {
    Title {
        section_index: usize,
        section: &'a Section,
    },
    Row {
        cursor: Cursor,
        section: &'a Section,
        row: &'a Row,
    },
}

impl<'a> Unit<'a> {
    pub fn title(document: &'a Document, section_index: usize) -> Self {
        Unit::Title {
            section_index,
            section: &document.sections[section_index],
        }
    }

    /// The row unit at `cursor`. The cursor must be valid for `document`.
    pub fn row(document: &'a Document, cursor: Cursor) -> Self {
        let section = &document.sections[cursor.section_index];
        Unit::Row {
            cursor,
            section,
            row: &section.rows[cursor.row_index],
        }
    }

    pub fn key(&self) -> UnitKey {
        match self {
            Unit::Title { section_index, .. } => UnitKey::Title {
                section: *section_index,
            },
            Unit::Row { cursor, .. } => UnitKey::Row {
                section: cursor.section_index,
                row: cursor.row_index,
            },
        }
    }

    pub fn section(&self) -> &'a Section {
        match self {
            Unit::Title { section, .. } | Unit::Row { section, .. } => section,
        }
    }
}

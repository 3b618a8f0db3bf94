//! Résumé document model — the ordered, typed sections the paginator consumes.
//!
//! Rows are shared (`Arc<Row>`) between the source document and every
//! page-local clone, so restricting a section to a page's rows never copies
//! row content.
#![allow(dead_code)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pagination::error::PaginationError;

// ────────────────────────────────────────────────────────────────────────────
// Section types
// ────────────────────────────────────────────────────────────────────────────

/// The kind of a résumé section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    /// Name and contact line. Singleton.
    Header,
    /// Free-text profile paragraph. Singleton.
    Summary,
    Experience,
    Education,
    Projects,
    Skills,
    Certifications,
    Awards,
    Publications,
    Languages,
    Volunteering,
    Custom,
}

impl SectionType {
    /// Singleton sections hold exactly one synthetic row, have no separately
    /// measured title and are never split across pages.
    pub fn is_singleton(self) -> bool {
        matches!(self, SectionType::Header | SectionType::Summary)
    }

    /// Whether the section's title is placed as its own unit before the first row.
    pub fn has_title_unit(self) -> bool {
        !self.is_singleton()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rows and sections
// ────────────────────────────────────────────────────────────────────────────

/// One addressable content unit of a section: an experience entry, a project
/// card, a skills group. Opaque to the pagination engine; only the
/// measurement oracle looks inside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
    /// Skill chips, contact items, tech-stack labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Row {
    pub fn with_text(text: impl Into<String>) -> Self {
        Row {
            text: Some(text.into()),
            ..Row::default()
        }
    }
}

/// A typed résumé section with its ordered rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section_type: SectionType,
    #[serde(default)]
    pub section_title: String,
    pub rows: Vec<Arc<Row>>,
    /// Template-specific display configuration. Carried through untouched.
    #[serde(default)]
    pub display_setting: Value,
}

impl Section {
    pub fn new(section_type: SectionType, section_title: impl Into<String>, rows: Vec<Row>) -> Self {
        Section {
            section_type,
            section_title: section_title.into(),
            rows: rows.into_iter().map(Arc::new).collect(),
            display_setting: Value::Null,
        }
    }

    /// A clone of this section holding no rows yet. The display setting is
    /// deep-copied; rows appended later are shared with the source.
    pub fn empty_clone(&self) -> Section {
        Section {
            section_type: self.section_type,
            section_title: self.section_title.clone(),
            rows: Vec::new(),
            display_setting: self.display_setting.clone(),
        }
    }

    /// A clone of this section restricted to `rows` (a contiguous index range).
    pub fn restricted_clone(&self, rows: std::ops::Range<usize>) -> Section {
        let mut clone = self.empty_clone();
        clone.rows = self.rows[rows].to_vec();
        clone
    }

    pub fn is_singleton(&self) -> bool {
        self.section_type.is_singleton()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// An ordered list of sections in render order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(sections: Vec<Section>) -> Self {
        Document { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    /// Rejects documents the paginator cannot place: a section with no rows,
    /// or a singleton section that does not carry exactly one row.
    pub fn validate(&self) -> Result<(), PaginationError> {
        for (index, section) in self.sections.iter().enumerate() {
            if section.rows.is_empty() {
                return Err(PaginationError::EmptySection {
                    index,
                    section_type: section.section_type,
                });
            }
            if section.is_singleton() && section.rows.len() != 1 {
                return Err(PaginationError::SingletonRowCount {
                    index,
                    section_type: section.section_type,
                    rows: section.rows.len(),
                });
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

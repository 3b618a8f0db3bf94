//! Page Fill Analysis — how well each paginated page uses its height.
//!
//! Pagination never shrinks content, so this is a report rather than a
//! remediation loop: callers surface it to the editor so the user can trim an
//! entry or switch to a denser template.
//!
//! # Page fill rules
//! - Whitespace > 8% on any page except the last → `TooMuchWhitespace`
//! - Content taller than the page (a single forced unit) → `Oversized`
//! - Otherwise → `Acceptable`

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pagination::Page;

const MAX_WHITESPACE_FRACTION: f32 = 0.08;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Overall page fill verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    /// ≥ 92% fill, or the final page of the document.
    Acceptable,
    /// < 92% fill on a page that is followed by another page.
    TooMuchWhitespace,
    /// A single unit taller than the page was placed anyway.
    Oversized,
}

/// Fill analysis for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFillAnalysis {
    /// 1-based page number.
    pub page_number: usize,
    pub used: f32,
    pub available: f32,
    pub fill_ratio: f32,
    pub whitespace_fraction: f32,
    pub overflow_fraction: f32,
    pub verdict: PageFillVerdict,
}

/// Summary of a whole pagination pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationReport {
    pub page_count: usize,
    /// 1-based numbers of pages whose content exceeds the page height.
    pub oversized_pages: Vec<usize>,
    pub pages: Vec<PageFillAnalysis>,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Analyzes a single page. `is_last` relaxes the whitespace rule: the last
/// page ends where the document ends.
pub fn analyze_page_fill(page: &Page, capacity: f32, is_last: bool) -> PageFillAnalysis {
    let used = page.content_height;
    let fill_ratio = if capacity > 0.0 { used / capacity } else { 0.0 };

    let whitespace_fraction = (1.0_f32 - fill_ratio).max(0.0);
    let overflow_fraction = (fill_ratio - 1.0_f32).max(0.0);

    let verdict = if fill_ratio > 1.0 {
        PageFillVerdict::Oversized
    } else if !is_last && whitespace_fraction > MAX_WHITESPACE_FRACTION {
        PageFillVerdict::TooMuchWhitespace
    } else {
        PageFillVerdict::Acceptable
    };

    PageFillAnalysis {
        page_number: page.number,
        used,
        available: capacity,
        fill_ratio,
        whitespace_fraction,
        overflow_fraction,
        verdict,
    }
}

/// Analyzes every page of a pass.
pub fn summarize(pages: &[Page], capacity: f32) -> PaginationReport {
    let analyses: Vec<PageFillAnalysis> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| analyze_page_fill(page, capacity, i + 1 == pages.len()))
        .collect();

    let oversized_pages: Vec<usize> = analyses
        .iter()
        .filter(|a| a.verdict == PageFillVerdict::Oversized)
        .map(|a| a.page_number)
        .collect();

    if !oversized_pages.is_empty() {
        warn!(
            pages = ?oversized_pages,
            capacity,
            "Pagination: content taller than the page was placed anyway"
        );
    }

    PaginationReport {
        page_count: pages.len(),
        oversized_pages,
        pages: analyses,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Axum route handlers for the Pagination API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, JsonBody};
use crate::layout::{summarize, FontFamily, PageConfig, PaginationReport, PaperSize, TextMetricsOracle};
use crate::models::Document;
use crate::pagination::{paginate, Page, PageCapacity};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PaginateRequest {
    pub document: Document,
    /// Overrides the service's default font family.
    #[serde(default)]
    pub font: Option<FontFamily>,
    /// Overrides the service's default paper size.
    #[serde(default)]
    pub paper: Option<PaperSize>,
}

#[derive(Debug, Serialize)]
pub struct PaginateResponse {
    pub pagination_id: Uuid,
    /// Usable page height in points.
    pub capacity: f32,
    pub pages: Vec<Page>,
    pub report: PaginationReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/paginate
///
/// Splits a résumé document into pages using the headless text-metrics oracle.
/// Pages are numbered from 1 in `report`; `pages` is in render order.
pub async fn handle_paginate(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PaginateRequest>,
) -> Result<Json<PaginateResponse>, AppError> {
    if request.document.is_empty() {
        return Err(AppError::Validation(
            "document must contain at least one section".to_string(),
        ));
    }

    let page_config = resolve_page_config(&state.page_config, &request);
    let capacity = page_config.usable_height();
    let pagination_id = Uuid::new_v4();
    let document = request.document;

    // CPU-bound pass — spawn_blocking to avoid blocking the async executor.
    let pages = tokio::task::spawn_blocking(move || {
        let mut oracle = TextMetricsOracle::new(page_config.clone());
        paginate(&document, &page_config, &mut oracle)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pagination: {e}")))??;

    let report = summarize(&pages, capacity);
    info!(
        %pagination_id,
        pages = pages.len(),
        oversized = report.oversized_pages.len(),
        "Document paginated"
    );

    Ok(Json(PaginateResponse {
        pagination_id,
        capacity,
        pages,
        report,
    }))
}

fn resolve_page_config(defaults: &PageConfig, request: &PaginateRequest) -> PageConfig {
    let mut config = defaults.clone();
    if let Some(font) = request.font {
        config.font = font;
    }
    if let Some(paper) = request.paper {
        config.paper = paper;
    }
    config
}

use crate::layout::PageConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Default page geometry and typography. Requests may override the font
    /// and paper size; everything else comes from here.
    pub page_config: PageConfig,
}

// Headless layout support for the pagination engine.
// Implements: static font metrics, page geometry, the text-metrics oracle and
// page fill reporting. Measurement is CPU-bound and must run inside
// tokio::task::spawn_blocking when driven from a handler.

pub mod font_metrics;
pub mod page_fill;
pub mod text_oracle;

// Re-export the public API consumed by the handlers.
pub use font_metrics::{default_page_config, FontFamily, PageConfig, PaperSize};
pub use page_fill::{summarize, PaginationReport};
pub use text_oracle::TextMetricsOracle;

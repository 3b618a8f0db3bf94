// Pagination engine: splits a résumé document into fixed-height pages.
// The engine only places units; heights come from an injected oracle and the
// page height from a capacity provider. CPU-bound passes driven from async
// code must run inside tokio::task::spawn_blocking.

mod builder;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod oracle;
pub mod orchestrator;
pub mod page;

// Re-export the public API consumed by the handlers and the layout module.
pub use cursor::{Cursor, Unit, UnitKey};
pub use error::{MeasureError, PaginationError};
pub use oracle::{MeasurementOracle, PageCapacity};
pub use orchestrator::paginate;
pub use page::Page;

pub mod section;

pub use section::{Document, Row, Section, SectionType};

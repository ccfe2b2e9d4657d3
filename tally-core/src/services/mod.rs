//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. The parser and
//! mapping engine are pure functions; the registries and the import service
//! sit on top of the storage ports.

pub mod browse;
pub mod charts;
pub mod csv;
mod fields;
pub mod import;
pub mod mapping;
mod templates;

pub use browse::{paginate, Page, TransactionFilter, PAGE_SIZE};
pub use charts::{Chart, ChartKind, ChartService};
pub use fields::{generate_field_id, FieldRegistry};
pub use import::{detect_columns, ImportRequest, ImportResult, ImportService};
pub use templates::{generate_template_id, iso_timestamp, TemplateStore};

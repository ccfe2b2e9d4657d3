//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod field;
mod parsed;
pub mod result;
mod template;
mod transaction;

pub use field::{builtin_fields, is_builtin, FieldConfig, FieldType, NewField};
pub use parsed::ParsedCsv;
pub use template::{chrono_format, ColumnMapping, CsvTemplate, Delimiter, TemplateFormData, DEFAULT_DATE_FORMATS};
pub use transaction::{parse_date, FieldValue, Transaction, TransactionType};

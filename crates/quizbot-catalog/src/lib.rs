//! Quiz catalog: the immutable question → answer mapping.
//!
//! Catalogs are parsed once at startup from a line-oriented text file and
//! shared read-only for the rest of the process lifetime.

pub mod catalog;
pub mod error;
pub mod loader;
pub mod parser;
pub mod text;

pub use catalog::{Catalog, QuizEntry};
pub use error::CatalogError;
pub use loader::{DEFAULT_ENCODING, decode_catalog, load_catalog};
pub use parser::parse_catalog;
pub use text::normalize_whitespace;

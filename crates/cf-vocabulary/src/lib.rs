//! CF standard-name vocabulary.
//!
//! Loads `cf-standard-name-table.xml` into a read-only lookup from canonical
//! name to canonical units and description. The vocabulary is loaded once per
//! run and passed by shared reference to every record build.

pub mod error;
pub mod loader;
pub mod parser;
pub mod table;

pub use error::{VocabularyLoadError, VocabularyResult};
pub use loader::{load, load_or_empty, VocabularySource};
pub use parser::parse_table;
pub use table::{StandardNameEntry, Vocabulary};

//! Assessment catalog: record model, tag vocabularies and ingestion.

pub mod loader;
pub mod record;
pub mod tags;

pub use loader::{Catalog, SkippedRow, load_catalog, parse_duration, read_csv, read_json};
pub use record::{AssessmentRecord, disambiguated_id, id_from_url, normalize_url};
pub use tags::{JobLevel, Language, TestType};

//! Catalog ingestion from CSV or JSON.
//!
//! Malformed rows (no url, unparseable duration, duplicate url) are skipped
//! with a warning; they never fail the whole load.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::record::{AssessmentRecord, disambiguated_id, id_from_url, normalize_url};
use super::tags::{JobLevel, TestType};
use crate::error::{RecError, Result};

/// Result of loading a catalog file.
#[derive(Debug, Default)]
pub struct Catalog {
    pub records: Vec<AssessmentRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// A row that was dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub reason: String,
}

/// Untyped row shared by the CSV and JSON readers.
#[derive(Debug, Default)]
struct RawRow {
    name: String,
    url: String,
    description: String,
    job_levels: Vec<String>,
    languages: Vec<String>,
    test_types: Vec<String>,
    duration: String,
    remote_testing: String,
    adaptive_irt: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    job_levels: Option<String>,
    #[serde(default)]
    languages: Option<String>,
    #[serde(default, alias = "test_types")]
    test_type: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    remote_testing: Option<String>,
    #[serde(default)]
    adaptive_irt: Option<String>,
}

impl From<CsvRow> for RawRow {
    fn from(row: CsvRow) -> Self {
        Self {
            name: row.name.unwrap_or_default(),
            url: row.url.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            job_levels: parse_list(row.job_levels.as_deref().unwrap_or_default()),
            languages: parse_list(row.languages.as_deref().unwrap_or_default()),
            test_types: parse_list(row.test_type.as_deref().unwrap_or_default()),
            duration: row.duration.unwrap_or_default(),
            remote_testing: row.remote_testing.unwrap_or_default(),
            adaptive_irt: row.adaptive_irt.unwrap_or_default(),
        }
    }
}

impl RawRow {
    fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).map(value_to_text).unwrap_or_default();
        let list = |key: &str| value.get(key).map(value_to_list).unwrap_or_default();
        Self {
            name: text("name"),
            url: text("url"),
            description: text("description"),
            job_levels: list("job_levels"),
            languages: list("languages"),
            test_types: value
                .get("test_type")
                .or_else(|| value.get("test_types"))
                .map(value_to_list)
                .unwrap_or_default(),
            duration: text("duration"),
            remote_testing: text("remote_testing"),
            adaptive_irt: text("adaptive_irt"),
        }
    }
}

/// Load a catalog, choosing the reader from the file extension.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path)
        .map_err(|err| RecError::Catalog(format!("open catalog {}: {err}", path.display())))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let catalog = if is_json {
        read_json(file)?
    } else {
        read_csv(file)?
    };

    info!(
        path = %path.display(),
        records = catalog.records.len(),
        skipped = catalog.skipped.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Read a CSV catalog with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Catalog> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut builder = CatalogBuilder::default();
    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        match row {
            Ok(row) => builder.push(row_number, row.into()),
            Err(err) => builder.skip(row_number, format!("unreadable row: {err}")),
        }
    }
    Ok(builder.finish())
}

/// Read a JSON catalog: an array of row objects.
pub fn read_json<R: Read>(reader: R) -> Result<Catalog> {
    let value: Value = serde_json::from_reader(reader)
        .map_err(|err| RecError::Catalog(format!("parse catalog json: {err}")))?;
    let rows = value
        .as_array()
        .ok_or_else(|| RecError::Catalog("catalog json must be an array of rows".to_string()))?;

    let mut builder = CatalogBuilder::default();
    for (index, row) in rows.iter().enumerate() {
        if row.is_object() {
            builder.push(index + 1, RawRow::from_json(row));
        } else {
            builder.skip(index + 1, "row is not an object".to_string());
        }
    }
    Ok(builder.finish())
}

#[derive(Default)]
struct CatalogBuilder {
    catalog: Catalog,
    seen_urls: HashSet<String>,
    seen_ids: HashSet<String>,
}

impl CatalogBuilder {
    fn push(&mut self, row: usize, raw: RawRow) {
        let mut record = match parse_row(raw) {
            Ok(record) => record,
            Err(reason) => return self.skip(row, reason),
        };

        if !self.seen_urls.insert(normalize_url(&record.url)) {
            return self.skip(row, format!("duplicate url {}", record.url));
        }
        if self.seen_ids.contains(&record.id) {
            let id = disambiguated_id(&record.url);
            debug!(row, slug = %record.id, %id, "slug already taken, disambiguating id");
            record.id = id;
        }
        if self.seen_ids.insert(record.id.clone()) {
            self.catalog.records.push(record);
        } else {
            self.skip(row, format!("duplicate id {}", record.id));
        }
    }

    fn skip(&mut self, row: usize, reason: String) {
        warn!(row, %reason, "skipping catalog row");
        self.catalog.skipped.push(SkippedRow { row, reason });
    }

    fn finish(self) -> Catalog {
        self.catalog
    }
}

fn parse_row(raw: RawRow) -> std::result::Result<AssessmentRecord, String> {
    let url = raw.url.trim();
    if url.is_empty() {
        return Err("missing url".to_string());
    }
    let id = id_from_url(url);
    if id.is_empty() {
        return Err(format!("cannot derive id from url {url}"));
    }
    let duration = parse_duration(&raw.duration)?;

    let mut job_levels = Vec::new();
    for label in &raw.job_levels {
        match JobLevel::from_label(label) {
            Some(level) => job_levels.push(level),
            None => debug!(%label, %id, "ignoring unknown job level"),
        }
    }

    let mut test_types = Vec::new();
    for label in raw.test_types.iter().flat_map(|item| split_code_run(item)) {
        let parsed = TestType::from_label(label);
        if parsed.is_empty() {
            debug!(%label, %id, "ignoring unknown test type");
        }
        test_types.extend(parsed);
    }

    let name = if raw.name.trim().is_empty() {
        id.clone()
    } else {
        raw.name.trim().to_string()
    };

    let mut record = AssessmentRecord::new(name, url)
        .with_description(raw.description.trim())
        .with_job_levels(job_levels)
        .with_test_types(test_types)
        .with_languages(raw.languages)
        .with_duration(duration)
        .with_flags(parse_bool(&raw.remote_testing), parse_bool(&raw.adaptive_irt));
    record.id = id;
    Ok(record)
}

/// Split a list cell: `['a', 'b']` or `a, b`.
pub fn parse_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);
    inner
        .split(',')
        .map(|item| item.trim().trim_matches(['\'', '"']).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// `"C P A"` → `["C", "P", "A"]`; anything else is returned whole.
fn split_code_run(item: &str) -> Vec<&str> {
    let parts: Vec<&str> = item.split_whitespace().collect();
    if parts.len() > 1 && parts.iter().all(|part| part.len() == 1) {
        parts
    } else {
        vec![item]
    }
}

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:max(?:imum)?\s*[:=]?\s*)?(\d+(?:\.\d+)?)\s*(?:m|min|mins|minute|minutes)?$")
        .expect("valid regex")
});

const UNSPECIFIED_DURATIONS: &[&str] = &[
    "", "-", "untimed", "variable", "n/a", "na", "none", "tbc", "tbd", "unspecified",
];

/// Parse a catalog duration cell into whole minutes.
///
/// Recognizes bare numbers (`30`, `30.0`), `max 30`, `30 minutes` and the
/// `Approximate Completion Time in minutes = 30` form. Zero and the
/// untimed markers mean unspecified.
pub fn parse_duration(raw: &str) -> std::result::Result<Option<u32>, String> {
    let lowered = raw.trim().to_lowercase();
    let value = lowered
        .rsplit_once('=')
        .map_or(lowered.as_str(), |(_, rhs)| rhs)
        .trim();

    if UNSPECIFIED_DURATIONS.contains(&value) {
        return Ok(None);
    }

    let captures = DURATION_RE
        .captures(value)
        .ok_or_else(|| format!("unparseable duration {raw:?}"))?;
    let minutes: f64 = captures[1]
        .parse()
        .map_err(|err| format!("unparseable duration {raw:?}: {err}"))?;
    if !minutes.is_finite() || minutes > f64::from(u32::MAX) {
        return Err(format!("duration out of range {raw:?}"));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = minutes.round() as u32;
    Ok((rounded > 0).then_some(rounded))
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "t"
    )
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn value_to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(s) => parse_list(s),
        Value::Null => Vec::new(),
        other => vec![value_to_text(other)],
    }
}

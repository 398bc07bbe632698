//! JSON persistence for a built corpus index.
//!
//! A snapshot pins the embedder id that produced it. Loading it under a
//! different embedder is refused, since query and corpus vectors would live
//! in different spaces.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use super::index::{AssessmentIndex, CorpusIndex};
use crate::catalog::AssessmentRecord;
use crate::error::{RecError, Result};

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    format_version: u32,
    embedder: String,
    dimension: usize,
    created_at: String,
    records: Vec<AssessmentRecord>,
}

/// Write `index` to `path`, replacing any previous snapshot atomically.
pub fn save_snapshot(index: &CorpusIndex, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let snapshot = Snapshot {
        format_version: SNAPSHOT_FORMAT_VERSION,
        embedder: index.embedder_id().to_string(),
        dimension: index.dimension(),
        created_at: chrono::Utc::now().to_rfc3339(),
        records: index.records().to_vec(),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer(&mut writer, &snapshot)?;
        writer.flush()?;
    }
    temp.persist(path).map_err(|err| RecError::Io(err.error))?;

    info!(
        path = %path.display(),
        records = snapshot.records.len(),
        "index snapshot written"
    );
    Ok(())
}

/// Load a snapshot, requiring it to have been built with `embedder_id`.
pub fn load_snapshot(path: &Path, embedder_id: &str) -> Result<CorpusIndex> {
    let file = File::open(path)?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;

    if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(RecError::CorpusIntegrity(format!(
            "snapshot {} has format version {} (expected {SNAPSHOT_FORMAT_VERSION})",
            path.display(),
            snapshot.format_version
        )));
    }
    if snapshot.embedder != embedder_id {
        return Err(RecError::CorpusIntegrity(format!(
            "snapshot {} was built with embedder {} but {embedder_id} is configured; rebuild the index",
            path.display(),
            snapshot.embedder
        )));
    }

    let index = CorpusIndex::from_parts(snapshot.records, snapshot.embedder)?;
    if index.dimension() != snapshot.dimension {
        return Err(RecError::CorpusIntegrity(format!(
            "snapshot {} declares dimension {} but stores {}",
            path.display(),
            snapshot.dimension,
            index.dimension()
        )));
    }

    info!(
        path = %path.display(),
        records = index.len(),
        created_at = %snapshot.created_at,
        "index snapshot loaded"
    );
    Ok(index)
}

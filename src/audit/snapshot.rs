use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::store::{Collection, Filter, RecordStore};

pub const STUDENTS_FILE: &str = "students.json";
pub const LEAVES_FILE: &str = "leaves.json";
pub const ADVISORS_FILE: &str = "advisors.json";
pub const HODS_FILE: &str = "hods.json";

const DUMPED: [(Collection, &str); 4] = [
    (Collection::Students, STUDENTS_FILE),
    (Collection::LeaveApplications, LEAVES_FILE),
    (Collection::Advisors, ADVISORS_FILE),
    (Collection::Hods, HODS_FILE),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshots {
    pub students: Vec<Value>,
    pub leaves: Vec<Value>,
    pub advisors: Vec<Value>,
    pub hods: Option<Vec<Value>>,
}

impl Snapshots {
    /// Loads whatever snapshot files exist in `dir`. The HOD file is optional.
    pub fn load(dir: &Path) -> Self {
        let hods_path = dir.join(HODS_FILE);
        Self {
            students: load_records(&dir.join(STUDENTS_FILE)),
            leaves: load_records(&dir.join(LEAVES_FILE)),
            advisors: load_records(&dir.join(ADVISORS_FILE)),
            hods: hods_path.exists().then(|| load_records(&hods_path)),
        }
    }
}

/// Missing, empty or malformed files load as no records.
pub fn load_records(path: &Path) -> Vec<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Snapshot not readable");
            return Vec::new();
        }
    };

    if content.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!(path = %path.display(), "Snapshot is not a JSON array");
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Snapshot is not valid JSON");
            Vec::new()
        }
    }
}

/// Writes one JSON array per department-bearing collection into `dir`.
/// Credential fields are left out.
pub async fn dump(store: &dyn RecordStore, dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = 0;
    for (collection, file) in DUMPED {
        let documents = store
            .find(collection, &Filter::all())
            .await
            .with_context(|| format!("reading {collection}"))?;

        let records: Vec<Value> = documents
            .into_iter()
            .map(|mut document| {
                document.body.remove("password");
                document.into_json()
            })
            .collect();

        let path = dir.join(file);
        let encoded = serde_json::to_string_pretty(&records)?;
        fs::write(&path, encoded).with_context(|| format!("writing {}", path.display()))?;
        info!(%collection, records = records.len(), path = %path.display(), "Saved snapshot");
        written += records.len();
    }

    Ok(written)
}

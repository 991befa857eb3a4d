/// On-disk url table
///
/// The whole table is a single JSON document `{ "urls": [...] }`. Writes go
/// to a temporary file next to the target and are renamed over it, so a
/// reader never sees a half-written table.

use erasmus_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// One short id and the encoded state it points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUrl {
    pub id: String,
    pub original_state: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub access_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTable {
    pub urls: Vec<StoredUrl>,
}

impl UrlTable {
    pub fn find_by_state(&self, original_state: &str) -> Option<&StoredUrl> {
        self.urls.iter().find(|u| u.original_state == original_state)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&StoredUrl> {
        self.urls.iter().find(|u| u.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut StoredUrl> {
        self.urls.iter_mut().find(|u| u.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }
}

/// Handle on the table file
#[derive(Debug, Clone)]
pub struct TableFile {
    path: PathBuf,
}

impl TableFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Create the parent directory and an empty table if the file is absent
    pub fn ensure(&self) -> Result<()> {
        let dir = self.dir();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            debug!("Created data directory {:?}", dir);
        }

        if !self.path.exists() {
            self.save(&UrlTable::default())?;
            info!("Initialized empty url table at {:?}", self.path);
        }

        Ok(())
    }

    pub fn load(&self) -> Result<UrlTable> {
        self.ensure()?;
        let data = fs::read_to_string(&self.path)?;
        let table: UrlTable = serde_json::from_str(&data)
            .map_err(|e| Error::Corruption(format!("{:?}: {}", self.path, e)))?;
        Ok(table)
    }

    pub fn save(&self, table: &UrlTable) -> Result<()> {
        let dir = self.dir();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, table)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, state: &str) -> StoredUrl {
        StoredUrl {
            id: id.to_string(),
            original_state: state.to_string(),
            created_at: 1_700_000_000_000,
            access_count: 0,
        }
    }

    #[test]
    fn test_ensure_creates_nested_file() {
        let dir = TempDir::new().unwrap();
        let file = TableFile::new(dir.path().join("nested/data/urls.json"));

        file.ensure().unwrap();

        let contents = fs::read_to_string(file.path()).unwrap();
        let table: UrlTable = serde_json::from_str(&contents).unwrap();
        assert!(table.urls.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let file = TableFile::new(dir.path().join("urls.json"));
        let table = UrlTable {
            urls: vec![record("abc123", "state-a"), record("xyz789", "state-b")],
        };

        file.save(&table).unwrap();
        assert_eq!(file.load().unwrap(), table);
    }

    #[test]
    fn test_file_layout_uses_camel_case() {
        let dir = TempDir::new().unwrap();
        let file = TableFile::new(dir.path().join("urls.json"));
        file.save(&UrlTable { urls: vec![record("abc123", "s")] }).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
        let first = &json["urls"][0];
        assert_eq!(first["id"], "abc123");
        assert_eq!(first["originalState"], "s");
        assert_eq!(first["createdAt"], 1_700_000_000_000i64);
        assert_eq!(first["accessCount"], 0);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let file = TableFile::new(dir.path().join("urls.json"));
        fs::write(file.path(), "{ not json").unwrap();

        let err = file.load().unwrap_err();
        assert_eq!(err.code(), "CORRUPTION");
    }

    #[test]
    fn test_lookups() {
        let mut table = UrlTable {
            urls: vec![record("abc123", "state-a")],
        };
        assert!(table.contains_id("abc123"));
        assert_eq!(table.find_by_state("state-a").unwrap().id, "abc123");
        assert!(table.find_by_state("state-b").is_none());

        table.find_by_id_mut("abc123").unwrap().access_count += 1;
        assert_eq!(table.find_by_id("abc123").unwrap().access_count, 1);
    }
}

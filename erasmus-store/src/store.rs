use crate::config::StoreConfig;
use crate::id::generate_short_id;
use crate::table::{StoredUrl, TableFile, UrlTable};
use erasmus_core::{Error, Result};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info, warn};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Colliding ids drawn at one length before the id grows by a character
const MAX_ID_ATTEMPTS: usize = 32;

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Aggregate view of the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub record_count: usize,
    pub total_accesses: u64,
    pub oldest_created_at: Option<i64>,
    pub newest_created_at: Option<i64>,
}

/// Maps encoded states to short ids.
///
/// Every read-modify-write cycle holds the writer lock, so concurrent
/// callers sharing one `UrlStore` never lose each other's updates. Storage
/// failures are logged and absorbed: an unreadable table reads as empty and
/// a failed write is dropped.
pub struct UrlStore {
    config: StoreConfig,
    file: TableFile,
    write_lock: Mutex<()>,
}

impl UrlStore {
    /// Open the store described by `config`, creating the table if needed.
    ///
    /// Only an invalid configuration is an error; a table that cannot be
    /// created yet is logged and retried on first use.
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidArgument)?;

        let file = TableFile::new(config.path.clone());
        if let Err(e) = file.ensure() {
            warn!("Could not initialize url table at {:?}: {}", file.path(), e);
        }

        Ok(Self {
            config,
            file,
            write_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn load_or_empty(&self) -> UrlTable {
        match self.file.load() {
            Ok(table) => table,
            Err(e) => {
                error!(code = e.code(), "Error reading url table {:?}: {}", self.file.path(), e);
                UrlTable::default()
            }
        }
    }

    fn save_or_log(&self, table: &UrlTable) {
        if let Err(e) = self.file.save(table) {
            error!(code = e.code(), "Error writing url table {:?}: {}", self.file.path(), e);
        }
    }

    /// Store an encoded state and return its short id.
    ///
    /// Storing the same state twice returns the same id without writing.
    pub fn store(&self, original_state: &str) -> String {
        let _guard = self.write_lock.lock();
        let mut table = self.load_or_empty();

        if let Some(existing) = table.find_by_state(original_state) {
            debug!("State already stored as {}", existing.id);
            return existing.id.clone();
        }

        let id = self.unused_id(&table);
        table.urls.push(StoredUrl {
            id: id.clone(),
            original_state: original_state.to_string(),
            created_at: now_millis(),
            access_count: 0,
        });
        self.save_or_log(&table);

        info!("Stored state as {} ({} bytes)", id, original_state.len());
        id
    }

    /// Draws ids until one is free. A length whose ids keep colliding is
    /// treated as full and the next length up is tried.
    fn unused_id(&self, table: &UrlTable) -> String {
        let mut length = self.config.id_length;
        loop {
            for _ in 0..MAX_ID_ATTEMPTS {
                let id = generate_short_id(length);
                if !table.contains_id(&id) {
                    return id;
                }
                debug!("Short id collision on {}, regenerating", id);
            }
            warn!(
                "No free short id after {} attempts at length {}, using length {}",
                MAX_ID_ATTEMPTS,
                length,
                length + 1
            );
            length += 1;
        }
    }

    /// Look up a short id, counting the access.
    pub fn resolve(&self, id: &str) -> Option<String> {
        let _guard = self.write_lock.lock();
        let mut table = self.load_or_empty();

        let record = table.find_by_id_mut(id)?;
        record.access_count = record.access_count.saturating_add(1);
        let state = record.original_state.clone();
        let count = record.access_count;
        self.save_or_log(&table);

        debug!("Resolved {} (access #{})", id, count);
        Some(state)
    }

    /// Look up a short id without counting the access.
    pub fn get(&self, id: &str) -> Option<StoredUrl> {
        self.load_or_empty().find_by_id(id).cloned()
    }

    /// Remove records created `max_age_days` or more ago, returning how many went.
    pub fn cleanup(&self, max_age_days: u32) -> usize {
        let _guard = self.write_lock.lock();
        let mut table = self.load_or_empty();

        let max_age = max_age_days as i64 * MILLIS_PER_DAY;
        let now = now_millis();
        let before = table.urls.len();
        table.urls.retain(|u| now.saturating_sub(u.created_at) < max_age);
        let removed = before - table.urls.len();
        self.save_or_log(&table);

        if removed > 0 {
            info!("Cleanup removed {} records older than {} days", removed, max_age_days);
        }
        removed
    }

    /// [`cleanup`](Self::cleanup) with the configured retention window.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup(self.config.retention_days)
    }

    /// Snapshot of every record
    pub fn records(&self) -> Vec<StoredUrl> {
        self.load_or_empty().urls
    }

    pub fn stats(&self) -> StoreStats {
        let table = self.load_or_empty();
        StoreStats {
            record_count: table.urls.len(),
            total_accesses: table
                .urls
                .iter()
                .fold(0u64, |total, u| total.saturating_add(u.access_count)),
            oldest_created_at: table.urls.iter().map(|u| u.created_at).min(),
            newest_created_at: table.urls.iter().map(|u| u.created_at).max(),
        }
    }
}

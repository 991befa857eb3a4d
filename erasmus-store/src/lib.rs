/// Short-URL store
///
/// Persists a table of short ids pointing at encoded budget states and
/// resolves them back, with content-addressed deduplication.

pub mod config;
pub mod id;
pub mod table;
pub mod store;

pub use config::StoreConfig;
pub use id::{generate_short_id, is_valid_short_id, ALPHABET, DEFAULT_ID_LENGTH};
pub use store::{now_millis, StoreStats, UrlStore};
pub use table::{StoredUrl, UrlTable};

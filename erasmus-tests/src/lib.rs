/// Test utilities and helpers for the Erasmus budget crates
///
/// Provides temporary url stores and realistic budget-state fixtures.

use erasmus_core::{
    AccommodationParameter, BudgetParameters, ExpenseParameter, Flight, ScholarshipConfig,
    SharedState,
};
use erasmus_store::{StoreConfig, StoredUrl, UrlStore, UrlTable};
use std::path::PathBuf;
use tempfile::TempDir;

/// Url store wrapper that manages temporary directory lifecycle
pub struct TestStore {
    pub store: UrlStore,
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestStore {
    /// Create a new store with its table in a temporary directory
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    /// Create a store after adjusting the default configuration
    pub fn with_config(adjust: impl FnOnce(StoreConfig) -> StoreConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("data").join("url-store.json");
        let store = UrlStore::open(adjust(StoreConfig::new(&path))).expect("Failed to open store");

        Self {
            store,
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Replace the table file contents with `records`
    pub fn seed(&self, records: Vec<StoredUrl>) {
        let json = serde_json::to_string_pretty(&UrlTable { urls: records })
            .expect("Failed to serialize table");
        std::fs::write(&self.path, json).expect("Failed to seed table");
    }

    /// Parse the table file as it is on disk
    pub fn table_on_disk(&self) -> UrlTable {
        let data = std::fs::read_to_string(&self.path).expect("Failed to read table");
        serde_json::from_str(&data).expect("Table is not valid JSON")
    }

    /// Reopen the same table with a fresh store (for persistence checks)
    pub fn reopen(&self) -> UrlStore {
        UrlStore::open(StoreConfig::new(&self.path)).expect("Failed to reopen store")
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Record created `days` days before now
pub fn record_aged(id: &str, state: &str, days: i64) -> StoredUrl {
    StoredUrl {
        id: id.to_string(),
        original_state: state.to_string(),
        created_at: erasmus_store::now_millis() - days * 24 * 60 * 60 * 1000,
        access_count: 0,
    }
}

/// A fully populated state, the way the calculator shares it
pub fn sample_state() -> SharedState {
    SharedState {
        city_id: "bologna-italy".to_string(),
        budget_params: BudgetParameters {
            accommodation: AccommodationParameter {
                amount: 480.0,
                is_shared: true,
                deposit: 2.0,
                number_of_people: 3,
            },
            utilities: ExpenseParameter { amount: 65.5, is_shared: true },
            groceries: ExpenseParameter { amount: 220.0, is_shared: false },
            transport: ExpenseParameter { amount: 27.0, is_shared: false },
            entertainment: ExpenseParameter { amount: 60.0, is_shared: false },
            dining: ExpenseParameter { amount: 110.25, is_shared: true },
            leisure: ExpenseParameter { amount: 45.0, is_shared: false },
            other: ExpenseParameter { amount: 30.0, is_shared: false },
        },
        flights: vec![
            Flight {
                id: "1718900000000".to_string(),
                description: "Valencia → Bologna (outbound)".to_string(),
                price: 74.99,
                date: "2026-09-14".to_string(),
                is_shared: false,
            },
            Flight {
                id: "1718900000001".to_string(),
                description: "Christmas trip home".to_string(),
                price: 189.0,
                date: "2026-12-20".to_string(),
                is_shared: false,
            },
        ],
        scholarship: ScholarshipConfig {
            monthly_grant: 310.0,
            max_months: 5,
            travel_support: 275.0,
            additional_support: Some(100.0),
        },
        stay_duration: 5.0,
    }
}

/// `count` distinct states differing in city and stay
pub fn distinct_states(count: usize) -> Vec<SharedState> {
    (0..count)
        .map(|i| SharedState {
            city_id: format!("city-{}", i),
            stay_duration: (i % 12) as f64 + 1.0,
            ..sample_state()
        })
        .collect()
}

pub mod error;
pub mod types;
pub mod codec;
pub mod validation;
pub mod summary;

pub use error::{Error, Result};
pub use types::*;
pub use codec::{decode_state, encode_state};
pub use summary::BudgetSummary;

pub mod error;
pub mod types;

#[cfg(feature = "yield_calc")]
pub mod yield_calc;

#[cfg(feature = "export")]
pub mod export;

pub use error::{AmountIssue, TsvYieldError, ValidationError};
pub use types::*;

/// Standard result type for all tsv-yield operations
pub type TsvYieldResult<T> = Result<T, TsvYieldError>;

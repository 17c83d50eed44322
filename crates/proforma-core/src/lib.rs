pub mod comps;
pub mod deal;
pub mod error;
pub mod types;

pub use error::ProformaError;
pub use types::*;

/// Standard result type for all proforma operations
pub type ProformaResult<T> = Result<T, ProformaError>;

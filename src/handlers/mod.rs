//! Business logic handlers
//!
//! These handlers hold the company rules (id parsing, paging, sorting,
//! validation, stats) so the HTTP routes only translate requests and
//! responses.

pub mod companies;
pub mod stats;

// Re-export commonly used types
pub use companies::*;
pub use stats::*;

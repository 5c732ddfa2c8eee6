//! Streaming readers that produce one typed record per CSV row.

pub mod csv;
pub mod guard;

pub use self::csv::{HeaderMap, NoteCsvReader};
pub use self::guard::QuoteGuard;

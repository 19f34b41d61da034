//! Glucose readings
//!
//! - **types**: `Reading`, `StatusLabel`, `TimePeriod` and timestamp parsing
//! - **error**: Error types
//!
//! Readings arrive already fetched from the reading store. Fields that can be
//! missing or malformed at the storage edge (value, timestamp, status) are
//! kept in a tolerant form and interpreted explicitly by the consumers.

pub mod error;
pub mod types;

pub use error::{ReadingError, ReadingResult};
pub use types::{parse_flag, parse_timestamp, Reading, StatusLabel, TimePeriod};

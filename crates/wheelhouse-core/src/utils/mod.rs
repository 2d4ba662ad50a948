//! Utility functions for dates, names and display formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    format_date, format_months, format_thousands, normalize_name, parse_record_date,
    truncate_string,
};

//! Time-Related Constants
//!
//! Time unit conversions and the geometry of the rolling rain windows.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Microseconds per millisecond.
pub const US_PER_MS: u64 = 1000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = MS_PER_SECOND * 60;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = MS_PER_MINUTE * 60;

// ===== RAIN WINDOWS =====

/// Buckets in the trailing-hour window.
pub const HOUR_WINDOW_BUCKETS: usize = 12;

/// Width of one trailing-hour bucket: 5 minutes.
pub const HOUR_WINDOW_BUCKET_MS: u64 = MS_PER_HOUR / HOUR_WINDOW_BUCKETS as u64;

/// Buckets in the trailing-day window.
pub const DAY_WINDOW_BUCKETS: usize = 24;

/// Width of one trailing-day bucket: 1 hour.
pub const DAY_WINDOW_BUCKET_MS: u64 = MS_PER_HOUR;

//! Primitive aliases shared by every Castline table and payload.

/// Row ids are `BIGSERIAL` everywhere.
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ`, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Money amounts in the smallest currency unit. Prices never touch floats.
pub type Cents = i64;

/// Whole-number percentage, 0 through 100.
pub type Percent = i32;

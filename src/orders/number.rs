// Copyright 2026 Ampere Supply Engineering.

//! Human-readable order numbers
//!
//! Format `AS{YY}{MM}{NNNNN}`: two-digit year and month of creation plus a
//! five-digit zero-padded sequence. Sequences come from a store-owned atomic
//! counter per (year, month) rather than a count of existing orders, so
//! concurrent checkouts cannot mint the same number.

use chrono::{DateTime, Datelike, Utc};

/// Prefix carried by every order number
pub const ORDER_NUMBER_PREFIX: &str = "AS";

/// Year-month bucket an order-number sequence is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    /// Four-digit year
    pub year: i32,
    /// Month, 1 through 12
    pub month: u32,
}

impl SequenceKey {
    /// Bucket for a creation timestamp
    pub fn for_timestamp(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }
}

/// Render an order number for a creation time and sequence value
pub fn format_order_number(at: DateTime<Utc>, sequence: u64) -> String {
    format!(
        "{ORDER_NUMBER_PREFIX}{:02}{:02}{:05}",
        at.year() % 100,
        at.month(),
        sequence
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_order_number() {
        let at = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        assert_eq!(format_order_number(at, 1), "AS260800001");
        assert_eq!(format_order_number(at, 42), "AS260800042");
        assert_eq!(format_order_number(at, 99999), "AS260899999");
    }

    #[test]
    fn test_month_zero_padding() {
        let at = Utc.with_ymd_and_hms(2027, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(format_order_number(at, 7), "AS270100007");
    }

    #[test]
    fn test_sequence_key_per_month() {
        let aug = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let sep = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        assert_ne!(
            SequenceKey::for_timestamp(aug),
            SequenceKey::for_timestamp(sep)
        );
        assert_eq!(
            SequenceKey::for_timestamp(aug),
            SequenceKey {
                year: 2026,
                month: 8
            }
        );
    }
}

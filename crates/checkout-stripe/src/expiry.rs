//! Combined Expiry Splitting
//!
//! The combined `MM / YY[YY]` input is split into the hidden month and year
//! inputs before tokenization. The emitted script and this function share
//! [`EXPIRY_SEPARATOR`].

use serde::{Deserialize, Serialize};

/// Separator jquery.payment's expiry formatting inserts
pub const EXPIRY_SEPARATOR: &str = " / ";

/// Month and year halves of a combined expiry value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitExpiry {
    pub month: String,
    pub year: String,
}

/// Split `"09 / 2031"` into `("09", "2031")`.
///
/// Only the first two parts are kept; a value without the separator yields
/// `None`.
pub fn split_combined_expiry(value: &str) -> Option<SplitExpiry> {
    let mut parts = value.trim().splitn(3, EXPIRY_SEPARATOR);
    let month = parts.next()?;
    let year = parts.next()?;

    Some(SplitExpiry {
        month: month.to_string(),
        year: year.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_four_digit_year() {
        let split = split_combined_expiry("09 / 2031").unwrap();
        assert_eq!(split.month, "09");
        assert_eq!(split.year, "2031");
    }

    #[test]
    fn test_split_two_digit_year() {
        let split = split_combined_expiry("12 / 27").unwrap();
        assert_eq!(split, SplitExpiry { month: "12".into(), year: "27".into() });
    }

    #[test]
    fn test_split_keeps_first_two_parts() {
        let split = split_combined_expiry("01 / 30 / 99").unwrap();
        assert_eq!(split.year, "30");
    }

    #[test]
    fn test_split_without_separator() {
        assert_eq!(split_combined_expiry("0931"), None);
        assert_eq!(split_combined_expiry(""), None);
    }

    proptest! {
        #[test]
        fn prop_split_recovers_parts(month in 1_u32..=12, year in 2000_u32..2100) {
            let value = format!("{month:02}{EXPIRY_SEPARATOR}{year}");
            let split = split_combined_expiry(&value).unwrap();

            prop_assert_eq!(split.month, format!("{month:02}"));
            prop_assert_eq!(split.year, year.to_string());
        }
    }
}

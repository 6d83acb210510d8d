//! Handhole and structure billing.

use rust_decimal::Decimal;

use crate::config::{RateCard, StructureCodes};
use crate::models::{BillingResult, Unbillable};

use super::items::LineItems;

/// Bills one handhole, plus a ground rod when requested.
///
/// Dimensions are matched exactly after trimming and lowercasing, so
/// `"17X30X18 "` matches `"17x30x18"`. Unmapped dimensions are reported as
/// unbillable.
pub fn calculate_structure(
    dimensions: &str,
    ground_rod: bool,
    rate_card: &RateCard,
    codes: &StructureCodes,
) -> BillingResult {
    let mut items = LineItems::new(rate_card);

    let key = dimensions.trim().to_ascii_lowercase();
    match codes.handholes.get(&key) {
        Some(code) => items.add(code, Decimal::ONE),
        None => items.skip(Unbillable::UnmappedHandhole {
            dimensions: dimensions.to_string(),
        }),
    };

    if ground_rod {
        items.add(&codes.ground_rod, Decimal::ONE);
    }

    items.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingCodes;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_handhole_with_ground_rod() {
        let codes = BillingCodes::standard().structure;
        let result = calculate_structure("17x30x18", true, &RateCard::vexus_la_tx_2026(), &codes);

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].unit_code, "UG17");
        assert_eq!(result.items[1].unit_code, "UG13");
        assert_eq!(result.total, dec("100.00"));
    }

    #[test]
    fn test_dimension_lookup_ignores_case_and_whitespace() {
        let codes = BillingCodes::standard().structure;
        let result = calculate_structure(" 30X48X30", false, &RateCard::vexus_la_tx_2026(), &codes);
        assert_eq!(result.items[0].unit_code, "UG10");
        assert_eq!(result.total, dec("310"));
    }

    #[test]
    fn test_unmapped_handhole_still_bills_ground_rod() {
        let codes = BillingCodes::standard().structure;
        let result = calculate_structure("10x10x10", true, &RateCard::vexus_la_tx_2026(), &codes);

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].unit_code, "UG13");
        assert_eq!(result.total, dec("40"));
        assert_eq!(
            result.unbillable,
            vec![Unbillable::UnmappedHandhole {
                dimensions: "10x10x10".to_string()
            }]
        );
    }
}

//! Cable pulling billing.

use rust_decimal::Decimal;

use crate::config::{PullingCodes, RateCard};
use crate::models::BillingResult;

use super::items::LineItems;

/// Selects the pulling unit code: bulk above the fiber threshold, else standard.
pub fn select_pulling_code(fiber_count: u32, codes: &PullingCodes) -> &str {
    if fiber_count > codes.bulk_fiber_threshold {
        codes.bulk.as_str()
    } else {
        codes.standard.as_str()
    }
}

/// Bills `footage` linear feet of cable placement.
pub fn calculate_pulling(
    footage: Decimal,
    fiber_count: u32,
    rate_card: &RateCard,
    codes: &PullingCodes,
) -> BillingResult {
    let mut items = LineItems::new(rate_card);
    items.add(select_pulling_code(fiber_count, codes), footage);
    items.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingCodes;
    use crate::models::Unbillable;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let codes = BillingCodes::standard().pulling;
        assert_eq!(select_pulling_code(24, &codes), "UG4");
        assert_eq!(select_pulling_code(144, &codes), "UG4");
        assert_eq!(select_pulling_code(145, &codes), "UG28");
        assert_eq!(select_pulling_code(432, &codes), "UG28");
    }

    #[test]
    fn test_standard_pull() {
        let codes = BillingCodes::standard().pulling;
        let result = calculate_pulling(dec("1200"), 144, &RateCard::vexus_la_tx_2026(), &codes);

        assert_eq!(result.items[0].unit_code, "UG4");
        assert_eq!(result.total, dec("660.00"));
    }

    #[test]
    fn test_bulk_pull() {
        let codes = BillingCodes::standard().pulling;
        let result = calculate_pulling(dec("850"), 288, &RateCard::vexus_la_tx_2026(), &codes);

        assert_eq!(result.items[0].unit_code, "UG28");
        assert_eq!(
            result.items[0].description,
            "Place 288-432ct armored fiber in duct"
        );
        assert_eq!(result.total, dec("850"));
    }

    #[test]
    fn test_negative_footage_is_unbillable() {
        let codes = BillingCodes::standard().pulling;
        let result = calculate_pulling(dec("-850"), 288, &RateCard::vexus_la_tx_2026(), &codes);

        assert!(result.items.is_empty());
        assert_eq!(result.total, Decimal::ZERO);
        assert!(matches!(
            &result.unbillable[..],
            [Unbillable::NegativeQuantity { unit_code, .. }] if unit_code == "UG28"
        ));
    }

    #[test]
    fn test_overflowing_footage_is_unbillable() {
        let codes = BillingCodes::standard().pulling;
        let result = calculate_pulling(Decimal::MAX, 24, &RateCard::vexus_la_tx_2026(), &codes);

        assert!(result.items.is_empty());
        assert!(matches!(
            &result.unbillable[..],
            [Unbillable::QuantityOverflow { unit_code, .. }] if unit_code == "UG4"
        ));
    }
}

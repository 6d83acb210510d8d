//! Directional boring billing.
//!
//! Boring is billed per linear foot, at a tier selected by the number of
//! ducts placed in the bore.

use rust_decimal::Decimal;

use crate::config::{BoringCodes, RateCard};
use crate::models::BillingResult;

use super::items::LineItems;

/// Selects the boring unit code for a duct count.
///
/// Six or more ducts use the top tier, exactly five the middle tier, and
/// anything else the standard tier.
pub fn select_boring_code(duct_count: u32, codes: &BoringCodes) -> &str {
    match duct_count {
        6.. => codes.six_or_more_ducts.as_str(),
        5 => codes.five_ducts.as_str(),
        _ => codes.standard.as_str(),
    }
}

/// Bills `footage` linear feet of boring.
///
/// # Example
///
/// ```
/// use fiber_workflow::billing::calculate_boring;
/// use fiber_workflow::config::{BillingCodes, RateCard};
/// use rust_decimal::Decimal;
///
/// let card = RateCard::vexus_la_tx_2026();
/// let codes = BillingCodes::standard();
///
/// let result = calculate_boring(Decimal::from(500), 6, &card, &codes.boring);
/// assert_eq!(result.items[0].unit_code, "UG24");
/// assert_eq!(result.total, Decimal::from(5250));
/// ```
pub fn calculate_boring(
    footage: Decimal,
    duct_count: u32,
    rate_card: &RateCard,
    codes: &BoringCodes,
) -> BillingResult {
    let mut items = LineItems::new(rate_card);
    items.add(select_boring_code(duct_count, codes), footage);
    items.finish()
}

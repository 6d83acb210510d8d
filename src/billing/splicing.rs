//! Splice point billing.
//!
//! A splice is billed as a setup item chosen by position, a per-fiber fusion
//! item and a per-test item. Fusion and test items are only billed when
//! their quantity is positive.

use rust_decimal::Decimal;

use crate::config::{RateCard, SplicingCodes};
use crate::models::{BillingResult, SplicePosition};

use super::items::LineItems;

/// Quantities billed for one splice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceQuantities {
    /// Position on the cable.
    pub position: SplicePosition,
    /// Fibers fusion spliced.
    pub fiber_count: u32,
    /// Power meter tests performed.
    pub test_count: u32,
}

/// Bills one splice point.
///
/// # Example
///
/// ```
/// use fiber_workflow::billing::{SpliceQuantities, calculate_splicing};
/// use fiber_workflow::config::{BillingCodes, RateCard};
/// use fiber_workflow::models::SplicePosition;
/// use rust_decimal::Decimal;
///
/// let quantities = SpliceQuantities {
///     position: SplicePosition::MidSpan,
///     fiber_count: 2,
///     test_count: 8,
/// };
/// let result = calculate_splicing(
///     &quantities,
///     &RateCard::vexus_la_tx_2026(),
///     &BillingCodes::standard().splicing,
/// );
/// assert_eq!(result.total, Decimal::new(36080, 2));
/// ```
pub fn calculate_splicing(
    quantities: &SpliceQuantities,
    rate_card: &RateCard,
    codes: &SplicingCodes,
) -> BillingResult {
    let mut items = LineItems::new(rate_card);

    let setup = match quantities.position {
        SplicePosition::MidSpan => &codes.ring_cut,
        SplicePosition::EndOfLine => &codes.re_enter,
    };
    items.add(setup, Decimal::ONE);

    if quantities.fiber_count > 0 {
        items.add(&codes.fusion, Decimal::from(quantities.fiber_count));
    }
    if quantities.test_count > 0 {
        items.add(&codes.test, Decimal::from(quantities.test_count));
    }

    items.finish()
}

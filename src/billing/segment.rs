//! Billing roll-ups for whole work units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{BillingCodes, EvidenceRules, RateCard};
use crate::evidence::required_test_count;
use crate::models::{BillingResult, SegmentDetails, SpliceDetails, UnitDetails, WorkUnit};

use super::boring::calculate_boring;
use super::pulling::calculate_pulling;
use super::splicing::{SpliceQuantities, calculate_splicing};

/// Duct count assumed when a segment does not report one.
pub const DEFAULT_DUCT_COUNT: u32 = 1;

/// Fiber count assumed when a segment does not report one.
pub const DEFAULT_FIBER_COUNT: u32 = 24;

/// Boring and pulling billing for one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentBilling {
    /// Boring at the measured footage, or the plan when not measured.
    pub boring: BillingResult,
    /// Pulling at the planned footage.
    pub pulling: BillingResult,
    /// `boring.total + pulling.total`.
    pub grand_total: Decimal,
}

/// Bills both phases of a segment.
pub fn calculate_segment_billing(
    segment: &SegmentDetails,
    rate_card: &RateCard,
    codes: &BillingCodes,
) -> SegmentBilling {
    let boring = bill_boring(segment, rate_card, codes);
    let pulling = bill_pulling(segment, rate_card, codes);
    let grand_total = boring.total + pulling.total;

    SegmentBilling {
        boring,
        pulling,
        grand_total,
    }
}

pub(crate) fn bill_boring(segment: &SegmentDetails, rate_card: &RateCard, codes: &BillingCodes) -> BillingResult {
    calculate_boring(
        segment.billable_bore_footage(),
        segment.duct_count.unwrap_or(DEFAULT_DUCT_COUNT),
        rate_card,
        &codes.boring,
    )
}

pub(crate) fn bill_pulling(segment: &SegmentDetails, rate_card: &RateCard, codes: &BillingCodes) -> BillingResult {
    calculate_pulling(
        segment.footage,
        segment.fiber_count.unwrap_or(DEFAULT_FIBER_COUNT),
        rate_card,
        &codes.pulling,
    )
}

/// Bills a splice point; the test quantity defaults to the type's requirement.
pub(crate) fn bill_splice(
    splice: &SpliceDetails,
    rate_card: &RateCard,
    codes: &BillingCodes,
    evidence: &EvidenceRules,
) -> BillingResult {
    let quantities = SpliceQuantities {
        position: splice.position,
        fiber_count: splice.fiber_count.unwrap_or(0),
        test_count: splice
            .test_count
            .unwrap_or_else(|| required_test_count(evidence, splice.splice_type)),
    };
    calculate_splicing(&quantities, rate_card, &codes.splicing)
}

/// Billing for any kind of unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitBilling {
    /// A segment's boring and pulling.
    Segment(SegmentBilling),
    /// A splice point.
    SplicePoint(BillingResult),
}

impl UnitBilling {
    /// Grand total across all items.
    pub fn total(&self) -> Decimal {
        match self {
            UnitBilling::Segment(billing) => billing.grand_total,
            UnitBilling::SplicePoint(billing) => billing.total,
        }
    }
}

/// Bills a unit regardless of status, dispatching on its kind.
pub fn calculate_unit_billing(
    unit: &WorkUnit,
    rate_card: &RateCard,
    codes: &BillingCodes,
    evidence: &EvidenceRules,
) -> UnitBilling {
    match &unit.details {
        UnitDetails::Segment(segment) => {
            UnitBilling::Segment(calculate_segment_billing(segment, rate_card, codes))
        }
        UnitDetails::SplicePoint(splice) => {
            UnitBilling::SplicePoint(bill_splice(splice, rate_card, codes, evidence))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SplicePosition, SpliceType};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn segment(actual: Option<&str>, ducts: Option<u32>, fibers: Option<u32>) -> SegmentDetails {
        SegmentDetails {
            footage: dec("500"),
            actual_footage: actual.map(dec),
            duct_count: ducts,
            fiber_count: fibers,
        }
    }

    #[test]
    fn test_segment_defaults_to_one_duct_and_24_fibers() {
        let billing = calculate_segment_billing(
            &segment(None, None, None),
            &RateCard::vexus_la_tx_2026(),
            &BillingCodes::standard(),
        );

        assert_eq!(billing.boring.items[0].unit_code, "UG1");
        assert_eq!(billing.boring.total, dec("4000.00"));
        assert_eq!(billing.pulling.items[0].unit_code, "UG4");
        assert_eq!(billing.pulling.total, dec("275.00"));
        assert_eq!(billing.grand_total, dec("4275.00"));
    }

    /// BL-020: boring uses measured footage, pulling the plan
    #[test]
    fn test_segment_bores_actual_footage() {
        let billing = calculate_segment_billing(
            &segment(Some("520"), Some(6), Some(288)),
            &RateCard::vexus_la_tx_2026(),
            &BillingCodes::standard(),
        );

        assert_eq!(billing.boring.items[0].quantity, dec("520"));
        assert_eq!(billing.boring.total, dec("5460.00"));
        assert_eq!(billing.pulling.items[0].quantity, dec("500"));
        assert_eq!(billing.pulling.total, dec("500.00"));
        assert_eq!(billing.grand_total, dec("5960.00"));
    }

    #[test]
    fn test_splice_point_test_count_defaults_to_requirement() {
        let unit = WorkUnit::splice_point(
            "SP-001",
            SpliceDetails {
                splice_type: SpliceType::OneByFour,
                position: SplicePosition::MidSpan,
                fiber_count: Some(2),
                tray_count: None,
                test_count: None,
                feed_pulling_status: None,
            },
        );

        let billing = calculate_unit_billing(
            &unit,
            &RateCard::vexus_la_tx_2026(),
            &BillingCodes::standard(),
            &EvidenceRules::standard(),
        );
        assert!(matches!(billing, UnitBilling::SplicePoint(_)));
        assert_eq!(billing.total(), dec("360.80"));
    }

    #[test]
    fn test_explicit_splice_test_count_wins() {
        let unit = WorkUnit::splice_point(
            "SP-002",
            SpliceDetails {
                splice_type: SpliceType::F1,
                position: SplicePosition::EndOfLine,
                fiber_count: Some(12),
                tray_count: Some(2),
                test_count: Some(12),
                feed_pulling_status: None,
            },
        );

        let billing = calculate_unit_billing(
            &unit,
            &RateCard::vexus_la_tx_2026(),
            &BillingCodes::standard(),
            &EvidenceRules::standard(),
        );
        // 137.50 + 12 * 16.50 + 12 * 6.60
        assert_eq!(billing.total(), dec("414.70"));
    }

    #[test]
    fn test_unit_billing_serializes_kind() {
        let unit = WorkUnit::segment("SEG-001", segment(None, Some(2), Some(48)));
        let billing = calculate_unit_billing(
            &unit,
            &RateCard::vexus_la_tx_2026(),
            &BillingCodes::standard(),
            &EvidenceRules::standard(),
        );

        let json = serde_json::to_value(&billing).unwrap();
        assert_eq!(json["kind"], "segment");
        assert!(json.get("grand_total").is_some());
    }
}

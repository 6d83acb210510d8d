//! Invoice assembly.
//!
//! An invoice bills a batch of units against one rate card. By default only
//! QC approved phases are billed.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{BillingCodes, EvidenceRules, RateCard};
use crate::models::{BillingResult, Phase, Status, Unbillable, UnitDetails, WorkUnit};

use super::segment::{bill_boring, bill_pulling, bill_splice};

/// Invoice options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceOptions {
    /// Bill only QC approved phases.
    #[serde(default = "default_only_approved")]
    pub only_approved: bool,
}

fn default_only_approved() -> bool {
    true
}

impl Default for InvoiceOptions {
    fn default() -> Self {
        Self {
            only_approved: default_only_approved(),
        }
    }
}

/// Billed work for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSection {
    /// The unit billed.
    pub unit_id: String,
    /// Phases included in this section.
    pub phases: Vec<Phase>,
    /// Line items for those phases.
    pub billing: BillingResult,
}

/// Invoice totals for one unit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    /// Rate card unit code.
    pub unit_code: String,
    /// Description from the rate card.
    pub description: String,
    /// Unit of measure.
    pub unit_of_measure: String,
    /// Quantity across all sections.
    pub quantity: Decimal,
    /// Value across all sections.
    pub total: Decimal,
}

/// An expected item that could not be billed, with the unit it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbilledItem {
    /// The unit whose item was left out.
    pub unit_id: String,
    /// Why it was left out.
    #[serde(flatten)]
    pub reason: Unbillable,
}

/// A complete invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Rate card used for pricing.
    pub rate_card_id: String,
    /// Customer on the rate card.
    pub customer: String,
    /// One section per unit with billable work.
    pub sections: Vec<InvoiceSection>,
    /// Per unit code totals, sorted by code.
    pub summary: Vec<SummaryLine>,
    /// Items that could not be billed.
    pub unbillable: Vec<UnbilledItem>,
    /// Sum of the section totals.
    pub grand_total: Decimal,
}

fn is_billable(unit: &WorkUnit, phase: Phase, options: &InvoiceOptions) -> bool {
    match unit.status(phase) {
        Some(status) => !options.only_approved || status == Status::QcApproved,
        None => false,
    }
}

fn bill_unit(
    unit: &WorkUnit,
    rate_card: &RateCard,
    codes: &BillingCodes,
    evidence: &EvidenceRules,
    options: &InvoiceOptions,
) -> Option<InvoiceSection> {
    let mut phases = Vec::new();
    let mut parts = Vec::new();

    match &unit.details {
        UnitDetails::Segment(segment) => {
            if is_billable(unit, Phase::Boring, options) {
                phases.push(Phase::Boring);
                parts.push(bill_boring(segment, rate_card, codes));
            }
            if is_billable(unit, Phase::Pulling, options) {
                phases.push(Phase::Pulling);
                parts.push(bill_pulling(segment, rate_card, codes));
            }
        }
        UnitDetails::SplicePoint(splice) => {
            if is_billable(unit, Phase::Splicing, options) {
                phases.push(Phase::Splicing);
                parts.push(bill_splice(splice, rate_card, codes, evidence));
            }
        }
    }

    if phases.is_empty() {
        return None;
    }

    let (items, unbillable) = parts
        .into_iter()
        .fold((Vec::new(), Vec::new()), |(mut items, mut unbillable), part| {
            items.extend(part.items);
            unbillable.extend(part.unbillable);
            (items, unbillable)
        });

    Some(InvoiceSection {
        unit_id: unit.id.clone(),
        phases,
        billing: BillingResult::new(items, unbillable),
    })
}

fn summarize(sections: &[InvoiceSection]) -> Vec<SummaryLine> {
    let mut by_code: BTreeMap<&str, SummaryLine> = BTreeMap::new();

    for item in sections.iter().flat_map(|s| &s.billing.items) {
        let line = by_code
            .entry(item.unit_code.as_str())
            .or_insert_with(|| SummaryLine {
                unit_code: item.unit_code.clone(),
                description: item.description.clone(),
                unit_of_measure: item.unit_of_measure.clone(),
                quantity: Decimal::ZERO,
                total: Decimal::ZERO,
            });
        line.quantity += item.quantity;
        line.total += item.total;
    }

    by_code.into_values().collect()
}

/// Builds an invoice for `units`.
///
/// Units with nothing billable get no section. The grand total always equals
/// the sum of the section totals and of the summary totals.
///
/// # Example
///
/// ```
/// use fiber_workflow::billing::{InvoiceOptions, build_invoice};
/// use fiber_workflow::config::{BillingCodes, EvidenceRules, RateCard};
/// use fiber_workflow::models::{Phase, SegmentDetails, Status, WorkUnit};
/// use rust_decimal::Decimal;
///
/// let unit = WorkUnit::segment(
///     "SEG-001",
///     SegmentDetails {
///         footage: Decimal::from(500),
///         actual_footage: None,
///         duct_count: Some(6),
///         fiber_count: Some(144),
///     },
/// )
/// .with_phase_status(Phase::Boring, Status::QcApproved);
///
/// let invoice = build_invoice(
///     &[unit],
///     &RateCard::vexus_la_tx_2026(),
///     &BillingCodes::standard(),
///     &EvidenceRules::standard(),
///     &InvoiceOptions::default(),
/// );
/// assert_eq!(invoice.sections.len(), 1);
/// assert_eq!(invoice.grand_total, Decimal::from(5250));
/// ```
pub fn build_invoice(
    units: &[WorkUnit],
    rate_card: &RateCard,
    codes: &BillingCodes,
    evidence: &EvidenceRules,
    options: &InvoiceOptions,
) -> Invoice {
    let sections: Vec<InvoiceSection> = units
        .iter()
        .filter_map(|unit| bill_unit(unit, rate_card, codes, evidence, options))
        .collect();

    let unbillable = sections
        .iter()
        .flat_map(|section| {
            section.billing.unbillable.iter().map(|reason| UnbilledItem {
                unit_id: section.unit_id.clone(),
                reason: reason.clone(),
            })
        })
        .collect();

    Invoice {
        rate_card_id: rate_card.id.clone(),
        customer: rate_card.customer.clone(),
        summary: summarize(&sections),
        grand_total: sections.iter().map(|s| s.billing.total).sum(),
        sections,
        unbillable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SegmentDetails, SpliceDetails, SplicePosition, SpliceType};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn segment(id: &str, boring: Status, pulling: Status) -> WorkUnit {
        WorkUnit::segment(
            id,
            SegmentDetails {
                footage: dec("500"),
                actual_footage: Some(dec("510")),
                duct_count: Some(2),
                fiber_count: Some(144),
            },
        )
        .with_phase_status(Phase::Boring, boring)
        .with_phase_status(Phase::Pulling, pulling)
    }

    fn splice_point(id: &str, status: Status) -> WorkUnit {
        WorkUnit::splice_point(
            id,
            SpliceDetails {
                splice_type: SpliceType::OneByFour,
                position: SplicePosition::MidSpan,
                fiber_count: Some(2),
                tray_count: None,
                test_count: None,
                feed_pulling_status: Some(Status::QcApproved),
            },
        )
        .with_phase_status(Phase::Splicing, status)
    }

    fn invoice(units: &[WorkUnit], options: InvoiceOptions) -> Invoice {
        build_invoice(
            units,
            &RateCard::vexus_la_tx_2026(),
            &BillingCodes::standard(),
            &EvidenceRules::standard(),
            &options,
        )
    }

    /// IN-001: only QC approved phases are billed
    #[test]
    fn test_only_approved_phases_are_billed() {
        let units = vec![
            segment("SEG-001", Status::QcApproved, Status::Complete),
            segment("SEG-002", Status::InProgress, Status::NotStarted),
            splice_point("SP-001", Status::QcApproved),
        ];
        let invoice = invoice(&units, InvoiceOptions::default());

        assert_eq!(invoice.sections.len(), 2);
        assert_eq!(invoice.sections[0].unit_id, "SEG-001");
        assert_eq!(invoice.sections[0].phases, vec![Phase::Boring]);
        // 510 LF measured at $8.00
        assert_eq!(invoice.sections[0].billing.total, dec("4080.00"));
        assert_eq!(invoice.sections[1].billing.total, dec("360.80"));
        assert_eq!(invoice.grand_total, dec("4440.80"));
    }

    #[test]
    fn test_all_phases_billed_when_not_restricted() {
        let units = vec![segment("SEG-001", Status::QcApproved, Status::InProgress)];
        let invoice = invoice(
            &units,
            InvoiceOptions {
                only_approved: false,
            },
        );

        assert_eq!(invoice.sections[0].phases, vec![Phase::Boring, Phase::Pulling]);
        // 4080.00 + 500 * 0.55
        assert_eq!(invoice.grand_total, dec("4355.00"));
    }

    /// IN-002: summary groups quantities by code
    #[test]
    fn test_summary_groups_by_code() {
        let units = vec![
            segment("SEG-001", Status::QcApproved, Status::QcApproved),
            segment("SEG-002", Status::QcApproved, Status::QcApproved),
            splice_point("SP-001", Status::QcApproved),
        ];
        let invoice = invoice(&units, InvoiceOptions::default());

        let codes: Vec<&str> = invoice.summary.iter().map(|l| l.unit_code.as_str()).collect();
        assert_eq!(codes, vec!["FS1", "FS2", "FS3", "UG1", "UG4"]);

        let ug1 = &invoice.summary[3];
        assert_eq!(ug1.quantity, dec("1020"));
        assert_eq!(ug1.total, dec("8160.00"));

        let summary_total: Decimal = invoice.summary.iter().map(|l| l.total).sum();
        assert_eq!(summary_total, invoice.grand_total);
    }

    #[test]
    fn test_missing_rates_are_listed_with_unit() {
        let mut card = RateCard::vexus_la_tx_2026();
        card.rates.remove("FS3");

        let units = vec![splice_point("SP-001", Status::QcApproved)];
        let invoice = build_invoice(
            &units,
            &card,
            &BillingCodes::standard(),
            &EvidenceRules::standard(),
            &InvoiceOptions::default(),
        );

        assert_eq!(invoice.grand_total, dec("308.00"));
        assert_eq!(
            invoice.unbillable,
            vec![UnbilledItem {
                unit_id: "SP-001".to_string(),
                reason: Unbillable::MissingRate {
                    unit_code: "FS3".to_string()
                },
            }]
        );
    }

    #[test]
    fn test_empty_invoice() {
        let invoice = invoice(&[], InvoiceOptions::default());
        assert!(invoice.sections.is_empty());
        assert!(invoice.summary.is_empty());
        assert_eq!(invoice.grand_total, Decimal::ZERO);
        assert_eq!(invoice.rate_card_id, "vexus-la-tx-2026");
        assert_eq!(invoice.customer, "Vexus Fiber");
    }

    #[test]
    fn test_invoice_options_default_from_json() {
        let options: InvoiceOptions = serde_json::from_str("{}").unwrap();
        assert!(options.only_approved);
    }
}

//! Billing output models.
//!
//! This module contains [`LineItem`] and [`BillingResult`], the output-only
//! values produced by the billing calculators. They are computed on demand
//! and never persisted by the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest quantity or line total the engine will bill, one quadrillion.
///
/// Larger lines are reported as [`Unbillable::QuantityOverflow`]. With every
/// line under this bound, invoice and unit roll-ups cannot overflow a
/// `Decimal` short of tens of trillions of lines.
pub const MAX_BILLABLE_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// A single billable entry.
///
/// # Example
///
/// ```
/// use fiber_workflow::models::LineItem;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let item = LineItem::new(
///     "FS1",
///     "Fusion splice 1 fiber",
///     Decimal::from(2),
///     "EA",
///     Decimal::from_str("16.50").unwrap(),
/// )
/// .unwrap();
/// assert_eq!(item.total, Decimal::from_str("33.00").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Rate card unit code (e.g. "UG1", "FS2").
    pub unit_code: String,
    /// Description from the rate card.
    pub description: String,
    /// Billed quantity.
    pub quantity: Decimal,
    /// Unit of measure from the rate card ("LF", "EA").
    pub unit_of_measure: String,
    /// Price per unit.
    pub unit_price: Decimal,
    /// `quantity * unit_price`, unrounded.
    pub total: Decimal,
}

impl LineItem {
    /// Creates a line item, computing its total.
    ///
    /// Returns `None` when the quantity or the total exceeds
    /// [`MAX_BILLABLE_AMOUNT`] in magnitude.
    pub fn new(
        unit_code: impl Into<String>,
        description: impl Into<String>,
        quantity: Decimal,
        unit_of_measure: impl Into<String>,
        unit_price: Decimal,
    ) -> Option<Self> {
        if quantity.abs() > MAX_BILLABLE_AMOUNT {
            return None;
        }
        let total = quantity
            .checked_mul(unit_price)
            .filter(|total| total.abs() <= MAX_BILLABLE_AMOUNT)?;

        Some(Self {
            unit_code: unit_code.into(),
            description: description.into(),
            quantity,
            unit_of_measure: unit_of_measure.into(),
            unit_price,
            total,
        })
    }
}

/// Why an expected line item was left out of a billing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unbillable {
    /// The rate card has no entry for the selected unit code.
    MissingRate {
        /// The unit code that was looked up.
        unit_code: String,
    },
    /// The handhole dimensions have no unit code mapping.
    UnmappedHandhole {
        /// The handhole dimensions that were supplied.
        dimensions: String,
    },
    /// The quantity is below zero.
    NegativeQuantity {
        /// The unit code that would have been billed.
        unit_code: String,
        /// The quantity that was supplied.
        quantity: Decimal,
    },
    /// The quantity or its line total is larger than [`MAX_BILLABLE_AMOUNT`].
    QuantityOverflow {
        /// The unit code that would have been billed.
        unit_code: String,
        /// The quantity that was supplied.
        quantity: Decimal,
    },
}

/// Line items for one piece of work plus their grand total.
///
/// `total` always equals the sum of the item totals, including when some
/// expected items were omitted and listed in `unbillable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingResult {
    /// Billable line items.
    pub items: Vec<LineItem>,
    /// Expected items that could not be billed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unbillable: Vec<Unbillable>,
    /// Sum of `items[*].total`.
    pub total: Decimal,
}

impl BillingResult {
    /// Builds a result, deriving the total from the items.
    ///
    /// An item that would overflow the running total is moved to
    /// `unbillable` as [`Unbillable::QuantityOverflow`].
    pub fn new(items: Vec<LineItem>, mut unbillable: Vec<Unbillable>) -> Self {
        let mut total = Decimal::ZERO;
        let mut billed = Vec::with_capacity(items.len());

        for item in items {
            match total.checked_add(item.total) {
                Some(sum) => {
                    total = sum;
                    billed.push(item);
                }
                None => unbillable.push(Unbillable::QuantityOverflow {
                    unit_code: item.unit_code,
                    quantity: item.quantity,
                }),
            }
        }

        Self {
            items: billed,
            unbillable,
            total,
        }
    }

    /// A result with nothing billed.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Returns true if every expected item was billed.
    pub fn is_fully_billed(&self) -> bool {
        self.unbillable.is_empty()
    }
}

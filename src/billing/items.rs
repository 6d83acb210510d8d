//! Line item assembly shared by the calculators.

use rust_decimal::Decimal;

use crate::config::RateCard;
use crate::models::{BillingResult, LineItem, Unbillable};

/// Collects priced items, recording codes the rate card cannot price.
pub(crate) struct LineItems<'a> {
    rate_card: &'a RateCard,
    items: Vec<LineItem>,
    unbillable: Vec<Unbillable>,
}

impl<'a> LineItems<'a> {
    pub(crate) fn new(rate_card: &'a RateCard) -> Self {
        Self {
            rate_card,
            items: Vec::new(),
            unbillable: Vec::new(),
        }
    }

    /// Prices `quantity` of `code`, or records why it cannot be billed.
    pub(crate) fn add(&mut self, code: &str, quantity: Decimal) -> &mut Self {
        let Some(rate) = self.rate_card.unit_rate(code) else {
            return self.skip(Unbillable::MissingRate {
                unit_code: code.to_string(),
            });
        };
        if quantity < Decimal::ZERO {
            return self.skip(Unbillable::NegativeQuantity {
                unit_code: code.to_string(),
                quantity,
            });
        }

        match LineItem::new(
            code,
            rate.description.as_str(),
            quantity,
            rate.unit_of_measure.as_str(),
            rate.unit_price,
        ) {
            Some(item) => self.items.push(item),
            None => self.unbillable.push(Unbillable::QuantityOverflow {
                unit_code: code.to_string(),
                quantity,
            }),
        }
        self
    }

    pub(crate) fn skip(&mut self, reason: Unbillable) -> &mut Self {
        self.unbillable.push(reason);
        self
    }

    pub(crate) fn finish(self) -> BillingResult {
        BillingResult::new(self.items, self.unbillable)
    }
}

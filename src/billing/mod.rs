//! Billing calculators.
//!
//! One pure function per work type, plus unit roll-ups and invoices. Codes
//! the rate card cannot price are left out of the items and reported in
//! [`BillingResult::unbillable`](crate::models::BillingResult).

mod boring;
mod invoice;
mod items;
mod pulling;
mod segment;
mod splicing;
mod structure;

pub use boring::{calculate_boring, select_boring_code};
pub use invoice::{Invoice, InvoiceOptions, InvoiceSection, SummaryLine, UnbilledItem, build_invoice};
pub use pulling::{calculate_pulling, select_pulling_code};
pub use segment::{
    DEFAULT_DUCT_COUNT, DEFAULT_FIBER_COUNT, SegmentBilling, UnitBilling,
    calculate_segment_billing, calculate_unit_billing,
};
pub use splicing::{SpliceQuantities, calculate_splicing};
pub use structure::calculate_structure;

//! Configuration loading and management for the fiber workflow engine.
//!
//! All rule data lives here: the transition table, progress weights,
//! evidence requirements, power meter thresholds, billing code selection
//! and customer rate cards. Rule functions receive these as immutable
//! inputs.
//!
//! # Example
//!
//! ```no_run
//! use fiber_workflow::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Rate cards: {:?}", loader.config().rate_cards().ids());
//! ```

mod loader;
mod rate_card;
mod types;

pub use loader::ConfigLoader;
pub use rate_card::{RateCard, RateCardRepository, UnitRate};
pub use types::{
    BASKET_LABEL, BillingCodes, BoringCodes, EngineConfig, EvidenceRules, PhotoLayout, PmThresholds,
    ProgressWeights, PullingCodes, SpliceEvidenceRule, SplicingCodes, StructureCodes,
    TransitionTable,
};

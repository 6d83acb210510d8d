//! Customer rate cards.
//!
//! A rate card maps unit codes to a description, unit of measure and price.
//! Cards are read-only reference data looked up by id.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Price entry for one unit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRate {
    /// Human-readable description of the work.
    pub description: String,
    /// Unit of measure, "LF" or "EA".
    #[serde(alias = "uom")]
    pub unit_of_measure: String,
    /// Price per unit.
    #[serde(alias = "price")]
    pub unit_price: Decimal,
}

impl UnitRate {
    fn new(description: &str, unit_of_measure: &str, unit_price: Decimal) -> Self {
        Self {
            description: description.to_string(),
            unit_of_measure: unit_of_measure.to_string(),
            unit_price,
        }
    }
}

/// A customer-specific price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCard {
    /// Identifier (e.g. "vexus-la-tx-2026").
    pub id: String,
    /// Customer the card applies to.
    pub customer: String,
    /// Date from which the prices apply.
    pub effective_date: NaiveDate,
    /// Unit code to rate.
    pub rates: BTreeMap<String, UnitRate>,
}

impl RateCard {
    /// Looks up the rate for a unit code.
    pub fn unit_rate(&self, code: &str) -> Option<&UnitRate> {
        self.rates.get(code)
    }

    /// Checks that the id is present and no price is negative.
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::invalid_config("rate card id is empty"));
        }
        if let Some((code, rate)) = self
            .rates
            .iter()
            .find(|(_, rate)| rate.unit_price < Decimal::ZERO)
        {
            return Err(EngineError::invalid_config(format!(
                "rate card '{}' has a negative price for '{}': {}",
                self.id, code, rate.unit_price
            )));
        }
        Ok(())
    }

    /// The Vexus Fiber Louisiana/Texas card effective 2026-01-01.
    pub fn vexus_la_tx_2026() -> Self {
        let cents = |value: i64| Decimal::new(value, 2);
        let rates = [
            ("UG1", UnitRate::new("Directional bore 1-4 ducts (1.25\" ID)", "LF", cents(800))),
            ("UG23", UnitRate::new("Directional bore 5 ducts", "LF", cents(950))),
            ("UG24", UnitRate::new("Directional bore 6 ducts", "LF", cents(1050))),
            ("UG4", UnitRate::new("Pull up to 144ct armored/micro cable", "LF", cents(55))),
            ("UG28", UnitRate::new("Place 288-432ct armored fiber in duct", "LF", cents(100))),
            ("FS1", UnitRate::new("Fusion splice 1 fiber", "EA", cents(1650))),
            ("FS2", UnitRate::new("Ring cut (mid-span terminals)", "EA", cents(27500))),
            ("FS3", UnitRate::new("Test Fiber (OTDR/power meter)", "EA", cents(660))),
            ("FS4", UnitRate::new("ReEnter/Install Enclosure (end-of-line)", "EA", cents(13750))),
            ("UG10", UnitRate::new("30x48x30 fiberglass/polycrete", "EA", cents(31000))),
            ("UG11", UnitRate::new("24x36x24", "EA", cents(11000))),
            ("UG12", UnitRate::new("Utility Box", "EA", cents(2000))),
            ("UG13", UnitRate::new("Ground rod 5/8\" x 8'", "EA", cents(4000))),
            ("UG17", UnitRate::new("17x30x18 HDPE", "EA", cents(6000))),
            ("UG18", UnitRate::new("24x36x18", "EA", cents(12500))),
            ("UG19", UnitRate::new("30x48x18", "EA", cents(25000))),
            ("UG20", UnitRate::new("Terminal Box", "EA", cents(4000))),
            ("UG27", UnitRate::new("30x48x24", "EA", cents(21000))),
        ];

        Self {
            id: "vexus-la-tx-2026".to_string(),
            customer: "Vexus Fiber".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_string(), rate))
                .collect(),
        }
    }
}

/// Read-only lookup of rate cards by id.
#[derive(Debug, Clone, Default)]
pub struct RateCardRepository {
    cards: HashMap<String, RateCard>,
}

impl RateCardRepository {
    /// Builds a repository, validating every card and rejecting duplicate ids.
    pub fn new(cards: impl IntoIterator<Item = RateCard>) -> EngineResult<Self> {
        let mut by_id = HashMap::new();
        for card in cards {
            card.validate()?;
            if by_id.contains_key(&card.id) {
                return Err(EngineError::invalid_config(format!(
                    "rate card '{}' is defined more than once",
                    card.id
                )));
            }
            by_id.insert(card.id.clone(), card);
        }
        Ok(Self { cards: by_id })
    }

    /// A repository holding only the built-in Vexus card.
    pub fn standard() -> Self {
        let card = RateCard::vexus_la_tx_2026();
        Self {
            cards: HashMap::from([(card.id.clone(), card)]),
        }
    }

    /// Returns the card with the given id.
    pub fn get(&self, id: &str) -> EngineResult<&RateCard> {
        self.cards
            .get(id)
            .ok_or_else(|| EngineError::RateCardNotFound { id: id.to_string() })
    }

    /// Ids of all loaded cards, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.cards.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of loaded cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if no cards are loaded.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

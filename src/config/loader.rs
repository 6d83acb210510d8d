//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Phase, Status};

use super::rate_card::{RateCard, RateCardRepository};
use super::types::{
    BillingCodes, EngineConfig, EvidenceRules, PmThresholds, ProgressWeights, TransitionTable,
};

/// Shape of `workflow.yaml`.
#[derive(Debug, Deserialize)]
struct WorkflowFile {
    transitions: BTreeMap<Phase, BTreeMap<Status, Vec<Status>>>,
    progress: ProgressWeights,
}

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── workflow.yaml        # Transition table and progress weights
/// ├── evidence.yaml        # Photo and test requirements
/// ├── power_meter.yaml     # dBm thresholds
/// ├── billing_codes.yaml   # Unit code selection rules
/// └── rate_cards/
///     └── vexus-la-tx-2026.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use fiber_workflow::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// let card = loader.rate_card("vexus-la-tx-2026")?;
/// println!("Loaded rate card for {}", card.customer);
/// # Ok::<(), fiber_workflow::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or violates a configuration invariant.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let workflow = Self::load_yaml::<WorkflowFile>(&path.join("workflow.yaml"))?;
        let transitions = TransitionTable::new(workflow.transitions)?;

        let evidence = Self::load_yaml::<EvidenceRules>(&path.join("evidence.yaml"))?;
        let power_meter = Self::load_yaml::<PmThresholds>(&path.join("power_meter.yaml"))?;
        let billing_codes = Self::load_yaml::<BillingCodes>(&path.join("billing_codes.yaml"))?;
        let rate_cards = RateCardRepository::new(Self::load_rate_cards(&path.join("rate_cards"))?)?;

        debug!(
            path = %path.display(),
            rate_cards = rate_cards.len(),
            "loaded engine configuration"
        );

        let config = EngineConfig::new(
            transitions,
            workflow.progress,
            evidence,
            power_meter,
            billing_codes,
            rate_cards,
        )?;

        Ok(Self { config })
    }

    /// Wraps an already assembled configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every rate card in the rate card directory.
    fn load_rate_cards(dir: &Path) -> EngineResult<Vec<RateCard>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut cards = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                cards.push(Self::load_yaml::<RateCard>(&path)?);
            }
        }

        if cards.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate cards found)", dir_str),
            });
        }

        Ok(cards)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Gets a rate card by id.
    pub fn rate_card(&self, id: &str) -> EngineResult<&RateCard> {
        self.config.rate_cards().get(id)
    }
}

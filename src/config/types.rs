//! Configuration types for the workflow, evidence, PM and billing rules.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from YAML files and injected into the rule functions. Every
//! type has a `standard()` constructor with the production defaults.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Phase, SpliceType, Status};

use super::rate_card::RateCardRepository;

/// Legal status transitions, per phase.
///
/// Statuses with no entry for a phase have no outgoing transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionTable {
    phases: BTreeMap<Phase, BTreeMap<Status, Vec<Status>>>,
}

impl TransitionTable {
    /// Builds a table, rejecting missing phases and self-loops.
    pub fn new(phases: BTreeMap<Phase, BTreeMap<Status, Vec<Status>>>) -> EngineResult<Self> {
        for phase in Phase::ALL {
            let Some(rows) = phases.get(&phase) else {
                return Err(EngineError::invalid_config(format!(
                    "transition table has no entry for phase '{}'",
                    phase
                )));
            };
            for (from, targets) in rows {
                if targets.contains(from) {
                    return Err(EngineError::invalid_config(format!(
                        "transition table for '{}' lets '{}' transition to itself",
                        phase, from
                    )));
                }
            }
        }
        Ok(Self { phases })
    }

    /// The table shared by every phase in the standard workflow.
    pub fn standard() -> Self {
        let rows: BTreeMap<Status, Vec<Status>> = Status::ALL
            .into_iter()
            .map(|status| (status, status.standard_successors().to_vec()))
            .collect();
        Self {
            phases: Phase::ALL
                .into_iter()
                .map(|phase| (phase, rows.clone()))
                .collect(),
        }
    }

    /// Statuses reachable from `current` in `phase`.
    pub fn successors(&self, phase: Phase, current: Status) -> &[Status] {
        self.phases
            .get(&phase)
            .and_then(|rows| rows.get(&current))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Weights used to turn statuses into completion percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressWeights {
    /// Completion fraction credited for each status (0 to 1).
    pub status_weights: BTreeMap<Status, Decimal>,
    /// Relative weight of each phase in a unit's overall progress.
    pub phase_weights: BTreeMap<Phase, Decimal>,
}

impl ProgressWeights {
    /// Standard weights: boring 40%, pulling 30%, splicing 30%.
    pub fn standard() -> Self {
        Self {
            status_weights: BTreeMap::from([
                (Status::NotStarted, Decimal::ZERO),
                (Status::InProgress, Decimal::new(5, 1)),
                (Status::Complete, Decimal::new(8, 1)),
                (Status::QcApproved, Decimal::ONE),
                (Status::Issue, Decimal::new(3, 1)),
                (Status::Blocked, Decimal::ZERO),
            ]),
            phase_weights: BTreeMap::from([
                (Phase::Boring, Decimal::new(4, 1)),
                (Phase::Pulling, Decimal::new(3, 1)),
                (Phase::Splicing, Decimal::new(3, 1)),
            ]),
        }
    }

    /// Checks that status weights lie in [0, 1] and phase weights are positive.
    pub fn validate(&self) -> EngineResult<()> {
        for (status, weight) in &self.status_weights {
            if *weight < Decimal::ZERO || *weight > Decimal::ONE {
                return Err(EngineError::invalid_config(format!(
                    "progress weight for '{}' must be between 0 and 1, got {}",
                    status, weight
                )));
            }
        }
        for phase in Phase::ALL {
            match self.phase_weights.get(&phase) {
                Some(weight) if *weight > Decimal::ZERO => {}
                Some(weight) => {
                    return Err(EngineError::invalid_config(format!(
                        "phase weight for '{}' must be positive, got {}",
                        phase, weight
                    )));
                }
                None => {
                    return Err(EngineError::invalid_config(format!(
                        "phase weight for '{}' is missing",
                        phase
                    )));
                }
            }
        }
        Ok(())
    }

    /// Completion fraction for a status; unlisted statuses count as zero.
    pub fn status_weight(&self, status: Status) -> Decimal {
        self.status_weights
            .get(&status)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Relative weight of a phase.
    pub fn phase_weight(&self, phase: Phase) -> Decimal {
        self.phase_weights
            .get(&phase)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Power meter thresholds in dBm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmThresholds {
    /// Lower edge of the pass band.
    pub pass_min: Decimal,
    /// Upper edge of the pass band; anything stronger fails.
    pub pass_max: Decimal,
    /// Lower edge of the warning band.
    pub warn_min: Decimal,
    /// Upper edge of the warning band.
    pub warn_max: Decimal,
    /// Readings below this fail as too weak.
    pub fail_weak_max: Decimal,
    /// Readings at or above this are on the strong side of the band.
    pub fail_strong_min: Decimal,
}

impl PmThresholds {
    /// Standard thresholds: pass -25..-8, warning -28..-25.
    pub fn standard() -> Self {
        Self {
            pass_min: Decimal::from(-25),
            pass_max: Decimal::from(-8),
            warn_min: Decimal::from(-28),
            warn_max: Decimal::from(-25),
            fail_weak_max: Decimal::from(-28),
            fail_strong_min: Decimal::from(-8),
        }
    }

    /// Checks that the bands are ordered weak to strong.
    pub fn validate(&self) -> EngineResult<()> {
        let ordered = self.warn_min <= self.warn_max
            && self.pass_min <= self.pass_max
            && self.fail_weak_max <= self.warn_max
            && self.warn_max <= self.pass_max
            && self.pass_max <= self.fail_strong_min;
        if ordered {
            Ok(())
        } else {
            Err(EngineError::invalid_config(format!(
                "power meter thresholds are not ordered: {:?}",
                self
            )))
        }
    }
}

/// How a splice type's photo labels are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum PhotoLayout {
    /// A literal label list, independent of tray count.
    Fixed {
        /// The labels, in capture order.
        labels: Vec<String>,
        /// Declared photo count; must equal `labels.len()`.
        photo_count: usize,
    },
    /// First base label, one label per tray, then the remaining base labels.
    PerTray {
        /// Base labels; the first must be `"Basket"` and precedes the tray
        /// photos.
        base_labels: Vec<String>,
        /// Prefix of each tray label, rendered as `"{prefix} #{n}"`.
        tray_prefix: String,
        /// Most trays photographed; larger tray counts are clamped to it.
        #[serde(default = "default_max_trays")]
        max_trays: u32,
    },
}

/// Label every per-tray list opens with.
pub const BASKET_LABEL: &str = "Basket";

fn default_max_trays() -> u32 {
    24
}

/// Evidence rule for one splice type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceEvidenceRule {
    /// Photo label layout.
    #[serde(flatten)]
    pub layout: PhotoLayout,
    /// Power meter readings required.
    #[serde(default)]
    pub test_count: u32,
    /// Whether an OTDR trace or similar artifact must be attached.
    #[serde(default)]
    pub requires_test_artifact: bool,
}

/// Evidence requirements for every phase and splice type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRules {
    /// Per splice type rules.
    pub splice_types: HashMap<SpliceType, SpliceEvidenceRule>,
    /// Photos required to complete boring.
    pub boring: Vec<String>,
    /// Photos required to complete pulling.
    pub pulling: Vec<String>,
    /// Photos required for splice points of unknown type.
    pub fallback: Vec<String>,
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl EvidenceRules {
    /// Standard evidence rules.
    pub fn standard() -> Self {
        let enclosure_base = labels(&[
            "Basket",
            "Strength members and grounds attached",
            "Completed enclosure exterior (closed)",
            "Cable entry with plugs/grommets",
            "Enclosure in handhole",
        ]);
        let one_by_four = labels(&[
            "Basket",
            "Splice tray (1 tray)",
            "Attached strength members",
            "Grommets from inside",
            "Completed enclosure closed",
            "Cables entering enclosure",
            "Enclosure in ground",
        ]);
        let one_by_eight = labels(&[
            "Basket",
            "Splitter tray",
            "Splice tray (1 tray)",
            "Attached strength members",
            "Grommets from inside",
            "Completed enclosure closed",
            "Cables entering enclosure",
            "Enclosure in ground",
        ]);
        let two_by_eight = labels(&[
            "Basket",
            "Splitter tray #1",
            "Splitter tray #2",
            "Splice tray (1 tray)",
            "Attached strength members",
            "Grommets from inside",
            "Completed enclosure closed",
            "Cables entering enclosure",
            "Enclosure in ground",
        ]);

        let fixed = |labels: Vec<String>, test_count: u32| SpliceEvidenceRule {
            layout: PhotoLayout::Fixed {
                photo_count: labels.len(),
                labels,
            },
            test_count,
            requires_test_artifact: false,
        };
        let per_tray = || SpliceEvidenceRule {
            layout: PhotoLayout::PerTray {
                base_labels: enclosure_base.clone(),
                tray_prefix: "Splice tray".to_string(),
                max_trays: default_max_trays(),
            },
            test_count: 0,
            requires_test_artifact: true,
        };

        Self {
            splice_types: HashMap::from([
                (SpliceType::OneByFour, fixed(one_by_four, 8)),
                (SpliceType::OneByEight, fixed(one_by_eight, 16)),
                (SpliceType::TwoByEight, fixed(two_by_eight, 0)),
                (SpliceType::F1, per_tray()),
                (SpliceType::TycoD, per_tray()),
            ]),
            boring: labels(&["Bore entry pit", "Bore exit pit", "Bore path restoration"]),
            pulling: labels(&[
                "Cable reel label/tag",
                "Cable entering conduit",
                "Cable at pull-through point",
                "Slack coil at handhole",
            ]),
            fallback: labels(&["Before photo", "During splice", "Completed splice"]),
        }
    }

    /// Checks label lists for duplicates and declared counts.
    pub fn validate(&self) -> EngineResult<()> {
        if self.splice_types.contains_key(&SpliceType::Unknown) {
            return Err(EngineError::invalid_config(
                "evidence rules may not define the Unknown splice type; use `fallback`",
            ));
        }
        check_distinct("boring", &self.boring)?;
        check_distinct("pulling", &self.pulling)?;
        check_distinct("fallback", &self.fallback)?;

        for (splice_type, rule) in &self.splice_types {
            let context = format!("splice type '{}'", splice_type);
            match &rule.layout {
                PhotoLayout::Fixed {
                    labels,
                    photo_count,
                } => {
                    check_distinct(&context, labels)?;
                    if labels.len() != *photo_count {
                        return Err(EngineError::invalid_config(format!(
                            "{} declares {} photos but lists {}",
                            context,
                            photo_count,
                            labels.len()
                        )));
                    }
                }
                PhotoLayout::PerTray {
                    base_labels,
                    tray_prefix,
                    max_trays,
                } => {
                    check_distinct(&context, base_labels)?;
                    if base_labels.first().map(String::as_str) != Some(BASKET_LABEL) {
                        return Err(EngineError::invalid_config(format!(
                            "{} must list '{}' as its first base label",
                            context, BASKET_LABEL
                        )));
                    }
                    if *max_trays == 0 {
                        return Err(EngineError::invalid_config(format!(
                            "{} allows zero trays",
                            context
                        )));
                    }
                    if base_labels.iter().any(|l| l.starts_with(tray_prefix.as_str())) {
                        return Err(EngineError::invalid_config(format!(
                            "{} has a base label that collides with tray prefix '{}'",
                            context, tray_prefix
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_distinct(context: &str, labels: &[String]) -> EngineResult<()> {
    let mut seen = BTreeSet::new();
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(EngineError::invalid_config(format!(
                "{} lists photo label '{}' more than once",
                context, label
            )));
        }
    }
    Ok(())
}

/// Unit codes for boring, chosen by duct count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoringCodes {
    /// Six or more ducts.
    pub six_or_more_ducts: String,
    /// Exactly five ducts.
    pub five_ducts: String,
    /// One to four ducts.
    pub standard: String,
}

/// Unit codes for cable pulling, chosen by fiber count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullingCodes {
    /// Cables above the bulk threshold.
    pub bulk: String,
    /// Cables at or below the bulk threshold.
    pub standard: String,
    /// Fiber count above which the bulk code applies.
    pub bulk_fiber_threshold: u32,
}

/// Unit codes for splicing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplicingCodes {
    /// Setup for mid-span splice points.
    pub ring_cut: String,
    /// Setup for end-of-line splice points.
    pub re_enter: String,
    /// Per fusion splice.
    pub fusion: String,
    /// Per power meter test.
    pub test: String,
}

/// Unit codes for handholes and other structures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureCodes {
    /// Handhole dimensions (e.g. "17x30x18") to unit code.
    pub handholes: BTreeMap<String, String>,
    /// Ground rod.
    pub ground_rod: String,
}

/// Unit code selection rules for every work type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingCodes {
    /// Boring codes.
    pub boring: BoringCodes,
    /// Pulling codes.
    pub pulling: PullingCodes,
    /// Splicing codes.
    pub splicing: SplicingCodes,
    /// Structure codes.
    pub structure: StructureCodes,
}

impl BillingCodes {
    /// Standard unit codes used by the Vexus LA/TX rate card.
    pub fn standard() -> Self {
        Self {
            boring: BoringCodes {
                six_or_more_ducts: "UG24".to_string(),
                five_ducts: "UG23".to_string(),
                standard: "UG1".to_string(),
            },
            pulling: PullingCodes {
                bulk: "UG28".to_string(),
                standard: "UG4".to_string(),
                bulk_fiber_threshold: 144,
            },
            splicing: SplicingCodes {
                ring_cut: "FS2".to_string(),
                re_enter: "FS4".to_string(),
                fusion: "FS1".to_string(),
                test: "FS3".to_string(),
            },
            structure: StructureCodes {
                handholes: [
                    ("15x20x12", "UG20"),
                    ("17x30x18", "UG17"),
                    ("24x36x18", "UG18"),
                    ("24x36x24", "UG11"),
                    ("30x48x18", "UG19"),
                    ("30x48x24", "UG27"),
                    ("30x48x30", "UG10"),
                ]
                .into_iter()
                .map(|(dims, code)| (dims.to_string(), code.to_string()))
                .collect(),
                ground_rod: "UG13".to_string(),
            },
        }
    }
}

/// Complete engine configuration, as loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    transitions: TransitionTable,
    progress: ProgressWeights,
    evidence: EvidenceRules,
    power_meter: PmThresholds,
    billing_codes: BillingCodes,
    rate_cards: RateCardRepository,
}

impl EngineConfig {
    /// Assembles a configuration, validating every part.
    pub fn new(
        transitions: TransitionTable,
        progress: ProgressWeights,
        evidence: EvidenceRules,
        power_meter: PmThresholds,
        billing_codes: BillingCodes,
        rate_cards: RateCardRepository,
    ) -> EngineResult<Self> {
        progress.validate()?;
        evidence.validate()?;
        power_meter.validate()?;
        Ok(Self {
            transitions,
            progress,
            evidence,
            power_meter,
            billing_codes,
            rate_cards,
        })
    }

    /// Built-in production defaults.
    pub fn standard() -> Self {
        Self {
            transitions: TransitionTable::standard(),
            progress: ProgressWeights::standard(),
            evidence: EvidenceRules::standard(),
            power_meter: PmThresholds::standard(),
            billing_codes: BillingCodes::standard(),
            rate_cards: RateCardRepository::standard(),
        }
    }

    /// Returns the transition table.
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Returns the progress weights.
    pub fn progress(&self) -> &ProgressWeights {
        &self.progress
    }

    /// Returns the evidence rules.
    pub fn evidence(&self) -> &EvidenceRules {
        &self.evidence
    }

    /// Returns the power meter thresholds.
    pub fn power_meter(&self) -> &PmThresholds {
        &self.power_meter
    }

    /// Returns the billing code rules.
    pub fn billing_codes(&self) -> &BillingCodes {
        &self.billing_codes
    }

    /// Returns the rate card repository.
    pub fn rate_cards(&self) -> &RateCardRepository {
        &self.rate_cards
    }
}

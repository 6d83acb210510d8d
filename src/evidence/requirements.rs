//! Evidence requirement derivation.
//!
//! Requirements are derived on demand from [`EvidenceRules`] and never
//! stored, so they always reflect the configuration in force.

use crate::config::{EvidenceRules, PhotoLayout, SpliceEvidenceRule};
use crate::models::{EvidenceRequirement, Phase, SpliceDetails, SpliceType};

/// Rule for a splice type, or `None` for the generic fallback.
fn splice_rule(rules: &EvidenceRules, splice_type: SpliceType) -> Option<&SpliceEvidenceRule> {
    match splice_type {
        SpliceType::OneByFour
        | SpliceType::OneByEight
        | SpliceType::TwoByEight
        | SpliceType::F1
        | SpliceType::TycoD => rules.splice_types.get(&splice_type),
        SpliceType::Unknown => None,
    }
}

/// Trays photographed in a closure.
///
/// A missing or zero count means one tray; counts above `max_trays` are
/// clamped to it.
fn effective_trays(tray_count: Option<u32>, max_trays: u32) -> u32 {
    tray_count.filter(|n| *n > 0).unwrap_or(1).min(max_trays.max(1))
}

/// Ordered photo labels required for a splice point.
///
/// Fixed layouts ignore `tray_count`. Per-tray layouts produce the first base
/// label, one `"{prefix} #{n}"` label per tray up to the layout's
/// `max_trays`, then the remaining base labels. Unknown types get the generic
/// fallback list.
///
/// # Example
///
/// ```
/// use fiber_workflow::config::EvidenceRules;
/// use fiber_workflow::evidence::required_evidence;
/// use fiber_workflow::models::SpliceType;
///
/// let rules = EvidenceRules::standard();
/// let labels = required_evidence(&rules, SpliceType::F1, Some(2));
/// assert_eq!(labels[0], "Basket");
/// assert_eq!(labels[1], "Splice tray #1");
/// assert_eq!(labels[2], "Splice tray #2");
/// assert_eq!(labels.len(), 7);
/// ```
pub fn required_evidence(
    rules: &EvidenceRules,
    splice_type: SpliceType,
    tray_count: Option<u32>,
) -> Vec<String> {
    let Some(rule) = splice_rule(rules, splice_type) else {
        return rules.fallback.clone();
    };

    match &rule.layout {
        PhotoLayout::Fixed { labels, .. } => labels.clone(),
        PhotoLayout::PerTray {
            base_labels,
            tray_prefix,
            max_trays,
        } => {
            let trays = effective_trays(tray_count, *max_trays);
            let mut labels = Vec::with_capacity(base_labels.len() + trays as usize);
            labels.extend(base_labels.first().cloned());
            labels.extend((1..=trays).map(|n| format!("{} #{}", tray_prefix, n)));
            labels.extend(base_labels.iter().skip(1).cloned());
            labels
        }
    }
}

/// Declared photo count for a splice point.
///
/// Always equal to the length of [`required_evidence`] for the same inputs.
pub fn required_photo_count(
    rules: &EvidenceRules,
    splice_type: SpliceType,
    tray_count: Option<u32>,
) -> usize {
    match splice_rule(rules, splice_type).map(|rule| &rule.layout) {
        Some(PhotoLayout::Fixed { photo_count, .. }) => *photo_count,
        Some(PhotoLayout::PerTray {
            base_labels,
            max_trays,
            ..
        }) => 1 + effective_trays(tray_count, *max_trays) as usize + base_labels.len().saturating_sub(1),
        None => rules.fallback.len(),
    }
}

/// Power meter readings required for a splice type.
pub fn required_test_count(rules: &EvidenceRules, splice_type: SpliceType) -> u32 {
    splice_rule(rules, splice_type).map_or(0, |rule| rule.test_count)
}

/// Full requirement for a splice point.
pub fn splice_requirement(rules: &EvidenceRules, details: &SpliceDetails) -> EvidenceRequirement {
    EvidenceRequirement {
        labels: required_evidence(rules, details.splice_type, details.tray_count),
        test_count: required_test_count(rules, details.splice_type),
        requires_test_artifact: splice_rule(rules, details.splice_type)
            .is_some_and(|rule| rule.requires_test_artifact),
    }
}

/// Requirement for completing `phase`.
///
/// Boring and pulling use their fixed lists. Splicing derives from the splice
/// details, falling back to the generic list when none are known.
pub fn phase_evidence(
    rules: &EvidenceRules,
    phase: Phase,
    splice: Option<&SpliceDetails>,
) -> EvidenceRequirement {
    let photos_only = |labels: &[String]| EvidenceRequirement {
        labels: labels.to_vec(),
        test_count: 0,
        requires_test_artifact: false,
    };

    match phase {
        Phase::Boring => photos_only(&rules.boring),
        Phase::Pulling => photos_only(&rules.pulling),
        Phase::Splicing => match splice {
            Some(details) => splice_requirement(rules, details),
            None => photos_only(&rules.fallback),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SplicePosition;
    use proptest::prelude::*;

    fn rules() -> EvidenceRules {
        EvidenceRules::standard()
    }

    /// EV-001: 1x4 uses its fixed seven-label list
    #[test]
    fn test_one_by_four_labels() {
        let labels = required_evidence(&rules(), SpliceType::OneByFour, None);
        assert_eq!(
            labels,
            vec![
                "Basket",
                "Splice tray (1 tray)",
                "Attached strength members",
                "Grommets from inside",
                "Completed enclosure closed",
                "Cables entering enclosure",
                "Enclosure in ground",
            ]
        );
    }

    #[test]
    fn test_one_by_eight_adds_splitter_tray() {
        let labels = required_evidence(&rules(), SpliceType::OneByEight, Some(3));
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[1], "Splitter tray");
    }

    #[test]
    fn test_two_by_eight_has_two_splitter_trays() {
        let labels = required_evidence(&rules(), SpliceType::TwoByEight, None);
        assert_eq!(labels.len(), 9);
        assert_eq!(labels[1], "Splitter tray #1");
        assert_eq!(labels[2], "Splitter tray #2");
    }

    /// EV-002: TYCO-D with three trays
    #[test]
    fn test_tyco_d_with_three_trays() {
        let labels = required_evidence(&rules(), SpliceType::TycoD, Some(3));
        assert_eq!(
            labels,
            vec![
                "Basket",
                "Splice tray #1",
                "Splice tray #2",
                "Splice tray #3",
                "Strength members and grounds attached",
                "Completed enclosure exterior (closed)",
                "Cable entry with plugs/grommets",
                "Enclosure in handhole",
            ]
        );
    }

    #[test]
    fn test_zero_or_missing_trays_count_as_one() {
        let rules = rules();
        let one = required_evidence(&rules, SpliceType::F1, Some(1));
        assert_eq!(required_evidence(&rules, SpliceType::F1, Some(0)), one);
        assert_eq!(required_evidence(&rules, SpliceType::F1, None), one);
        assert_eq!(one.len(), 6);
    }

    /// EV-006: tray counts beyond the configured maximum are clamped
    #[test]
    fn test_tray_count_is_clamped_to_max_trays() {
        let rules = rules();
        let labels = required_evidence(&rules, SpliceType::F1, Some(u32::MAX));

        assert_eq!(labels.len(), 1 + 24 + 4);
        assert_eq!(labels[24], "Splice tray #24");
        assert_eq!(labels[25], "Strength members and grounds attached");
        assert_eq!(required_photo_count(&rules, SpliceType::TycoD, Some(u32::MAX)), labels.len());
    }

    #[test]
    fn test_configured_max_trays_is_honored() {
        let mut rules = rules();
        if let Some(PhotoLayout::PerTray { max_trays, .. }) = rules
            .splice_types
            .get_mut(&SpliceType::F1)
            .map(|rule| &mut rule.layout)
        {
            *max_trays = 2;
        }

        let labels = required_evidence(&rules, SpliceType::F1, Some(6));
        assert_eq!(labels.len(), 1 + 2 + 4);
        assert_eq!(required_photo_count(&rules, SpliceType::F1, Some(6)), 7);
        assert_eq!(required_evidence(&rules, SpliceType::TycoD, Some(6)).len(), 1 + 6 + 4);
    }

    /// EV-003: unknown types degrade to the generic list
    #[test]
    fn test_unknown_type_uses_fallback() {
        let labels = required_evidence(&rules(), SpliceType::Unknown, Some(4));
        assert_eq!(labels, vec!["Before photo", "During splice", "Completed splice"]);
        assert_eq!(required_test_count(&rules(), SpliceType::Unknown), 0);
    }

    #[test]
    fn test_required_test_counts() {
        let rules = rules();
        assert_eq!(required_test_count(&rules, SpliceType::OneByFour), 8);
        assert_eq!(required_test_count(&rules, SpliceType::OneByEight), 16);
        assert_eq!(required_test_count(&rules, SpliceType::TwoByEight), 0);
        assert_eq!(required_test_count(&rules, SpliceType::F1), 0);
        assert_eq!(required_test_count(&rules, SpliceType::TycoD), 0);
    }

    #[test]
    fn test_known_type_missing_from_rules_uses_fallback() {
        let mut rules = rules();
        rules.splice_types.remove(&SpliceType::TwoByEight);
        assert_eq!(
            required_evidence(&rules, SpliceType::TwoByEight, None),
            rules.fallback
        );
    }

    #[test]
    fn test_splice_requirement_for_f1_needs_artifact() {
        let details = SpliceDetails {
            splice_type: SpliceType::F1,
            position: SplicePosition::EndOfLine,
            fiber_count: Some(12),
            tray_count: Some(2),
            test_count: None,
            feed_pulling_status: None,
        };
        let requirement = splice_requirement(&rules(), &details);
        assert!(requirement.requires_test_artifact);
        assert_eq!(requirement.test_count, 0);
        assert_eq!(requirement.labels.len(), 7);
    }

    #[test]
    fn test_phase_evidence_for_segment_phases() {
        let rules = rules();
        let pulling = phase_evidence(&rules, Phase::Pulling, None);
        assert_eq!(pulling.labels.len(), 4);
        assert_eq!(pulling.labels[0], "Cable reel label/tag");
        assert_eq!(pulling.test_count, 0);

        let boring = phase_evidence(&rules, Phase::Boring, None);
        assert_eq!(boring.labels.len(), 3);
        assert!(!boring.requires_test_artifact);
    }

    #[test]
    fn test_phase_evidence_for_splicing_without_details() {
        let rules = rules();
        let requirement = phase_evidence(&rules, Phase::Splicing, None);
        assert_eq!(requirement.labels, rules.fallback);
    }

    fn splice_types() -> impl Strategy<Value = SpliceType> {
        prop::sample::select(vec![
            SpliceType::OneByFour,
            SpliceType::OneByEight,
            SpliceType::TwoByEight,
            SpliceType::F1,
            SpliceType::TycoD,
            SpliceType::Unknown,
        ])
    }

    proptest! {
        /// EV-004: 1x4 is independent of tray count
        #[test]
        fn prop_one_by_four_ignores_trays(trays in proptest::option::of(0u32..64)) {
            let rules = rules();
            prop_assert_eq!(
                required_evidence(&rules, SpliceType::OneByFour, trays),
                required_evidence(&rules, SpliceType::OneByFour, None)
            );
        }

        /// EV-005: F1 has basket, one label per tray and four more base labels
        #[test]
        fn prop_f1_label_count(trays in 1u32..64) {
            let labels = required_evidence(&rules(), SpliceType::F1, Some(trays));
            prop_assert_eq!(labels.len(), 1 + trays.min(24) as usize + 4);
        }

        #[test]
        fn prop_labels_match_declared_count_and_are_distinct(
            splice_type in splice_types(),
            trays in proptest::option::of(0u32..64),
        ) {
            let rules = rules();
            let labels = required_evidence(&rules, splice_type, trays);
            prop_assert_eq!(labels.len(), required_photo_count(&rules, splice_type, trays));

            let distinct: std::collections::BTreeSet<_> = labels.iter().collect();
            prop_assert_eq!(distinct.len(), labels.len());
        }
    }
}

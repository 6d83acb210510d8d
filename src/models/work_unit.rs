//! Work unit model and splice vocabulary.
//!
//! A [`WorkUnit`] is either a cable segment (boring and pulling) or a splice
//! point (splicing only). Units are immutable snapshots: a validated status
//! change produces a new snapshot with a bumped version.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Phase, Status};

/// Closure type of a splice point.
///
/// Any unrecognised value deserializes to [`SpliceType::Unknown`], which the
/// evidence rules answer with a generic fallback list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum SpliceType {
    /// 1x4 splitter terminal.
    #[serde(rename = "1x4")]
    OneByFour,
    /// 1x8 splitter terminal.
    #[serde(rename = "1x8")]
    OneByEight,
    /// Dual 1x8 splitter terminal.
    #[serde(rename = "2x8")]
    TwoByEight,
    /// F1 feeder closure.
    #[serde(rename = "F1")]
    F1,
    /// TYCO-D feeder closure.
    #[serde(rename = "TYCO-D")]
    TycoD,
    /// Missing or unrecognised splice type.
    #[default]
    #[serde(other)]
    Unknown,
}

impl SpliceType {
    /// Every recognised splice type.
    pub const KNOWN: [SpliceType; 5] = [
        SpliceType::OneByFour,
        SpliceType::OneByEight,
        SpliceType::TwoByEight,
        SpliceType::F1,
        SpliceType::TycoD,
    ];

    /// Returns the job-site code of the splice type.
    pub const fn as_str(self) -> &'static str {
        match self {
            SpliceType::OneByFour => "1x4",
            SpliceType::OneByEight => "1x8",
            SpliceType::TwoByEight => "2x8",
            SpliceType::F1 => "F1",
            SpliceType::TycoD => "TYCO-D",
            SpliceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SpliceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpliceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Ok(SpliceType::KNOWN
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(code))
            .unwrap_or(SpliceType::Unknown))
    }
}

/// Where a splice point sits on the cable, which selects the setup billing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplicePosition {
    /// Cable continues through; the sheath is ring cut.
    MidSpan,
    /// Cable ends here; the enclosure is re-entered or installed.
    EndOfLine,
}

/// Quantities carried by a cable segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDetails {
    /// Planned linear footage.
    pub footage: Decimal,
    /// Footage measured by the boring crew, when reported.
    #[serde(default)]
    pub actual_footage: Option<Decimal>,
    /// Number of ducts in the bore.
    #[serde(default)]
    pub duct_count: Option<u32>,
    /// Fiber count of the cable pulled through the segment.
    #[serde(default)]
    pub fiber_count: Option<u32>,
}

impl SegmentDetails {
    /// Footage to bill for boring: the measured footage when reported, else the plan.
    pub fn billable_bore_footage(&self) -> Decimal {
        self.actual_footage.unwrap_or(self.footage)
    }
}

/// Configuration of a splice point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceDetails {
    /// Closure type.
    #[serde(default)]
    pub splice_type: SpliceType,
    /// Position on the cable.
    pub position: SplicePosition,
    /// Number of fibers fusion spliced.
    #[serde(default)]
    pub fiber_count: Option<u32>,
    /// Number of splice trays in the closure.
    #[serde(default)]
    pub tray_count: Option<u32>,
    /// Number of power meter tests billed, when it differs from the requirement.
    #[serde(default)]
    pub test_count: Option<u32>,
    /// Pulling status of the cable feeding this splice point.
    #[serde(default)]
    pub feed_pulling_status: Option<Status>,
}

/// Kind-specific details of a work unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitDetails {
    /// A bored and pulled cable segment.
    Segment(SegmentDetails),
    /// A splice point.
    SplicePoint(SpliceDetails),
}

/// A segment or splice point tracked through the workflow.
///
/// # Example
///
/// ```
/// use fiber_workflow::models::{Phase, SegmentDetails, Status, WorkUnit};
/// use rust_decimal::Decimal;
///
/// let unit = WorkUnit::segment(
///     "SEG-001",
///     SegmentDetails {
///         footage: Decimal::new(500, 0),
///         actual_footage: None,
///         duct_count: Some(2),
///         fiber_count: Some(144),
///     },
/// );
/// assert_eq!(unit.status(Phase::Boring), Some(Status::NotStarted));
/// assert_eq!(unit.status(Phase::Splicing), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    /// Opaque unique identifier.
    pub id: String,
    /// Status of each phase this unit tracks.
    pub phase_status: BTreeMap<Phase, Status>,
    /// Kind-specific quantities.
    pub details: UnitDetails,
    /// Snapshot version for optimistic concurrency in the persistence layer.
    #[serde(default)]
    pub version: u64,
}

impl WorkUnit {
    /// Creates a segment with boring and pulling not started.
    pub fn segment(id: impl Into<String>, details: SegmentDetails) -> Self {
        Self {
            id: id.into(),
            phase_status: BTreeMap::from([
                (Phase::Boring, Status::NotStarted),
                (Phase::Pulling, Status::NotStarted),
            ]),
            details: UnitDetails::Segment(details),
            version: 0,
        }
    }

    /// Creates a splice point with splicing not started.
    pub fn splice_point(id: impl Into<String>, details: SpliceDetails) -> Self {
        Self {
            id: id.into(),
            phase_status: BTreeMap::from([(Phase::Splicing, Status::NotStarted)]),
            details: UnitDetails::SplicePoint(details),
            version: 0,
        }
    }

    /// Returns the status of `phase`, or `None` when the unit does not track it.
    pub fn status(&self, phase: Phase) -> Option<Status> {
        self.phase_status.get(&phase).copied()
    }

    /// Returns true if the unit tracks `phase`.
    pub fn tracks(&self, phase: Phase) -> bool {
        self.phase_status.contains_key(&phase)
    }

    /// Builder-style status setter used when assembling snapshots.
    pub fn with_phase_status(mut self, phase: Phase, status: Status) -> Self {
        self.phase_status.insert(phase, status);
        self
    }

    /// Returns a new snapshot with `phase` set to `status` and the version bumped.
    ///
    /// This does not validate the change; see
    /// [`apply_status_change`](crate::workflow::apply_status_change).
    pub fn transitioned(&self, phase: Phase, status: Status) -> Self {
        let mut next = self.clone().with_phase_status(phase, status);
        next.version = self.version + 1;
        next
    }

    /// Segment details, if this unit is a segment.
    pub fn as_segment(&self) -> Option<&SegmentDetails> {
        match &self.details {
            UnitDetails::Segment(details) => Some(details),
            UnitDetails::SplicePoint(_) => None,
        }
    }

    /// Splice details, if this unit is a splice point.
    pub fn as_splice_point(&self) -> Option<&SpliceDetails> {
        match &self.details {
            UnitDetails::SplicePoint(details) => Some(details),
            UnitDetails::Segment(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_segment() -> WorkUnit {
        WorkUnit::segment(
            "SEG-001",
            SegmentDetails {
                footage: dec("500"),
                actual_footage: None,
                duct_count: Some(6),
                fiber_count: Some(288),
            },
        )
    }

    #[test]
    fn test_segment_tracks_boring_and_pulling_only() {
        let unit = sample_segment();
        assert!(unit.tracks(Phase::Boring));
        assert!(unit.tracks(Phase::Pulling));
        assert!(!unit.tracks(Phase::Splicing));
    }

    #[test]
    fn test_splice_point_tracks_splicing_only() {
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
        assert_eq!(unit.phase_status.len(), 1);
        assert_eq!(unit.status(Phase::Splicing), Some(Status::NotStarted));
    }

    #[test]
    fn test_transitioned_returns_new_snapshot_with_bumped_version() {
        let unit = sample_segment();
        let next = unit.transitioned(Phase::Boring, Status::InProgress);

        assert_eq!(unit.status(Phase::Boring), Some(Status::NotStarted));
        assert_eq!(unit.version, 0);
        assert_eq!(next.status(Phase::Boring), Some(Status::InProgress));
        assert_eq!(next.version, 1);
    }

    #[test]
    fn test_billable_bore_footage_prefers_actual() {
        let mut details = SegmentDetails {
            footage: dec("500"),
            actual_footage: None,
            duct_count: None,
            fiber_count: None,
        };
        assert_eq!(details.billable_bore_footage(), dec("500"));
        details.actual_footage = Some(dec("512.5"));
        assert_eq!(details.billable_bore_footage(), dec("512.5"));
    }

    #[test]
    fn test_unrecognised_splice_type_deserializes_to_unknown() {
        let splice_type: SpliceType = serde_json::from_str("\"1x16\"").unwrap();
        assert_eq!(splice_type, SpliceType::Unknown);
        let splice_type: SpliceType = serde_json::from_str("\"TYCO-D\"").unwrap();
        assert_eq!(splice_type, SpliceType::TycoD);
    }

    #[test]
    fn test_splice_type_from_str_ignores_case() {
        assert_eq!(SpliceType::from_str("tyco-d").unwrap(), SpliceType::TycoD);
        assert_eq!(SpliceType::from_str("f1").unwrap(), SpliceType::F1);
        assert_eq!(SpliceType::from_str("").unwrap(), SpliceType::Unknown);
    }

    #[test]
    fn test_deserialize_splice_point_without_type() {
        let json = r#"{
            "id": "SP-009",
            "phase_status": { "splicing": "In Progress" },
            "details": { "kind": "splice_point", "position": "end-of-line" }
        }"#;

        let unit: WorkUnit = serde_json::from_str(json).unwrap();
        let splice = unit.as_splice_point().unwrap();
        assert_eq!(splice.splice_type, SpliceType::Unknown);
        assert_eq!(splice.position, SplicePosition::EndOfLine);
        assert_eq!(unit.version, 0);
        assert_eq!(unit.status(Phase::Splicing), Some(Status::InProgress));
    }

    #[test]
    fn test_deserialize_segment() {
        let json = r#"{
            "id": "SEG-002",
            "phase_status": { "boring": "QC Approved", "pulling": "Not Started" },
            "details": { "kind": "segment", "footage": "420", "duct_count": 5 },
            "version": 7
        }"#;

        let unit: WorkUnit = serde_json::from_str(json).unwrap();
        let segment = unit.as_segment().unwrap();
        assert_eq!(segment.footage, dec("420"));
        assert_eq!(segment.duct_count, Some(5));
        assert_eq!(segment.fiber_count, None);
        assert_eq!(unit.version, 7);
        assert_eq!(unit.status(Phase::Boring), Some(Status::QcApproved));
    }
}

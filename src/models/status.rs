//! Phase and status vocabulary.
//!
//! This module defines the closed [`Phase`] and [`Status`] enums that the
//! workflow rules match on exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One of the three ordered construction stages.
///
/// # Example
///
/// ```
/// use fiber_workflow::models::Phase;
///
/// assert_eq!(Phase::parse(" Pulling "), Some(Phase::Pulling));
/// assert_eq!(Phase::Pulling.predecessor(), Some(Phase::Boring));
/// assert_eq!(Phase::parse("trenching"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Directional boring of the duct path.
    Boring,
    /// Pulling cable through the bored duct.
    Pulling,
    /// Splicing fibers at a splice point.
    Splicing,
}

impl Phase {
    /// All phases in workflow order.
    pub const ALL: [Phase; 3] = [Phase::Boring, Phase::Pulling, Phase::Splicing];

    /// Zero-based position of the phase in the workflow.
    pub const fn index(self) -> usize {
        match self {
            Phase::Boring => 0,
            Phase::Pulling => 1,
            Phase::Splicing => 2,
        }
    }

    /// The phase that must be QC approved before this one may begin.
    pub const fn predecessor(self) -> Option<Phase> {
        match self {
            Phase::Boring => None,
            Phase::Pulling => Some(Phase::Boring),
            Phase::Splicing => Some(Phase::Pulling),
        }
    }

    /// Returns the lowercase phase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Boring => "boring",
            Phase::Pulling => "pulling",
            Phase::Splicing => "splicing",
        }
    }

    /// Parses a phase name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for names outside the vocabulary so callers can degrade
    /// to an "Unknown phase" decision instead of failing.
    pub fn parse(name: &str) -> Option<Phase> {
        let name = name.trim();
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The status of a single phase of a work unit.
///
/// Serialized using the display names used on the job site
/// ("Not Started", "QC Approved", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Work has not begun.
    #[serde(rename = "Not Started", alias = "not_started")]
    NotStarted,
    /// Crew is actively working the phase.
    #[serde(rename = "In Progress", alias = "in_progress")]
    InProgress,
    /// Crew reports the phase done; awaiting QC.
    #[serde(rename = "Complete", alias = "complete")]
    Complete,
    /// QC signed off. Terminal.
    #[serde(rename = "QC Approved", alias = "qc_approved")]
    QcApproved,
    /// A problem was reported and must be resolved.
    #[serde(rename = "Issue", alias = "issue")]
    Issue,
    /// Work is held by an external dependency.
    #[serde(rename = "Blocked", alias = "blocked")]
    Blocked,
}

impl Status {
    /// All six statuses.
    pub const ALL: [Status; 6] = [
        Status::NotStarted,
        Status::InProgress,
        Status::Complete,
        Status::QcApproved,
        Status::Issue,
        Status::Blocked,
    ];

    /// Returns the display name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Complete => "Complete",
            Status::QcApproved => "QC Approved",
            Status::Issue => "Issue",
            Status::Blocked => "Blocked",
        }
    }

    /// Successors in the standard transition table shared by every phase.
    pub const fn standard_successors(self) -> &'static [Status] {
        match self {
            Status::NotStarted => &[Status::InProgress],
            Status::InProgress => &[Status::Complete, Status::Issue],
            Status::Complete => &[Status::QcApproved, Status::Issue],
            Status::Issue => &[Status::InProgress],
            Status::QcApproved | Status::Blocked => &[],
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let snake = wanted.to_ascii_lowercase().replace([' ', '-'], "_");
        Status::ALL
            .into_iter()
            .find(|status| {
                status.as_str() == wanted
                    || status.as_str().to_ascii_lowercase().replace(' ', "_") == snake
            })
            .ok_or_else(|| EngineError::UnknownStatus {
                value: s.to_string(),
            })
    }
}

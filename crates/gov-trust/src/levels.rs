//! The six-level graduated trust scale.
//!
//! Levels are ordinal: each grants a strictly broader set of execution
//! capabilities than the one below it. Trust only ever changes through
//! [`crate::TrustLadder::assign`] — there is no automatic promotion path.

use serde::{Deserialize, Serialize};

use crate::error::TrustError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TrustLevel {
    /// Read-only observation; no execution capability.
    Observer = 0,
    /// State monitoring and structured status signalling.
    Monitor = 1,
    /// Recommendation generation for human review.
    Suggest = 2,
    /// Action execution requiring explicit human approval.
    ActWithApproval = 3,
    /// Action execution with mandatory post-hoc reporting.
    ActAndReport = 4,
    /// Full autonomous execution within the assigned scope.
    Autonomous = 5,
}

/// Floor for decay and the level assumed for agents with no assignment.
pub const TRUST_LEVEL_MIN: TrustLevel = TrustLevel::Observer;
/// Ceiling of the scale.
pub const TRUST_LEVEL_MAX: TrustLevel = TrustLevel::Autonomous;

impl TrustLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Validate and convert a raw integer into a `TrustLevel`.
    pub fn from_i64(value: i64) -> Result<Self, TrustError> {
        match value {
            0 => Ok(Self::Observer),
            1 => Ok(Self::Monitor),
            2 => Ok(Self::Suggest),
            3 => Ok(Self::ActWithApproval),
            4 => Ok(Self::ActAndReport),
            5 => Ok(Self::Autonomous),
            other => Err(TrustError::InvalidTrustLevel(other)),
        }
    }

    /// Clamp an arbitrary signed delta to the valid [0, 5] range.
    pub fn clamp_from_i64(value: i64) -> Self {
        let clamped = value.clamp(TRUST_LEVEL_MIN.as_u8() as i64, TRUST_LEVEL_MAX.as_u8() as i64);
        Self::from_i64(clamped).expect("clamped value is always in range")
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Observer => "observer",
            Self::Monitor => "monitor",
            Self::Suggest => "suggest",
            Self::ActWithApproval => "act_with_approval",
            Self::ActAndReport => "act_and_report",
            Self::Autonomous => "autonomous",
        };
        write!(f, "{s}")
    }
}

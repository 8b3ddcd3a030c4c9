//! Rain lockout modifier
//!
//! Suppresses watering after measurable rain over the last three days.
//! The check abstains whenever one of the three daily totals is unknown.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WateringError;

/// Three-day rainfall (in) above which watering is locked out
pub const DEFAULT_LOCKOUT_THRESHOLD_IN: f64 = 0.01;

const MAX_SCALE: i32 = 200;

/// Outcome of the three-day rain check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutDecision {
    NoChange,
    Lockout,
}

/// How a lockout is applied to the computed result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockoutPolicy {
    /// Raise the restrict flag and leave the scale as computed
    #[default]
    Restrict,
    /// Force the scale to 0 and raise the restrict flag
    ForceZero,
}

impl fmt::Display for LockoutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockoutPolicy::Restrict => write!(f, "restrict"),
            LockoutPolicy::ForceZero => write!(f, "force_zero"),
        }
    }
}

impl FromStr for LockoutPolicy {
    type Err = WateringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(LockoutPolicy::Restrict),
            "force_zero" | "zero" => Ok(LockoutPolicy::ForceZero),
            other => Err(WateringError::config(format!(
                "Invalid lockout policy '{other}'. Must be one of: restrict, force_zero"
            ))),
        }
    }
}

/// Scale and restrict flag after the modifier ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutOutcome {
    pub scale: Option<i32>,
    pub restrict: bool,
}

impl LockoutPolicy {
    /// Apply a decision to a computed scale.
    ///
    /// `ForceZero` produces a scale of 0 even when no base method ran.
    #[must_use]
    pub fn apply(self, decision: LockoutDecision, scale: Option<i32>) -> LockoutOutcome {
        let scale = match (decision, self) {
            (LockoutDecision::Lockout, LockoutPolicy::ForceZero) => Some(0),
            _ => scale,
        };

        LockoutOutcome {
            scale: scale.map(|s| s.clamp(0, MAX_SCALE)),
            restrict: decision == LockoutDecision::Lockout,
        }
    }
}

/// Check the last three days of rain against the threshold
#[must_use]
pub fn evaluate_lockout(
    precip_today_in: Option<f64>,
    precip_yesterday_in: Option<f64>,
    precip_two_days_ago_in: Option<f64>,
    threshold_in: f64,
) -> LockoutDecision {
    match (precip_today_in, precip_yesterday_in, precip_two_days_ago_in) {
        (Some(today), Some(yesterday), Some(two_days_ago)) => {
            if today + yesterday + two_days_ago > threshold_in {
                LockoutDecision::Lockout
            } else {
                LockoutDecision::NoChange
            }
        }
        _ => LockoutDecision::NoChange,
    }
}

//! Warning/critical threshold resolution and classification

use super::result::CheckStatus;
use serde_json::Value;

/// Which side of a threshold counts as unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Escalate when the measured value is greater than or equal to the threshold.
    HigherIsWorse,
    /// Escalate when the measured value is strictly below the threshold.
    LowerIsWorse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy<T> {
    pub warning: T,
    pub critical: T,
    pub direction: Direction,
}

impl<T: PartialOrd + Copy> ThresholdPolicy<T> {
    pub fn higher_is_worse(warning: T, critical: T) -> Self {
        Self {
            warning,
            critical,
            direction: Direction::HigherIsWorse,
        }
    }

    pub fn lower_is_worse(warning: T, critical: T) -> Self {
        Self {
            warning,
            critical,
            direction: Direction::LowerIsWorse,
        }
    }

    /// Critical is tested first, so overlapping thresholds resolve to `Failed`.
    pub fn classify(&self, value: T) -> CheckStatus {
        if self.breaches(value, self.critical) {
            CheckStatus::Failed
        } else if self.breaches(value, self.warning) {
            CheckStatus::Warning
        } else {
            CheckStatus::Ok
        }
    }

    fn breaches(&self, value: T, threshold: T) -> bool {
        match self.direction {
            Direction::HigherIsWorse => value >= threshold,
            Direction::LowerIsWorse => value < threshold,
        }
    }
}

/// Reads a configuration value as a finite number strictly greater than zero.
///
/// Accepts JSON numbers and numeric strings with surrounding whitespace.
pub fn positive_number(raw: Option<&Value>) -> Option<f64> {
    let number = match raw? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if number.is_finite() && number > 0.0 {
        Some(number)
    } else {
        None
    }
}

pub fn resolve_rate_threshold(raw: Option<&Value>, default: f64) -> f64 {
    positive_number(raw).unwrap_or(default)
}

/// Integer thresholds truncate the override; a value that truncates to zero keeps the default.
pub fn resolve_count_threshold(raw: Option<&Value>, default: u64) -> u64 {
    positive_number(raw)
        .map(|n| n.trunc())
        .filter(|n| *n >= 1.0 && *n <= u64::MAX as f64)
        .map(|n| n as u64)
        .unwrap_or(default)
}

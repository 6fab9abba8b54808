use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metrics whose name starts with this prefix count toward the attack subtotal.
pub const ATTACK_PREFIX: &str = "A_";

/// Built-in metric catalogue with default weights.
pub const DEFAULT_WEIGHTS: [(&str, f64); 8] = [
    // Attack
    ("A_DUALS", 1.0),
    ("A_SHOTS", 1.1),
    ("A_DRIBBLES", 1.05),
    ("A_PROGRESSIVE_PASS", 1.1),
    // Defense
    ("D_DUALS", 1.15),
    ("D_BLOCKED_SHOT", 1.2),
    ("D_TRUNCATED_BALL", 1.1),
    ("D_PROGRESSIVE_PASS", 1.05),
];

/// Weight used for any metric missing from the weight table.
pub const FALLBACK_WEIGHT: f64 = 1.0;

/// Which subtotal a metric feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attack,
    Defense,
}

impl Side {
    /// Classify a metric by name. Purely syntactic: anything not prefixed
    /// with `A_` is defense, including names outside the default catalogue.
    pub fn of(metric: &str) -> Self {
        if metric.starts_with(ATTACK_PREFIX) {
            Side::Attack
        } else {
            Side::Defense
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Attack => write!(f, "attack"),
            Side::Defense => write!(f, "defense"),
        }
    }
}

/// Fresh copy of the default weight table.
pub fn default_weights() -> BTreeMap<String, f64> {
    DEFAULT_WEIGHTS
        .iter()
        .map(|(name, weight)| (name.to_string(), *weight))
        .collect()
}

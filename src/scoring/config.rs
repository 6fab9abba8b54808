use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metrics::default_weights;

pub const DEFAULT_FAIL_ALPHA: f64 = 0.55;
pub const DEFAULT_VOLUME_CAP: f64 = 2.0;

/// Main scoring configuration.
///
/// Every field is optional. A missing field falls back to the built-in
/// default when the calculator is constructed. A `weights` table, when given,
/// replaces the default table entirely: metrics it does not list score with
/// weight 1.0.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   fail_alpha: 0.55
///   volume_cap: 2.0
///   weights:
///     A_SHOTS: 1.1
///     D_DUALS: 1.15
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Per-metric weights (metric name -> weight)
    #[serde(default)]
    pub weights: Option<BTreeMap<String, f64>>,

    /// Penalty applied per failed attempt when computing the success rate
    #[serde(default)]
    pub fail_alpha: Option<f64>,

    /// Upper bound on the logarithmic volume factor
    #[serde(default)]
    pub volume_cap: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Some(default_weights()),
            fail_alpha: Some(DEFAULT_FAIL_ALPHA),
            volume_cap: Some(DEFAULT_VOLUME_CAP),
        }
    }
}

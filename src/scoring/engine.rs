use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::config::{ScoringConfig, DEFAULT_FAIL_ALPHA, DEFAULT_VOLUME_CAP};
use super::metrics::{default_weights, Side, FALLBACK_WEIGHT};

/// Attempt/success counters for one metric.
///
/// Counts are signed so that malformed input (negative counts,
/// `success > attempts`) still decodes and is absorbed by the formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(default)]
    pub attempts: i64,
    #[serde(default)]
    pub success: i64,
}

impl MetricRecord {
    pub fn new(attempts: i64, success: i64) -> Self {
        Self { attempts, success }
    }
}

/// Metric name -> counters. Ordered so breakdowns and sums are deterministic.
pub type ActionSet = BTreeMap<String, MetricRecord>;

/// A named action record, e.g. one player of a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerActions {
    pub name: String,
    #[serde(default)]
    pub actions: ActionSet,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub fai_attack: f64,
    pub fai_defense: f64,
    pub fai_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricContribution {
    pub metric: String,
    pub side: Side,
    pub attempts: i64,
    pub success: i64,
    pub p: f64,      // Clamped success rate
    pub volume: f64, // Capped ln(1 + attempts)
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub result: ScoreResult,
    pub metrics: Vec<MetricContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPlayer {
    pub name: String,
    #[serde(flatten)]
    pub result: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerBreakdown {
    pub name: String,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
}

/// Roster order: total descending, ties broken by name ascending.
fn rank_order(a_total: f64, a_name: &str, b_total: f64, b_name: &str) -> Ordering {
    b_total
        .partial_cmp(&a_total)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_name.cmp(b_name))
}

/// Computes FAEI scores from action records.
///
/// Configuration is owned by the instance and never changes after
/// construction, so a calculator can be shared across threads freely.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCalculator {
    weights: BTreeMap<String, f64>,
    fail_alpha: f64,
    volume_cap: f64,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(None, DEFAULT_FAIL_ALPHA, DEFAULT_VOLUME_CAP)
    }
}

impl ScoreCalculator {
    /// Create a calculator. `None` weights means the built-in table.
    ///
    /// No validation happens here: odd values (zero or negative weights,
    /// negative `fail_alpha`, non-positive `volume_cap`) are kept as given.
    pub fn new(weights: Option<BTreeMap<String, f64>>, fail_alpha: f64, volume_cap: f64) -> Self {
        Self {
            weights: weights.unwrap_or_else(default_weights),
            fail_alpha,
            volume_cap,
        }
    }

    /// Build from a (possibly partial) scoring config, filling gaps with defaults.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(
            config.weights.clone(),
            config.fail_alpha.unwrap_or(DEFAULT_FAIL_ALPHA),
            config.volume_cap.unwrap_or(DEFAULT_VOLUME_CAP),
        )
    }

    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    pub fn fail_alpha(&self) -> f64 {
        self.fail_alpha
    }

    pub fn volume_cap(&self) -> f64 {
        self.volume_cap
    }

    /// Weight for a metric, falling back to 1.0 for metrics not in the table.
    pub fn weight_for(&self, metric: &str) -> f64 {
        self.weights.get(metric).copied().unwrap_or(FALLBACK_WEIGHT)
    }

    /// Contribution of a single metric: `p * volume * weight`.
    pub fn contribution(&self, metric: &str, attempts: i64, success: i64) -> f64 {
        self.evaluate(metric, MetricRecord::new(attempts, success))
            .contribution
    }

    fn evaluate(&self, metric: &str, record: MetricRecord) -> MetricContribution {
        let side = Side::of(metric);
        let weight = self.weight_for(metric);

        if record.attempts <= 0 {
            return MetricContribution {
                metric: metric.to_string(),
                side,
                attempts: record.attempts,
                success: record.success,
                p: 0.0,
                volume: 0.0,
                weight,
                contribution: 0.0,
            };
        }

        let attempts = record.attempts as f64;
        let success = record.success as f64;

        // Negative when success > attempts
        let fails = attempts - success;
        let raw_p = (success - self.fail_alpha * fails) / attempts;
        let p = raw_p.min(1.0).max(0.0);

        let volume = (1.0 + attempts).ln().min(self.volume_cap);

        MetricContribution {
            metric: metric.to_string(),
            side,
            attempts: record.attempts,
            success: record.success,
            p,
            volume,
            weight,
            contribution: p * volume * weight,
        }
    }

    /// Score an action record.
    pub fn calc(&self, actions: &ActionSet) -> ScoreResult {
        self.calc_detailed(actions).result
    }

    /// Score an action record and keep the per-metric contributions.
    pub fn calc_detailed(&self, actions: &ActionSet) -> ScoreBreakdown {
        let mut fai_attack = 0.0;
        let mut fai_defense = 0.0;
        let mut metrics = Vec::with_capacity(actions.len());

        for (metric, record) in actions {
            let entry = self.evaluate(metric, *record);
            tracing::debug!(
                metric = %entry.metric,
                side = %entry.side,
                p = entry.p,
                volume = entry.volume,
                weight = entry.weight,
                contribution = entry.contribution,
                "metric scored"
            );

            match entry.side {
                Side::Attack => fai_attack += entry.contribution,
                Side::Defense => fai_defense += entry.contribution,
            }
            metrics.push(entry);
        }

        // Total is rounded from the raw sum, not from the rounded subtotals
        let result = ScoreResult {
            fai_attack: round3(fai_attack),
            fai_defense: round3(fai_defense),
            fai_total: round3(fai_attack + fai_defense),
        };

        ScoreBreakdown { result, metrics }
    }

    /// Score every player and rank by total (descending), then name.
    pub fn calc_roster(&self, players: &[PlayerActions]) -> Vec<ScoredPlayer> {
        let mut scored: Vec<ScoredPlayer> = players
            .iter()
            .map(|player| ScoredPlayer {
                name: player.name.clone(),
                result: self.calc(&player.actions),
            })
            .collect();

        scored.sort_by(|a, b| rank_order(a.result.fai_total, &a.name, b.result.fai_total, &b.name));
        scored
    }

    /// Like `calc_roster`, keeping each player's per-metric contributions.
    pub fn calc_roster_detailed(&self, players: &[PlayerActions]) -> Vec<PlayerBreakdown> {
        let mut detailed: Vec<PlayerBreakdown> = players
            .iter()
            .map(|player| PlayerBreakdown {
                name: player.name.clone(),
                breakdown: self.calc_detailed(&player.actions),
            })
            .collect();

        detailed.sort_by(|a, b| {
            rank_order(
                a.breakdown.result.fai_total,
                &a.name,
                b.breakdown.result.fai_total,
                &b.name,
            )
        });
        detailed
    }
}

/// Round the exact stored value to 3 decimal places.
///
/// 1.0005 is stored just below the tie and rounds to 1.0, not 1.001.
pub fn round3(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}

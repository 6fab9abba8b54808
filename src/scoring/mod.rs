pub mod config;
pub mod engine;
pub mod metrics;
pub mod validation;

pub use config::*;
pub use engine::{
    round3, ActionSet, MetricContribution, MetricRecord, PlayerActions, PlayerBreakdown,
    ScoreBreakdown, ScoreCalculator, ScoreResult, ScoredPlayer,
};
pub use metrics::{default_weights, Side, ATTACK_PREFIX, DEFAULT_WEIGHTS, FALLBACK_WEIGHT};
pub use validation::{check_actions, validate_scoring};

use super::config::ScoringConfig;
use super::engine::ActionSet;
use super::metrics::DEFAULT_WEIGHTS;

/// Check a scoring configuration for values that are accepted but probably
/// unintended. Returns every finding at once (not just the first).
///
/// The calculator never rejects these; callers decide whether to warn.
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(alpha) = config.fail_alpha {
        if !alpha.is_finite() {
            errors.push("scoring.fail_alpha: must be a finite number".to_string());
        } else if alpha < 0.0 {
            errors.push(format!(
                "scoring.fail_alpha: {} is negative, failures will raise the success rate",
                alpha
            ));
        }
    }

    if let Some(cap) = config.volume_cap {
        if !cap.is_finite() {
            errors.push("scoring.volume_cap: must be a finite number".to_string());
        } else if cap <= 0.0 {
            errors.push(format!(
                "scoring.volume_cap: {} is not positive, every contribution will be <= 0",
                cap
            ));
        }
    }

    if let Some(ref weights) = config.weights {
        for (metric, weight) in weights {
            if !weight.is_finite() {
                errors.push(format!("scoring.weights.{}: must be a finite number", metric));
            } else if *weight <= 0.0 {
                errors.push(format!(
                    "scoring.weights.{}: {} is not positive",
                    metric, weight
                ));
            }
        }

        let missing: Vec<&str> = DEFAULT_WEIGHTS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| !weights.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            errors.push(format!(
                "scoring.weights: no weight for {} (falls back to 1.0)",
                missing.join(", ")
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check an action record for counters the formula will clamp or ignore.
pub fn check_actions(actions: &ActionSet) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (metric, record) in actions {
        if record.attempts < 0 {
            errors.push(format!("{}: negative attempts ({})", metric, record.attempts));
        }
        if record.success < 0 {
            errors.push(format!("{}: negative success ({})", metric, record.success));
        }
        if record.success > record.attempts {
            errors.push(format!(
                "{}: success ({}) exceeds attempts ({})",
                metric, record.success, record.attempts
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

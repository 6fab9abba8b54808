use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{ScoreBreakdown, ScoreCalculator, ScoreResult, ScoredPlayer, Side};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with the three decimals it is rounded to
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

/// Format a score result as three labelled lines
pub fn format_result(result: &ScoreResult, use_colors: bool) -> String {
    let rows = [
        ("Attack", result.fai_attack),
        ("Defense", result.fai_defense),
        ("Total", result.fai_total),
    ];

    rows.iter()
        .map(|(label, value)| {
            let label = format!("{:<8}", label);
            let value = format!("{:>8}", format_score(*value));
            if use_colors && label.starts_with("Total") {
                format!("{}{}", label.bold(), value.bold())
            } else if use_colors {
                format!("{}{}", label.dimmed(), value)
            } else {
                format!("{}{}", label, value)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format per-metric contributions followed by the result
/// One line per metric: name, side, success/attempts, p, volume, weight, contribution
pub fn format_breakdown(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    if breakdown.metrics.is_empty() {
        return format!("No actions recorded.\n\n{}", format_result(&breakdown.result, use_colors));
    }

    let name_width = breakdown
        .metrics
        .iter()
        .map(|m| m.metric.chars().count())
        .max()
        .unwrap_or(0);

    let lines: Vec<String> = breakdown
        .metrics
        .iter()
        .map(|m| {
            let name = format!("{:<width$}", m.metric, width = name_width);
            let side = format!("{:<7}", m.side.to_string());
            let detail = format!(
                "{:>4}/{:<4} p={:.3} vol={:.3} w={:.2}",
                m.success, m.attempts, m.p, m.volume, m.weight
            );
            let contribution = format!("{:>8.3}", m.contribution);

            if use_colors {
                let side = match m.side {
                    Side::Attack => side.red().to_string(),
                    Side::Defense => side.blue().to_string(),
                };
                format!("{}  {}  {}  {}", name.bold(), side, detail.dimmed(), contribution)
            } else {
                format!("{}  {}  {}  {}", name, side, detail, contribution)
            }
        })
        .collect();

    format!("{}\n\n{}", lines.join("\n"), format_result(&breakdown.result, use_colors))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a ranked roster with columns: Index, Total, Attack, Defense, Name
/// Numeric columns are right-aligned, 8 chars wide
pub fn format_roster_table(players: &[ScoredPlayer], use_colors: bool) -> String {
    if players.is_empty() {
        return "No players found.".to_string();
    }

    let term_width = get_terminal_width();

    // Index: 3 chars + 1 space, three score columns of 8 chars + 2 spaces each
    let index_width = 3;
    let score_width = 8;
    let separator = "  ";
    let fixed_width = index_width + 1 + (score_width + separator.len()) * 3;

    players
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            let index_str = format!("{:>2}.", idx + 1);
            let total = format!("{:>width$}", format_score(player.result.fai_total), width = score_width);
            let attack = format!("{:>width$}", format_score(player.result.fai_attack), width = score_width);
            let defense = format!("{:>width$}", format_score(player.result.fai_defense), width = score_width);

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&player.name, width - fixed_width),
                Some(_) => truncate_name(&player.name, 20),
                None => player.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    total.bold(),
                    separator,
                    attack.red(),
                    separator,
                    defense.blue(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, total, separator, attack, separator, defense, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the effective weight table and scalar parameters
pub fn format_weights(calc: &ScoreCalculator, use_colors: bool) -> String {
    let name_width = calc
        .weights()
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = calc
        .weights()
        .iter()
        .map(|(metric, weight)| {
            let name = format!("{:<width$}", metric, width = name_width);
            let side = format!("{:<7}", Side::of(metric).to_string());
            if use_colors {
                format!("{}  {}  {:.2}", name.bold(), side.dimmed(), weight)
            } else {
                format!("{}  {}  {:.2}", name, side, weight)
            }
        })
        .collect();

    lines.push(String::new());
    lines.push(format!("fail_alpha  {}", calc.fail_alpha()));
    lines.push(format!("volume_cap  {}", calc.volume_cap()));
    lines.push("unlisted metrics weigh 1.00".to_string());
    lines.join("\n")
}

/// Serialize any result shape as pretty JSON
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ActionSet, MetricRecord};

    fn sample_actions() -> ActionSet {
        let mut actions = ActionSet::new();
        actions.insert("A_SHOTS".to_string(), MetricRecord::new(6, 3));
        actions.insert("D_DUALS".to_string(), MetricRecord::new(4, 3));
        actions
    }

    #[test]
    fn test_format_score_three_decimals() {
        assert_eq!(format_score(0.482), "0.482");
        assert_eq!(format_score(0.0), "0.000");
        assert_eq!(format_score(1.5), "1.500");
    }

    #[test]
    fn test_format_result_plain() {
        let result = ScoreResult { fai_attack: 0.482, fai_defense: 1.134, fai_total: 1.616 };
        let output = format_result(&result, false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Attack"));
        assert!(lines[0].ends_with("0.482"));
        assert!(lines[1].ends_with("1.134"));
        assert!(lines[2].starts_with("Total"));
        assert!(lines[2].ends_with("1.616"));
    }

    #[test]
    fn test_format_breakdown_plain() {
        let calc = ScoreCalculator::default();
        let breakdown = calc.calc_detailed(&sample_actions());
        let output = format_breakdown(&breakdown, false);

        assert!(output.contains("A_SHOTS  attack"));
        assert!(output.contains("D_DUALS  defense"));
        assert!(output.contains("p=0.225"));
        assert!(output.contains("w=1.15"));
        assert!(output.contains("   0.482"));
    }

    #[test]
    fn test_format_breakdown_empty() {
        let calc = ScoreCalculator::default();
        let breakdown = calc.calc_detailed(&ActionSet::new());
        let output = format_breakdown(&breakdown, false);
        assert!(output.starts_with("No actions recorded."));
        assert!(output.contains("0.000"));
    }

    #[test]
    fn test_format_roster_empty() {
        assert_eq!(format_roster_table(&[], false), "No players found.");
    }

    #[test]
    fn test_format_roster_table_plain() {
        let players = vec![
            ScoredPlayer {
                name: "Pito".to_string(),
                result: ScoreResult { fai_attack: 0.482, fai_defense: 1.134, fai_total: 1.616 },
            },
            ScoredPlayer {
                name: "Ferrao".to_string(),
                result: ScoreResult { fai_attack: 0.482, fai_defense: 0.0, fai_total: 0.482 },
            },
        ];
        let output = format_roster_table(&players, false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1.    1.616"));
        assert!(lines[0].contains("Pito"));
        assert!(lines[1].starts_with(" 2.    0.482"));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Ricardinho", 20), "Ricardinho");
        assert_eq!(truncate_name("Ricardinho", 7), "Rica...");
        assert_eq!(truncate_name("Ricardinho", 2), "Ri");
    }

    #[test]
    fn test_format_weights_plain() {
        let calc = ScoreCalculator::default();
        let output = format_weights(&calc, false);
        assert!(output.contains("A_SHOTS             attack   1.10"));
        assert!(output.contains("D_BLOCKED_SHOT      defense  1.20"));
        assert!(output.contains("fail_alpha  0.55"));
        assert!(output.contains("volume_cap  2"));
    }

    #[test]
    fn test_format_json_result() {
        let calc = ScoreCalculator::default();
        let result = calc.calc(&sample_actions());
        let json = format_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["fai_attack"], 0.482);
        assert_eq!(value["fai_defense"], 1.134);
    }

    #[test]
    fn test_format_json_roster_flattens_result() {
        let players = vec![ScoredPlayer {
            name: "Pito".to_string(),
            result: ScoreResult { fai_attack: 0.5, fai_defense: 0.25, fai_total: 0.75 },
        }];
        let json = format_json(&players).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "Pito");
        assert_eq!(value[0]["fai_total"], 0.75);
    }
}

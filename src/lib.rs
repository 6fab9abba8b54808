pub mod config;
pub mod input;
pub mod output;
pub mod scoring;

pub use scoring::{ScoreCalculator, ScoreResult};

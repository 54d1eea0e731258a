use std::path::PathBuf;

use clap::Parser;

use crate::error::SetupError;
use crate::scores::HighScores;

pub const DEFAULT_TICK_MS: u64 = 50;
const MAX_TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Parser)]
#[command(name = "galaga-tui", version, about = "A Galaga-style arcade shooter for the terminal")]
pub struct Config {
    /// Milliseconds per game tick
    #[arg(long = "tick-ms", env = "GALAGA_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// High-score file (defaults to galaga.scores next to the executable)
    #[arg(long, env = "GALAGA_SCORES")]
    pub scores: Option<PathBuf>,

    /// Seed for reproducible rounds
    #[arg(long, env = "GALAGA_SEED")]
    pub seed: Option<u64>,

    /// Write logs to this file; logging is off without it
    #[arg(long = "log-file", env = "GALAGA_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            scores: None,
            seed: None,
            log_file: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.tick_ms == 0 || self.tick_ms > MAX_TICK_MS {
            return Err(SetupError::InvalidTickRate {
                tick_ms: self.tick_ms,
            });
        }
        Ok(())
    }

    pub fn scores_path(&self) -> PathBuf {
        self.scores.clone().unwrap_or_else(HighScores::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::try_parse_from(["galaga-tui"]).unwrap();
        assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "galaga-tui",
            "--tick-ms",
            "40",
            "--scores",
            "/tmp/x.scores",
            "--seed",
            "9",
        ])
        .unwrap();
        assert_eq!(config.tick_ms, 40);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.scores_path(), PathBuf::from("/tmp/x.scores"));
    }

    #[test]
    fn tick_rate_is_bounded() {
        let config = Config {
            tick_ms: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(SetupError::InvalidTickRate { tick_ms: 0 })
        );
        let config = Config {
            tick_ms: 5000,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}

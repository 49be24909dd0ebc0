use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use scramble_text::{Alphabet, PeriodMode, ScrambleConfig};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::types::TextSource;

const DEFAULT_TEXT: &str = "DECRYPTING";

#[derive(Parser, Debug)]
#[command(name = "scramble")]
#[command(about = "Terminal demo of a per-character text scramble effect")]
pub struct Cli {
    /// Text to scramble
    #[arg(long, conflicts_with = "labels")]
    pub text: Option<String>,

    /// File with one label per line; F5 cycles through them
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Seed for a reproducible animation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Shortest timer period in milliseconds
    #[arg(long, default_value_t = 100)]
    pub min_period_ms: u64,

    /// Random extra period in milliseconds, added on top of the minimum
    #[arg(long, default_value_t = 200)]
    pub jitter_ms: u64,

    /// Probability that a firing shows the true character
    #[arg(long, default_value_t = 0.6)]
    pub reveal: f64,

    /// Substitute characters used to obscure cells
    #[arg(long)]
    pub alphabet: Option<String>,

    /// Start delay added per character index, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub stagger_ms: u64,

    /// Re-sample each timer's period after every firing
    #[arg(long)]
    pub resample: bool,

    /// Start with the effect switched off
    #[arg(long)]
    pub idle: bool,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn scramble_config(&self) -> Result<ScrambleConfig> {
        let alphabet = match &self.alphabet {
            Some(glyphs) => Alphabet::new(glyphs)?,
            None => Alphabet::default(),
        };
        let period_mode = if self.resample {
            PeriodMode::PerFiring
        } else {
            PeriodMode::Fixed
        };

        let config = ScrambleConfig::default()
            .with_min_period(Duration::from_millis(self.min_period_ms))
            .with_period_jitter(Duration::from_millis(self.jitter_ms))
            .with_reveal_probability(self.reveal)
            .with_stagger(Duration::from_millis(self.stagger_ms))
            .with_period_mode(period_mode)
            .with_alphabet(alphabet);
        config.validate()?;

        Ok(config)
    }

    pub fn text_source(&self) -> Result<TextSource> {
        if let Some(path) = &self.labels {
            let labels = load_labels_from_file(path)?;
            if labels.is_empty() {
                anyhow::bail!("no labels found in {}", path.display());
            }

            return Ok(TextSource::Labels(labels));
        }

        let text = self.text.clone().unwrap_or_else(|| DEFAULT_TEXT.to_string());
        Ok(TextSource::Fixed(text))
    }
}

pub fn load_labels_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read labels file at {}", path.display()))?;

    Ok(parse_labels(&content))
}

pub fn parse_labels(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Installs the tracing subscriber. Without a log file no output layer is
/// attached, since anything written to stdout/stderr would corrupt the TUI.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(env_filter).init();
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file at {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();
    tracing::info!(path = %path.display(), "logging initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_skip_blank_lines_and_trim() {
        let labels = parse_labels("  ALPHA \n\n\tBETA\r\n   \nGAMMA");
        assert_eq!(labels, vec!["ALPHA", "BETA", "GAMMA"]);
    }

    #[test]
    fn cli_defaults_build_default_config() {
        let cli = Cli::parse_from(["scramble"]);
        let config = cli.scramble_config().unwrap();
        assert_eq!(config, ScrambleConfig::default());
        assert!(matches!(cli.text_source().unwrap(), TextSource::Fixed(t) if t == DEFAULT_TEXT));
    }

    #[test]
    fn cli_flags_map_onto_config() {
        let cli = Cli::parse_from([
            "scramble",
            "--min-period-ms",
            "50",
            "--jitter-ms",
            "10",
            "--reveal",
            "0.9",
            "--alphabet",
            "01",
            "--stagger-ms",
            "100",
            "--resample",
        ]);
        let config = cli.scramble_config().unwrap();

        assert_eq!(config.min_period, Duration::from_millis(50));
        assert_eq!(config.period_jitter, Duration::from_millis(10));
        assert_eq!(config.reveal_probability, 0.9);
        assert_eq!(config.alphabet.as_slice(), &['0', '1']);
        assert_eq!(config.stagger, Duration::from_millis(100));
        assert_eq!(config.period_mode, PeriodMode::PerFiring);
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let cli = Cli::parse_from(["scramble", "--reveal", "2"]);
        assert!(cli.scramble_config().is_err());

        let cli = Cli::parse_from(["scramble", "--min-period-ms", "0"]);
        assert!(cli.scramble_config().is_err());
    }
}

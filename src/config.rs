//! Tuning knobs for [`ScrambleEngine`](crate::engine::ScrambleEngine).

use std::time::Duration;

use rand::Rng;

use crate::{alphabet::Alphabet, error::ConfigError};

pub const DEFAULT_MIN_PERIOD: Duration = Duration::from_millis(100);
pub const DEFAULT_PERIOD_JITTER: Duration = Duration::from_millis(200);
pub const DEFAULT_REVEAL_PROBABILITY: f64 = 0.6;

/// When a character's timer period is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodMode {
    /// Once per character when the activation cycle starts.
    #[default]
    Fixed,
    /// Again after every firing.
    PerFiring,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrambleConfig {
    pub min_period: Duration,
    pub period_jitter: Duration,
    pub reveal_probability: f64,
    pub period_mode: PeriodMode,
    /// Extra delay before the first firing, multiplied by the character index.
    pub stagger: Duration,
    pub alphabet: Alphabet,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            min_period: DEFAULT_MIN_PERIOD,
            period_jitter: DEFAULT_PERIOD_JITTER,
            reveal_probability: DEFAULT_REVEAL_PROBABILITY,
            period_mode: PeriodMode::default(),
            stagger: Duration::ZERO,
            alphabet: Alphabet::default(),
        }
    }
}

impl ScrambleConfig {
    pub fn with_min_period(mut self, period: Duration) -> Self {
        self.min_period = period;
        self
    }

    pub fn with_period_jitter(mut self, jitter: Duration) -> Self {
        self.period_jitter = jitter;
        self
    }

    pub fn with_reveal_probability(mut self, probability: f64) -> Self {
        self.reveal_probability = probability;
        self
    }

    pub fn with_period_mode(mut self, mode: PeriodMode) -> Self {
        self.period_mode = mode;
        self
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }

        if !(0.0..=1.0).contains(&self.reveal_probability) {
            return Err(ConfigError::RevealProbability(self.reveal_probability));
        }

        Ok(())
    }

    /// Longest period a timer can be given.
    pub fn max_period(&self) -> Duration {
        self.min_period
            .saturating_add(Duration::from_millis(self.jitter_ms()))
    }

    /// Samples one timer period from `[min_period, max_period]` at millisecond
    /// granularity.
    pub fn sample_period<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let jitter_ms = self.jitter_ms();
        if jitter_ms == 0 {
            return self.min_period;
        }

        self.min_period
            .saturating_add(Duration::from_millis(rng.random_range(0..=jitter_ms)))
    }

    /// Start offset for the character at `index`.
    pub fn start_delay(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.stagger.saturating_mul(index)
    }

    fn jitter_ms(&self) -> u64 {
        u64::try_from(self.period_jitter.as_millis()).unwrap_or(u64::MAX)
    }
}

//! Per-character scramble animation.
//!
//! Every character of the source text owns a repeating timer. On each firing
//! the cell either reveals its true character or shows a random member of the
//! [`Alphabet`](crate::alphabet::Alphabet). The timers are not real OS
//! timers: one [`Cycle`] keeps them in a min-heap keyed by due time, and the
//! host drives the engine with [`ScrambleEngine::advance`]. Dropping the
//! cycle cancels every pending firing at once.
//!
//! ```
//! use std::time::Duration;
//! use scramble_text::{ScrambleConfig, ScrambleEngine};
//!
//! let mut engine = ScrambleEngine::seeded(ScrambleConfig::default(), 42).unwrap();
//! engine.render("ABC", true);
//! engine.advance(Duration::from_millis(500));
//! assert_eq!(engine.display().len(), 3);
//!
//! assert_eq!(engine.render("ABC", false), "ABC");
//! assert_eq!(engine.pending_timers(), 0);
//! ```

use std::{cmp::Reverse, collections::BinaryHeap, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::{
    config::{PeriodMode, ScrambleConfig},
    error::ConfigError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Inactive, or active over empty text. Display equals source.
    Idle,
    /// One activation cycle is running.
    Scrambling,
}

/// What a single timer firing wrote into its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Reveal,
    Obscure(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub idx: usize,
    pub at: Duration,
    pub outcome: Outcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Firing {
    due: Duration,
    idx: usize,
    period: Duration,
}

/// Owning handle for one activation cycle.
#[derive(Debug)]
struct Cycle {
    generation: u64,
    queue: BinaryHeap<Reverse<Firing>>,
}

impl Cycle {
    fn start<R: Rng + ?Sized>(
        generation: u64,
        now: Duration,
        len: usize,
        config: &ScrambleConfig,
        rng: &mut R,
    ) -> Self {
        let queue = (0..len)
            .map(|idx| {
                let period = config.sample_period(rng);
                Reverse(Firing {
                    due: now
                        .saturating_add(config.start_delay(idx))
                        .saturating_add(period),
                    idx,
                    period,
                })
            })
            .collect();

        Self { generation, queue }
    }

    fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(firing)| firing.due)
    }

    fn cancel(self, reason: &'static str) {
        debug!(
            generation = self.generation,
            pending = self.queue.len(),
            reason,
            "scramble cycle cancelled"
        );
    }
}

pub struct ScrambleEngine<R = StdRng> {
    config: ScrambleConfig,
    rng: R,
    source: Vec<char>,
    display: Vec<char>,
    active: bool,
    now: Duration,
    generation: u64,
    cycle: Option<Cycle>,
}

impl ScrambleEngine<StdRng> {
    /// Engine seeded from the operating system.
    pub fn new(config: ScrambleConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Engine with a reproducible random sequence.
    pub fn seeded(config: ScrambleConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ScrambleEngine<R> {
    pub fn with_rng(config: ScrambleConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            rng,
            source: Vec::new(),
            display: Vec::new(),
            active: false,
            now: Duration::ZERO,
            generation: 0,
            cycle: None,
        })
    }

    /// Syncs both inputs and returns what should be shown right now.
    pub fn render(&mut self, text: &str, is_active: bool) -> String {
        self.set_text(text);
        self.set_active(is_active);
        self.display_string()
    }

    pub fn set_text(&mut self, text: &str) {
        if self.source.iter().copied().eq(text.chars()) {
            return;
        }

        self.cancel_cycle("text changed");
        self.source = text.chars().collect();
        self.settle();

        if self.active {
            self.start_cycle();
        }
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }

        self.active = active;
        if active {
            self.start_cycle();
        } else {
            self.cancel_cycle("deactivated");
            self.settle();
        }
    }

    /// Moves the clock forward by `delta`, applying every firing that falls
    /// due. Each timer fires at most once per call: periods that elapsed
    /// entirely inside `delta` are skipped, not replayed. Returns how many
    /// firings ran.
    pub fn advance(&mut self, delta: Duration) -> usize {
        let target = self.now.saturating_add(delta);
        let mut fired = 0;

        while self.fire_due(Some(target)).is_some() {
            fired += 1;
        }

        self.now = target;
        fired
    }

    /// Jumps the clock to the earliest pending firing and applies it.
    pub fn fire_next(&mut self) -> Option<Fired> {
        self.fire_due(None)
    }

    fn fire_due(&mut self, horizon: Option<Duration>) -> Option<Fired> {
        let Self {
            config,
            rng,
            source,
            display,
            now,
            cycle,
            ..
        } = self;

        let cycle = cycle.as_mut()?;
        let due = cycle.next_due()?;
        if horizon.is_some_and(|horizon| due > horizon) {
            return None;
        }

        let Reverse(firing) = cycle.queue.pop()?;
        *now = (*now).max(firing.due);

        let outcome = if rng.random_bool(config.reveal_probability) {
            display[firing.idx] = source[firing.idx];
            Outcome::Reveal
        } else {
            let ch = config.alphabet.pick(rng);
            display[firing.idx] = ch;
            Outcome::Obscure(ch)
        };

        let period = match config.period_mode {
            PeriodMode::Fixed => firing.period,
            PeriodMode::PerFiring => config.sample_period(rng),
        };
        match next_due_after(firing.due, period, horizon.unwrap_or(firing.due)) {
            Some(due) => cycle.queue.push(Reverse(Firing {
                due,
                idx: firing.idx,
                period,
            })),
            None => debug!(
                generation = cycle.generation,
                idx = firing.idx,
                "scramble timer reached the end of the clock"
            ),
        }

        trace!(idx = firing.idx, ?outcome, "scramble timer fired");

        Some(Fired {
            idx: firing.idx,
            at: firing.due,
            outcome,
        })
    }

    /// Cancels the current cycle and settles the display.
    pub fn teardown(&mut self) {
        self.cancel_cycle("teardown");
        self.settle();
    }

    pub fn display(&self) -> &[char] {
        &self.display
    }

    pub fn display_string(&self) -> String {
        self.display.iter().collect()
    }

    pub fn source(&self) -> &[char] {
        &self.source
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> EngineState {
        if self.cycle.is_some() {
            EngineState::Scrambling
        } else {
            EngineState::Idle
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.cycle.as_ref().map_or(0, |cycle| cycle.queue.len())
    }

    /// Number of activation cycles started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn elapsed(&self) -> Duration {
        self.now
    }

    pub fn config(&self) -> &ScrambleConfig {
        &self.config
    }

    fn start_cycle(&mut self) {
        self.cancel_cycle("restart");
        if self.source.is_empty() {
            return;
        }

        self.generation += 1;
        let cycle = Cycle::start(
            self.generation,
            self.now,
            self.source.len(),
            &self.config,
            &mut self.rng,
        );
        debug!(
            generation = self.generation,
            timers = cycle.queue.len(),
            "scramble cycle started"
        );
        self.cycle = Some(cycle);
    }

    fn cancel_cycle(&mut self, reason: &'static str) {
        if let Some(cycle) = self.cycle.take() {
            cycle.cancel(reason);
        }
    }

    fn settle(&mut self) {
        self.display.clone_from(&self.source);
    }
}

/// First `due + k * period` (k >= 1) strictly after `horizon`, or `None`
/// once that lies past the end of the clock.
fn next_due_after(due: Duration, period: Duration, horizon: Duration) -> Option<Duration> {
    let mut next = due.saturating_add(period);
    if next <= horizon {
        let missed = (horizon - next).as_nanos() / period.as_nanos() + 1;
        next = next.saturating_add(duration_from_nanos(
            period.as_nanos().saturating_mul(missed),
        ));
    }

    (next > horizon).then_some(next)
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

impl<R> Drop for ScrambleEngine<R> {
    fn drop(&mut self) {
        if let Some(cycle) = self.cycle.take() {
            cycle.cancel("dropped");
        }
    }
}

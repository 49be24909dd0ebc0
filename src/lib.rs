//! Animated "decoding" text: each character flickers between its true value
//! and random substitutes until the effect is switched off.

pub mod alphabet;
pub mod config;
pub mod engine;
pub mod error;
pub mod widget;

pub use alphabet::Alphabet;
pub use config::{PeriodMode, ScrambleConfig};
pub use engine::{EngineState, Fired, Outcome, ScrambleEngine};
pub use error::ConfigError;
pub use widget::ScrambleText;

//! Core configuration for folio-motion-core.

use serde::{Deserialize, Serialize};

use crate::interp::Easing;

/// Configuration shared by every scope created from it.
/// Keep this minimal; new knobs get a serde default so old JSON keeps loading.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Viewport fraction used when a trigger does not name a start boundary
    /// (0.8 = "element top crosses 80% of viewport height").
    pub default_trigger_start: f32,

    /// Maximum events retained in a scope's pending outputs before older
    /// events are dropped. Changes are never dropped.
    pub max_pending_events: usize,

    pub progress: ProgressConfig,
}

/// Progress simulator parameters. Defaults mirror the loading screen of
/// the portfolio: 150 ms ticks, up to 15% per tick, 500 ms settle.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub interval_ms: u64,
    /// Smallest increment per tick; must be > 0 so the run terminates.
    pub min_increment: f32,
    pub max_increment: f32,
    /// Delay between reaching 100 and firing the completion callback.
    pub settle_ms: u64,
    /// Seconds the displayed bar takes to converge on a new value.
    pub bar_smoothing: f32,
    pub bar_easing: Easing,
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_trigger_start: 0.8,
            max_pending_events: 1024,
            progress: ProgressConfig::default(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            interval_ms: 150,
            min_increment: 1.0,
            max_increment: 15.0,
            settle_ms: 500,
            bar_smoothing: 0.3,
            bar_easing: Easing::PowerOut(2),
            seed: None,
        }
    }
}

use std::env;
use std::time::Duration;

use crate::search::Strategy;

const DEFAULT_WIDTH: usize = 40;
const DEFAULT_HEIGHT: usize = 30;
const DEFAULT_FPS: u64 = 30;
const DEFAULT_OBSTACLE_DIVISOR: usize = 5;
/// Largest accepted side; keeps terminal coordinates well inside `u16`.
pub const MAX_SIDE: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub fps: u64,
    /// One obstacle placement per this many cells.
    pub obstacle_divisor: usize,
    pub seed: Option<u64>,
    pub strategy: Strategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            obstacle_divisor: DEFAULT_OBSTACLE_DIVISOR,
            seed: None,
            strategy: Strategy::ShortestPath,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from a key lookup, keeping the default for anything missing,
    /// unparsable, zero, or a grid side above `MAX_SIDE`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };
        let side = |key: &str| {
            positive(key)
                .and_then(|v| usize::try_from(v).ok())
                .filter(|v| *v <= MAX_SIDE)
        };
        let strategy = match lookup("RESCUE_SEARCH").as_deref().map(str::trim) {
            Some("dfs") | Some("any") => Strategy::AnyPath,
            _ => defaults.strategy,
        };
        Self {
            width: side("RESCUE_WIDTH").unwrap_or(defaults.width),
            height: side("RESCUE_HEIGHT").unwrap_or(defaults.height),
            fps: positive("RESCUE_FPS").unwrap_or(defaults.fps),
            obstacle_divisor: positive("RESCUE_OBSTACLE_DIVISOR")
                .map_or(defaults.obstacle_divisor, |v| v as usize),
            seed: lookup("RESCUE_SEED").and_then(|v| v.trim().parse::<u64>().ok()),
            strategy,
        }
    }

    pub fn obstacles(&self) -> usize {
        self.width.saturating_mul(self.height) / self.obstacle_divisor.max(1)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1))
    }
}

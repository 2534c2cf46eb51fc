//! Scheduling configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timings of the observation/scheduling layer, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay between page load and the first initialisation.
    #[serde(default = "default_init_delay_ms")]
    pub init_delay_ms: u64,

    /// Mutation bursts closer together than this collapse into one pass.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Backstop pass interval.
    #[serde(default = "default_rescan_interval_ms")]
    pub rescan_interval_ms: u64,

    /// Expansion stays inert this long after (re)initialisation.
    #[serde(default = "default_expand_delay_ms")]
    pub expand_delay_ms: u64,

    /// Dedupe stays inert this long after expansion becomes active.
    #[serde(default = "default_dedupe_delay_ms")]
    pub dedupe_delay_ms: u64,

    /// Interval between container discovery attempts.
    #[serde(default = "default_discovery_interval_ms")]
    pub discovery_interval_ms: u64,

    /// Discovery gives up after this many timed attempts.
    #[serde(default = "default_discovery_max_attempts")]
    pub discovery_max_attempts: u32,
}

fn default_init_delay_ms() -> u64 {
    1200
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_rescan_interval_ms() -> u64 {
    2000
}

fn default_expand_delay_ms() -> u64 {
    800
}

fn default_dedupe_delay_ms() -> u64 {
    1500
}

fn default_discovery_interval_ms() -> u64 {
    500
}

fn default_discovery_max_attempts() -> u32 {
    40
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            init_delay_ms: default_init_delay_ms(),
            debounce_ms: default_debounce_ms(),
            rescan_interval_ms: default_rescan_interval_ms(),
            expand_delay_ms: default_expand_delay_ms(),
            dedupe_delay_ms: default_dedupe_delay_ms(),
            discovery_interval_ms: default_discovery_interval_ms(),
            discovery_max_attempts: default_discovery_max_attempts(),
        }
    }
}

impl TimingConfig {
    /// All delays zero: passes act immediately. Handy for tests.
    pub fn immediate() -> Self {
        Self {
            init_delay_ms: 0,
            expand_delay_ms: 0,
            dedupe_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn init_delay(&self) -> Duration {
        Duration::from_millis(self.init_delay_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn rescan_interval(&self) -> Duration {
        Duration::from_millis(self.rescan_interval_ms)
    }

    pub fn expand_delay(&self) -> Duration {
        Duration::from_millis(self.expand_delay_ms)
    }

    pub fn dedupe_delay(&self) -> Duration {
        Duration::from_millis(self.dedupe_delay_ms)
    }

    pub fn discovery_interval(&self) -> Duration {
        Duration::from_millis(self.discovery_interval_ms)
    }
}

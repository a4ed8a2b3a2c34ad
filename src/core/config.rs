//! Engine configuration.
//!
//! Games configure the engine once at startup. Everything here is optional:
//! `EngineConfig::default()` gives an entropy-seeded engine whose decision
//! calls never time out.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Startup configuration for a [`Game`](crate::game::Game).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the engine RNG. `None` draws a seed from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Deadline for a single decision call. A participant that misses it is
    /// treated as having declined.
    #[serde(default, with = "duration_millis")]
    pub decision_timeout: Option<Duration>,
}

impl EngineConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed RNG seed (reproducible shuffles and samples).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bound every decision call by `timeout`.
    #[must_use]
    pub fn with_decision_timeout(mut self, timeout: Duration) -> Self {
        self.decision_timeout = Some(timeout);
        self
    }

    /// The seed to use, drawing one from entropy when none was configured.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => {
                let millis = u64::try_from(d.as_millis()).map_err(<S::Error as serde::ser::Error>::custom)?;
                serializer.serialize_some(&millis)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}

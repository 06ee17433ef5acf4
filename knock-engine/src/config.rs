use knock_core::TrialType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Session-start validation failures. These are the only fatal errors in the
/// engine: a malformed configuration must never silently produce a short or
/// unbalanced trial list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("block {block}: trial counts sum to {got}, declared size is {declared}")]
    BadProportions {
        block: String,
        got: usize,
        declared: usize,
    },
    #[error("block order references undefined block {0:?}")]
    UnknownBlock(String),
    #[error("block order is empty")]
    EmptyOrder,
    #[error("configured blocks contain no trials")]
    NoTrials,
}

/// Trial-type counts for one block. Counts must sum to `size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub size: usize,
    pub counts: BTreeMap<TrialType, usize>,
}

impl BlockSpec {
    pub fn new(size: usize, counts: [(TrialType, usize); 4]) -> Self {
        Self {
            size,
            counts: counts.into_iter().collect(),
        }
    }
}

/// Static configuration for a full session: phase durations, block order and
/// per-block trial proportions. Not generated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub fixation_ms: u64,
    pub stimulus_window_ms: u64,
    pub feedback_ms: u64,
    /// Blocks are concatenated in this order; order between blocks is fixed.
    pub block_order: Vec<String>,
    pub blocks: BTreeMap<String, BlockSpec>,
}

impl SessionConfig {
    /// Fails fast on the taxonomy-(a) errors: proportions that do not sum to
    /// the declared block size, or an order entry naming an undefined block.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_order.is_empty() {
            return Err(ConfigError::EmptyOrder);
        }
        for name in &self.block_order {
            let block = self
                .blocks
                .get(name)
                .ok_or_else(|| ConfigError::UnknownBlock(name.clone()))?;
            let got: usize = block.counts.values().sum();
            if got != block.size {
                return Err(ConfigError::BadProportions {
                    block: name.clone(),
                    got,
                    declared: block.size,
                });
            }
        }
        if self.total_trials() == 0 {
            return Err(ConfigError::NoTrials);
        }
        Ok(())
    }

    /// Total trial count across the configured block order.
    pub fn total_trials(&self) -> usize {
        self.block_order
            .iter()
            .filter_map(|name| self.blocks.get(name))
            .map(|b| b.size)
            .sum()
    }

    /// Minimal single-block session: one trial of each type. Used by the
    /// simulator's quick mode and the end-to-end tests.
    pub fn single_block_demo() -> Self {
        use TrialType::*;
        Self {
            fixation_ms: 1000,
            stimulus_window_ms: 3000,
            feedback_ms: 1000,
            block_order: vec!["MC".into()],
            blocks: BTreeMap::from([(
                "MC".into(),
                BlockSpec::new(4, [(GoA, 1), (GoB, 1), (NogoA, 1), (NogoB, 1)]),
            )]),
        }
    }
}

impl Default for SessionConfig {
    /// Full go-incongruent session: four 100-trial blocks, MC / HC1 / HC2 / LC
    /// conflict levels in fixed order.
    fn default() -> Self {
        use TrialType::*;
        Self {
            fixation_ms: 1000,
            stimulus_window_ms: 3000,
            feedback_ms: 1000,
            block_order: vec!["MC".into(), "HC1".into(), "HC2".into(), "LC".into()],
            blocks: BTreeMap::from([
                (
                    "MC".into(),
                    BlockSpec::new(100, [(GoA, 25), (GoB, 25), (NogoA, 25), (NogoB, 25)]),
                ),
                (
                    "LC".into(),
                    BlockSpec::new(100, [(GoA, 35), (GoB, 15), (NogoA, 35), (NogoB, 15)]),
                ),
                (
                    "HC1".into(),
                    BlockSpec::new(100, [(GoA, 15), (GoB, 35), (NogoA, 15), (NogoB, 35)]),
                ),
                (
                    "HC2".into(),
                    BlockSpec::new(100, [(GoA, 15), (GoB, 50), (NogoA, 15), (NogoB, 20)]),
                ),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_trials(), 400);
    }

    #[test]
    fn demo_config_is_four_trials() {
        let config = SessionConfig::single_block_demo();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_trials(), 4);
    }

    #[test]
    fn rejects_proportions_not_summing_to_size() {
        let mut config = SessionConfig::default();
        config.blocks.get_mut("MC").unwrap().size = 99;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BadProportions {
                block: "MC".into(),
                got: 100,
                declared: 99,
            })
        );
    }

    #[test]
    fn rejects_unknown_block_in_order() {
        let mut config = SessionConfig::default();
        config.block_order.push("HC3".into());
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownBlock("HC3".into()))
        );
    }

    #[test]
    fn rejects_empty_block_order() {
        let mut config = SessionConfig::default();
        config.block_order.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyOrder));
    }

    #[test]
    fn rejects_internally_consistent_but_empty_session() {
        // A zero-size block with no counts satisfies the per-block sum check
        // yet would yield an empty trial list.
        let mut config = SessionConfig::default();
        config.block_order = vec!["Z".into()];
        config.blocks.insert(
            "Z".into(),
            BlockSpec {
                size: 0,
                counts: BTreeMap::new(),
            },
        );
        assert_eq!(config.validate(), Err(ConfigError::NoTrials));
    }
}

use crate::config::{ConfigError, SessionConfig};
use knock_core::TrialSpec;
use rand::Rng;

/// Builds one block's trial sequence: every configured trial type is pushed
/// `count` times, then the block is shuffled in place with Fisher-Yates so
/// every permutation of the multiset is equally likely.
pub fn generate_block<R: Rng>(
    block_id: &str,
    config: &SessionConfig,
    rng: &mut R,
) -> Result<Vec<TrialSpec>, ConfigError> {
    let block = config
        .blocks
        .get(block_id)
        .ok_or_else(|| ConfigError::UnknownBlock(block_id.to_string()))?;

    let mut trials = Vec::with_capacity(block.size);
    for (&trial_type, &count) in &block.counts {
        for _ in 0..count {
            trials.push(TrialSpec::of(trial_type));
        }
    }

    if trials.len() != block.size {
        return Err(ConfigError::BadProportions {
            block: block_id.to_string(),
            got: trials.len(),
            declared: block.size,
        });
    }

    // Fisher-Yates: i from last down to 1, uniform j in [0, i], swap.
    for i in (1..trials.len()).rev() {
        let j = rng.random_range(0..=i);
        trials.swap(i, j);
    }

    Ok(trials)
}

/// Concatenates the configured blocks in their fixed order. Called exactly
/// once per session; the result is stored and never regenerated.
pub fn generate_trial_list<R: Rng>(
    config: &SessionConfig,
    rng: &mut R,
) -> Result<Vec<TrialSpec>, ConfigError> {
    config.validate()?;
    let mut list = Vec::with_capacity(config.total_trials());
    for block_id in &config.block_order {
        list.extend(generate_block(block_id, config, rng)?);
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knock_core::TrialType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn type_counts(trials: &[TrialSpec]) -> BTreeMap<TrialType, usize> {
        let mut counts = BTreeMap::new();
        for t in trials {
            *counts.entry(t.trial_type).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn block_multiset_matches_configured_proportions() {
        let config = SessionConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for block_id in &config.block_order {
            let trials = generate_block(block_id, &config, &mut rng).unwrap();
            assert_eq!(trials.len(), config.blocks[block_id].size);
            assert_eq!(type_counts(&trials), config.blocks[block_id].counts);
        }
    }

    #[test]
    fn trial_list_preserves_block_order() {
        let config = SessionConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let list = generate_trial_list(&config, &mut rng).unwrap();
        assert_eq!(list.len(), 400);

        // Each block occupies a contiguous segment whose multiset matches
        // that block's proportions; trials never leak across boundaries.
        let mut offset = 0;
        for block_id in &config.block_order {
            let block = &config.blocks[block_id];
            let segment = &list[offset..offset + block.size];
            assert_eq!(type_counts(segment), block.counts);
            offset += block.size;
        }
    }

    #[test]
    fn same_seed_yields_same_list() {
        let config = SessionConfig::default();
        let a = generate_trial_list(&config, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_trial_list(&config, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_keep_the_composition_invariant() {
        let config = SessionConfig::default();
        let a = generate_trial_list(&config, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate_trial_list(&config, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(type_counts(&a), type_counts(&b));
    }

    #[test]
    fn unknown_block_fails_fast() {
        let config = SessionConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_block("XX", &config, &mut rng),
            Err(ConfigError::UnknownBlock(_))
        ));
    }
}

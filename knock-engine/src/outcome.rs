use knock_core::{TrialSpec, TrialType};
use rand::Rng;

/// Points at stake on every trial.
pub const STAKE: i64 = 50;

/// Probability that the reinforcement schedule delivers the intended outcome.
pub const REINFORCEMENT_P: f64 = 0.8;

/// Result of resolving one stimulus phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub was_correct: bool,
    pub score_change: i64,
}

/// Outcome valence of a trial type under the probabilistic schedule.
///
/// Reward types pay +STAKE when correct and nothing otherwise; punishment
/// types pay nothing when correct and -STAKE otherwise. Combined with which
/// action is rewarded (go vs. no-go) this makes the four trial types pairwise
/// distinguishable:
///
/// | type  | rewarded action | correct | incorrect |
/// |-------|-----------------|---------|-----------|
/// | go1   | knock           | +50     | 0         |
/// | go2   | knock           | 0       | -50       |
/// | nogo1 | withhold        | 0       | -50       |
/// | nogo2 | withhold        | +50     | 0         |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valence {
    Reward,
    Punishment,
}

impl Valence {
    pub fn of(trial_type: TrialType) -> Self {
        match trial_type {
            TrialType::GoA | TrialType::NogoB => Valence::Reward,
            TrialType::GoB | TrialType::NogoA => Valence::Punishment,
        }
    }

    fn score_change(&self, was_correct: bool) -> i64 {
        match (self, was_correct) {
            (Valence::Reward, true) => STAKE,
            (Valence::Reward, false) => 0,
            (Valence::Punishment, true) => 0,
            (Valence::Punishment, false) => -STAKE,
        }
    }
}

/// Maps a trial's type and the participant's action to correctness and a
/// score delta. Pluggable so sessions can run under either schedule.
pub trait ScoringPolicy {
    fn resolve(&mut self, trial: &TrialSpec, knocked: bool) -> Outcome;
}

/// Canonical probabilistic reinforcement: the action matching the trial
/// type's rewarded action counts as correct with probability `p`, and is
/// reversed with probability `1 - p`, modelling a noisy-reward environment.
#[derive(Debug, Clone)]
pub struct ProbabilisticPolicy<R: Rng> {
    p: f64,
    rng: R,
}

impl<R: Rng> ProbabilisticPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self {
            p: REINFORCEMENT_P,
            rng,
        }
    }

    pub fn with_probability(p: f64, rng: R) -> Self {
        Self { p, rng }
    }
}

impl<R: Rng> ScoringPolicy for ProbabilisticPolicy<R> {
    fn resolve(&mut self, trial: &TrialSpec, knocked: bool) -> Outcome {
        let matched = knocked == trial.trial_type.is_go();
        let reversed = !self.rng.random_bool(self.p);
        let was_correct = matched != reversed;
        Outcome {
            was_correct,
            score_change: Valence::of(trial.trial_type).score_change(was_correct),
        }
    }
}

/// Earlier deterministic schedule: correctness follows the trial's default
/// contingency directly and every trial pays out +STAKE or -STAKE.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicPolicy;

impl ScoringPolicy for DeterministicPolicy {
    fn resolve(&mut self, trial: &TrialSpec, knocked: bool) -> Outcome {
        let was_correct = knocked == trial.knock_is_correct;
        Outcome {
            was_correct,
            score_change: if was_correct { STAKE } else { -STAKE },
        }
    }
}

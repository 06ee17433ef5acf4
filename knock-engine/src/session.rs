use crate::config::{ConfigError, SessionConfig};
use crate::generate::generate_trial_list;
use crate::outcome::{Outcome, ScoringPolicy};
use crate::sink::TrialSink;
use knock_core::{SessionPhase, TrialRecord, TrialSpec};
use knock_timing::Timer;
use rand::Rng;
use tracing::{debug, info};

/// Drives one full session: owns the trial list, the per-trial phase clock,
/// the running score and the record emission.
///
/// The controller is poll-driven and single-threaded: the host calls `tick()`
/// on its cadence (frame loop, timer loop) and `key_pressed()` from its input
/// handler. Exactly one of those triggers resolves each stimulus phase; the
/// `stimulus_resolved` flag makes the losing trigger a no-op rather than an
/// error. All elapsed times are wall-clock deltas against the phase-start
/// timestamp, so drift never accumulates across the session.
pub struct SessionController<T, P, S>
where
    T: Timer,
    P: ScoringPolicy,
    S: TrialSink,
{
    config: SessionConfig,
    user_id: String,
    timer: T,
    policy: P,
    sink: S,
    trials: Vec<TrialSpec>,
    index: usize,
    phase: SessionPhase,
    phase_start_ns: u64,
    stimulus_resolved: bool,
    score: i64,
    last_outcome: Option<Outcome>,
}

impl<T, P, S> SessionController<T, P, S>
where
    T: Timer,
    P: ScoringPolicy,
    S: TrialSink,
{
    /// Validates the configuration, generates the full trial list once and
    /// enters the first trial's fixation phase.
    pub fn new<R: Rng>(
        config: SessionConfig,
        user_id: impl Into<String>,
        timer: T,
        policy: P,
        sink: S,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let trials = generate_trial_list(&config, rng)?;
        let phase_start_ns = timer.now_ns();
        info!(trials = trials.len(), "session started");
        Ok(Self {
            config,
            user_id: user_id.into(),
            timer,
            policy,
            sink,
            trials,
            index: 0,
            phase: SessionPhase::Fixation,
            phase_start_ns,
            stimulus_resolved: false,
            score: 0,
            last_outcome: None,
        })
    }

    /// Advances any phase whose duration has elapsed. Safe to call at any
    /// cadence; a late call resolves the pending timeout on arrival.
    pub fn tick(&mut self) {
        let elapsed_ms = self.phase_elapsed_ms();
        match self.phase {
            SessionPhase::Fixation => {
                if elapsed_ms >= self.config.fixation_ms {
                    self.enter(SessionPhase::Stimulus);
                }
            }
            SessionPhase::Stimulus => {
                if !self.stimulus_resolved && elapsed_ms >= self.config.stimulus_window_ms {
                    // Window elapsed with no press.
                    self.resolve_stimulus(false, 0);
                }
            }
            SessionPhase::Feedback => {
                if elapsed_ms >= self.config.feedback_ms {
                    if self.index + 1 < self.trials.len() {
                        self.index += 1;
                        self.enter(SessionPhase::Fixation);
                    } else {
                        self.enter(SessionPhase::Ended);
                        info!(score = self.score, "session ended");
                    }
                }
            }
            SessionPhase::Ended => {}
        }
    }

    /// Primary-action key handler. Only honored during an unresolved stimulus
    /// phase; repeated presses and presses in any other phase are no-ops.
    pub fn key_pressed(&mut self) {
        if !self.phase.accepts_input() || self.stimulus_resolved {
            return;
        }
        let reaction_ms = self.phase_elapsed_ms().min(self.config.stimulus_window_ms);
        self.resolve_stimulus(true, reaction_ms);
    }

    fn phase_elapsed_ms(&self) -> u64 {
        self.timer.elapsed(self.phase_start_ns).as_millis() as u64
    }

    fn enter(&mut self, phase: SessionPhase) {
        self.phase = phase;
        self.phase_start_ns = self.timer.now_ns();
        if phase == SessionPhase::Stimulus {
            self.stimulus_resolved = false;
        }
    }

    /// Single completion path for the stimulus phase, whichever trigger wins.
    fn resolve_stimulus(&mut self, knocked: bool, reaction_ms: u64) {
        self.stimulus_resolved = true;

        let trial = self.trials[self.index];
        let outcome = self.policy.resolve(&trial, knocked);
        self.score += outcome.score_change;
        self.last_outcome = Some(outcome);

        let record = TrialRecord {
            user_id: self.user_id.clone(),
            trial_number: self.index + 1,
            stimulus: trial.trial_type.as_str().to_string(),
            reaction_time: reaction_ms,
            knocked,
            correct: outcome.was_correct,
            score_change: outcome.score_change,
            new_score: self.score,
        };
        debug!(
            trial = record.trial_number,
            stimulus = %record.stimulus,
            knocked,
            correct = record.correct,
            score = self.score,
            "trial resolved"
        );
        self.sink.submit(&record);

        self.enter(SessionPhase::Feedback);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn is_ended(&self) -> bool {
        self.phase.is_terminal()
    }

    /// The trial currently being presented, if the session is still running.
    pub fn current_trial(&self) -> Option<&TrialSpec> {
        if self.is_ended() {
            None
        } else {
            self.trials.get(self.index)
        }
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn total_trials(&self) -> usize {
        self.trials.len()
    }

    /// 1-based progress for presentation layers.
    pub fn trial_progress(&self) -> (usize, usize) {
        (self.index + 1, self.trials.len())
    }
}

use knock_engine::{RlAgent, ScoringPolicy, SessionController, TrialSink, STAKE};
use knock_core::SessionPhase;
use knock_timing::Timer;
use rand::Rng;
use std::time::Duration;
use tracing::info;

/// Planned action for the trial currently on screen.
struct Plan {
    trial: usize,
    knock: bool,
    press_at_ns: u64,
}

/// Runs a session to completion with the RL agent as the participant.
///
/// The loop polls the controller the way a frame loop would: one `tick` per
/// iteration, a short sleep in between. At stimulus onset the agent commits
/// to an action and, if it chose to knock, a reaction time; the press is
/// delivered once that moment passes. After each feedback onset the agent
/// learns from the delivered outcome.
pub fn run_session<T, P, S, R>(
    controller: &mut SessionController<T, P, S>,
    agent: &mut RlAgent,
    timer: &T,
    rng: &mut R,
) -> i64
where
    T: Timer,
    P: ScoringPolicy,
    S: TrialSink,
    R: Rng,
{
    let mut plan: Option<Plan> = None;
    let mut learned_trial = 0usize;

    while !controller.is_ended() {
        controller.tick();
        let (trial, _) = controller.trial_progress();

        match controller.phase() {
            SessionPhase::Stimulus => {
                if plan.as_ref().map(|p| p.trial) != Some(trial) {
                    let knock = agent.choose(rng);
                    let window_ms = controller.config().stimulus_window_ms;
                    let reaction_ms = rng.random_range(window_ms / 10..=window_ms * 6 / 10);
                    plan = Some(Plan {
                        trial,
                        knock,
                        press_at_ns: timer.now_ns() + reaction_ms * 1_000_000,
                    });
                }
                if let Some(p) = &plan {
                    if p.knock && timer.now_ns() >= p.press_at_ns {
                        controller.key_pressed();
                    }
                }
            }
            SessionPhase::Feedback => {
                if learned_trial != trial {
                    if let (Some(outcome), Some(p)) = (controller.last_outcome(), &plan) {
                        agent.learn(p.knock, outcome.score_change as f64 / STAKE as f64);
                        learned_trial = trial;
                        info!(
                            trial,
                            knocked = p.knock,
                            correct = outcome.was_correct,
                            score = controller.score(),
                            "trial finished"
                        );
                    }
                }
            }
            SessionPhase::Fixation | SessionPhase::Ended => {}
        }

        timer.sleep(Duration::from_millis(1));
    }

    controller.score()
}

#[cfg(test)]
mod tests {
    use super::*;
    use knock_engine::{
        AgentParams, DeterministicPolicy, MemorySink, ProbabilisticPolicy, SessionConfig,
        SessionController,
    };
    use knock_timing::ManualTimer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn simulated_demo_session_completes_with_consistent_records() {
        let timer = ManualTimer::new();
        let sink = MemorySink::new();
        let mut rng = StdRng::seed_from_u64(21);
        let mut controller = SessionController::new(
            SessionConfig::single_block_demo(),
            "sim",
            timer.clone(),
            DeterministicPolicy,
            sink.clone(),
            &mut rng,
        )
        .unwrap();
        let mut agent = RlAgent::new(AgentParams::default());

        let final_score = run_session(&mut controller, &mut agent, &timer, &mut rng);

        let records = sink.records();
        assert_eq!(records.len(), 4);
        let mut running = 0;
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.trial_number, i + 1);
            running += record.score_change;
            assert_eq!(record.new_score, running);
            assert!(record.reaction_time <= 3000);
            if !record.knocked {
                assert_eq!(record.reaction_time, 0);
            }
        }
        assert_eq!(final_score, running);
    }

    #[test]
    fn full_session_under_the_probabilistic_schedule() {
        let timer = ManualTimer::new();
        let sink = MemorySink::new();
        let mut rng = StdRng::seed_from_u64(22);
        let mut controller = SessionController::new(
            SessionConfig::default(),
            "sim",
            timer.clone(),
            ProbabilisticPolicy::new(StdRng::seed_from_u64(23)),
            sink.clone(),
            &mut rng,
        )
        .unwrap();
        let mut agent = RlAgent::default();

        let final_score = run_session(&mut controller, &mut agent, &timer, &mut rng);

        let records = sink.records();
        assert_eq!(records.len(), 400);
        let total: i64 = records.iter().map(|r| r.score_change).sum();
        assert_eq!(final_score, total);
        assert!(records
            .iter()
            .all(|r| [-50, 0, 50].contains(&r.score_change)));
    }
}

pub mod agent;
pub mod config;
pub mod generate;
pub mod outcome;
pub mod session;
pub mod sink;

pub use agent::{AgentParams, RlAgent};
pub use config::{BlockSpec, ConfigError, SessionConfig};
pub use generate::{generate_block, generate_trial_list};
pub use outcome::{
    DeterministicPolicy, Outcome, ProbabilisticPolicy, ScoringPolicy, Valence, REINFORCEMENT_P,
    STAKE,
};
pub use session::SessionController;
pub use sink::{MemorySink, NullSink, TrialSink};

pub mod phase;
pub mod record;
pub mod trial;

pub use phase::SessionPhase;
pub use record::TrialRecord;
pub use trial::{TrialSpec, TrialType};

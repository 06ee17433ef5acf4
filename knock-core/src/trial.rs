use serde::{Deserialize, Serialize};

/// Closed set of Go/No-Go trial types.
///
/// The two Go types reward a key press, the two No-Go types reward
/// withholding it. The A/B split carries the outcome valence used by the
/// probabilistic scoring policy: A-types of each pair play for reward,
/// B-types play to avoid punishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrialType {
    #[serde(rename = "go1")]
    GoA,
    #[serde(rename = "go2")]
    GoB,
    #[serde(rename = "nogo1")]
    NogoA,
    #[serde(rename = "nogo2")]
    NogoB,
}

impl TrialType {
    pub const ALL: [TrialType; 4] = [
        TrialType::GoA,
        TrialType::GoB,
        TrialType::NogoA,
        TrialType::NogoB,
    ];

    /// String encoding used in trial records and the persisted schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialType::GoA => "go1",
            TrialType::GoB => "go2",
            TrialType::NogoA => "nogo1",
            TrialType::NogoB => "nogo2",
        }
    }

    /// True when the rewarded action for this type is pressing the key.
    pub fn is_go(&self) -> bool {
        matches!(self, TrialType::GoA | TrialType::GoB)
    }

    /// Asset reference shown during the stimulus phase.
    pub fn stimulus_ref(&self) -> &'static str {
        match self {
            TrialType::GoA => "/assets/goImage1.jpeg",
            TrialType::GoB => "/assets/goImage2.jpeg",
            TrialType::NogoA => "/assets/noGoImage1.jpeg",
            TrialType::NogoB => "/assets/noGoImage2.jpeg",
        }
    }
}

impl std::fmt::Display for TrialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the generated trial list. Built once at session start,
/// never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrialSpec {
    pub trial_type: TrialType,
    pub stimulus_ref: &'static str,
    /// Used by the deterministic scoring variant: whether knocking is the
    /// correct response for this trial.
    pub knock_is_correct: bool,
}

impl TrialSpec {
    pub fn of(trial_type: TrialType) -> Self {
        Self {
            trial_type,
            stimulus_ref: trial_type.stimulus_ref(),
            knock_is_correct: trial_type.is_go(),
        }
    }
}

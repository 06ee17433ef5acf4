use serde::{Deserialize, Serialize};

/// Outbound log entry, one per trial. Immutable once built; submitted to the
/// trial-log sink exactly once, never updated.
///
/// Field names serialize in the camelCase form the submission endpoint and
/// the persisted `trial_data` table expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecord {
    pub user_id: String,
    /// 1-based position within the session.
    pub trial_number: usize,
    /// String-encoded trial type, e.g. `"go1"`.
    pub stimulus: String,
    /// Milliseconds from stimulus onset to key press; 0 when no press.
    pub reaction_time: u64,
    pub knocked: bool,
    pub correct: bool,
    pub score_change: i64,
    /// Cumulative score after applying `score_change`.
    pub new_score: i64,
}

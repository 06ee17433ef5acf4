/// Per-trial phase sequence driven by the session controller.
///
/// `Fixation -> Stimulus -> Feedback` repeats once per trial; after the
/// feedback of the last trial the session enters the terminal `Ended` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Fixation,
    Stimulus,
    Feedback,
    Ended,
}

impl SessionPhase {
    /// Whether the primary-action key is accepted in this phase.
    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionPhase::Stimulus)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Ended)
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Fixation
    }
}

use std::fmt;

/// Lifecycle of one search cycle.
///
/// Transitions only go forward: `Setting -> Searching -> Finished`, and a new
/// cycle starts again from `Setting`. A search without sources goes straight
/// from `Setting` to `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// The request is being composed.
    #[default]
    Setting,
    /// Source tasks are running.
    Searching,
    /// Every task ended, by completion, failure or cancellation.
    Finished,
}

impl Phase {
    /// Whether the engine may move from `self` to `next`.
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Setting, Phase::Searching)
                | (Phase::Setting, Phase::Finished)
                | (Phase::Searching, Phase::Finished)
                | (Phase::Finished, Phase::Setting)
                | (Phase::Setting, Phase::Setting)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Setting => "SETTING",
            Phase::Searching => "SEARCHING",
            Phase::Finished => "FINISHED",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::Phase;

    #[test]
    fn transitions_are_one_directional() {
        assert!(Phase::Setting.can_transition_to(Phase::Searching));
        assert!(Phase::Searching.can_transition_to(Phase::Finished));
        assert!(Phase::Finished.can_transition_to(Phase::Setting));
        assert!(Phase::Setting.can_transition_to(Phase::Finished));

        assert!(!Phase::Searching.can_transition_to(Phase::Setting));
        assert!(!Phase::Finished.can_transition_to(Phase::Searching));
        assert!(!Phase::Searching.can_transition_to(Phase::Searching));
    }
}

use crate::SearchSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand a snapshot of the settings to the engine.
    StartSearch(SearchSettings),
    CancelSearch,
    /// Drop the previous results and return the engine to its setting phase.
    ResetSearch,
}

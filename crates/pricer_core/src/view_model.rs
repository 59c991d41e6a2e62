use crate::{Card, Phase, SearchOutcome, SourceId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricerViewModel {
    pub phase: Phase,
    /// Result columns, one per source of the current search.
    pub columns: Vec<SourceId>,
    pub rows: Vec<CardRowView>,
    pub sources: Vec<SourceProgressView>,
    pub cancel_requested: bool,
    pub was_cancelled: bool,
    pub last_error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardRowView {
    pub card: Card,
    pub quantity: u32,
    /// `None` while the source has not reached this card.
    pub cells: Vec<Option<SearchOutcome>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProgressView {
    pub source: SourceId,
    pub done: usize,
    pub total: usize,
    pub ended: bool,
    pub failure: Option<String>,
}

impl SourceProgressView {
    /// Short status label, e.g. `3/10`, `done`, `failed`.
    pub fn status_label(&self) -> String {
        match (&self.failure, self.ended) {
            (Some(_), _) => "failed".to_string(),
            (None, true) if self.done == self.total => "done".to_string(),
            (None, true) => format!("stopped at {}/{}", self.done, self.total),
            (None, false) => format!("{}/{}", self.done, self.total),
        }
    }
}

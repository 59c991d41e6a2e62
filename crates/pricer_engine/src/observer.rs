use std::sync::{mpsc, Arc};

use pricer_core::{Card, SearchOutcome, SourceId};

use crate::{ResultStore, SearchEvent, SourceError};

/// Progress callbacks from a running search.
///
/// Calls arrive on whichever worker thread produced the event. Implementors
/// that drive a UI must hand the event over to their own thread.
pub trait SearchObserver: Send + Sync {
    fn search_started(&self, _card_count: usize) {}

    fn card_search_started(&self, _card: &Card, _source: &SourceId) {}

    fn card_search_ended(&self, _card: &Card, _outcome: &SearchOutcome, _source: &SourceId) {}

    /// The source processed every card, or stopped early on cancellation.
    fn source_task_ended(&self, _source: &SourceId, _store: &Arc<ResultStore>) {}

    fn source_task_failed(&self, _source: &SourceId, _error: &SourceError) {}

    /// Fired once, after every source task has stopped.
    fn search_finished(&self, _cancelled: bool) {}
}

/// Forwards every callback into a channel as a [`SearchEvent`].
pub struct ChannelObserver {
    tx: mpsc::Sender<SearchEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::Sender<SearchEvent>) -> Self {
        Self { tx }
    }

    /// Observer plus the receiving end it feeds.
    pub fn channel() -> (Self, mpsc::Receiver<SearchEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: SearchEvent) {
        let _ = self.tx.send(event);
    }
}

impl SearchObserver for ChannelObserver {
    fn search_started(&self, card_count: usize) {
        self.send(SearchEvent::SearchStarted { card_count });
    }

    fn card_search_started(&self, card: &Card, source: &SourceId) {
        self.send(SearchEvent::CardSearchStarted {
            card: card.clone(),
            source: source.clone(),
        });
    }

    fn card_search_ended(&self, card: &Card, outcome: &SearchOutcome, source: &SourceId) {
        self.send(SearchEvent::CardSearchEnded {
            card: card.clone(),
            outcome: outcome.clone(),
            source: source.clone(),
        });
    }

    fn source_task_ended(&self, source: &SourceId, store: &Arc<ResultStore>) {
        self.send(SearchEvent::SourceTaskEnded {
            source: source.clone(),
            store: store.clone(),
        });
    }

    fn source_task_failed(&self, source: &SourceId, error: &SourceError) {
        self.send(SearchEvent::SourceTaskFailed {
            source: source.clone(),
            error: error.clone(),
        });
    }

    fn search_finished(&self, cancelled: bool) {
        self.send(SearchEvent::SearchFinished { cancelled });
    }
}

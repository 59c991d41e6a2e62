use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use pricer_core::{Card, CardResult, SearchOutcome, SourceId};
use pricer_logging::pricer_warn;

/// Results of one source for one search.
///
/// Only the source's own task writes; anyone may read at any time. Each entry
/// is inserted whole under the write lock, so readers never see half of one.
#[derive(Debug)]
pub struct ResultStore {
    source: SourceId,
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    outcomes: HashMap<Card, SearchOutcome>,
    not_found: Vec<Card>,
    elapsed: Option<Duration>,
}

impl ResultStore {
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            inner: RwLock::new(StoreInner::default()),
        }
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Ignored, with a warning, once the store is frozen.
    pub fn record_result(&self, card: Card, result: CardResult) {
        let mut inner = self.write();
        if inner.elapsed.is_some() {
            pricer_warn!("{}: store is frozen, dropping result for {}", self.source, card);
            return;
        }
        if inner.outcomes.contains_key(&card) {
            pricer_warn!("{}: replacing existing outcome for {}", self.source, card);
            inner.not_found.retain(|c| c != &card);
        }
        inner.outcomes.insert(card, SearchOutcome::Found(result));
    }

    /// Ignored, with a warning, once the store is frozen.
    pub fn record_not_found(&self, card: Card) {
        let mut inner = self.write();
        if inner.elapsed.is_some() {
            pricer_warn!("{}: store is frozen, dropping not-found for {}", self.source, card);
            return;
        }
        if inner.outcomes.contains_key(&card) {
            pricer_warn!("{}: replacing existing outcome for {}", self.source, card);
        }
        if !inner.not_found.contains(&card) {
            inner.not_found.push(card.clone());
        }
        inner.outcomes.insert(card, SearchOutcome::NotFound);
    }

    /// Sets the task's elapsed time and freezes the store. Returns `false`
    /// and keeps the first value if it was already set.
    pub fn finalize_elapsed(&self, elapsed: Duration) -> bool {
        let mut inner = self.write();
        if inner.elapsed.is_some() {
            pricer_warn!("{}: elapsed time already finalized", self.source);
            return false;
        }
        inner.elapsed = Some(elapsed);
        true
    }

    /// `None` while the card has not been searched yet.
    pub fn get(&self, card: &Card) -> Option<SearchOutcome> {
        self.read().outcomes.get(card).cloned()
    }

    pub fn snapshot(&self) -> HashMap<Card, SearchOutcome> {
        self.read().outcomes.clone()
    }

    /// Cards the source had nothing for, in search order.
    pub fn not_found(&self) -> Vec<Card> {
        self.read().not_found.clone()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.read().elapsed
    }

    /// True once the owning task has ended.
    pub fn is_frozen(&self) -> bool {
        self.elapsed().is_some()
    }

    /// Number of cards searched so far.
    pub fn len(&self) -> usize {
        self.read().outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn found_count(&self) -> usize {
        self.read()
            .outcomes
            .values()
            .filter(|outcome| outcome.is_found())
            .count()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

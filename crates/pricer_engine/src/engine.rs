use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use pricer_core::{Card, Phase, SearchOutcome, SearchSettings, SourceId};
use pricer_logging::{pricer_debug, pricer_info, pricer_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::{
    EngineError, FailureKind, PriceSource, ResultStore, SearchObserver, SourceError,
};

/// Runs one concurrent task per enabled source and reports progress to the
/// registered observers.
///
/// The engine owns its tokio runtime, so it must be created and dropped
/// outside of any async context.
pub struct SearchEngine {
    runtime: Runtime,
    sources: Vec<Arc<dyn PriceSource>>,
    shared: Arc<EngineShared>,
}

struct EngineShared {
    lifecycle: Mutex<Lifecycle>,
    settled: Condvar,
    observers: RwLock<Vec<Arc<dyn SearchObserver>>>,
    stores: RwLock<Vec<Arc<ResultStore>>>,
}

struct Lifecycle {
    phase: Phase,
    /// Incremented by every `start`.
    cycle: u64,
    /// Last cycle whose terminal event has been delivered.
    settled_cycle: u64,
    cancel: CancellationToken,
}

struct SourceTask {
    source: Arc<dyn PriceSource>,
    cards: Arc<[Card]>,
    store: Arc<ResultStore>,
    cancel: CancellationToken,
    running: Arc<AtomicUsize>,
    /// Set by any task of the cycle that skipped cards after a cancel.
    stopped_early: Arc<AtomicBool>,
    shared: Arc<EngineShared>,
    cycle: u64,
}

impl SearchEngine {
    /// Registers `sources`; a repeated [`SourceId`] keeps the first source.
    pub fn new(
        sources: impl IntoIterator<Item = Arc<dyn PriceSource>>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("pricer-search")
            .build()?;

        let mut registered: Vec<Arc<dyn PriceSource>> = Vec::new();
        for source in sources {
            if registered.iter().any(|known| known.id() == source.id()) {
                pricer_warn!("Ignoring duplicate source {}", source.id());
                continue;
            }
            registered.push(source);
        }

        Ok(Self {
            runtime,
            sources: registered,
            shared: Arc::new(EngineShared {
                lifecycle: Mutex::new(Lifecycle {
                    phase: Phase::Setting,
                    cycle: 0,
                    settled_cycle: 0,
                    cancel: CancellationToken::new(),
                }),
                settled: Condvar::new(),
                observers: RwLock::new(Vec::new()),
                stores: RwLock::new(Vec::new()),
            }),
        })
    }

    pub fn add_observer(&self, observer: Arc<dyn SearchObserver>) {
        self.shared
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().phase
    }

    pub fn sources(&self) -> &[Arc<dyn PriceSource>] {
        &self.sources
    }

    pub fn source(&self, id: &SourceId) -> Option<&Arc<dyn PriceSource>> {
        self.sources.iter().find(|source| source.id() == id)
    }

    /// Stores of the current search, in enabled-source order.
    pub fn stores(&self) -> Vec<Arc<ResultStore>> {
        self.shared.stores()
    }

    pub fn store(&self, id: &SourceId) -> Option<Arc<ResultStore>> {
        self.shared
            .stores()
            .into_iter()
            .find(|store| store.source() == id)
    }

    /// Launches the search described by `settings`.
    ///
    /// The cards are copied here, so later edits to `settings` do not reach
    /// the running tasks.
    pub fn start(&self, settings: &SearchSettings) -> Result<(), EngineError> {
        let mut lifecycle = self.shared.lock();
        if !lifecycle.phase.can_transition_to(Phase::Searching) {
            return Err(EngineError::WrongPhase {
                operation: "start a search",
                phase: lifecycle.phase,
            });
        }
        let enabled = settings
            .sources()
            .iter()
            .map(|id| {
                self.source(id)
                    .cloned()
                    .ok_or_else(|| EngineError::UnknownSource(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let stores: Vec<Arc<ResultStore>> = enabled
            .iter()
            .map(|source| Arc::new(ResultStore::new(source.id().clone())))
            .collect();
        *self
            .shared
            .stores
            .write()
            .unwrap_or_else(PoisonError::into_inner) = stores.clone();

        lifecycle.cycle += 1;
        lifecycle.cancel = CancellationToken::new();
        let next = if enabled.is_empty() {
            Phase::Finished
        } else {
            Phase::Searching
        };
        debug_assert!(lifecycle.phase.can_transition_to(next));
        lifecycle.phase = next;
        let cycle = lifecycle.cycle;
        let cancel = lifecycle.cancel.clone();
        drop(lifecycle);

        let cards: Arc<[Card]> = settings.cards().into();
        pricer_info!(
            "Search {cycle} started: {} cards across {} sources",
            cards.len(),
            enabled.len()
        );
        self.shared
            .notify(|observer| observer.search_started(cards.len()));

        if enabled.is_empty() {
            self.shared.notify(|observer| observer.search_finished(false));
            self.shared.settle(cycle);
            return Ok(());
        }

        let running = Arc::new(AtomicUsize::new(enabled.len()));
        let stopped_early = Arc::new(AtomicBool::new(false));
        for (source, store) in enabled.into_iter().zip(stores) {
            let task = SourceTask {
                source,
                cards: cards.clone(),
                store,
                cancel: cancel.clone(),
                running: running.clone(),
                stopped_early: stopped_early.clone(),
                shared: self.shared.clone(),
                cycle,
            };
            self.runtime.spawn(task.run());
        }
        Ok(())
    }

    /// Asks every running task to stop after its current card.
    pub fn cancel(&self) -> Result<(), EngineError> {
        let lifecycle = self.shared.lock();
        if lifecycle.phase != Phase::Searching {
            return Err(EngineError::WrongPhase {
                operation: "cancel",
                phase: lifecycle.phase,
            });
        }
        pricer_info!("Cancelling search {}", lifecycle.cycle);
        lifecycle.cancel.cancel();
        Ok(())
    }

    /// Drops the previous results and returns to [`Phase::Setting`].
    pub fn reset(&self) -> Result<(), EngineError> {
        let mut lifecycle = self.shared.lock();
        if !lifecycle.phase.can_transition_to(Phase::Setting) {
            return Err(EngineError::WrongPhase {
                operation: "reset",
                phase: lifecycle.phase,
            });
        }
        self.shared
            .stores
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        lifecycle.cancel = CancellationToken::new();
        lifecycle.phase = Phase::Setting;
        Ok(())
    }

    /// Blocks until the latest search has finished and its terminal event
    /// has been delivered. Returns at once when no search was started.
    pub fn wait(&self) {
        let lifecycle = self.shared.lock();
        let target = lifecycle.cycle;
        let _settled = self
            .shared
            .settled
            .wait_while(lifecycle, |state| state.settled_cycle < target)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Like [`wait`](Self::wait) with an upper bound. Returns `true` if the
    /// search finished in time.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let lifecycle = self.shared.lock();
        let target = lifecycle.cycle;
        let (_settled, result) = self
            .shared
            .settled
            .wait_timeout_while(lifecycle, timeout, |state| state.settled_cycle < target)
            .unwrap_or_else(PoisonError::into_inner);
        !result.timed_out()
    }
}

impl EngineShared {
    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stores(&self) -> Vec<Arc<ResultStore>> {
        self.stores
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Observers are called on a snapshot, so a callback may register more.
    fn notify(&self, event: impl Fn(&dyn SearchObserver)) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            event(observer.as_ref());
        }
    }

    /// `cancelled` is true only when some task skipped cards; a cancel that
    /// arrives after the last card was looked up does not count.
    fn finish(&self, cycle: u64, cancelled: bool) {
        {
            let mut lifecycle = self.lock();
            if lifecycle.cycle == cycle && lifecycle.phase == Phase::Searching {
                lifecycle.phase = Phase::Finished;
            }
        }
        pricer_info!("Search {cycle} finished (cancelled: {cancelled})");
        self.notify(|observer| observer.search_finished(cancelled));
        self.settle(cycle);
    }

    fn settle(&self, cycle: u64) {
        let mut lifecycle = self.lock();
        lifecycle.settled_cycle = lifecycle.settled_cycle.max(cycle);
        drop(lifecycle);
        self.settled.notify_all();
    }
}

impl SourceTask {
    async fn run(self) {
        let source_id = self.source.id().clone();
        let started = Instant::now();
        pricer_info!("{source_id}: searching {} cards", self.cards.len());

        let mut failure = None;
        for card in self.cards.iter() {
            self.shared
                .notify(|observer| observer.card_search_started(card, &source_id));
            if self.cancel.is_cancelled() {
                pricer_info!("{source_id}: stopped before {card}");
                self.stopped_early.store(true, Ordering::Release);
                break;
            }
            match self.lookup(card).await {
                Ok(outcome) => {
                    pricer_debug!("{source_id}: {card} -> {outcome}");
                    match &outcome {
                        SearchOutcome::Found(result) => {
                            self.store.record_result(card.clone(), result.clone())
                        }
                        SearchOutcome::NotFound => self.store.record_not_found(card.clone()),
                    }
                    self.shared.notify(|observer| {
                        observer.card_search_ended(card, &outcome, &source_id)
                    });
                }
                Err(error) => {
                    pricer_warn!("{source_id}: search for {card} failed: {error}");
                    failure = Some(error);
                    break;
                }
            }
        }

        let elapsed = started.elapsed();
        self.store.finalize_elapsed(elapsed);
        match failure {
            Some(error) => {
                self.shared
                    .notify(|observer| observer.source_task_failed(&source_id, &error));
            }
            None => {
                pricer_info!(
                    "{source_id}: ended after {:.1}s with {} of {} cards",
                    elapsed.as_secs_f64(),
                    self.store.len(),
                    self.cards.len()
                );
                self.shared
                    .notify(|observer| observer.source_task_ended(&source_id, &self.store));
            }
        }

        if self.running.fetch_sub(1, Ordering::AcqRel) == 1 {
            let cancelled = self.stopped_early.load(Ordering::Acquire);
            self.shared.finish(self.cycle, cancelled);
        }
    }

    async fn lookup(&self, card: &Card) -> Result<SearchOutcome, SourceError> {
        AssertUnwindSafe(self.source.find_cheapest(card.name()))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                Err(SourceError::new(
                    FailureKind::Internal,
                    format!("adapter panicked while searching for {card}"),
                ))
            })
    }
}

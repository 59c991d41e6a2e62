use std::sync::{mpsc, Arc};
use std::thread;

use pricer_core::{Effect, Msg};
use pricer_engine::{ChannelObserver, SearchEngine, SearchEvent};
use pricer_logging::{pricer_info, pricer_warn};

/// Executes session effects against the engine and feeds engine events back
/// as session messages.
pub struct EffectRunner {
    engine: Arc<SearchEngine>,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(engine: Arc<SearchEngine>, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (observer, event_rx) = ChannelObserver::channel();
        engine.add_observer(Arc::new(observer));
        let runner = Self { engine, msg_tx };
        runner.spawn_event_loop(event_rx);
        runner
    }

    pub fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartSearch(settings) => {
                    pricer_info!(
                        "StartSearch cards={} sources={}",
                        settings.card_count(),
                        settings.sources().len()
                    );
                    if let Err(err) = self.engine.start(&settings) {
                        pricer_warn!("Engine refused to start: {err}");
                        let _ = self.msg_tx.send(Msg::SearchRejected {
                            message: err.to_string(),
                        });
                    }
                }
                // The search may finish before the request lands; the
                // terminal event still arrives, so a refusal is only logged.
                Effect::CancelSearch => {
                    if let Err(err) = self.engine.cancel() {
                        pricer_warn!("Cancel ignored: {err}");
                    }
                }
                Effect::ResetSearch => {
                    if let Err(err) = self.engine.reset() {
                        pricer_warn!("Reset ignored: {err}");
                    }
                }
            }
        }
    }

    fn spawn_event_loop(&self, event_rx: mpsc::Receiver<SearchEvent>) {
        // Weak, since the engine's observer list keeps this channel open.
        let engine = Arc::downgrade(&self.engine);
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            while let Ok(event) = event_rx.recv() {
                let Some(engine) = engine.upgrade() else {
                    break;
                };
                if let Some(msg) = map_event(&engine, event) {
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                }
            }
        });
    }
}

fn map_event(engine: &SearchEngine, event: SearchEvent) -> Option<Msg> {
    match event {
        SearchEvent::SearchStarted { card_count } => Some(Msg::SearchStarted {
            card_count,
            sources: engine
                .stores()
                .iter()
                .map(|store| store.source().clone())
                .collect(),
        }),
        SearchEvent::CardSearchStarted { .. } => None,
        SearchEvent::CardSearchEnded {
            card,
            outcome,
            source,
        } => Some(Msg::CardSearchEnded {
            source,
            card,
            outcome,
        }),
        SearchEvent::SourceTaskEnded { source, .. } => Some(Msg::SourceEnded { source }),
        SearchEvent::SourceTaskFailed { source, error } => Some(Msg::SourceFailed {
            source,
            message: error.to_string(),
        }),
        SearchEvent::SearchFinished { cancelled } => Some(Msg::SearchFinished { cancelled }),
    }
}

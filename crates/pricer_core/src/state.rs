use std::collections::HashMap;

use crate::view_model::{CardRowView, PricerViewModel, SourceProgressView};
use crate::{Card, CardEntry, Phase, SearchOutcome, SearchSettings, SettingsError, SourceId};

#[derive(Debug, Clone, PartialEq)]
struct SourceProgress {
    source: SourceId,
    done: usize,
    ended: bool,
    failure: Option<String>,
}

/// Front-end session: the settings being edited plus a mirror of the engine's
/// progress for rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricerState {
    settings: SearchSettings,
    phase: Phase,
    progress: Vec<SourceProgress>,
    outcomes: HashMap<(SourceId, Card), SearchOutcome>,
    cancel_requested: bool,
    was_cancelled: bool,
    last_error: Option<String>,
    dirty: bool,
}

impl PricerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SearchSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn view(&self) -> PricerViewModel {
        let columns = self.result_columns();
        let rows = self
            .settings
            .cards()
            .iter()
            .map(|card| CardRowView {
                card: card.clone(),
                quantity: self.settings.quantity(card).unwrap_or(1),
                cells: columns
                    .iter()
                    .map(|source| self.outcomes.get(&(source.clone(), card.clone())).cloned())
                    .collect(),
            })
            .collect();
        let total = self.settings.card_count();
        let sources = self
            .progress
            .iter()
            .map(|p| SourceProgressView {
                source: p.source.clone(),
                done: p.done,
                total,
                ended: p.ended,
                failure: p.failure.clone(),
            })
            .collect();

        PricerViewModel {
            phase: self.phase,
            columns,
            rows,
            sources,
            cancel_requested: self.cancel_requested,
            was_cancelled: self.was_cancelled,
            last_error: self.last_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.mark_dirty();
    }

    /// Runs a settings edit, allowed only while composing the request.
    pub(crate) fn edit_settings(
        &mut self,
        edit: impl FnOnce(&mut SearchSettings) -> Result<(), SettingsError>,
    ) {
        if self.phase != Phase::Setting {
            self.set_error(format!("settings are locked while {}", self.phase));
            return;
        }
        // Work on a copy so a failed edit leaves no partial changes.
        let mut next = self.settings.clone();
        match edit(&mut next) {
            Ok(()) => {
                self.settings = next;
                self.last_error = None;
                self.mark_dirty();
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    pub(crate) fn replace_cards(&mut self, entries: Vec<CardEntry>) {
        self.edit_settings(|settings| {
            let mut next = SearchSettings::from_entries(entries)?;
            for source in settings.sources() {
                next.add_source(source.clone())?;
            }
            *settings = next;
            Ok(())
        });
    }

    pub(crate) fn begin_search(&mut self) -> bool {
        if self.phase != Phase::Setting {
            return false;
        }
        if self.settings.card_count() == 0 {
            self.set_error("add at least one card before searching");
            return false;
        }
        if self.settings.sources().is_empty() {
            self.set_error("enable at least one source before searching");
            return false;
        }
        self.phase = Phase::Searching;
        self.clear_results();
        self.progress = self
            .settings
            .sources()
            .iter()
            .map(|source| SourceProgress {
                source: source.clone(),
                done: 0,
                ended: false,
                failure: None,
            })
            .collect();
        self.mark_dirty();
        true
    }

    pub(crate) fn request_cancel(&mut self) -> bool {
        if self.phase != Phase::Searching || self.cancel_requested {
            return false;
        }
        self.cancel_requested = true;
        self.mark_dirty();
        true
    }

    pub(crate) fn start_new_cycle(&mut self) -> bool {
        if self.phase != Phase::Finished {
            return false;
        }
        self.phase = Phase::Setting;
        self.clear_results();
        self.progress.clear();
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_card_outcome(&mut self, source: SourceId, card: Card, outcome: SearchOutcome) {
        if let Some(progress) = self.progress_mut(&source) {
            progress.done += 1;
        }
        self.outcomes.insert((source, card), outcome);
        self.mark_dirty();
    }

    pub(crate) fn apply_source_ended(&mut self, source: &SourceId, failure: Option<String>) {
        if let Some(progress) = self.progress_mut(source) {
            progress.ended = true;
            progress.failure = failure;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_search_finished(&mut self, cancelled: bool) {
        if self.phase != Phase::Searching {
            return;
        }
        self.phase = Phase::Finished;
        self.was_cancelled = cancelled;
        self.cancel_requested = false;
        self.mark_dirty();
    }

    pub(crate) fn apply_search_rejected(&mut self, message: String) {
        if self.phase != Phase::Searching {
            return;
        }
        self.phase = Phase::Setting;
        self.progress.clear();
        self.cancel_requested = false;
        self.set_error(message);
    }

    fn clear_results(&mut self) {
        self.outcomes.clear();
        self.cancel_requested = false;
        self.was_cancelled = false;
        self.last_error = None;
    }

    fn progress_mut(&mut self, source: &SourceId) -> Option<&mut SourceProgress> {
        self.progress.iter_mut().find(|p| &p.source == source)
    }

    fn result_columns(&self) -> Vec<SourceId> {
        self.progress.iter().map(|p| p.source.clone()).collect()
    }

    /// Aligns the progress columns with the sources the engine actually runs.
    pub(crate) fn apply_search_started(&mut self, sources: Vec<SourceId>) {
        if self.phase != Phase::Searching {
            return;
        }
        self.progress = sources
            .into_iter()
            .map(|source| SourceProgress {
                source,
                done: 0,
                ended: false,
                failure: None,
            })
            .collect();
        self.mark_dirty();
    }
}

use crate::{Card, Effect, Msg, PricerState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PricerState, msg: Msg) -> (PricerState, Vec<Effect>) {
    let effects = match msg {
        Msg::CardsImported(entries) => {
            state.replace_cards(entries);
            Vec::new()
        }
        Msg::AddCard { name, quantity } => {
            state.edit_settings(|settings| settings.add_card(Card::new(name), quantity));
            Vec::new()
        }
        Msg::RemoveCard(card) => {
            state.edit_settings(|settings| settings.remove_card(&card));
            Vec::new()
        }
        Msg::RenameCard { card, new_name } => {
            state.edit_settings(|settings| settings.replace_card(&card, Card::new(new_name)));
            Vec::new()
        }
        Msg::SetQuantity { card, quantity } => {
            state.edit_settings(|settings| settings.set_quantity(&card, quantity));
            Vec::new()
        }
        Msg::ToggleSource(source) => {
            state.edit_settings(|settings| {
                if settings.contains_source(&source) {
                    settings.remove_source(&source)
                } else {
                    settings.add_source(source)
                }
            });
            Vec::new()
        }
        Msg::StartClicked => {
            if state.begin_search() {
                vec![Effect::StartSearch(state.settings().clone())]
            } else {
                Vec::new()
            }
        }
        Msg::StopClicked => {
            if state.request_cancel() {
                vec![Effect::CancelSearch]
            } else {
                Vec::new()
            }
        }
        Msg::NewSearchClicked => {
            if state.start_new_cycle() {
                vec![Effect::ResetSearch]
            } else {
                Vec::new()
            }
        }
        Msg::SearchRejected { message } => {
            state.apply_search_rejected(message);
            Vec::new()
        }
        Msg::SearchStarted { sources, .. } => {
            state.apply_search_started(sources);
            Vec::new()
        }
        Msg::CardSearchEnded {
            source,
            card,
            outcome,
        } => {
            state.apply_card_outcome(source, card, outcome);
            Vec::new()
        }
        Msg::SourceEnded { source } => {
            state.apply_source_ended(&source, None);
            Vec::new()
        }
        Msg::SourceFailed { source, message } => {
            state.apply_source_ended(&source, Some(message));
            Vec::new()
        }
        Msg::SearchFinished { cancelled } => {
            state.apply_search_finished(cancelled);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

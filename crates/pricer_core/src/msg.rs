use crate::{Card, CardEntry, SearchOutcome, SourceId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A card list was imported; replaces the current cards.
    CardsImported(Vec<CardEntry>),
    /// User added a card row.
    AddCard { name: String, quantity: u32 },
    /// User deleted a card row.
    RemoveCard(Card),
    /// User edited a card name in place.
    RenameCard { card: Card, new_name: String },
    /// User edited a quantity.
    SetQuantity { card: Card, quantity: u32 },
    /// User switched a source on or off.
    ToggleSource(SourceId),
    /// User clicked Search.
    StartClicked,
    /// User clicked Stop.
    StopClicked,
    /// User asked for a fresh cycle after a finished search.
    NewSearchClicked,
    /// Engine refused to start; the session goes back to editing.
    SearchRejected { message: String },
    /// Engine accepted the search.
    SearchStarted {
        card_count: usize,
        sources: Vec<SourceId>,
    },
    /// Engine finished one card on one source.
    CardSearchEnded {
        source: SourceId,
        card: Card,
        outcome: SearchOutcome,
    },
    /// A source task ran to completion or stopped on cancellation.
    SourceEnded { source: SourceId },
    /// A source task aborted on a fetch error.
    SourceFailed { source: SourceId, message: String },
    /// Every source task stopped.
    SearchFinished { cancelled: bool },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

//! Card pricer core: domain types, search settings and the pure session
//! state machine.
mod card;
mod effect;
mod import;
mod msg;
mod phase;
mod settings;
mod source_id;
mod state;
mod update;
mod view_model;

pub use card::{format_price, normalize_card_name, Card, CardEntry, CardResult, SearchOutcome};
pub use effect::Effect;
pub use import::{format_card_list, parse_card_list, ImportError};
pub use msg::Msg;
pub use phase::Phase;
pub use settings::{SearchSettings, SettingsError};
pub use source_id::SourceId;
pub use state::PricerState;
pub use update::update;
pub use view_model::{CardRowView, PricerViewModel, SourceProgressView};

use std::collections::HashMap;

use thiserror::Error;

use crate::{Card, CardEntry, SourceId};

/// A violated [`SearchSettings`] invariant. Settings are left untouched when
/// one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("card '{0}' is already in the list")]
    DuplicateCard(Card),
    #[error("no card '{0}' in the list")]
    UnknownCard(Card),
    #[error("card name is empty")]
    EmptyCardName,
    #[error("quantity of '{card}' must be at least 1, got {quantity}")]
    InvalidQuantity { card: Card, quantity: u32 },
    #[error("source '{0}' is already enabled")]
    DuplicateSource(SourceId),
    #[error("source '{0}' is not enabled")]
    UnknownSource(SourceId),
}

/// Everything a search needs: the ordered cards with quantities and the
/// enabled sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSettings {
    cards: Vec<Card>,
    quantities: HashMap<Card, u32>,
    sources: Vec<SourceId>,
}

impl SearchSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds settings from an imported card list, in order.
    pub fn from_entries(
        entries: impl IntoIterator<Item = CardEntry>,
    ) -> Result<Self, SettingsError> {
        let mut settings = Self::new();
        for entry in entries {
            settings.add_card(entry.card, entry.quantity)?;
        }
        Ok(settings)
    }

    pub fn add_card(&mut self, card: Card, quantity: u32) -> Result<(), SettingsError> {
        if card.is_empty() {
            return Err(SettingsError::EmptyCardName);
        }
        self.ensure_absent(&card)?;
        check_quantity(&card, quantity)?;
        self.quantities.insert(card.clone(), quantity);
        self.cards.push(card);
        Ok(())
    }

    pub fn remove_card(&mut self, card: &Card) -> Result<(), SettingsError> {
        let index = self.index_of(card)?;
        self.cards.remove(index);
        self.quantities.remove(card);
        Ok(())
    }

    /// Swaps `old` for `new` at the same position, keeping the quantity.
    pub fn replace_card(&mut self, old: &Card, new: Card) -> Result<(), SettingsError> {
        let index = self.index_of(old)?;
        if new.is_empty() {
            return Err(SettingsError::EmptyCardName);
        }
        self.ensure_absent(&new)?;
        let quantity = self.quantities.remove(old).unwrap_or(1);
        self.quantities.insert(new.clone(), quantity);
        self.cards[index] = new;
        Ok(())
    }

    pub fn set_quantity(&mut self, card: &Card, quantity: u32) -> Result<(), SettingsError> {
        self.index_of(card)?;
        check_quantity(card, quantity)?;
        self.quantities.insert(card.clone(), quantity);
        Ok(())
    }

    pub fn quantity(&self, card: &Card) -> Option<u32> {
        self.quantities.get(card).copied()
    }

    pub fn contains_card(&self, card: &Card) -> bool {
        self.quantities.contains_key(card)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Cards with their quantities, in list order.
    pub fn entries(&self) -> Vec<CardEntry> {
        self.cards
            .iter()
            .map(|card| CardEntry::new(card.clone(), self.quantity(card).unwrap_or(1)))
            .collect()
    }

    pub fn add_source(&mut self, source: SourceId) -> Result<(), SettingsError> {
        if self.sources.contains(&source) {
            return Err(SettingsError::DuplicateSource(source));
        }
        self.sources.push(source);
        Ok(())
    }

    pub fn remove_source(&mut self, source: &SourceId) -> Result<(), SettingsError> {
        let index = self
            .sources
            .iter()
            .position(|s| s == source)
            .ok_or_else(|| SettingsError::UnknownSource(source.clone()))?;
        self.sources.remove(index);
        Ok(())
    }

    pub fn contains_source(&self, source: &SourceId) -> bool {
        self.sources.contains(source)
    }

    pub fn sources(&self) -> &[SourceId] {
        &self.sources
    }

    fn index_of(&self, card: &Card) -> Result<usize, SettingsError> {
        self.cards
            .iter()
            .position(|c| c == card)
            .ok_or_else(|| SettingsError::UnknownCard(card.clone()))
    }

    fn ensure_absent(&self, card: &Card) -> Result<(), SettingsError> {
        if self.contains_card(card) {
            Err(SettingsError::DuplicateCard(card.clone()))
        } else {
            Ok(())
        }
    }
}

fn check_quantity(card: &Card, quantity: u32) -> Result<(), SettingsError> {
    if quantity < 1 {
        return Err(SettingsError::InvalidQuantity {
            card: card.clone(),
            quantity,
        });
    }
    Ok(())
}

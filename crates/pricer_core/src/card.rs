use std::fmt;

/// Characters vendors emit in place of a plain apostrophe, including the
/// replacement character left behind by a wrongly decoded page.
const APOSTROPHE_LOOKALIKES: &[char] = &['`', '´', '‘', '’', '\u{FFFD}'];

/// Collapse whitespace runs to single spaces, trim, and unify apostrophe
/// look-alikes to `'`.
///
/// `normalize_card_name("Flames   of    Firebrand") == "Flames of Firebrand"`.
pub fn normalize_card_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().map(unify_apostrophe));
    }
    out
}

fn unify_apostrophe(c: char) -> char {
    if APOSTROPHE_LOOKALIKES.contains(&c) {
        '\''
    } else {
        c
    }
}

/// `Fire/Ice` and `Fire / Ice` become `Fire // Ice`.
fn join_split_halves(name: String) -> String {
    if name.contains("//") || !name.contains('/') {
        return name;
    }
    let halves: Vec<&str> = name.split('/').map(str::trim).collect();
    if halves.iter().any(|half| half.is_empty()) {
        return name;
    }
    halves.join(" // ")
}

/// Two decimals and the currency code, the way every report prints prices.
pub fn format_price(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

/// A requested card, identified by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    name: String,
}

impl Card {
    /// Normalizes the name; split cards are written `Fire // Ice` however
    /// the halves were separated.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: join_split_halves(normalize_card_name(name.as_ref())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A card paired with its requested copy count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEntry {
    pub card: Card,
    pub quantity: u32,
}

impl CardEntry {
    pub fn new(card: Card, quantity: u32) -> Self {
        Self { card, quantity }
    }
}

/// One priced offer returned by a vendor.
#[derive(Debug, Clone, PartialEq)]
pub struct CardResult {
    name: String,
    card_type: Option<String>,
    edition: Option<String>,
    price: f64,
    currency: String,
}

impl CardResult {
    /// The vendor's name is kept as returned, except for apostrophe look-alikes.
    pub fn new(name: impl AsRef<str>, price: f64, currency: impl Into<String>) -> Self {
        Self {
            name: name.as_ref().chars().map(unify_apostrophe).collect(),
            card_type: None,
            edition: None,
            price,
            currency: currency.into(),
        }
    }

    pub fn with_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into()).filter(|t: &String| !t.trim().is_empty());
        self
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into()).filter(|e: &String| !e.trim().is_empty());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn card_type(&self) -> Option<&str> {
        self.card_type.as_deref()
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Whether the price can take part in cheapest selection.
    pub fn has_usable_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }

    /// Price with currency, e.g. `1.50 EUR`.
    pub fn price_label(&self) -> String {
        format_price(self.price, &self.currency)
    }
}

impl fmt::Display for CardResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.price_label())?;
        if let Some(edition) = &self.edition {
            write!(f, " [{edition}]")?;
        }
        Ok(())
    }
}

/// What a source reported for one card.
///
/// "Not searched yet" is the absence of an outcome, never a variant.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(CardResult),
    NotFound,
}

impl SearchOutcome {
    pub fn result(&self) -> Option<&CardResult> {
        match self {
            SearchOutcome::Found(result) => Some(result),
            SearchOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

impl From<Option<CardResult>> for SearchOutcome {
    fn from(value: Option<CardResult>) -> Self {
        match value {
            Some(result) => SearchOutcome::Found(result),
            None => SearchOutcome::NotFound,
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Found(result) => write!(f, "{result}"),
            SearchOutcome::NotFound => f.write_str("not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_cards_get_one_spelling() {
        assert_eq!(Card::new("Fire/Ice").name(), "Fire // Ice");
        assert_eq!(Card::new("Fire /  Ice").name(), "Fire // Ice");
        assert_eq!(Card::new("Fire // Ice").name(), "Fire // Ice");
        assert_eq!(Card::new("Mountain").name(), "Mountain");
        assert_eq!(Card::new("/ Ice").name(), "/ Ice");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(
            normalize_card_name("Flames   of    Firebrand"),
            "Flames of Firebrand"
        );
        assert_eq!(normalize_card_name("  \tMountain \n"), "Mountain");
        assert_eq!(normalize_card_name("   "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "Flames   of    Firebrand",
            " Urza’s   Saga ",
            "Gaea`s Cradle",
            "",
            "Fire // Ice",
        ] {
            let once = normalize_card_name(raw);
            assert_eq!(normalize_card_name(&once), once);
        }
    }

    #[test]
    fn normalize_unifies_apostrophes() {
        assert_eq!(normalize_card_name("Urza’s Saga"), "Urza's Saga");
        assert_eq!(normalize_card_name("Gaea`s Cradle"), "Gaea's Cradle");
        assert_eq!(normalize_card_name("Sensei\u{FFFD}s Top"), "Sensei's Top");
    }

    #[test]
    fn cards_compare_by_normalized_name_case_sensitively() {
        assert_eq!(Card::new("Lightning  Bolt"), Card::new(" Lightning Bolt"));
        assert_ne!(Card::new("Lightning Bolt"), Card::new("lightning bolt"));
    }

    #[test]
    fn card_result_cleans_vendor_apostrophes_and_blank_fields() {
        let result = CardResult::new("Urza`s Saga", 3.5, "EUR")
            .with_type("  ")
            .with_edition("Time Spiral");
        assert_eq!(result.name(), "Urza's Saga");
        assert_eq!(result.card_type(), None);
        assert_eq!(result.edition(), Some("Time Spiral"));
        assert_eq!(result.price_label(), "3.50 EUR");
    }

    #[test]
    fn unusable_prices_are_flagged() {
        assert!(CardResult::new("A", 0.0, "EUR").has_usable_price());
        assert!(!CardResult::new("A", -1.0, "EUR").has_usable_price());
        assert!(!CardResult::new("A", f64::NAN, "EUR").has_usable_price());
    }
}

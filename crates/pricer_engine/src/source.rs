use pricer_core::{normalize_card_name, CardResult, SearchOutcome, SourceId};
use url::Url;

use crate::SourceError;

/// Stable identity of a price source plus the currency its prices are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentity {
    id: SourceId,
    currency: String,
}

impl SourceIdentity {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            id: SourceId::new(name, base_url),
            currency: currency.into(),
        }
    }

    pub fn id(&self) -> &SourceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    pub fn base_url(&self) -> &str {
        self.id.base_url()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

/// One vendor's price lookup.
///
/// Adapters only fetch raw candidates; normalization, exact-name filtering and
/// cheapest selection are shared by every source through [`find_cheapest`].
///
/// [`find_cheapest`]: PriceSource::find_cheapest
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Raw, possibly over-broad matches for an already normalized name.
    async fn fetch_candidates(&self, normalized_name: &str) -> Result<Vec<CardResult>, SourceError>;

    fn identity(&self) -> &SourceIdentity;

    /// Page a person can open to run the same search by hand.
    fn search_url(&self, name: &str) -> Url;

    fn id(&self) -> &SourceId {
        self.identity().id()
    }

    /// Cheapest candidate whose name matches `name` exactly, ignoring case.
    async fn find_cheapest(&self, name: &str) -> Result<SearchOutcome, SourceError> {
        let query = normalize_card_name(name);
        let candidates = self.fetch_candidates(&query).await?;
        Ok(select_cheapest(&query, candidates).into())
    }
}

/// Drops candidates that are not exactly `query` (case-insensitive) or carry
/// no usable price, then keeps the strictly cheapest one. Equal prices keep
/// the earliest candidate.
pub fn select_cheapest(query: &str, candidates: Vec<CardResult>) -> Option<CardResult> {
    let wanted = query.to_lowercase();
    let mut cheapest: Option<CardResult> = None;
    for candidate in candidates {
        if !candidate.has_usable_price() || candidate.name().to_lowercase() != wanted {
            continue;
        }
        let is_cheaper = cheapest
            .as_ref()
            .map_or(true, |best| candidate.price() < best.price());
        if is_cheaper {
            cheapest = Some(candidate);
        }
    }
    cheapest
}

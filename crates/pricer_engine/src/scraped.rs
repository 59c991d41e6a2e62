use pricer_core::{normalize_card_name, CardResult};
use pricer_logging::{pricer_debug, pricer_warn};
use scraper::{ElementRef, Selector};
use url::Url;

use crate::{FailureKind, FetchSettings, PageFetcher, PriceSource, SourceError, SourceIdentity};

/// Upper bound on result pages fetched for a single card.
pub const MAX_PAGES: usize = 20;

/// Candidates parsed from one vendor result page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    pub candidates: Vec<CardResult>,
    /// Total hits across all pages, when the page states it.
    pub total_results: Option<usize>,
}

/// What a scraped vendor contributes: where its result pages live and how to
/// read one.
pub trait VendorPages: Send + Sync {
    fn identity(&self) -> &SourceIdentity;

    /// `None` when the vendor returns everything on one page.
    fn results_per_page(&self) -> Option<usize>;

    /// 1-based result page for an already normalized name.
    fn page_url(&self, name: &str, page: usize) -> Url;

    fn parse_page(&self, html: &str) -> Result<ResultPage, SourceError>;
}

/// A [`PriceSource`] backed by a vendor's HTML search pages.
pub struct ScrapedSource<V> {
    vendor: V,
    fetcher: PageFetcher,
}

impl<V: VendorPages> ScrapedSource<V> {
    pub fn new(vendor: V, settings: FetchSettings) -> Self {
        Self {
            vendor,
            fetcher: PageFetcher::new(settings),
        }
    }

    pub fn vendor(&self) -> &V {
        &self.vendor
    }

    async fn fetch_page(&self, name: &str, page: usize) -> Result<ResultPage, SourceError> {
        let url = self.vendor.page_url(name, page);
        let html = self.fetcher.fetch_html(&url).await?;
        self.vendor.parse_page(&html)
    }
}

#[async_trait::async_trait]
impl<V: VendorPages> PriceSource for ScrapedSource<V> {
    async fn fetch_candidates(&self, normalized_name: &str) -> Result<Vec<CardResult>, SourceError> {
        let first = self.fetch_page(normalized_name, 1).await?;
        let pages = match (first.total_results, self.vendor.results_per_page()) {
            (Some(total), Some(per_page)) => page_count(total, per_page),
            _ => 1,
        };
        if pages > MAX_PAGES {
            pricer_warn!(
                "{}: {normalized_name} spans {pages} pages, reading the first {MAX_PAGES}",
                self.vendor.identity().id()
            );
        }

        let mut candidates = first.candidates;
        for page in 2..=pages.min(MAX_PAGES) {
            let next = self.fetch_page(normalized_name, page).await?;
            candidates.extend(next.candidates);
        }
        pricer_debug!(
            "{}: {} candidates for {normalized_name}",
            self.vendor.identity().id(),
            candidates.len()
        );
        Ok(candidates)
    }

    fn identity(&self) -> &SourceIdentity {
        self.vendor.identity()
    }

    fn search_url(&self, name: &str) -> Url {
        self.vendor.page_url(&normalize_card_name(name), 1)
    }
}

/// Pages needed for `total` hits, never less than one.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 1;
    }
    total.div_ceil(per_page).max(1)
}

/// Parses the `n`-th (0-based) run of digits, dots and commas in `text`,
/// reading a comma as the decimal point.
///
/// `nth_number("Položky 1 až 30 z celkem 95", 2) == Some(95.0)`.
pub fn nth_number(text: &str, n: usize) -> Option<f64> {
    text.split(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .map(|run| run.trim_matches(['.', ',']))
        .filter(|run| run.chars().any(|c| c.is_ascii_digit()))
        .nth(n)
        .and_then(|run| run.replace(',', ".").parse().ok())
}

/// Parses a price label such as `"12,50 €"` or `"1 200 Kč"`.
///
/// Digit groups separated by plain spaces are joined first.
pub fn parse_price(text: &str) -> Option<f64> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    nth_number(&compact, 0)
}

/// Static selectors are checked by tests, so a failure here is reported as a
/// parse error instead of a panic.
pub fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css)
        .map_err(|err| SourceError::new(FailureKind::Parse, format!("bad selector {css}: {err}")))
}

/// Element text with whitespace runs collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_card_name(&element.text().collect::<String>())
}

/// Base URL with a trailing slash, so relative paths join below it.
pub fn base_url(raw: &str) -> Result<Url, SourceError> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|err| SourceError::new(FailureKind::InvalidUrl, err.to_string()))
}

use pricer_core::CardResult;
use pricer_logging::pricer_debug;
use scraper::{ElementRef, Html};
use url::Url;

use crate::scraped::{base_url, element_text, nth_number, parse_price, selector};
use crate::{FailureKind, ResultPage, SourceError, SourceIdentity, VendorPages};

pub const NAME: &str = "Cerny Rytir";
pub const DEFAULT_BASE_URL: &str = "http://www.cernyrytir.cz/";
pub const CURRENCY: &str = "CZK";
pub const RESULTS_PER_PAGE: usize = 30;

/// Czech shop whose results come as a table with three rows per card.
#[derive(Debug, Clone)]
pub struct CernyRytir {
    identity: SourceIdentity,
    base: Url,
}

impl CernyRytir {
    pub fn new(base: &str) -> Result<Self, SourceError> {
        let base = base_url(base)?;
        Ok(Self {
            identity: SourceIdentity::new(NAME, base.as_str(), CURRENCY),
            base,
        })
    }
}

impl VendorPages for CernyRytir {
    fn identity(&self) -> &SourceIdentity {
        &self.identity
    }

    fn results_per_page(&self) -> Option<usize> {
        Some(RESULTS_PER_PAGE)
    }

    fn page_url(&self, name: &str, page: usize) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("{}index.php3", self.base.path()));
        let offset = page.saturating_sub(1) * RESULTS_PER_PAGE;
        url.query_pairs_mut()
            .append_pair("akce", "3")
            .append_pair("limit", &offset.to_string())
            .append_pair("jmenokarty", name)
            .append_pair("edice_magic", "libovolna")
            .append_pair("poczob", &RESULTS_PER_PAGE.to_string())
            .append_pair("foil", "A")
            .append_pair("triditpodle", "ceny")
            .append_pair("hledej_pouze_magic", "1")
            .append_pair("submit", "Vyhledej");
        url
    }

    fn parse_page(&self, html: &str) -> Result<ResultPage, SourceError> {
        let doc = Html::parse_document(html);
        let tables: Vec<_> = doc.select(&selector("table.kusovkytext")?).collect();
        if tables.is_empty() {
            return Err(SourceError::new(
                FailureKind::Parse,
                "no result table on the page",
            ));
        }

        let total_results = doc
            .select(&selector("span.kusovkytext")?)
            .next()
            .and_then(|span| nth_number(&element_text(span), 0))
            .map(|total| total as usize);

        let Some(results) = tables.get(1) else {
            return Ok(ResultPage {
                candidates: Vec::new(),
                total_results,
            });
        };

        let name_sel = selector("td div font")?;
        let rows: Vec<_> = results.select(&selector("tbody > tr")?).collect();
        let mut candidates = Vec::new();
        for group in rows.chunks_exact(3) {
            let name = group[0]
                .select(&name_sel)
                .map(element_text)
                .collect::<Vec<_>>()
                .join(" ");
            let edition = cell_text(group[1], 0).unwrap_or_default();
            let card_type = cell_text(group[2], 0).unwrap_or_default();
            let Some(price) = cell_text(group[2], 2).as_deref().and_then(parse_price) else {
                pricer_debug!("{NAME}: skipping {name} without a readable price");
                continue;
            };
            candidates.push(
                CardResult::new(name, price, CURRENCY)
                    .with_edition(edition)
                    .with_type(card_type),
            );
        }

        Ok(ResultPage {
            candidates,
            total_results,
        })
    }
}

/// Text of the `index`-th `td` directly under `row`.
fn cell_text(row: ElementRef<'_>, index: usize) -> Option<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td")
        .nth(index)
        .map(element_text)
}

use pricer_core::CardResult;
use pricer_logging::pricer_debug;
use scraper::Html;
use url::Url;

use crate::scraped::{base_url, element_text, nth_number, parse_price, selector};
use crate::{ResultPage, SourceError, SourceIdentity, VendorPages};

pub const NAME: &str = "Draco";
pub const DEFAULT_BASE_URL: &str = "http://shop.dragonhost.eu/";
pub const CURRENCY: &str = "EUR";
/// The shop ignores larger limits.
pub const RESULTS_PER_PAGE: usize = 120;

/// Magento catalog search of the Draco shop.
#[derive(Debug, Clone)]
pub struct Draco {
    identity: SourceIdentity,
    base: Url,
}

impl Draco {
    pub fn new(base: &str) -> Result<Self, SourceError> {
        let base = base_url(base)?;
        Ok(Self {
            identity: SourceIdentity::new(NAME, base.as_str(), CURRENCY),
            base,
        })
    }
}

impl VendorPages for Draco {
    fn identity(&self) -> &SourceIdentity {
        &self.identity
    }

    fn results_per_page(&self) -> Option<usize> {
        Some(RESULTS_PER_PAGE)
    }

    fn page_url(&self, name: &str, page: usize) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("{}catalogsearch/result/index/", self.base.path()));
        url.query_pairs_mut()
            .append_pair("limit", &RESULTS_PER_PAGE.to_string())
            .append_pair("p", &page.to_string())
            .append_pair("q", name);
        url
    }

    fn parse_page(&self, html: &str) -> Result<ResultPage, SourceError> {
        let doc = Html::parse_document(html);

        // "Items: 19" for one page, "Items 1 to 120 of 129" otherwise. The
        // toolbar is repeated below the list, so only the first one counts.
        let Some(amount) = doc
            .select(&selector("div.category-products p.amount")?)
            .next()
            .map(element_text)
        else {
            return Ok(ResultPage {
                candidates: Vec::new(),
                total_results: Some(0),
            });
        };
        let position = if digit_runs(&amount) > 1 { 2 } else { 0 };
        let total_results = nth_number(&amount, position).map(|total| total as usize);

        let name_sel = selector("h2.product-name a")?;
        let price_sel = selector("span.price")?;
        let mut candidates = Vec::new();
        for item in doc.select(&selector("div.col-main li.item")?) {
            let name = item
                .select(&name_sel)
                .next()
                .map(element_text)
                .unwrap_or_default();
            let Some(price) = item
                .select(&price_sel)
                .next()
                .map(element_text)
                .as_deref()
                .and_then(parse_price)
            else {
                pricer_debug!("{NAME}: skipping {name} without a readable price");
                continue;
            };
            candidates.push(CardResult::new(name, price, CURRENCY));
        }

        Ok(ResultPage {
            candidates,
            total_results,
        })
    }
}

fn digit_runs(text: &str) -> usize {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .count()
}

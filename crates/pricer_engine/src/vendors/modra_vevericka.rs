use pricer_core::CardResult;
use pricer_logging::pricer_debug;
use scraper::Html;
use url::Url;

use crate::scraped::{base_url, element_text, parse_price, selector};
use crate::{ResultPage, SourceError, SourceIdentity, VendorPages};

pub const NAME: &str = "Modra Vevericka";
pub const DEFAULT_BASE_URL: &str = "http://www.modravevericka.sk/";
pub const CURRENCY: &str = "EUR";

/// Slovak shop; the listing URL asks for a page big enough to hold every hit.
#[derive(Debug, Clone)]
pub struct ModraVevericka {
    identity: SourceIdentity,
    base: Url,
}

impl ModraVevericka {
    pub fn new(base: &str) -> Result<Self, SourceError> {
        let base = base_url(base)?;
        Ok(Self {
            identity: SourceIdentity::new(NAME, base.as_str(), CURRENCY),
            base,
        })
    }
}

impl VendorPages for ModraVevericka {
    fn identity(&self) -> &SourceIdentity {
        &self.identity
    }

    fn results_per_page(&self) -> Option<usize> {
        None
    }

    fn page_url(&self, name: &str, _page: usize) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!(
            "{}x-cards,x-page-1-size-10000-order-name-asc.html",
            self.base.path()
        ));
        url.query_pairs_mut()
            .append_pair("onclick", "run_shopping_assistant")
            .append_pair("filter_name", name);
        url
    }

    fn parse_page(&self, html: &str) -> Result<ResultPage, SourceError> {
        let doc = Html::parse_document(html);
        let name_sel = selector("div.name a")?;
        let price_sel = selector("div.price")?;

        let mut candidates = Vec::new();
        for card in doc.select(&selector("#card_list div.card")?) {
            let name = card
                .select(&name_sel)
                .next()
                .map(element_text)
                .unwrap_or_default();
            let Some(price) = card
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
            total_results: Some(candidates.len()),
            candidates,
        })
    }
}

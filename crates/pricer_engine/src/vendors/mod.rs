//! Scraped vendor adapters.
use std::sync::Arc;

use crate::{FetchSettings, PriceSource, ScrapedSource, SourceError};

pub mod cerny_rytir;
pub mod draco;
pub mod modra_vevericka;

pub use cerny_rytir::CernyRytir;
pub use draco::Draco;
pub use modra_vevericka::ModraVevericka;

/// Every built-in vendor at its public address.
pub fn default_sources(settings: &FetchSettings) -> Result<Vec<Arc<dyn PriceSource>>, SourceError> {
    let cerny = ScrapedSource::new(
        CernyRytir::new(cerny_rytir::DEFAULT_BASE_URL)?,
        settings.clone(),
    );
    let dragon = ScrapedSource::new(Draco::new(draco::DEFAULT_BASE_URL)?, settings.clone());
    let vevericka = ScrapedSource::new(
        ModraVevericka::new(modra_vevericka::DEFAULT_BASE_URL)?,
        settings.clone(),
    );
    Ok(vec![
        Arc::new(cerny) as Arc<dyn PriceSource>,
        Arc::new(dragon),
        Arc::new(vevericka),
    ])
}

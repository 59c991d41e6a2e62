//! Card pricer engine: price sources, concurrent search execution and
//! report output.
mod decode;
mod engine;
mod fetch;
mod observer;
mod report;
mod report_file;
mod scraped;
mod source;
mod store;
mod types;
pub mod vendors;

pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use engine::SearchEngine;
pub use fetch::{FetchSettings, PageFetcher};
pub use observer::{ChannelObserver, SearchObserver};
pub use report::{GridCell, GridRow, PriceGrid, SourceTotal};
pub use report_file::{ensure_output_dir, AtomicFileWriter, PersistError, ReportKind, EXPORT_STEM};
pub use scraped::{
    element_text, nth_number, page_count, parse_price, selector, ResultPage, ScrapedSource,
    VendorPages, MAX_PAGES,
};
pub use source::{select_cheapest, PriceSource, SourceIdentity};
pub use store::ResultStore;
pub use types::{EngineError, FailureKind, SearchEvent, SourceError};

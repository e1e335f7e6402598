//! Data acquisition: constituent scrape, session cache, price history.

pub mod cache;
pub mod history;
pub mod html;
pub mod provider;
pub mod wiki;
pub mod yahoo;

pub use cache::TableCache;
pub use history::{fetch_ytd, ytd_range, PriceHistory};
pub use provider::{
    DataError, FetchProgress, PricePoint, PriceProvider, PriceSeries, SilentProgress,
    StdoutProgress,
};
pub use wiki::{WikiSource, CONSTITUENTS_URL};
pub use yahoo::YahooProvider;

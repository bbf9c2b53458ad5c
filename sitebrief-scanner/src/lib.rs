pub mod canonical;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod frontier;
pub mod result;

pub use crawler::{CrawlEvent, Crawler, ProgressCallback};
pub use error::ScanError;
pub use result::{CrawlOutcome, Heading, PageRecord};

pub mod detail;
pub mod listing;

#[cfg(test)]
pub(crate) mod tests;

pub use detail::DetailExtractor;
pub use listing::{ListingPageScraper, PageReport};

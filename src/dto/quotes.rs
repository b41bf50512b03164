//! DTOs for the quote builder and saved quotes.

use crate::domain::quote::{Quote, QuoteLineItem, QuoteSummary};
use crate::domain::region::{PricedService, Region};

#[derive(Debug)]
pub struct QuoteBuilderData {
    pub regions: Vec<Region>,
    /// `None` when the hub has no regions yet.
    pub selected: Option<Region>,
    pub services: Vec<PricedService>,
    pub size_bands: &'static [&'static str],
    pub default_sqft: i32,
}

#[derive(Debug)]
pub struct QuotesPageData {
    pub quotes: Vec<Quote>,
}

#[derive(Debug)]
pub struct QuotePageData {
    pub quote: Quote,
    pub items: Vec<QuoteLineItem>,
    pub summary: QuoteSummary,
}

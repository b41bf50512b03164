//! DTO modules that bridge services with templates and APIs.

pub mod api;
pub mod dashboard;
pub mod events;
pub mod owners;
pub mod personnel;
pub mod portal;
pub mod price_master;
pub mod properties;
pub mod quotes;
pub mod regions;
pub mod tickets;

/// Generated spreadsheet handed to the route for download.
#[derive(Debug)]
pub struct CsvDownload {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Delivery tally of the notifications triggered by an operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NotifyOutcome {
    pub sent: usize,
    pub failed: usize,
}

use crate::domain::price_entry::PriceEntry;

#[derive(Debug)]
pub struct PriceMasterPageData {
    pub entries: Vec<PriceEntry>,
}

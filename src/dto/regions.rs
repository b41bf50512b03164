use crate::domain::region::{CatalogEntry, PricedService, Region};

#[derive(Debug)]
pub struct RegionsPageData {
    /// Regions with their active rates joined to catalogue names.
    pub regions: Vec<(Region, Vec<PricedService>)>,
    pub catalog: Vec<CatalogEntry>,
}

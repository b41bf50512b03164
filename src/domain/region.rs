use serde::{Deserialize, Serialize};

use crate::domain::types::{
    Amount, CatalogEntryId, CatalogName, HubId, RegionId, RegionPart, RegionRateId, ServiceCode,
    VisitCount,
};

/// Label fragment used to pick the default quoting region.
pub const DEFAULT_REGION_MARKER: &str = "TX - Frisco";

/// Pricing region. The factors are recorded for reference and are not
/// applied to rates.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub hub_id: HubId,
    pub state: RegionPart,
    pub city: RegionPart,
    pub property_type: RegionPart,
    pub labor_factor: f64,
    pub material_factor: f64,
}

impl Region {
    /// Human readable `"{state} - {city} - {property_type}"` label.
    pub fn label(&self) -> String {
        format!("{} - {} - {}", self.state, self.city, self.property_type)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewRegion {
    pub hub_id: HubId,
    pub state: RegionPart,
    pub city: RegionPart,
    pub property_type: RegionPart,
    pub labor_factor: f64,
    pub material_factor: f64,
}

/// Standard service offered by a hub.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: CatalogEntryId,
    pub hub_id: HubId,
    pub code: ServiceCode,
    pub display_name: CatalogName,
    pub default_times_per_year: VisitCount,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCatalogEntry {
    pub hub_id: HubId,
    pub code: ServiceCode,
    pub display_name: CatalogName,
    pub default_times_per_year: VisitCount,
}

/// Per-visit base price of a catalogue service in a region.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegionRate {
    pub id: RegionRateId,
    pub region_id: RegionId,
    pub service_code: ServiceCode,
    pub base_price_per_visit: Amount,
    pub min_sqft: Option<i32>,
    pub max_sqft: Option<i32>,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewRegionRate {
    pub region_id: RegionId,
    pub service_code: ServiceCode,
    pub base_price_per_visit: Amount,
    pub min_sqft: Option<i32>,
    pub max_sqft: Option<i32>,
    pub active: bool,
}

/// Region rate joined with the catalogue entry it prices.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PricedService {
    pub rate: RegionRate,
    pub display_name: String,
    pub default_times_per_year: i32,
}

/// Joins rates to catalogue entries by code. Rates without a catalogue entry
/// fall back to their code as a name and zero default visits.
pub fn price_services(rates: Vec<RegionRate>, catalog: &[CatalogEntry]) -> Vec<PricedService> {
    let mut priced: Vec<PricedService> = rates
        .into_iter()
        .map(|rate| {
            let entry = catalog.iter().find(|c| c.code == rate.service_code);
            PricedService {
                display_name: entry
                    .map(|c| c.display_name.to_string())
                    .unwrap_or_else(|| rate.service_code.to_string()),
                default_times_per_year: entry.map(|c| c.default_times_per_year.get()).unwrap_or(0),
                rate,
            }
        })
        .collect();
    priced.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    priced
}

/// The first region whose label contains [`DEFAULT_REGION_MARKER`], else the
/// first region.
pub fn default_region(regions: &[Region]) -> Option<&Region> {
    regions
        .iter()
        .find(|r| r.label().contains(DEFAULT_REGION_MARKER))
        .or_else(|| regions.first())
}

use diesel::prelude::*;

use crate::domain::region::{
    CatalogEntry as DomainCatalogEntry, NewCatalogEntry as DomainNewCatalogEntry,
    NewRegion as DomainNewRegion, NewRegionRate as DomainNewRegionRate, Region as DomainRegion,
    RegionRate as DomainRegionRate,
};
use crate::domain::types::{
    Amount, CatalogEntryId, CatalogName, HubId, RegionId, RegionPart, RegionRateId, ServiceCode,
    TypeConstraintError, VisitCount,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::regions)]
pub struct Region {
    pub id: i32,
    pub hub_id: i32,
    pub state: String,
    pub city: String,
    pub property_type: String,
    pub labor_factor: f64,
    pub material_factor: f64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::regions)]
pub struct NewRegion<'a> {
    pub hub_id: i32,
    pub state: &'a str,
    pub city: &'a str,
    pub property_type: &'a str,
    pub labor_factor: f64,
    pub material_factor: f64,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::catalog_entries)]
pub struct CatalogEntry {
    pub id: i32,
    pub hub_id: i32,
    pub code: String,
    pub display_name: String,
    pub default_times_per_year: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::catalog_entries)]
pub struct NewCatalogEntry<'a> {
    pub hub_id: i32,
    pub code: &'a str,
    pub display_name: &'a str,
    pub default_times_per_year: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Region, foreign_key = region_id))]
#[diesel(table_name = crate::schema::region_rates)]
pub struct RegionRate {
    pub id: i32,
    pub region_id: i32,
    pub service_code: String,
    pub base_price_per_visit: f64,
    pub min_sqft: Option<i32>,
    pub max_sqft: Option<i32>,
    pub active: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::region_rates)]
pub struct NewRegionRate<'a> {
    pub region_id: i32,
    pub service_code: &'a str,
    pub base_price_per_visit: f64,
    pub min_sqft: Option<i32>,
    pub max_sqft: Option<i32>,
    pub active: bool,
}

impl TryFrom<Region> for DomainRegion {
    type Error = TypeConstraintError;

    fn try_from(row: Region) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RegionId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            state: RegionPart::new(row.state)?,
            city: RegionPart::new(row.city)?,
            property_type: RegionPart::new(row.property_type)?,
            labor_factor: row.labor_factor,
            material_factor: row.material_factor,
        })
    }
}

impl<'a> From<&'a DomainNewRegion> for NewRegion<'a> {
    fn from(region: &'a DomainNewRegion) -> Self {
        Self {
            hub_id: region.hub_id.get(),
            state: region.state.as_str(),
            city: region.city.as_str(),
            property_type: region.property_type.as_str(),
            labor_factor: region.labor_factor,
            material_factor: region.material_factor,
        }
    }
}

impl TryFrom<CatalogEntry> for DomainCatalogEntry {
    type Error = TypeConstraintError;

    fn try_from(row: CatalogEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CatalogEntryId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            code: ServiceCode::new(row.code)?,
            display_name: CatalogName::new(row.display_name)?,
            default_times_per_year: VisitCount::new(row.default_times_per_year)?,
        })
    }
}

impl<'a> From<&'a DomainNewCatalogEntry> for NewCatalogEntry<'a> {
    fn from(entry: &'a DomainNewCatalogEntry) -> Self {
        Self {
            hub_id: entry.hub_id.get(),
            code: entry.code.as_str(),
            display_name: entry.display_name.as_str(),
            default_times_per_year: entry.default_times_per_year.get(),
        }
    }
}

impl TryFrom<RegionRate> for DomainRegionRate {
    type Error = TypeConstraintError;

    fn try_from(row: RegionRate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RegionRateId::try_from(row.id)?,
            region_id: RegionId::try_from(row.region_id)?,
            service_code: ServiceCode::new(row.service_code)?,
            base_price_per_visit: Amount::new(row.base_price_per_visit)?,
            min_sqft: row.min_sqft,
            max_sqft: row.max_sqft,
            active: row.active,
        })
    }
}

impl<'a> From<&'a DomainNewRegionRate> for NewRegionRate<'a> {
    fn from(rate: &'a DomainNewRegionRate) -> Self {
        Self {
            region_id: rate.region_id.get(),
            service_code: rate.service_code.as_str(),
            base_price_per_visit: rate.base_price_per_visit.get(),
            min_sqft: rate.min_sqft,
            max_sqft: rate.max_sqft,
            active: rate.active,
        }
    }
}

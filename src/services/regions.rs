//! Pricing regions, the service catalogue and regional rates.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::region::{CatalogEntry, NewRegionRate, Region, RegionRate, price_services};
use crate::domain::types::HubId;
use crate::dto::regions::RegionsPageData;
use crate::forms::regions::{
    CatalogEntryForm, CatalogEntryPayload, RegionForm, RegionPayload, RegionRateForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{RegionReader, RegionWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Every region with its active rates named after the catalogue.
pub fn list_regions<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<RegionsPageData>
where
    R: RegionReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let catalog = repo.list_catalog_entries(hub_id)?;
    let regions = repo
        .list_regions(hub_id)?
        .into_iter()
        .map(|region| {
            let rates = repo.list_region_rates(region.id, true)?;
            Ok((region, price_services(rates, &catalog)))
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(RegionsPageData { regions, catalog })
}

pub fn add_region<R>(repo: &R, user: &AuthenticatedUser, form: RegionForm) -> ServiceResult<Region>
where
    R: RegionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = RegionPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;

    let region = repo.create_region(&payload.into_domain(hub_id))?;

    Ok(region)
}

pub fn add_catalog_entry<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CatalogEntryForm,
) -> ServiceResult<CatalogEntry>
where
    R: RegionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = CatalogEntryPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;

    let entry = repo.upsert_catalog_entry(&payload.into_domain(hub_id))?;

    Ok(entry)
}

/// Inserts or updates the rate of one service in a region of the hub.
pub fn upsert_rate<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RegionRateForm,
) -> ServiceResult<RegionRate>
where
    R: RegionReader + RegionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let rate = NewRegionRate::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;

    repo.get_region_by_id(rate.region_id, hub_id)?
        .ok_or_else(|| ServiceError::Form("Unknown region.".to_string()))?;

    let rate = repo.upsert_region_rate(&rate).map_err(|err| {
        log::error!("Failed to store rate for region {}: {err}", rate.region_id);
        err
    })?;

    Ok(rate)
}

//! Regions, the service catalogue and per-region rates used by the quote builder.

use diesel::{prelude::*, upsert::excluded};

use crate::domain::region::{
    CatalogEntry, NewCatalogEntry, NewRegion, NewRegionRate, Region, RegionRate,
};
use crate::domain::types::{HubId, RegionId};
use crate::models::region::{
    CatalogEntry as DbCatalogEntry, NewCatalogEntry as DbNewCatalogEntry, NewRegion as DbNewRegion,
    NewRegionRate as DbNewRegionRate, Region as DbRegion, RegionRate as DbRegionRate,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, RegionReader, RegionWriter};

impl RegionReader for DieselRepository {
    fn get_region_by_id(&self, id: RegionId, hub_id: HubId) -> RepositoryResult<Option<Region>> {
        use crate::schema::regions;

        let mut conn = self.conn()?;
        let row = regions::table
            .filter(regions::id.eq(id.get()))
            .filter(regions::hub_id.eq(hub_id.get()))
            .first::<DbRegion>(&mut conn)
            .optional()?;

        Ok(row.map(Region::try_from).transpose()?)
    }

    fn list_regions(&self, hub_id: HubId) -> RepositoryResult<Vec<Region>> {
        use crate::schema::regions;

        let mut conn = self.conn()?;
        regions::table
            .filter(regions::hub_id.eq(hub_id.get()))
            .order((
                regions::state.asc(),
                regions::city.asc(),
                regions::property_type.asc(),
            ))
            .load::<DbRegion>(&mut conn)?
            .into_iter()
            .map(|row| Region::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn list_catalog_entries(&self, hub_id: HubId) -> RepositoryResult<Vec<CatalogEntry>> {
        use crate::schema::catalog_entries;

        let mut conn = self.conn()?;
        catalog_entries::table
            .filter(catalog_entries::hub_id.eq(hub_id.get()))
            .order(catalog_entries::display_name.asc())
            .load::<DbCatalogEntry>(&mut conn)?
            .into_iter()
            .map(|row| CatalogEntry::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn list_region_rates(
        &self,
        region_id: RegionId,
        active_only: bool,
    ) -> RepositoryResult<Vec<RegionRate>> {
        use crate::schema::region_rates;

        let mut conn = self.conn()?;
        let mut query = region_rates::table
            .filter(region_rates::region_id.eq(region_id.get()))
            .into_boxed();
        if active_only {
            query = query.filter(region_rates::active.eq(true));
        }

        query
            .order(region_rates::service_code.asc())
            .load::<DbRegionRate>(&mut conn)?
            .into_iter()
            .map(|row| RegionRate::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl RegionWriter for DieselRepository {
    fn create_region(&self, region: &NewRegion) -> RepositoryResult<Region> {
        use crate::schema::regions;

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let existing = regions::table
                .filter(regions::hub_id.eq(region.hub_id.get()))
                .filter(regions::state.eq(region.state.as_str()))
                .filter(regions::city.eq(region.city.as_str()))
                .filter(regions::property_type.eq(region.property_type.as_str()))
                .first::<DbRegion>(conn)
                .optional()?;

            let row = match existing {
                Some(row) => row,
                None => diesel::insert_into(regions::table)
                    .values(&DbNewRegion::from(region))
                    .get_result::<DbRegion>(conn)?,
            };

            Ok(Region::try_from(row)?)
        })
    }

    fn upsert_catalog_entry(&self, entry: &NewCatalogEntry) -> RepositoryResult<CatalogEntry> {
        use crate::schema::catalog_entries;

        let mut conn = self.conn()?;
        let row = diesel::insert_into(catalog_entries::table)
            .values(&DbNewCatalogEntry::from(entry))
            .on_conflict((catalog_entries::hub_id, catalog_entries::code))
            .do_update()
            .set((
                catalog_entries::display_name.eq(excluded(catalog_entries::display_name)),
                catalog_entries::default_times_per_year
                    .eq(excluded(catalog_entries::default_times_per_year)),
            ))
            .get_result::<DbCatalogEntry>(&mut conn)?;

        Ok(CatalogEntry::try_from(row)?)
    }

    fn upsert_region_rate(&self, rate: &NewRegionRate) -> RepositoryResult<RegionRate> {
        use crate::schema::region_rates;

        let mut conn = self.conn()?;
        let row = diesel::insert_into(region_rates::table)
            .values(&DbNewRegionRate::from(rate))
            .on_conflict((region_rates::region_id, region_rates::service_code))
            .do_update()
            .set((
                region_rates::base_price_per_visit.eq(excluded(region_rates::base_price_per_visit)),
                region_rates::min_sqft.eq(excluded(region_rates::min_sqft)),
                region_rates::max_sqft.eq(excluded(region_rates::max_sqft)),
                region_rates::active.eq(excluded(region_rates::active)),
            ))
            .get_result::<DbRegionRate>(&mut conn)?;

        Ok(RegionRate::try_from(row)?)
    }
}

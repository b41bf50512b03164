use diesel::prelude::*;

use crate::domain::price_entry::{NewPriceEntry, PriceEntry, UpdatePriceEntry};
use crate::domain::types::{HubId, PriceEntryId, ServiceCategory};
use crate::models::price_entry::{
    NewPriceEntry as DbNewPriceEntry, PriceEntry as DbPriceEntry,
    UpdatePriceEntry as DbUpdatePriceEntry,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PriceEntryReader, PriceEntryWriter};

impl PriceEntryReader for DieselRepository {
    fn get_price_entry_by_id(
        &self,
        id: PriceEntryId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<PriceEntry>> {
        use crate::schema::price_entries;

        let mut conn = self.conn()?;
        let row = price_entries::table
            .filter(price_entries::id.eq(id.get()))
            .filter(price_entries::hub_id.eq(hub_id.get()))
            .first::<DbPriceEntry>(&mut conn)
            .optional()?;

        Ok(row.map(PriceEntry::try_from).transpose()?)
    }

    fn list_price_entries(&self, hub_id: HubId) -> RepositoryResult<Vec<PriceEntry>> {
        use crate::schema::price_entries;

        let mut conn = self.conn()?;
        price_entries::table
            .filter(price_entries::hub_id.eq(hub_id.get()))
            .order((price_entries::category.asc(), price_entries::frequency.asc()))
            .load::<DbPriceEntry>(&mut conn)?
            .into_iter()
            .map(|row| PriceEntry::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn find_price_entry(
        &self,
        hub_id: HubId,
        category: &ServiceCategory,
        frequency: &str,
    ) -> RepositoryResult<Option<PriceEntry>> {
        use crate::schema::price_entries;

        let mut conn = self.conn()?;
        let row = price_entries::table
            .filter(price_entries::hub_id.eq(hub_id.get()))
            .filter(price_entries::category.eq(category.as_str()))
            .filter(price_entries::frequency.eq(frequency))
            .first::<DbPriceEntry>(&mut conn)
            .optional()?;

        Ok(row.map(PriceEntry::try_from).transpose()?)
    }
}

impl PriceEntryWriter for DieselRepository {
    fn create_price_entry(&self, entry: &NewPriceEntry) -> RepositoryResult<PriceEntry> {
        use crate::schema::price_entries;

        let mut conn = self.conn()?;
        let row = diesel::insert_into(price_entries::table)
            .values(&DbNewPriceEntry::from_details(entry.hub_id, &entry.details))
            .get_result::<DbPriceEntry>(&mut conn)?;

        Ok(PriceEntry::try_from(row)?)
    }

    fn update_price_entry(
        &self,
        id: PriceEntryId,
        hub_id: HubId,
        updates: &UpdatePriceEntry,
    ) -> RepositoryResult<PriceEntry> {
        use crate::schema::price_entries;

        let mut conn = self.conn()?;
        let row = diesel::update(
            price_entries::table
                .filter(price_entries::id.eq(id.get()))
                .filter(price_entries::hub_id.eq(hub_id.get())),
        )
        .set(&DbUpdatePriceEntry::from(updates))
        .get_result::<DbPriceEntry>(&mut conn)?;

        Ok(PriceEntry::try_from(row)?)
    }

    fn delete_price_entry(&self, id: PriceEntryId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::price_entries;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            price_entries::table
                .filter(price_entries::id.eq(id.get()))
                .filter(price_entries::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

//! Repository implementation for property owners.

use diesel::{prelude::*, upsert::excluded};

use crate::domain::owner::{NewOwner, Owner, UpdateOwner};
use crate::domain::types::{Email, HubId, OwnerId, PropertyId};
use crate::models::owner::{NewOwner as DbNewOwner, Owner as DbOwner, UpdateOwner as DbUpdateOwner};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, OwnerReader, OwnerWriter};

fn into_owners(rows: Vec<DbOwner>) -> RepositoryResult<Vec<Owner>> {
    rows.into_iter()
        .map(|row| Owner::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl OwnerReader for DieselRepository {
    fn get_owner_by_id(&self, id: OwnerId, hub_id: HubId) -> RepositoryResult<Option<Owner>> {
        use crate::schema::owners;

        let mut conn = self.conn()?;
        let row = owners::table
            .filter(owners::id.eq(id.get()))
            .filter(owners::hub_id.eq(hub_id.get()))
            .first::<DbOwner>(&mut conn)
            .optional()?;

        Ok(row.map(Owner::try_from).transpose()?)
    }

    fn get_owner_by_email(&self, email: &Email, hub_id: HubId) -> RepositoryResult<Option<Owner>> {
        use crate::schema::owners;

        let mut conn = self.conn()?;
        let row = owners::table
            .filter(owners::email.eq(email.as_str()))
            .filter(owners::hub_id.eq(hub_id.get()))
            .first::<DbOwner>(&mut conn)
            .optional()?;

        Ok(row.map(Owner::try_from).transpose()?)
    }

    fn list_owners(&self, hub_id: HubId) -> RepositoryResult<Vec<Owner>> {
        use crate::schema::owners;

        let mut conn = self.conn()?;
        let rows = owners::table
            .filter(owners::hub_id.eq(hub_id.get()))
            .order(owners::name.asc())
            .load::<DbOwner>(&mut conn)?;

        into_owners(rows)
    }

    fn list_property_owners(
        &self,
        property_id: PropertyId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<Owner>> {
        use crate::schema::owners;

        let mut conn = self.conn()?;
        let rows = owners::table
            .filter(owners::property_id.eq(property_id.get()))
            .filter(owners::hub_id.eq(hub_id.get()))
            .order(owners::name.asc())
            .load::<DbOwner>(&mut conn)?;

        into_owners(rows)
    }
}

impl OwnerWriter for DieselRepository {
    fn create_owner(&self, owner: &NewOwner) -> RepositoryResult<Owner> {
        use crate::schema::owners;

        let mut conn = self.conn()?;
        let row = diesel::insert_into(owners::table)
            .values(&DbNewOwner::from(owner))
            .get_result::<DbOwner>(&mut conn)?;

        Ok(Owner::try_from(row)?)
    }

    fn update_owner(
        &self,
        id: OwnerId,
        hub_id: HubId,
        updates: &UpdateOwner,
    ) -> RepositoryResult<Owner> {
        use crate::schema::owners;

        let mut conn = self.conn()?;
        let row = diesel::update(
            owners::table
                .filter(owners::id.eq(id.get()))
                .filter(owners::hub_id.eq(hub_id.get())),
        )
        .set(&DbUpdateOwner::from(updates))
        .get_result::<DbOwner>(&mut conn)?;

        Ok(Owner::try_from(row)?)
    }

    fn delete_owner(&self, id: OwnerId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::owners;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            owners::table
                .filter(owners::id.eq(id.get()))
                .filter(owners::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn upsert_owner_user(&self, owner: &NewOwner) -> RepositoryResult<Owner> {
        use crate::schema::owners;

        let mut conn = self.conn()?;
        let row = diesel::insert_into(owners::table)
            .values(&DbNewOwner::from(owner))
            .on_conflict((owners::email, owners::hub_id))
            .do_update()
            .set((
                owners::name.eq(excluded(owners::name)),
                owners::is_user.eq(owners::is_user.or(excluded(owners::is_user))),
            ))
            .get_result::<DbOwner>(&mut conn)?;

        Ok(Owner::try_from(row)?)
    }
}

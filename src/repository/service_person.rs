use diesel::prelude::*;

use crate::domain::service_person::{NewServicePerson, ServicePerson, UpdateServicePerson};
use crate::domain::types::{HubId, ServicePersonId};
use crate::models::service_person::{
    NewServicePerson as DbNewServicePerson, ServicePerson as DbServicePerson,
    UpdateServicePerson as DbUpdateServicePerson,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ServicePersonReader, ServicePersonWriter};

impl ServicePersonReader for DieselRepository {
    fn get_service_person_by_id(
        &self,
        id: ServicePersonId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<ServicePerson>> {
        use crate::schema::service_people;

        let mut conn = self.conn()?;
        let row = service_people::table
            .filter(service_people::id.eq(id.get()))
            .filter(service_people::hub_id.eq(hub_id.get()))
            .first::<DbServicePerson>(&mut conn)
            .optional()?;

        Ok(row.map(ServicePerson::try_from).transpose()?)
    }

    fn list_service_people(
        &self,
        hub_id: HubId,
        active_only: bool,
    ) -> RepositoryResult<Vec<ServicePerson>> {
        use crate::schema::service_people;

        let mut conn = self.conn()?;
        let mut query = service_people::table
            .filter(service_people::hub_id.eq(hub_id.get()))
            .into_boxed();
        if active_only {
            query = query.filter(service_people::is_active.eq(true));
        }

        query
            .order(service_people::full_name.asc())
            .load::<DbServicePerson>(&mut conn)?
            .into_iter()
            .map(|row| ServicePerson::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl ServicePersonWriter for DieselRepository {
    fn create_service_person(&self, person: &NewServicePerson) -> RepositoryResult<ServicePerson> {
        use crate::schema::service_people;

        let mut conn = self.conn()?;
        let row = diesel::insert_into(service_people::table)
            .values(&DbNewServicePerson::from_details(person.hub_id, &person.details))
            .get_result::<DbServicePerson>(&mut conn)?;

        Ok(ServicePerson::try_from(row)?)
    }

    fn update_service_person(
        &self,
        id: ServicePersonId,
        hub_id: HubId,
        updates: &UpdateServicePerson,
    ) -> RepositoryResult<ServicePerson> {
        use crate::schema::service_people;

        let mut conn = self.conn()?;
        let row = diesel::update(
            service_people::table
                .filter(service_people::id.eq(id.get()))
                .filter(service_people::hub_id.eq(hub_id.get())),
        )
        .set(&DbUpdateServicePerson::from_details(
            &updates.details,
            updates.is_active,
        ))
        .get_result::<DbServicePerson>(&mut conn)?;

        Ok(ServicePerson::try_from(row)?)
    }

    fn deactivate_service_person(
        &self,
        id: ServicePersonId,
        hub_id: HubId,
    ) -> RepositoryResult<()> {
        use crate::schema::service_people;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            service_people::table
                .filter(service_people::id.eq(id.get()))
                .filter(service_people::hub_id.eq(hub_id.get())),
        )
        .set(service_people::is_active.eq(false))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::service_event::{
    EventStatusUpdate, NewServiceEvent, ScheduledVisit, ServiceEvent,
};
use crate::domain::service_person::ServicePerson;
use crate::domain::types::{HubId, ServiceEventId};
use crate::models::service_event::{
    NewServiceEvent as DbNewServiceEvent, ServiceEvent as DbServiceEvent, UpdateEventStatus,
};
use crate::models::service_person::ServicePerson as DbServicePerson;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, ServiceEventListQuery, ServiceEventReader, ServiceEventWriter,
};

impl ServiceEventReader for DieselRepository {
    fn get_service_event_by_id(
        &self,
        id: ServiceEventId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<ServiceEvent>> {
        use crate::schema::service_events;

        let mut conn = self.conn()?;
        let row = service_events::table
            .filter(service_events::id.eq(id.get()))
            .filter(service_events::hub_id.eq(hub_id.get()))
            .first::<DbServiceEvent>(&mut conn)
            .optional()?;

        Ok(row.map(ServiceEvent::try_from).transpose()?)
    }

    fn list_service_events(
        &self,
        query: ServiceEventListQuery,
    ) -> RepositoryResult<Vec<ScheduledVisit>> {
        use crate::schema::{properties, service_events, service_people};

        let mut conn = self.conn()?;

        let mut items = service_events::table
            .inner_join(properties::table)
            .left_join(service_people::table)
            .select((
                service_events::all_columns,
                properties::name,
                service_people::all_columns.nullable(),
            ))
            .filter(service_events::hub_id.eq(query.hub_id.get()))
            .into_boxed();

        if let Some(property_id) = query.property_id {
            items = items.filter(service_events::property_id.eq(property_id.get()));
        }
        if let Some(from) = query.from {
            items = items.filter(service_events::scheduled_date.ge(from));
        }
        if let Some(to) = query.to {
            items = items.filter(service_events::scheduled_date.le(to));
        }
        if let Some(status) = query.status {
            items = items.filter(service_events::status.eq(status.as_str()));
        }

        let rows = items
            .order((
                service_events::scheduled_date.asc(),
                service_events::scheduled_time.asc(),
                service_events::id.asc(),
            ))
            .load::<(DbServiceEvent, String, Option<DbServicePerson>)>(&mut conn)?;

        rows.into_iter()
            .map(|(event, property_name, provider)| {
                Ok(ScheduledVisit {
                    event: ServiceEvent::try_from(event)?,
                    property_name,
                    provider: provider.map(ServicePerson::try_from).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()
    }
}

impl ServiceEventWriter for DieselRepository {
    fn create_service_event(&self, event: &NewServiceEvent) -> RepositoryResult<ServiceEvent> {
        use crate::schema::service_events;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let row = diesel::insert_into(service_events::table)
            .values(&DbNewServiceEvent::from_domain(event, now))
            .get_result::<DbServiceEvent>(&mut conn)?;

        Ok(ServiceEvent::try_from(row)?)
    }

    fn update_service_event_status(
        &self,
        id: ServiceEventId,
        hub_id: HubId,
        update: &EventStatusUpdate,
    ) -> RepositoryResult<ServiceEvent> {
        use crate::schema::service_events;

        let mut conn = self.conn()?;
        let row = diesel::update(
            service_events::table
                .filter(service_events::id.eq(id.get()))
                .filter(service_events::hub_id.eq(hub_id.get())),
        )
        .set(&UpdateEventStatus::from(update))
        .get_result::<DbServiceEvent>(&mut conn)?;

        Ok(ServiceEvent::try_from(row)?)
    }

    fn delete_service_event(&self, id: ServiceEventId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::service_events;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            service_events::table
                .filter(service_events::id.eq(id.get()))
                .filter(service_events::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn mark_service_event_reminded(
        &self,
        id: ServiceEventId,
        hub_id: HubId,
    ) -> RepositoryResult<ServiceEvent> {
        use crate::schema::service_events;

        let mut conn = self.conn()?;
        let row = diesel::update(
            service_events::table
                .filter(service_events::id.eq(id.get()))
                .filter(service_events::hub_id.eq(hub_id.get())),
        )
        .set(service_events::last_reminder_at.eq(Some(Utc::now().naive_utc())))
        .get_result::<DbServiceEvent>(&mut conn)?;

        Ok(ServiceEvent::try_from(row)?)
    }
}

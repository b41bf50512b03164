use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

use crate::domain::service_event::{
    EventStatusUpdate, NewServiceEvent as DomainNewServiceEvent,
    ServiceEvent as DomainServiceEvent,
};
use crate::domain::types::{
    EventStatus, HubId, PropertyId, PropertyServiceId, ServiceCategory, ServiceEventId,
    ServicePersonId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::service_events)]
pub struct ServiceEvent {
    pub id: i32,
    pub hub_id: i32,
    pub property_id: i32,
    pub service_id: Option<i32>,
    pub provider_id: Option<i32>,
    pub service_category: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub status: String,
    pub followup_required: bool,
    pub followup_notes: Option<String>,
    pub last_reminder_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::service_events)]
pub struct NewServiceEvent<'a> {
    pub hub_id: i32,
    pub property_id: i32,
    pub service_id: Option<i32>,
    pub provider_id: Option<i32>,
    pub service_category: &'a str,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub status: &'a str,
    pub followup_required: bool,
    pub followup_notes: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::service_events)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateEventStatus<'a> {
    pub status: &'a str,
    pub followup_required: bool,
    pub followup_notes: Option<&'a str>,
}

impl TryFrom<ServiceEvent> for DomainServiceEvent {
    type Error = TypeConstraintError;

    fn try_from(row: ServiceEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ServiceEventId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            property_id: PropertyId::try_from(row.property_id)?,
            service_id: row.service_id.map(PropertyServiceId::try_from).transpose()?,
            provider_id: row.provider_id.map(ServicePersonId::try_from).transpose()?,
            service_category: ServiceCategory::new(row.service_category)?,
            scheduled_date: row.scheduled_date,
            scheduled_time: row.scheduled_time,
            status: row.status.parse::<EventStatus>()?,
            followup_required: row.followup_required,
            followup_notes: row.followup_notes,
            last_reminder_at: row.last_reminder_at,
            created_at: row.created_at,
        })
    }
}

impl<'a> NewServiceEvent<'a> {
    pub fn from_domain(event: &'a DomainNewServiceEvent, now: NaiveDateTime) -> Self {
        Self {
            hub_id: event.hub_id.get(),
            property_id: event.property_id.get(),
            service_id: event.service_id.map(PropertyServiceId::get),
            provider_id: event.provider_id.map(ServicePersonId::get),
            service_category: event.service_category.as_str(),
            scheduled_date: event.scheduled_date,
            scheduled_time: event.scheduled_time,
            status: EventStatus::Scheduled.as_str(),
            followup_required: event.followup_required,
            followup_notes: event.followup_notes.as_deref(),
            created_at: now,
        }
    }
}

impl<'a> From<&'a EventStatusUpdate> for UpdateEventStatus<'a> {
    fn from(update: &'a EventStatusUpdate) -> Self {
        Self {
            status: update.status.as_str(),
            followup_required: update.followup_required,
            followup_notes: update.followup_notes.as_deref(),
        }
    }
}

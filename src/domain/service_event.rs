use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::service_person::ServicePerson;
use crate::domain::types::{
    EventStatus, HubId, PropertyId, PropertyServiceId, ServiceCategory, ServiceEventId,
    ServicePersonId,
};

/// A scheduled visit to a property.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceEvent {
    pub id: ServiceEventId,
    pub hub_id: HubId,
    pub property_id: PropertyId,
    /// Service line the visit fulfils; `None` for ad-hoc visits.
    pub service_id: Option<PropertyServiceId>,
    pub provider_id: Option<ServicePersonId>,
    pub service_category: ServiceCategory,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub status: EventStatus,
    pub followup_required: bool,
    pub followup_notes: Option<String>,
    pub last_reminder_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl ServiceEvent {
    /// Derived scheduling label relative to `today`.
    pub fn due_state(&self, today: NaiveDate) -> DueState {
        match self.status {
            EventStatus::Scheduled if self.scheduled_date < today => DueState::Overdue,
            EventStatus::Scheduled if self.scheduled_date == today => DueState::DueToday,
            EventStatus::Scheduled => DueState::Upcoming,
            EventStatus::Completed => DueState::Completed,
            EventStatus::Cancelled => DueState::Cancelled,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DueState {
    Overdue,
    DueToday,
    Upcoming,
    Completed,
    Cancelled,
}

impl DueState {
    pub const fn as_str(self) -> &'static str {
        match self {
            DueState::Overdue => "Overdue",
            DueState::DueToday => "Due today",
            DueState::Upcoming => "Upcoming",
            DueState::Completed => "Completed",
            DueState::Cancelled => "Cancelled",
        }
    }
}

impl Serialize for DueState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewServiceEvent {
    pub hub_id: HubId,
    pub property_id: PropertyId,
    pub service_id: Option<PropertyServiceId>,
    pub provider_id: Option<ServicePersonId>,
    pub service_category: ServiceCategory,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub followup_required: bool,
    pub followup_notes: Option<String>,
}

/// Status change recorded by an administrator.
#[derive(Clone, Debug, PartialEq)]
pub struct EventStatusUpdate {
    pub status: EventStatus,
    pub followup_required: bool,
    pub followup_notes: Option<String>,
}

/// Event joined with the data needed to list it.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ScheduledVisit {
    pub event: ServiceEvent,
    pub property_name: String,
    pub provider: Option<ServicePerson>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: NaiveDate, status: EventStatus) -> ServiceEvent {
        ServiceEvent {
            id: ServiceEventId::new(1).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            property_id: PropertyId::new(1).unwrap(),
            service_id: None,
            provider_id: None,
            service_category: ServiceCategory::new("Mowing").unwrap(),
            scheduled_date: date,
            scheduled_time: None,
            status,
            followup_required: false,
            followup_notes: None,
            last_reminder_at: None,
            created_at: date.and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn scheduled_events_are_labelled_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 5, 9).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap();

        assert_eq!(
            event(yesterday, EventStatus::Scheduled).due_state(today),
            DueState::Overdue
        );
        assert_eq!(
            event(today, EventStatus::Scheduled).due_state(today),
            DueState::DueToday
        );
        assert_eq!(
            event(tomorrow, EventStatus::Scheduled).due_state(today),
            DueState::Upcoming
        );
    }

    #[test]
    fn finished_events_report_their_status() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let past = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        assert_eq!(
            event(past, EventStatus::Completed).due_state(today),
            DueState::Completed
        );
        assert_eq!(
            event(past, EventStatus::Cancelled).due_state(today).as_str(),
            "Cancelled"
        );
    }
}

//! DTOs for the visit scheduler.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::property::Property;
use crate::domain::property_service::PropertyService;
use crate::domain::service_event::{DueState, ScheduledVisit};
use crate::domain::service_person::ServicePerson;

/// Optional window bounds; missing bounds fall back to the default window.
#[derive(Debug, Default)]
pub struct EventsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Listed visit with its due state.
#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    #[serde(flatten)]
    pub visit: ScheduledVisit,
    pub due_state: DueState,
}

#[derive(Debug)]
pub struct EventsPageData {
    pub rows: Vec<EventRow>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub properties: Vec<Property>,
    pub services: Vec<PropertyService>,
    /// Active crew only.
    pub providers: Vec<ServicePerson>,
}

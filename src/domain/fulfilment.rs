//! Planned vs. completed visit tracking.
//!
//! A property's plan is the list of its service lines; each line plans
//! `times_per_year` visits. Only events linked to a service line count
//! towards its fulfilment, ad-hoc visits are ignored.

use chrono::Datelike;
use serde::Serialize;

use crate::domain::property::Property;
use crate::domain::property_service::PropertyService;
use crate::domain::service_event::ServiceEvent;
use crate::domain::types::{EventStatus, PropertyId, PropertyServiceId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FulfilmentStatus {
    NotConfigured,
    OnTrack,
    NotStarted,
    InProgress,
}

impl FulfilmentStatus {
    pub fn from_counts(planned: i32, completed: i32) -> Self {
        let pending = (planned - completed).max(0);
        if planned == 0 {
            FulfilmentStatus::NotConfigured
        } else if pending == 0 {
            FulfilmentStatus::OnTrack
        } else if completed == 0 {
            FulfilmentStatus::NotStarted
        } else {
            FulfilmentStatus::InProgress
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FulfilmentStatus::NotConfigured => "Not configured",
            FulfilmentStatus::OnTrack => "On Track",
            FulfilmentStatus::NotStarted => "Not Started",
            FulfilmentStatus::InProgress => "In Progress",
        }
    }
}

impl Serialize for FulfilmentStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Counters shared by service and property rows.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct VisitTally {
    pub planned: i32,
    pub completed: i32,
    pub scheduled: i32,
    pub pending: i32,
    pub completion_pct: Option<f64>,
    pub status: FulfilmentStatus,
}

impl VisitTally {
    pub fn new(planned: i32, completed: i32, scheduled: i32) -> Self {
        let completion_pct =
            (planned > 0).then(|| f64::from(completed) / f64::from(planned) * 100.0);
        Self {
            planned,
            completed,
            scheduled,
            pending: (planned - completed).max(0),
            completion_pct,
            status: FulfilmentStatus::from_counts(planned, completed),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ServiceFulfilment {
    pub service_id: PropertyServiceId,
    pub category: String,
    pub frequency: String,
    #[serde(flatten)]
    pub tally: VisitTally,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PropertyFulfilment {
    pub property_id: PropertyId,
    pub property_name: String,
    pub year: i32,
    pub services: Vec<ServiceFulfilment>,
    #[serde(flatten)]
    pub tally: VisitTally,
}

/// Aggregates one property's plan against its events dated in `year`.
///
/// `services` and `events` may contain rows of other properties; they are
/// filtered by property id.
pub fn property_fulfilment(
    property: &Property,
    services: &[PropertyService],
    events: &[ServiceEvent],
    year: i32,
) -> PropertyFulfilment {
    let rows: Vec<ServiceFulfilment> = services
        .iter()
        .filter(|s| s.property_id == property.id)
        .map(|service| {
            let linked = events.iter().filter(|e| {
                e.service_id == Some(service.id) && e.scheduled_date.year() == year
            });
            let (completed, scheduled) =
                linked.fold((0, 0), |(completed, scheduled), e| match e.status {
                    EventStatus::Completed => (completed + 1, scheduled),
                    EventStatus::Scheduled => (completed, scheduled + 1),
                    EventStatus::Cancelled => (completed, scheduled),
                });

            ServiceFulfilment {
                service_id: service.id,
                category: service.category.to_string(),
                frequency: service.frequency.clone(),
                tally: VisitTally::new(service.times_per_year.get(), completed, scheduled),
            }
        })
        .collect();

    let planned = rows.iter().map(|r| r.tally.planned).sum();
    let completed = rows.iter().map(|r| r.tally.completed).sum();
    let scheduled = rows.iter().map(|r| r.tally.scheduled).sum();

    PropertyFulfilment {
        property_id: property.id,
        property_name: property.name.to_string(),
        year,
        services: rows,
        tally: VisitTally::new(planned, completed, scheduled),
    }
}

/// Fulfilment of every property in the portfolio, in input order.
pub fn portfolio_fulfilment(
    properties: &[Property],
    services: &[PropertyService],
    events: &[ServiceEvent],
    year: i32,
) -> Vec<PropertyFulfilment> {
    properties
        .iter()
        .map(|p| property_fulfilment(p, services, events, year))
        .collect()
}

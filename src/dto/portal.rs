//! DTO for the owner portal.

use crate::domain::fulfilment::PropertyFulfilment;
use crate::domain::owner::Owner;
use crate::domain::property::Property;
use crate::domain::property_service::PropertyService;
use crate::domain::service_event::ScheduledVisit;

/// The owner's own property view.
#[derive(Debug)]
pub struct PortalPageData {
    pub owner: Owner,
    /// Set when an administrator has linked the owner to a property.
    pub property: Option<OwnedProperty>,
}

#[derive(Debug)]
pub struct OwnedProperty {
    pub property: Property,
    pub services: Vec<PropertyService>,
    pub fulfilment: PropertyFulfilment,
    pub events: Vec<ScheduledVisit>,
}

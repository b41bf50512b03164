//! DTOs for the property index and detail pages.

use crate::domain::fulfilment::PropertyFulfilment;
use crate::domain::owner::Owner;
use crate::domain::price_entry::PriceEntry;
use crate::domain::property::Property;
use crate::domain::property_service::PropertyService;
use crate::domain::service_event::ScheduledVisit;
use crate::pagination::Paginated;

/// Query parameters accepted by the property index.
#[derive(Debug, Default)]
pub struct PropertiesQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub struct PropertiesPageData {
    pub properties: Paginated<Property>,
    pub search_query: Option<String>,
}

/// Everything shown on a property page.
#[derive(Debug)]
pub struct PropertyPageData {
    pub property: Property,
    pub services: Vec<PropertyService>,
    pub owners: Vec<Owner>,
    /// Visits of the selected year.
    pub events: Vec<ScheduledVisit>,
    pub fulfilment: PropertyFulfilment,
    pub year: i32,
    pub year_choices: Vec<i32>,
    /// Offered as suggestions in the add-service form.
    pub price_entries: Vec<PriceEntry>,
}

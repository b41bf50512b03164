//! DTOs exposed by the JSON API endpoints.

use serde::Serialize;

use crate::domain::fulfilment::PropertyFulfilment;
use crate::domain::property::Property;

/// Query parameters accepted by `/api/v1/properties`.
#[derive(Debug, Default)]
pub struct PropertiesApiQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PropertiesResponse {
    /// Total number of properties matching the filter.
    pub total: usize,
    pub properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
pub struct FulfilmentResponse {
    pub year: i32,
    pub properties: Vec<PropertyFulfilment>,
}

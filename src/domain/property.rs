use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::property_service::PropertyService;
use crate::domain::types::{Amount, HubId, PropertyId, PropertyName};

/// Markup applied to the service cost when recalculating the quoted price.
pub const QUOTE_MARKUP: f64 = 1.3;
/// Share of the quoted price credited to the business.
pub const CREDIT_RATE: f64 = 0.95;

/// Managed property with its annual financials.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub hub_id: HubId,
    pub name: PropertyName,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub annual_quote: Amount,
    pub annual_credited: Amount,
    pub annual_cost: Amount,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Property fields that can be edited by administrators.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDetails {
    pub name: PropertyName,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub annual_quote: Amount,
    pub annual_credited: Amount,
    pub annual_cost: Amount,
}

/// Property to be inserted for a hub.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProperty {
    pub hub_id: HubId,
    pub details: PropertyDetails,
}

impl NewProperty {
    #[must_use]
    pub fn new(hub_id: HubId, details: PropertyDetails) -> Self {
        Self { hub_id, details }
    }
}

/// Full replacement of the editable property fields.
pub type UpdateProperty = PropertyDetails;

/// Annual figures derived from the service plan of a property.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct PropertyFinancials {
    pub annual_cost: Amount,
    pub annual_quote: Amount,
    pub annual_credited: Amount,
}

impl PropertyFinancials {
    /// Sums `times_per_year * each_time_cost` over the services and derives
    /// the quoted and credited amounts from that cost.
    pub fn from_services(services: &[PropertyService]) -> Self {
        let cost: f64 = services.iter().map(|s| s.annual_cost()).sum();
        let quote = cost * QUOTE_MARKUP;
        let credited = quote * CREDIT_RATE;

        Self {
            annual_cost: Amount::new(cost).unwrap_or_default(),
            annual_quote: Amount::new(quote).unwrap_or_default(),
            annual_credited: Amount::new(credited).unwrap_or_default(),
        }
    }
}

/// Trims an optional free-text field, mapping blanks to `None`.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

use serde::{Deserialize, Serialize};

use crate::domain::types::{Amount, HubId, PriceEntryId, ServiceCategory};

/// Default per-visit cost for a service category and frequency.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PriceEntry {
    pub id: PriceEntryId,
    pub hub_id: HubId,
    pub category: ServiceCategory,
    pub frequency: String,
    pub default_cost: Amount,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceEntryDetails {
    pub category: ServiceCategory,
    pub frequency: String,
    pub default_cost: Amount,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPriceEntry {
    pub hub_id: HubId,
    pub details: PriceEntryDetails,
}

pub type UpdatePriceEntry = PriceEntryDetails;

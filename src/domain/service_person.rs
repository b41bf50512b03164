use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, HubId, PersonName, PhoneNumber, ServicePersonId};

/// Crew member who can be assigned to visits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServicePerson {
    pub id: ServicePersonId,
    pub hub_id: HubId,
    pub full_name: PersonName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub role: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl ServicePerson {
    /// Whether the person can be reached with a reminder.
    pub fn is_reachable(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

/// Editable crew member fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ServicePersonDetails {
    pub full_name: PersonName,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    pub role: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewServicePerson {
    pub hub_id: HubId,
    pub details: ServicePersonDetails,
}

/// Update payload; `is_active` lets an admin re-activate a person.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateServicePerson {
    pub details: ServicePersonDetails,
    pub is_active: bool,
}

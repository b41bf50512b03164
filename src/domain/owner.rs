use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, HubId, OwnerId, PersonName, PhoneNumber, PropertyId};

/// Property owner linked by e-mail to at most one property.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    pub id: OwnerId,
    pub hub_id: HubId,
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub property_id: Option<PropertyId>,
    /// Set once the owner has signed in to the portal.
    pub is_user: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewOwner {
    pub hub_id: HubId,
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub property_id: Option<PropertyId>,
    pub is_user: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateOwner {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub property_id: Option<PropertyId>,
}

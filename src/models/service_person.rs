use diesel::prelude::*;

use crate::domain::service_person::{ServicePerson as DomainServicePerson, ServicePersonDetails};
use crate::domain::types::{
    Email, HubId, PersonName, PhoneNumber, ServicePersonId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::service_people)]
pub struct ServicePerson {
    pub id: i32,
    pub hub_id: i32,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::service_people)]
pub struct NewServicePerson<'a> {
    pub hub_id: i32,
    pub full_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub role: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::service_people)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateServicePerson<'a> {
    pub full_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub role: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub is_active: bool,
}

impl TryFrom<ServicePerson> for DomainServicePerson {
    type Error = TypeConstraintError;

    fn try_from(row: ServicePerson) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ServicePersonId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            full_name: PersonName::new(row.full_name)?,
            email: row.email.map(Email::new).transpose()?,
            phone: row.phone.map(PhoneNumber::new).transpose()?,
            role: row.role,
            notes: row.notes,
            is_active: row.is_active,
        })
    }
}

impl<'a> NewServicePerson<'a> {
    pub fn from_details(hub_id: HubId, details: &'a ServicePersonDetails) -> Self {
        Self {
            hub_id: hub_id.get(),
            full_name: details.full_name.as_str(),
            email: details.email.as_ref().map(Email::as_str),
            phone: details.phone.as_ref().map(PhoneNumber::as_str),
            role: details.role.as_deref(),
            notes: details.notes.as_deref(),
            is_active: true,
        }
    }
}

impl<'a> UpdateServicePerson<'a> {
    pub fn from_details(details: &'a ServicePersonDetails, is_active: bool) -> Self {
        Self {
            full_name: details.full_name.as_str(),
            email: details.email.as_ref().map(Email::as_str),
            phone: details.phone.as_ref().map(PhoneNumber::as_str),
            role: details.role.as_deref(),
            notes: details.notes.as_deref(),
            is_active,
        }
    }
}

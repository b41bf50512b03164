use diesel::prelude::*;

use crate::domain::owner::{
    NewOwner as DomainNewOwner, Owner as DomainOwner, UpdateOwner as DomainUpdateOwner,
};
use crate::domain::types::{
    Email, HubId, OwnerId, PersonName, PhoneNumber, PropertyId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::owners)]
pub struct Owner {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub property_id: Option<i32>,
    pub is_user: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::owners)]
pub struct NewOwner<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub property_id: Option<i32>,
    pub is_user: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::owners)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateOwner<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub property_id: Option<i32>,
}

impl TryFrom<Owner> for DomainOwner {
    type Error = TypeConstraintError;

    fn try_from(row: Owner) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OwnerId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            name: PersonName::new(row.name)?,
            email: Email::new(row.email)?,
            phone: row.phone.map(PhoneNumber::new).transpose()?,
            property_id: row.property_id.map(PropertyId::try_from).transpose()?,
            is_user: row.is_user,
        })
    }
}

impl<'a> From<&'a DomainNewOwner> for NewOwner<'a> {
    fn from(owner: &'a DomainNewOwner) -> Self {
        Self {
            hub_id: owner.hub_id.get(),
            name: owner.name.as_str(),
            email: owner.email.as_str(),
            phone: owner.phone.as_ref().map(PhoneNumber::as_str),
            property_id: owner.property_id.map(PropertyId::get),
            is_user: owner.is_user,
        }
    }
}

impl<'a> From<&'a DomainUpdateOwner> for UpdateOwner<'a> {
    fn from(owner: &'a DomainUpdateOwner) -> Self {
        Self {
            name: owner.name.as_str(),
            email: owner.email.as_str(),
            phone: owner.phone.as_ref().map(PhoneNumber::as_str),
            property_id: owner.property_id.map(PropertyId::get),
        }
    }
}

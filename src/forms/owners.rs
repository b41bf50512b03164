use serde::Deserialize;
use validator::Validate;

use crate::domain::owner::{NewOwner, UpdateOwner};
use crate::domain::types::{Email, HubId, PersonName, PhoneNumber, PropertyId};
use crate::forms::{FormError, non_blank, parse_optional_id};

#[derive(Debug, Deserialize, Validate)]
/// Admin form linking an owner e-mail to a property.
pub struct OwnerForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Blank leaves the owner unassigned.
    #[serde(default)]
    pub property_id: String,
}

pub struct OwnerPayload {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub property_id: Option<PropertyId>,
}

impl TryFrom<OwnerForm> for OwnerPayload {
    type Error = FormError;

    fn try_from(form: OwnerForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let phone = non_blank(&form.phone)
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|_| FormError::InvalidPhoneNumber)?;
        let property_id = parse_optional_id(&form.property_id)?
            .map(PropertyId::new)
            .transpose()
            .map_err(|_| FormError::InvalidId)?;

        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone,
            property_id,
        })
    }
}

impl OwnerPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewOwner {
        NewOwner {
            hub_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            property_id: self.property_id,
            is_user: false,
        }
    }

    pub fn into_update(self) -> UpdateOwner {
        UpdateOwner {
            name: self.name,
            email: self.email,
            phone: self.phone,
            property_id: self.property_id,
        }
    }
}

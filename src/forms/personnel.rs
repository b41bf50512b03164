//! Crew member form.

use serde::Deserialize;
use validator::Validate;

use crate::domain::property::clean_optional;
use crate::domain::service_person::{NewServicePerson, ServicePersonDetails, UpdateServicePerson};
use crate::domain::types::{Email, HubId, PersonName, PhoneNumber};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct ServicePersonForm {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub notes: String,
    /// Checkbox; only meaningful on edit.
    #[serde(default)]
    pub is_active: Option<String>,
}

pub struct ServicePersonPayload {
    pub details: ServicePersonDetails,
    pub is_active: bool,
}

impl TryFrom<ServicePersonForm> for ServicePersonPayload {
    type Error = FormError;

    fn try_from(form: ServicePersonForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let email = non_blank(&form.email)
            .map(Email::new)
            .transpose()
            .map_err(|_| FormError::InvalidEmail)?;
        let phone = non_blank(&form.phone)
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|_| FormError::InvalidPhoneNumber)?;

        let details = ServicePersonDetails {
            full_name: PersonName::new(form.full_name).map_err(|_| FormError::InvalidName)?,
            email,
            phone,
            role: clean_optional(Some(form.role)),
            notes: clean_optional(Some(form.notes)),
        };

        Ok(Self {
            details,
            is_active: form.is_active.is_some(),
        })
    }
}

impl ServicePersonPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewServicePerson {
        NewServicePerson {
            hub_id,
            details: self.details,
        }
    }

    pub fn into_update(self) -> UpdateServicePerson {
        UpdateServicePerson {
            details: self.details,
            is_active: self.is_active,
        }
    }
}

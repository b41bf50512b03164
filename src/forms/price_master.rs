use serde::Deserialize;
use validator::Validate;

use crate::domain::price_entry::{NewPriceEntry, PriceEntryDetails, UpdatePriceEntry};
use crate::domain::property::clean_optional;
use crate::domain::types::{Amount, HubId, ServiceCategory};
use crate::forms::{FormError, parse_amount_or_zero};

#[derive(Debug, Deserialize, Validate)]
pub struct PriceEntryForm {
    #[validate(length(min = 1, max = 120))]
    pub category: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub default_cost: String,
    #[serde(default)]
    pub notes: String,
}

pub struct PriceEntryPayload {
    pub details: PriceEntryDetails,
}

impl TryFrom<PriceEntryForm> for PriceEntryPayload {
    type Error = FormError;

    fn try_from(form: PriceEntryForm) -> Result<Self, Self::Error> {
        let category =
            ServiceCategory::new(form.category.as_str()).map_err(|_| FormError::MissingCategory)?;
        form.validate()?;
        let default_cost = Amount::new(parse_amount_or_zero(&form.default_cost)?)
            .map_err(|_| FormError::InvalidAmount)?;

        Ok(Self {
            details: PriceEntryDetails {
                category,
                frequency: form.frequency.trim().to_string(),
                default_cost,
                notes: clean_optional(Some(form.notes)),
            },
        })
    }
}

impl PriceEntryPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewPriceEntry {
        NewPriceEntry {
            hub_id,
            details: self.details,
        }
    }

    pub fn into_update(self) -> UpdatePriceEntry {
        self.details
    }
}

//! Forms for properties and their service lines.

use serde::Deserialize;
use validator::Validate;

use crate::domain::property::{NewProperty, PropertyDetails, UpdateProperty, clean_optional};
use crate::domain::property_service::NewPropertyService;
use crate::domain::types::{Amount, HubId, PropertyName, ServiceCategory, VisitCount};
use crate::forms::{FormError, parse_amount_or_zero, parse_optional_amount, parse_optional_i32};

#[derive(Debug, Deserialize, Validate)]
/// Property create/edit form. Money fields are free text so blanks can
/// mean zero.
pub struct PropertyForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub annual_quote: String,
    #[serde(default)]
    pub annual_credited: String,
    #[serde(default)]
    pub annual_cost: String,
}

/// Validated property fields.
pub struct PropertyPayload {
    pub details: PropertyDetails,
}

impl TryFrom<PropertyForm> for PropertyPayload {
    type Error = FormError;

    fn try_from(form: PropertyForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let amount = |value: &str| -> Result<Amount, FormError> {
            Amount::new(parse_amount_or_zero(value)?).map_err(|_| FormError::InvalidAmount)
        };

        let details = PropertyDetails {
            name: PropertyName::new(form.name).map_err(|_| FormError::InvalidName)?,
            address: clean_optional(Some(form.address)),
            city: clean_optional(Some(form.city)),
            state: clean_optional(Some(form.state)),
            zip: clean_optional(Some(form.zip)),
            annual_quote: amount(&form.annual_quote)?,
            annual_credited: amount(&form.annual_credited)?,
            annual_cost: amount(&form.annual_cost)?,
        };

        Ok(Self { details })
    }
}

impl PropertyPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewProperty {
        NewProperty::new(hub_id, self.details)
    }

    pub fn into_update(self) -> UpdateProperty {
        self.details
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Service line form. A blank cost on a new line is filled from the price
/// master.
pub struct ServiceForm {
    #[validate(length(min = 1, max = 120))]
    pub category: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub times_per_year: String,
    #[serde(default)]
    pub each_time_cost: String,
    #[serde(default)]
    pub notes: String,
}

pub struct ServicePayload {
    pub category: ServiceCategory,
    pub frequency: String,
    pub times_per_year: VisitCount,
    /// `None` when the cost field was left blank.
    pub each_time_cost: Option<Amount>,
    pub notes: Option<String>,
}

impl TryFrom<ServiceForm> for ServicePayload {
    type Error = FormError;

    fn try_from(form: ServiceForm) -> Result<Self, Self::Error> {
        let category =
            ServiceCategory::new(form.category.as_str()).map_err(|_| FormError::MissingCategory)?;
        form.validate()?;
        let times = parse_optional_i32(&form.times_per_year)?.unwrap_or(0);
        let times_per_year = VisitCount::new(times).map_err(|_| FormError::InvalidCount)?;
        let each_time_cost = parse_optional_amount(&form.each_time_cost)?
            .map(Amount::new)
            .transpose()
            .map_err(|_| FormError::InvalidAmount)?;

        Ok(Self {
            category,
            frequency: form.frequency.trim().to_string(),
            times_per_year,
            each_time_cost,
            notes: clean_optional(Some(form.notes)),
        })
    }
}

impl ServicePayload {
    /// Builds the service line, using `fallback_cost` when no cost was given.
    pub fn into_domain(self, fallback_cost: Amount) -> NewPropertyService {
        NewPropertyService::new(
            self.category,
            self.frequency,
            self.times_per_year,
            self.each_time_cost.unwrap_or(fallback_cost),
            self.notes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property_form(name: &str, quote: &str) -> PropertyForm {
        PropertyForm {
            name: name.to_string(),
            address: " 1 Main St ".to_string(),
            city: String::new(),
            state: "TX".to_string(),
            zip: String::new(),
            annual_quote: quote.to_string(),
            annual_credited: String::new(),
            annual_cost: "100".to_string(),
        }
    }

    #[test]
    fn property_payload_cleans_optional_fields() {
        let payload = PropertyPayload::try_from(property_form("Oak Court", "2500.50")).unwrap();

        assert_eq!(payload.details.name.as_str(), "Oak Court");
        assert_eq!(payload.details.address.as_deref(), Some("1 Main St"));
        assert_eq!(payload.details.city, None);
        assert_eq!(payload.details.annual_quote.get(), 2500.5);
        assert_eq!(payload.details.annual_credited, Amount::ZERO);
    }

    #[test]
    fn property_requires_name_and_non_negative_money() {
        assert!(PropertyPayload::try_from(property_form("", "1")).is_err());
        assert!(matches!(
            PropertyPayload::try_from(property_form("Oak Court", "-5")),
            Err(FormError::InvalidAmount)
        ));
    }

    #[test]
    fn blank_service_cost_uses_fallback() {
        let form = ServiceForm {
            category: "Mowing".to_string(),
            frequency: " Weekly (22 Visits) ".to_string(),
            times_per_year: "22".to_string(),
            each_time_cost: String::new(),
            notes: String::new(),
        };

        let payload = ServicePayload::try_from(form).unwrap();
        assert!(payload.each_time_cost.is_none());

        let service = payload.into_domain(Amount::new(60.0).unwrap());
        assert_eq!(service.frequency, "Weekly (22 Visits)");
        assert_eq!(service.each_time_cost.get(), 60.0);
        assert_eq!(service.notes, None);
    }

    #[test]
    fn service_rejects_negative_times() {
        let form = ServiceForm {
            category: "Mowing".to_string(),
            frequency: String::new(),
            times_per_year: "-1".to_string(),
            each_time_cost: "10".to_string(),
            notes: String::new(),
        };

        assert!(matches!(
            ServicePayload::try_from(form),
            Err(FormError::InvalidCount)
        ));
    }
}

//! Diesel models for properties and their service lines.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::property::{
    NewProperty as DomainNewProperty, Property as DomainProperty, PropertyDetails,
    PropertyFinancials,
};
use crate::domain::property_service::{
    NewPropertyService as DomainNewPropertyService, PropertyService as DomainPropertyService,
};
use crate::domain::types::{
    Amount, HubId, PropertyId, PropertyName, PropertyServiceId, ServiceCategory,
    TypeConstraintError, VisitCount,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::properties)]
pub struct Property {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub annual_quote: f64,
    pub annual_credited: f64,
    pub annual_cost: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::properties)]
pub struct NewProperty<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: Option<&'a str>,
    pub annual_quote: f64,
    pub annual_credited: f64,
    pub annual_cost: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::properties)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProperty<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: Option<&'a str>,
    pub annual_quote: f64,
    pub annual_credited: f64,
    pub annual_cost: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::properties)]
pub struct UpdateFinancials {
    pub annual_quote: f64,
    pub annual_credited: f64,
    pub annual_cost: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Property, foreign_key = property_id))]
#[diesel(table_name = crate::schema::property_services)]
pub struct PropertyService {
    pub id: i32,
    pub property_id: i32,
    pub category: String,
    pub frequency: String,
    pub times_per_year: i32,
    pub each_time_cost: f64,
    pub notes: Option<String>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::property_services)]
#[diesel(treat_none_as_null = true)]
pub struct NewPropertyService<'a> {
    pub property_id: i32,
    pub category: &'a str,
    pub frequency: &'a str,
    pub times_per_year: i32,
    pub each_time_cost: f64,
    pub notes: Option<&'a str>,
}

impl TryFrom<Property> for DomainProperty {
    type Error = TypeConstraintError;

    fn try_from(row: Property) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PropertyId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            name: PropertyName::new(row.name)?,
            address: row.address,
            city: row.city,
            state: row.state,
            zip: row.zip,
            annual_quote: Amount::new(row.annual_quote)?,
            annual_credited: Amount::new(row.annual_credited)?,
            annual_cost: Amount::new(row.annual_cost)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl<'a> NewProperty<'a> {
    pub fn from_domain(property: &'a DomainNewProperty, now: NaiveDateTime) -> Self {
        Self::from_details(property.hub_id, &property.details, now)
    }

    pub fn from_details(hub_id: HubId, details: &'a PropertyDetails, now: NaiveDateTime) -> Self {
        Self {
            hub_id: hub_id.get(),
            name: details.name.as_str(),
            address: details.address.as_deref(),
            city: details.city.as_deref(),
            state: details.state.as_deref(),
            zip: details.zip.as_deref(),
            annual_quote: details.annual_quote.get(),
            annual_credited: details.annual_credited.get(),
            annual_cost: details.annual_cost.get(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateProperty<'a> {
    pub fn from_domain(details: &'a PropertyDetails, now: NaiveDateTime) -> Self {
        Self {
            name: details.name.as_str(),
            address: details.address.as_deref(),
            city: details.city.as_deref(),
            state: details.state.as_deref(),
            zip: details.zip.as_deref(),
            annual_quote: details.annual_quote.get(),
            annual_credited: details.annual_credited.get(),
            annual_cost: details.annual_cost.get(),
            updated_at: now,
        }
    }
}

impl UpdateFinancials {
    pub fn from_domain(financials: &PropertyFinancials, now: NaiveDateTime) -> Self {
        Self {
            annual_quote: financials.annual_quote.get(),
            annual_credited: financials.annual_credited.get(),
            annual_cost: financials.annual_cost.get(),
            updated_at: now,
        }
    }
}

impl TryFrom<PropertyService> for DomainPropertyService {
    type Error = TypeConstraintError;

    fn try_from(row: PropertyService) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PropertyServiceId::try_from(row.id)?,
            property_id: PropertyId::try_from(row.property_id)?,
            category: ServiceCategory::new(row.category)?,
            frequency: row.frequency,
            times_per_year: VisitCount::new(row.times_per_year)?,
            each_time_cost: Amount::new(row.each_time_cost)?,
            notes: row.notes,
        })
    }
}

impl<'a> NewPropertyService<'a> {
    pub fn from_domain(property_id: PropertyId, service: &'a DomainNewPropertyService) -> Self {
        Self {
            property_id: property_id.get(),
            category: service.category.as_str(),
            frequency: service.frequency.as_str(),
            times_per_year: service.times_per_year.get(),
            each_time_cost: service.each_time_cost.get(),
            notes: service.notes.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn property_row_into_domain() {
        let ts = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let row = Property {
            id: 3,
            hub_id: 1,
            name: "North Campus".into(),
            address: None,
            city: Some("Frisco".into()),
            state: Some("TX".into()),
            zip: None,
            annual_quote: 100.0,
            annual_credited: 95.0,
            annual_cost: 50.0,
            created_at: ts,
            updated_at: ts,
        };

        let domain = DomainProperty::try_from(row).expect("valid property");
        assert_eq!(domain.id.get(), 3);
        assert_eq!(domain.name.as_str(), "North Campus");
        assert_eq!(domain.annual_cost.get(), 50.0);
    }

    #[test]
    fn negative_cost_is_rejected() {
        let row = PropertyService {
            id: 1,
            property_id: 1,
            category: "Mowing".into(),
            frequency: String::new(),
            times_per_year: 1,
            each_time_cost: -5.0,
            notes: None,
        };

        assert_eq!(
            DomainPropertyService::try_from(row),
            Err(TypeConstraintError::InvalidAmount)
        );
    }
}

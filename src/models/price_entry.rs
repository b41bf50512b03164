use diesel::prelude::*;

use crate::domain::price_entry::{PriceEntry as DomainPriceEntry, PriceEntryDetails};
use crate::domain::types::{Amount, HubId, PriceEntryId, ServiceCategory, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::price_entries)]
pub struct PriceEntry {
    pub id: i32,
    pub hub_id: i32,
    pub category: String,
    pub frequency: String,
    pub default_cost: f64,
    pub notes: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::price_entries)]
pub struct NewPriceEntry<'a> {
    pub hub_id: i32,
    pub category: &'a str,
    pub frequency: &'a str,
    pub default_cost: f64,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::price_entries)]
#[diesel(treat_none_as_null = true)]
pub struct UpdatePriceEntry<'a> {
    pub category: &'a str,
    pub frequency: &'a str,
    pub default_cost: f64,
    pub notes: Option<&'a str>,
}

impl TryFrom<PriceEntry> for DomainPriceEntry {
    type Error = TypeConstraintError;

    fn try_from(row: PriceEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PriceEntryId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            category: ServiceCategory::new(row.category)?,
            frequency: row.frequency,
            default_cost: Amount::new(row.default_cost)?,
            notes: row.notes,
        })
    }
}

impl<'a> NewPriceEntry<'a> {
    pub fn from_details(hub_id: HubId, details: &'a PriceEntryDetails) -> Self {
        Self {
            hub_id: hub_id.get(),
            category: details.category.as_str(),
            frequency: details.frequency.as_str(),
            default_cost: details.default_cost.get(),
            notes: details.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a PriceEntryDetails> for UpdatePriceEntry<'a> {
    fn from(details: &'a PriceEntryDetails) -> Self {
        Self {
            category: details.category.as_str(),
            frequency: details.frequency.as_str(),
            default_cost: details.default_cost.get(),
            notes: details.notes.as_deref(),
        }
    }
}

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::quote::{
    NewQuote as DomainNewQuote, NewQuoteLineItem as DomainNewQuoteLineItem,
    Quote as DomainQuote, QuoteLineItem as DomainQuoteLineItem,
};
use crate::domain::types::{
    Amount, Email, HubId, PropertyId, QuoteId, ServiceCode, TypeConstraintError, VisitCount,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::quotes)]
pub struct Quote {
    pub id: i32,
    pub hub_id: i32,
    pub region_label: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub property_name: Option<String>,
    pub property_size_band: Option<String>,
    pub sqft_estimate: Option<i32>,
    pub notes: Option<String>,
    pub annual_quote: f64,
    pub converted_property_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quotes)]
pub struct NewQuote<'a> {
    pub hub_id: i32,
    pub region_label: &'a str,
    pub customer_name: Option<&'a str>,
    pub customer_email: Option<&'a str>,
    pub property_name: Option<&'a str>,
    pub property_size_band: Option<&'a str>,
    pub sqft_estimate: Option<i32>,
    pub notes: Option<&'a str>,
    pub annual_quote: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Quote, foreign_key = quote_id))]
#[diesel(table_name = crate::schema::quote_line_items)]
pub struct QuoteLineItem {
    pub id: i32,
    pub quote_id: i32,
    pub service_code: String,
    pub service_name: String,
    pub times_per_year: i32,
    pub price_per_visit: f64,
    pub annual_total: f64,
    pub included: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quote_line_items)]
pub struct NewQuoteLineItem<'a> {
    pub quote_id: i32,
    pub service_code: &'a str,
    pub service_name: &'a str,
    pub times_per_year: i32,
    pub price_per_visit: f64,
    pub annual_total: f64,
    pub included: bool,
}

impl TryFrom<Quote> for DomainQuote {
    type Error = TypeConstraintError;

    fn try_from(row: Quote) -> Result<Self, Self::Error> {
        Ok(Self {
            id: QuoteId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            region_label: row.region_label,
            customer_name: row.customer_name,
            customer_email: row.customer_email.map(Email::new).transpose()?,
            property_name: row.property_name,
            property_size_band: row.property_size_band,
            sqft_estimate: row.sqft_estimate,
            notes: row.notes,
            annual_quote: Amount::new(row.annual_quote)?,
            converted_property_id: row
                .converted_property_id
                .map(PropertyId::try_from)
                .transpose()?,
            created_at: row.created_at,
        })
    }
}

impl<'a> NewQuote<'a> {
    pub fn from_domain(quote: &'a DomainNewQuote, now: NaiveDateTime) -> Self {
        Self {
            hub_id: quote.hub_id.get(),
            region_label: quote.region_label.as_str(),
            customer_name: quote.customer_name.as_deref(),
            customer_email: quote.customer_email.as_ref().map(Email::as_str),
            property_name: quote.property_name.as_deref(),
            property_size_band: quote.property_size_band.as_deref(),
            sqft_estimate: quote.sqft_estimate,
            notes: quote.notes.as_deref(),
            annual_quote: quote.annual_quote.get(),
            created_at: now,
        }
    }
}

impl TryFrom<QuoteLineItem> for DomainQuoteLineItem {
    type Error = TypeConstraintError;

    fn try_from(row: QuoteLineItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            quote_id: QuoteId::try_from(row.quote_id)?,
            service_code: ServiceCode::new(row.service_code)?,
            service_name: row.service_name,
            times_per_year: VisitCount::new(row.times_per_year)?,
            price_per_visit: Amount::new(row.price_per_visit)?,
            annual_total: Amount::new(row.annual_total)?,
            included: row.included,
        })
    }
}

impl<'a> NewQuoteLineItem<'a> {
    pub fn from_domain(quote_id: QuoteId, item: &'a DomainNewQuoteLineItem) -> Self {
        Self {
            quote_id: quote_id.get(),
            service_code: item.service_code.as_str(),
            service_name: item.service_name.as_str(),
            times_per_year: item.times_per_year.get(),
            price_per_visit: item.price_per_visit.get(),
            annual_total: item.annual_total.get(),
            included: item.included,
        }
    }
}

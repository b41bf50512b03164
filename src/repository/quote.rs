use chrono::Utc;
use diesel::prelude::*;

use crate::domain::property::Property;
use crate::domain::quote::{NewQuote, NewQuoteLineItem, Quote, QuoteConversion, QuoteLineItem};
use crate::domain::types::{HubId, QuoteId};
use crate::models::property::{
    NewProperty as DbNewProperty, NewPropertyService as DbNewPropertyService,
    Property as DbProperty,
};
use crate::models::quote::{
    NewQuote as DbNewQuote, NewQuoteLineItem as DbNewQuoteLineItem, Quote as DbQuote,
    QuoteLineItem as DbQuoteLineItem,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, QuoteReader, QuoteWriter};

impl QuoteReader for DieselRepository {
    fn get_quote_by_id(&self, id: QuoteId, hub_id: HubId) -> RepositoryResult<Option<Quote>> {
        use crate::schema::quotes;

        let mut conn = self.conn()?;
        let row = quotes::table
            .filter(quotes::id.eq(id.get()))
            .filter(quotes::hub_id.eq(hub_id.get()))
            .first::<DbQuote>(&mut conn)
            .optional()?;

        Ok(row.map(Quote::try_from).transpose()?)
    }

    fn list_quotes(&self, hub_id: HubId) -> RepositoryResult<Vec<Quote>> {
        use crate::schema::quotes;

        let mut conn = self.conn()?;
        quotes::table
            .filter(quotes::hub_id.eq(hub_id.get()))
            .order((quotes::created_at.desc(), quotes::id.desc()))
            .load::<DbQuote>(&mut conn)?
            .into_iter()
            .map(|row| Quote::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn list_quote_line_items(&self, quote_id: QuoteId) -> RepositoryResult<Vec<QuoteLineItem>> {
        use crate::schema::quote_line_items;

        let mut conn = self.conn()?;
        quote_line_items::table
            .filter(quote_line_items::quote_id.eq(quote_id.get()))
            .order(quote_line_items::id.asc())
            .load::<DbQuoteLineItem>(&mut conn)?
            .into_iter()
            .map(|row| QuoteLineItem::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl QuoteWriter for DieselRepository {
    fn create_quote(
        &self,
        quote: &NewQuote,
        items: &[NewQuoteLineItem],
    ) -> RepositoryResult<Quote> {
        use crate::schema::{quote_line_items, quotes};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(quotes::table)
                .values(&DbNewQuote::from_domain(quote, now))
                .get_result::<DbQuote>(conn)?;
            let created = Quote::try_from(row)?;

            let lines: Vec<DbNewQuoteLineItem> = items
                .iter()
                .map(|item| DbNewQuoteLineItem::from_domain(created.id, item))
                .collect();
            if !lines.is_empty() {
                diesel::insert_into(quote_line_items::table)
                    .values(&lines)
                    .execute(conn)?;
            }

            Ok(created)
        })
    }

    fn convert_quote(
        &self,
        id: QuoteId,
        hub_id: HubId,
        conversion: &QuoteConversion,
    ) -> RepositoryResult<Property> {
        use crate::schema::{properties, property_services, quotes};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let quote = quotes::table
                .filter(quotes::id.eq(id.get()))
                .filter(quotes::hub_id.eq(hub_id.get()))
                .first::<DbQuote>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;
            if quote.converted_property_id.is_some() {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "Quote #{} was already converted",
                    quote.id
                )));
            }

            let row = diesel::insert_into(properties::table)
                .values(&DbNewProperty::from_details(hub_id, &conversion.property, now))
                .get_result::<DbProperty>(conn)?;
            let property = Property::try_from(row)?;

            let services: Vec<DbNewPropertyService> = conversion
                .services
                .iter()
                .map(|service| DbNewPropertyService::from_domain(property.id, service))
                .collect();
            if !services.is_empty() {
                diesel::insert_into(property_services::table)
                    .values(&services)
                    .execute(conn)?;
            }

            let marked = diesel::update(
                quotes::table
                    .filter(quotes::id.eq(id.get()))
                    .filter(quotes::converted_property_id.is_null()),
            )
            .set(quotes::converted_property_id.eq(Some(property.id.get())))
            .execute(conn)?;
            if marked != 1 {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "Quote #{} was already converted",
                    quote.id
                )));
            }

            Ok(property)
        })
    }
}

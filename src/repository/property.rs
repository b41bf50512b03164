//! Repository implementation for properties and their service lines.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::property::{NewProperty, Property, PropertyFinancials, UpdateProperty};
use crate::domain::property_service::{NewPropertyService, PropertyService};
use crate::domain::types::{HubId, PropertyId, PropertyServiceId};
use crate::models::property::{
    NewProperty as DbNewProperty, NewPropertyService as DbNewPropertyService,
    Property as DbProperty, PropertyService as DbPropertyService, UpdateFinancials,
    UpdateProperty as DbUpdateProperty,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PropertyListQuery, PropertyReader, PropertyWriter};

fn into_properties(rows: Vec<DbProperty>) -> RepositoryResult<Vec<Property>> {
    rows.into_iter()
        .map(|row| Property::try_from(row).map_err(RepositoryError::from))
        .collect()
}

fn into_services(rows: Vec<DbPropertyService>) -> RepositoryResult<Vec<PropertyService>> {
    rows.into_iter()
        .map(|row| PropertyService::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl PropertyReader for DieselRepository {
    fn get_property_by_id(
        &self,
        id: PropertyId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Property>> {
        use crate::schema::properties;

        let mut conn = self.conn()?;
        let row = properties::table
            .filter(properties::id.eq(id.get()))
            .filter(properties::hub_id.eq(hub_id.get()))
            .first::<DbProperty>(&mut conn)
            .optional()?;

        Ok(row.map(Property::try_from).transpose()?)
    }

    fn list_properties(
        &self,
        query: PropertyListQuery,
    ) -> RepositoryResult<(usize, Vec<Property>)> {
        use crate::schema::properties;

        let mut conn = self.conn()?;

        let pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));

        let filtered = || {
            let mut items = properties::table
                .filter(properties::hub_id.eq(query.hub_id.get()))
                .into_boxed::<Sqlite>();
            if let Some(pattern) = &pattern {
                items = items.filter(
                    properties::name
                        .like(pattern.clone())
                        .or(properties::address.like(pattern.clone()))
                        .or(properties::city.like(pattern.clone())),
                );
            }
            items
        };

        let total: i64 = filtered().count().get_result(&mut conn)?;

        let mut items = filtered().order(properties::name.asc());
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1);
            let offset = ((page - 1) * pagination.per_page) as i64;
            items = items.limit(pagination.per_page as i64).offset(offset);
        }

        let rows = items.load::<DbProperty>(&mut conn)?;

        Ok((total as usize, into_properties(rows)?))
    }

    fn list_property_services(
        &self,
        property_id: PropertyId,
    ) -> RepositoryResult<Vec<PropertyService>> {
        use crate::schema::property_services;

        let mut conn = self.conn()?;
        let rows = property_services::table
            .filter(property_services::property_id.eq(property_id.get()))
            .order(property_services::id.asc())
            .load::<DbPropertyService>(&mut conn)?;

        into_services(rows)
    }

    fn get_property_service_by_id(
        &self,
        id: PropertyServiceId,
        property_id: PropertyId,
    ) -> RepositoryResult<Option<PropertyService>> {
        use crate::schema::property_services;

        let mut conn = self.conn()?;
        let row = property_services::table
            .filter(property_services::id.eq(id.get()))
            .filter(property_services::property_id.eq(property_id.get()))
            .first::<DbPropertyService>(&mut conn)
            .optional()?;

        Ok(row.map(PropertyService::try_from).transpose()?)
    }

    fn list_hub_property_services(&self, hub_id: HubId) -> RepositoryResult<Vec<PropertyService>> {
        use crate::schema::{properties, property_services};

        let mut conn = self.conn()?;
        let rows = property_services::table
            .inner_join(properties::table)
            .filter(properties::hub_id.eq(hub_id.get()))
            .select(property_services::all_columns)
            .order(property_services::id.asc())
            .load::<DbPropertyService>(&mut conn)?;

        into_services(rows)
    }
}

impl PropertyWriter for DieselRepository {
    fn create_property(&self, new_property: &NewProperty) -> RepositoryResult<Property> {
        use crate::schema::properties;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let row = diesel::insert_into(properties::table)
            .values(&DbNewProperty::from_domain(new_property, now))
            .get_result::<DbProperty>(&mut conn)?;

        Ok(Property::try_from(row)?)
    }

    fn update_property(
        &self,
        id: PropertyId,
        hub_id: HubId,
        updates: &UpdateProperty,
    ) -> RepositoryResult<Property> {
        use crate::schema::properties;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let row = diesel::update(
            properties::table
                .filter(properties::id.eq(id.get()))
                .filter(properties::hub_id.eq(hub_id.get())),
        )
        .set(&DbUpdateProperty::from_domain(updates, now))
        .get_result::<DbProperty>(&mut conn)?;

        Ok(Property::try_from(row)?)
    }

    fn update_property_financials(
        &self,
        id: PropertyId,
        hub_id: HubId,
        financials: &PropertyFinancials,
    ) -> RepositoryResult<Property> {
        use crate::schema::properties;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let row = diesel::update(
            properties::table
                .filter(properties::id.eq(id.get()))
                .filter(properties::hub_id.eq(hub_id.get())),
        )
        .set(&UpdateFinancials::from_domain(financials, now))
        .get_result::<DbProperty>(&mut conn)?;

        Ok(Property::try_from(row)?)
    }

    fn delete_property(&self, id: PropertyId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::properties;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            properties::table
                .filter(properties::id.eq(id.get()))
                .filter(properties::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn create_property_service(
        &self,
        property_id: PropertyId,
        service: &NewPropertyService,
    ) -> RepositoryResult<PropertyService> {
        use crate::schema::property_services;

        let mut conn = self.conn()?;
        let row = diesel::insert_into(property_services::table)
            .values(&DbNewPropertyService::from_domain(property_id, service))
            .get_result::<DbPropertyService>(&mut conn)?;

        Ok(PropertyService::try_from(row)?)
    }

    fn update_property_service(
        &self,
        id: PropertyServiceId,
        property_id: PropertyId,
        service: &NewPropertyService,
    ) -> RepositoryResult<PropertyService> {
        use crate::schema::property_services;

        let mut conn = self.conn()?;
        let row = diesel::update(
            property_services::table
                .filter(property_services::id.eq(id.get()))
                .filter(property_services::property_id.eq(property_id.get())),
        )
        .set(&DbNewPropertyService::from_domain(property_id, service))
        .get_result::<DbPropertyService>(&mut conn)?;

        Ok(PropertyService::try_from(row)?)
    }

    fn delete_property_service(
        &self,
        id: PropertyServiceId,
        property_id: PropertyId,
    ) -> RepositoryResult<()> {
        use crate::schema::property_services;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            property_services::table
                .filter(property_services::id.eq(id.get()))
                .filter(property_services::property_id.eq(property_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

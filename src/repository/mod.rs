use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::owner::{NewOwner, Owner, UpdateOwner};
use crate::domain::price_entry::{NewPriceEntry, PriceEntry, UpdatePriceEntry};
use crate::domain::property::{NewProperty, Property, PropertyFinancials, UpdateProperty};
use crate::domain::property_service::{NewPropertyService, PropertyService};
use crate::domain::quote::{NewQuote, NewQuoteLineItem, Quote, QuoteConversion, QuoteLineItem};
use crate::domain::region::{
    CatalogEntry, NewCatalogEntry, NewRegion, NewRegionRate, Region, RegionRate,
};
use crate::domain::service_event::{
    EventStatusUpdate, NewServiceEvent, ScheduledVisit, ServiceEvent,
};
use crate::domain::service_person::{NewServicePerson, ServicePerson, UpdateServicePerson};
use crate::domain::ticket::{
    NewTicket, NewTicketAttachment, Ticket, TicketAdminUpdate, TicketAttachment, TicketListing,
};
use crate::domain::types::{
    AttachmentId, Email, EventStatus, HubId, OwnerId, PriceEntryId, PropertyId,
    PropertyServiceId, QuoteId, RegionId, ServiceCategory, ServiceEventId, ServicePersonId,
    TicketId, TicketStatus,
};
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod owner;
pub mod price_entry;
pub mod property;
pub mod quote;
pub mod region;
pub mod service_event;
pub mod service_person;
pub mod ticket;

/// Diesel-backed repository sharing one connection pool for every entity.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl PropertyListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Filter for scheduled visits; every bound is optional and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEventListQuery {
    pub hub_id: HubId,
    pub property_id: Option<PropertyId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<EventStatus>,
}

impl ServiceEventListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            property_id: None,
            from: None,
            to: None,
            status: None,
        }
    }

    pub fn property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn until(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketListQuery {
    pub hub_id: HubId,
    pub owner_id: Option<OwnerId>,
    pub property_id: Option<PropertyId>,
    pub status: Option<TicketStatus>,
}

impl TicketListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            owner_id: None,
            property_id: None,
            status: None,
        }
    }

    pub fn owner(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }
}

pub trait PropertyReader {
    fn get_property_by_id(&self, id: PropertyId, hub_id: HubId)
    -> RepositoryResult<Option<Property>>;
    fn list_properties(&self, query: PropertyListQuery)
    -> RepositoryResult<(usize, Vec<Property>)>;
    fn list_property_services(&self, property_id: PropertyId)
    -> RepositoryResult<Vec<PropertyService>>;
    fn get_property_service_by_id(
        &self,
        id: PropertyServiceId,
        property_id: PropertyId,
    ) -> RepositoryResult<Option<PropertyService>>;
    /// All service lines of every property in the hub.
    fn list_hub_property_services(&self, hub_id: HubId) -> RepositoryResult<Vec<PropertyService>>;
}

pub trait PropertyWriter {
    fn create_property(&self, new_property: &NewProperty) -> RepositoryResult<Property>;
    fn update_property(
        &self,
        id: PropertyId,
        hub_id: HubId,
        updates: &UpdateProperty,
    ) -> RepositoryResult<Property>;
    fn update_property_financials(
        &self,
        id: PropertyId,
        hub_id: HubId,
        financials: &PropertyFinancials,
    ) -> RepositoryResult<Property>;
    fn delete_property(&self, id: PropertyId, hub_id: HubId) -> RepositoryResult<()>;
    fn create_property_service(
        &self,
        property_id: PropertyId,
        service: &NewPropertyService,
    ) -> RepositoryResult<PropertyService>;
    fn update_property_service(
        &self,
        id: PropertyServiceId,
        property_id: PropertyId,
        service: &NewPropertyService,
    ) -> RepositoryResult<PropertyService>;
    fn delete_property_service(
        &self,
        id: PropertyServiceId,
        property_id: PropertyId,
    ) -> RepositoryResult<()>;
}

pub trait ServicePersonReader {
    fn get_service_person_by_id(
        &self,
        id: ServicePersonId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<ServicePerson>>;
    fn list_service_people(
        &self,
        hub_id: HubId,
        active_only: bool,
    ) -> RepositoryResult<Vec<ServicePerson>>;
}

pub trait ServicePersonWriter {
    fn create_service_person(&self, person: &NewServicePerson) -> RepositoryResult<ServicePerson>;
    fn update_service_person(
        &self,
        id: ServicePersonId,
        hub_id: HubId,
        updates: &UpdateServicePerson,
    ) -> RepositoryResult<ServicePerson>;
    fn deactivate_service_person(&self, id: ServicePersonId, hub_id: HubId)
    -> RepositoryResult<()>;
}

pub trait PriceEntryReader {
    fn get_price_entry_by_id(
        &self,
        id: PriceEntryId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<PriceEntry>>;
    fn list_price_entries(&self, hub_id: HubId) -> RepositoryResult<Vec<PriceEntry>>;
    fn find_price_entry(
        &self,
        hub_id: HubId,
        category: &ServiceCategory,
        frequency: &str,
    ) -> RepositoryResult<Option<PriceEntry>>;
}

pub trait PriceEntryWriter {
    fn create_price_entry(&self, entry: &NewPriceEntry) -> RepositoryResult<PriceEntry>;
    fn update_price_entry(
        &self,
        id: PriceEntryId,
        hub_id: HubId,
        updates: &UpdatePriceEntry,
    ) -> RepositoryResult<PriceEntry>;
    fn delete_price_entry(&self, id: PriceEntryId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait ServiceEventReader {
    fn get_service_event_by_id(
        &self,
        id: ServiceEventId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<ServiceEvent>>;
    /// Visits ordered by date then time, joined with property and provider.
    fn list_service_events(
        &self,
        query: ServiceEventListQuery,
    ) -> RepositoryResult<Vec<ScheduledVisit>>;
}

pub trait ServiceEventWriter {
    fn create_service_event(&self, event: &NewServiceEvent) -> RepositoryResult<ServiceEvent>;
    fn update_service_event_status(
        &self,
        id: ServiceEventId,
        hub_id: HubId,
        update: &EventStatusUpdate,
    ) -> RepositoryResult<ServiceEvent>;
    fn delete_service_event(&self, id: ServiceEventId, hub_id: HubId) -> RepositoryResult<()>;
    fn mark_service_event_reminded(
        &self,
        id: ServiceEventId,
        hub_id: HubId,
    ) -> RepositoryResult<ServiceEvent>;
}

pub trait OwnerReader {
    fn get_owner_by_id(&self, id: OwnerId, hub_id: HubId) -> RepositoryResult<Option<Owner>>;
    fn get_owner_by_email(&self, email: &Email, hub_id: HubId) -> RepositoryResult<Option<Owner>>;
    fn list_owners(&self, hub_id: HubId) -> RepositoryResult<Vec<Owner>>;
    fn list_property_owners(
        &self,
        property_id: PropertyId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<Owner>>;
}

pub trait OwnerWriter {
    fn create_owner(&self, owner: &NewOwner) -> RepositoryResult<Owner>;
    fn update_owner(
        &self,
        id: OwnerId,
        hub_id: HubId,
        updates: &UpdateOwner,
    ) -> RepositoryResult<Owner>;
    fn delete_owner(&self, id: OwnerId, hub_id: HubId) -> RepositoryResult<()>;
    /// Creates the owner or refreshes its name; `is_user` is only ever
    /// raised, the property link is left untouched.
    fn upsert_owner_user(&self, owner: &NewOwner) -> RepositoryResult<Owner>;
}

pub trait TicketReader {
    fn get_ticket_by_id(&self, id: TicketId, hub_id: HubId) -> RepositoryResult<Option<Ticket>>;
    /// Tickets newest first.
    fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<Vec<TicketListing>>;
    /// Attachments newest first.
    fn list_ticket_attachments(&self, ticket_id: TicketId)
    -> RepositoryResult<Vec<TicketAttachment>>;
    fn get_ticket_attachment(
        &self,
        id: AttachmentId,
        ticket_id: TicketId,
    ) -> RepositoryResult<Option<TicketAttachment>>;
}

pub trait TicketWriter {
    fn create_ticket(&self, ticket: &NewTicket) -> RepositoryResult<Ticket>;
    fn update_ticket(
        &self,
        id: TicketId,
        hub_id: HubId,
        update: &TicketAdminUpdate,
    ) -> RepositoryResult<Ticket>;
    fn create_ticket_attachment(
        &self,
        attachment: &NewTicketAttachment,
    ) -> RepositoryResult<TicketAttachment>;
}

pub trait RegionReader {
    fn get_region_by_id(&self, id: RegionId, hub_id: HubId) -> RepositoryResult<Option<Region>>;
    fn list_regions(&self, hub_id: HubId) -> RepositoryResult<Vec<Region>>;
    fn list_catalog_entries(&self, hub_id: HubId) -> RepositoryResult<Vec<CatalogEntry>>;
    fn list_region_rates(
        &self,
        region_id: RegionId,
        active_only: bool,
    ) -> RepositoryResult<Vec<RegionRate>>;
}

pub trait RegionWriter {
    /// Inserts the region or returns the existing one with the same label.
    fn create_region(&self, region: &NewRegion) -> RepositoryResult<Region>;
    /// Inserts or renames a catalogue entry keyed by `(hub_id, code)`.
    fn upsert_catalog_entry(&self, entry: &NewCatalogEntry) -> RepositoryResult<CatalogEntry>;
    /// Inserts or updates a rate keyed by `(region_id, service_code)`.
    fn upsert_region_rate(&self, rate: &NewRegionRate) -> RepositoryResult<RegionRate>;
}

pub trait QuoteReader {
    fn get_quote_by_id(&self, id: QuoteId, hub_id: HubId) -> RepositoryResult<Option<Quote>>;
    /// Quotes newest first.
    fn list_quotes(&self, hub_id: HubId) -> RepositoryResult<Vec<Quote>>;
    fn list_quote_line_items(&self, quote_id: QuoteId) -> RepositoryResult<Vec<QuoteLineItem>>;
}

pub trait QuoteWriter {
    /// Stores the quote and all of its lines in one transaction.
    fn create_quote(&self, quote: &NewQuote, items: &[NewQuoteLineItem])
    -> RepositoryResult<Quote>;
    /// Creates the property and its services and marks the quote as
    /// converted, atomically. Fails if the quote was already converted.
    fn convert_quote(
        &self,
        id: QuoteId,
        hub_id: HubId,
        conversion: &QuoteConversion,
    ) -> RepositoryResult<Property>;
}

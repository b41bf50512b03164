//! Mock repository implementations for isolating services in tests.

use mockall::mock;

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
    AttachmentId, Email, HubId, OwnerId, PriceEntryId, PropertyId, PropertyServiceId, QuoteId,
    RegionId, ServiceCategory, ServiceEventId, ServicePersonId, TicketId,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    OwnerReader, OwnerWriter, PriceEntryReader, PriceEntryWriter, PropertyListQuery,
    PropertyReader, PropertyWriter, QuoteReader, QuoteWriter, RegionReader, RegionWriter,
    ServiceEventListQuery, ServiceEventReader, ServiceEventWriter, ServicePersonReader,
    ServicePersonWriter, TicketListQuery, TicketReader, TicketWriter,
};

mock! {
    pub Repository {}

    impl PropertyReader for Repository {
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
        fn list_hub_property_services(
            &self,
            hub_id: HubId,
        ) -> RepositoryResult<Vec<PropertyService>>;
    }

    impl PropertyWriter for Repository {
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

    impl ServicePersonReader for Repository {
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

    impl ServicePersonWriter for Repository {
        fn create_service_person(
            &self,
            person: &NewServicePerson,
        ) -> RepositoryResult<ServicePerson>;
        fn update_service_person(
            &self,
            id: ServicePersonId,
            hub_id: HubId,
            updates: &UpdateServicePerson,
        ) -> RepositoryResult<ServicePerson>;
        fn deactivate_service_person(&self, id: ServicePersonId, hub_id: HubId)
        -> RepositoryResult<()>;
    }

    impl PriceEntryReader for Repository {
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

    impl PriceEntryWriter for Repository {
        fn create_price_entry(&self, entry: &NewPriceEntry) -> RepositoryResult<PriceEntry>;
        fn update_price_entry(
            &self,
            id: PriceEntryId,
            hub_id: HubId,
            updates: &UpdatePriceEntry,
        ) -> RepositoryResult<PriceEntry>;
        fn delete_price_entry(&self, id: PriceEntryId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl ServiceEventReader for Repository {
        fn get_service_event_by_id(
            &self,
            id: ServiceEventId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<ServiceEvent>>;
        fn list_service_events(
            &self,
            query: ServiceEventListQuery,
        ) -> RepositoryResult<Vec<ScheduledVisit>>;
    }

    impl ServiceEventWriter for Repository {
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

    impl OwnerReader for Repository {
        fn get_owner_by_id(&self, id: OwnerId, hub_id: HubId) -> RepositoryResult<Option<Owner>>;
        fn get_owner_by_email(
            &self,
            email: &Email,
            hub_id: HubId,
        ) -> RepositoryResult<Option<Owner>>;
        fn list_owners(&self, hub_id: HubId) -> RepositoryResult<Vec<Owner>>;
        fn list_property_owners(
            &self,
            property_id: PropertyId,
            hub_id: HubId,
        ) -> RepositoryResult<Vec<Owner>>;
    }

    impl OwnerWriter for Repository {
        fn create_owner(&self, owner: &NewOwner) -> RepositoryResult<Owner>;
        fn update_owner(
            &self,
            id: OwnerId,
            hub_id: HubId,
            updates: &UpdateOwner,
        ) -> RepositoryResult<Owner>;
        fn delete_owner(&self, id: OwnerId, hub_id: HubId) -> RepositoryResult<()>;
        fn upsert_owner_user(&self, owner: &NewOwner) -> RepositoryResult<Owner>;
    }

    impl TicketReader for Repository {
        fn get_ticket_by_id(&self, id: TicketId, hub_id: HubId) -> RepositoryResult<Option<Ticket>>;
        fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<Vec<TicketListing>>;
        fn list_ticket_attachments(&self, ticket_id: TicketId)
        -> RepositoryResult<Vec<TicketAttachment>>;
        fn get_ticket_attachment(
            &self,
            id: AttachmentId,
            ticket_id: TicketId,
        ) -> RepositoryResult<Option<TicketAttachment>>;
    }

    impl TicketWriter for Repository {
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

    impl RegionReader for Repository {
        fn get_region_by_id(&self, id: RegionId, hub_id: HubId) -> RepositoryResult<Option<Region>>;
        fn list_regions(&self, hub_id: HubId) -> RepositoryResult<Vec<Region>>;
        fn list_catalog_entries(&self, hub_id: HubId) -> RepositoryResult<Vec<CatalogEntry>>;
        fn list_region_rates(
            &self,
            region_id: RegionId,
            active_only: bool,
        ) -> RepositoryResult<Vec<RegionRate>>;
    }

    impl RegionWriter for Repository {
        fn create_region(&self, region: &NewRegion) -> RepositoryResult<Region>;
        fn upsert_catalog_entry(&self, entry: &NewCatalogEntry) -> RepositoryResult<CatalogEntry>;
        fn upsert_region_rate(&self, rate: &NewRegionRate) -> RepositoryResult<RegionRate>;
    }

    impl QuoteReader for Repository {
        fn get_quote_by_id(&self, id: QuoteId, hub_id: HubId) -> RepositoryResult<Option<Quote>>;
        fn list_quotes(&self, hub_id: HubId) -> RepositoryResult<Vec<Quote>>;
        fn list_quote_line_items(&self, quote_id: QuoteId) -> RepositoryResult<Vec<QuoteLineItem>>;
    }

    impl QuoteWriter for Repository {
        fn create_quote(&self, quote: &NewQuote, items: &[NewQuoteLineItem])
        -> RepositoryResult<Quote>;
        fn convert_quote(
            &self,
            id: QuoteId,
            hub_id: HubId,
            conversion: &QuoteConversion,
        ) -> RepositoryResult<Property>;
    }
}

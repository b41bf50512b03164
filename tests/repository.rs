use chrono::NaiveDate;
use pushkind_grounds::domain::owner::NewOwner;
use pushkind_grounds::domain::property::{NewProperty, PropertyDetails, PropertyFinancials};
use pushkind_grounds::domain::property_service::NewPropertyService;
use pushkind_grounds::domain::quote::{NewQuote, NewQuoteLineItem};
use pushkind_grounds::domain::region::{NewCatalogEntry, NewRegion, NewRegionRate};
use pushkind_grounds::domain::service_event::{EventStatusUpdate, NewServiceEvent};
use pushkind_grounds::domain::service_person::{NewServicePerson, ServicePersonDetails};
use pushkind_grounds::domain::ticket::{NewTicket, TicketAdminUpdate};
use pushkind_grounds::domain::types::{
    Amount, CatalogName, Email, EventStatus, HubId, PersonName, PropertyId, PropertyName,
    RegionPart, ServiceCategory, ServiceCode, TicketPriority, TicketStatus, TicketSubject,
    TicketText, VisitCount,
};
use pushkind_grounds::repository::errors::RepositoryError;
use pushkind_grounds::repository::{
    DieselRepository, OwnerReader, OwnerWriter, PropertyListQuery, PropertyReader,
    PropertyWriter, QuoteReader, QuoteWriter, RegionReader, RegionWriter, ServiceEventListQuery,
    ServiceEventReader, ServiceEventWriter, ServicePersonReader, ServicePersonWriter,
    TicketListQuery, TicketReader, TicketWriter,
};

mod common;

fn hub() -> HubId {
    HubId::new(1).unwrap()
}

fn details(name: &str, city: &str) -> PropertyDetails {
    PropertyDetails {
        name: PropertyName::new(name).unwrap(),
        address: Some(format!("1 {name} Way")),
        city: Some(city.to_string()),
        state: Some("TX".to_string()),
        zip: None,
        annual_quote: Amount::ZERO,
        annual_credited: Amount::ZERO,
        annual_cost: Amount::ZERO,
    }
}

fn mowing() -> NewPropertyService {
    NewPropertyService::new(
        ServiceCategory::new("Mowing").unwrap(),
        "Weekly (22 Visits)",
        VisitCount::new(22).unwrap(),
        Amount::new(60.0).unwrap(),
        None,
    )
}

fn visit_on(property_id: PropertyId, date: (i32, u32, u32)) -> NewServiceEvent {
    NewServiceEvent {
        hub_id: hub(),
        property_id,
        service_id: None,
        provider_id: None,
        service_category: ServiceCategory::new("Mowing").unwrap(),
        scheduled_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        scheduled_time: None,
        followup_required: false,
        followup_notes: None,
    }
}

#[test]
fn test_property_repository_crud() {
    let test_db = common::TestDb::new("test_property_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let birch = repo
        .create_property(&NewProperty::new(hub(), details("Birch Court", "Frisco")))
        .unwrap();
    let oak = repo
        .create_property(&NewProperty::new(hub(), details("Oak Plaza", "Plano")))
        .unwrap();
    repo.create_property(&NewProperty::new(
        HubId::new(2).unwrap(),
        details("Elsewhere", "Austin"),
    ))
    .unwrap();

    let (total, items) = repo.list_properties(PropertyListQuery::new(hub())).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].name.as_str(), "Birch Court");

    let (found, items) = repo
        .list_properties(PropertyListQuery::new(hub()).search("plano"))
        .unwrap();
    assert_eq!(found, 1);
    assert_eq!(items[0].id, oak.id);

    let (paged_total, page) = repo
        .list_properties(PropertyListQuery::new(hub()).paginate(2, 1))
        .unwrap();
    assert_eq!(paged_total, 2);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, oak.id);

    let mut renamed = details("Birch Court East", "Frisco");
    renamed.annual_quote = Amount::new(1200.0).unwrap();
    let updated = repo.update_property(birch.id, hub(), &renamed).unwrap();
    assert_eq!(updated.name.as_str(), "Birch Court East");
    assert_eq!(updated.annual_quote.get(), 1200.0);

    assert!(
        repo.get_property_by_id(birch.id, HubId::new(2).unwrap())
            .unwrap()
            .is_none()
    );

    repo.delete_property(oak.id, hub()).unwrap();
    assert!(matches!(
        repo.delete_property(oak.id, hub()),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_property_services_and_financials() {
    let test_db = common::TestDb::new("test_property_services_and_financials.db");
    let repo = DieselRepository::new(test_db.pool());

    let property = repo
        .create_property(&NewProperty::new(hub(), details("Cedar Park", "Frisco")))
        .unwrap();
    let service = repo.create_property_service(property.id, &mowing()).unwrap();

    let mut cheaper = mowing();
    cheaper.each_time_cost = Amount::new(50.0).unwrap();
    let updated = repo
        .update_property_service(service.id, property.id, &cheaper)
        .unwrap();
    assert_eq!(updated.each_time_cost.get(), 50.0);

    let services = repo.list_property_services(property.id).unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(repo.list_hub_property_services(hub()).unwrap().len(), 1);

    let financials = PropertyFinancials::from_services(&services);
    let refreshed = repo
        .update_property_financials(property.id, hub(), &financials)
        .unwrap();
    assert_eq!(refreshed.annual_cost.get(), 1100.0);
    assert!(refreshed.annual_quote.get() > refreshed.annual_cost.get());

    repo.delete_property_service(service.id, property.id).unwrap();
    assert!(repo.list_property_services(property.id).unwrap().is_empty());
}

#[test]
fn test_service_events_window_and_status() {
    let test_db = common::TestDb::new("test_service_events_window_and_status.db");
    let repo = DieselRepository::new(test_db.pool());

    let property = repo
        .create_property(&NewProperty::new(hub(), details("Elm Yard", "Frisco")))
        .unwrap();
    let person = repo
        .create_service_person(&NewServicePerson {
            hub_id: hub(),
            details: ServicePersonDetails {
                full_name: PersonName::new("Maria Lopez").unwrap(),
                email: Some(Email::new("maria@example.com").unwrap()),
                phone: None,
                role: Some("Crew lead".to_string()),
                notes: None,
            },
        })
        .unwrap();

    let mut first = visit_on(property.id, (2025, 3, 1));
    first.provider_id = Some(person.id);
    let first = repo.create_service_event(&first).unwrap();
    repo.create_service_event(&visit_on(property.id, (2025, 4, 15)))
        .unwrap();
    repo.create_service_event(&visit_on(property.id, (2025, 6, 1)))
        .unwrap();

    let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
    let visits = repo
        .list_service_events(ServiceEventListQuery::new(hub()).between(start, end))
        .unwrap();
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0].event.id, first.id);
    assert_eq!(visits[0].property_name, "Elm Yard");
    assert_eq!(
        visits[0].provider.as_ref().map(|p| p.full_name.as_str()),
        Some("Maria Lopez")
    );

    repo.update_service_event_status(
        first.id,
        hub(),
        &EventStatusUpdate {
            status: EventStatus::Completed,
            followup_required: true,
            followup_notes: Some("Edge the beds".to_string()),
        },
    )
    .unwrap();

    let scheduled = repo
        .list_service_events(ServiceEventListQuery::new(hub()).status(EventStatus::Scheduled))
        .unwrap();
    assert_eq!(scheduled.len(), 2);

    let reminded = repo.mark_service_event_reminded(first.id, hub()).unwrap();
    assert!(reminded.last_reminder_at.is_some());

    repo.deactivate_service_person(person.id, hub()).unwrap();
    assert!(repo.list_service_people(hub(), true).unwrap().is_empty());
    assert_eq!(repo.list_service_people(hub(), false).unwrap().len(), 1);
}

#[test]
fn test_owner_upsert_keeps_property_link() {
    let test_db = common::TestDb::new("test_owner_upsert_keeps_property_link.db");
    let repo = DieselRepository::new(test_db.pool());

    let property = repo
        .create_property(&NewProperty::new(hub(), details("Maple Row", "Frisco")))
        .unwrap();
    let owner = repo
        .create_owner(&NewOwner {
            hub_id: hub(),
            name: PersonName::new("Dana Owner").unwrap(),
            email: Email::new("dana@example.com").unwrap(),
            phone: None,
            property_id: Some(property.id),
            is_user: false,
        })
        .unwrap();
    assert!(!owner.is_user);

    let signed_in = repo
        .upsert_owner_user(&NewOwner {
            hub_id: hub(),
            name: PersonName::new("Dana O.").unwrap(),
            email: Email::new("DANA@example.com").unwrap(),
            phone: None,
            property_id: None,
            is_user: true,
        })
        .unwrap();
    assert_eq!(signed_in.id, owner.id);
    assert!(signed_in.is_user);
    assert_eq!(signed_in.property_id, Some(property.id));

    let linked = repo.list_property_owners(property.id, hub()).unwrap();
    assert_eq!(linked.len(), 1);

    repo.delete_owner(owner.id, hub()).unwrap();
    assert!(repo.list_owners(hub()).unwrap().is_empty());
}

#[test]
fn test_ticket_lifecycle() {
    let test_db = common::TestDb::new("test_ticket_lifecycle.db");
    let repo = DieselRepository::new(test_db.pool());

    let property = repo
        .create_property(&NewProperty::new(hub(), details("Pine Lot", "Frisco")))
        .unwrap();
    let owner = repo
        .create_owner(&NewOwner {
            hub_id: hub(),
            name: PersonName::new("Sam Owner").unwrap(),
            email: Email::new("sam@example.com").unwrap(),
            phone: None,
            property_id: Some(property.id),
            is_user: true,
        })
        .unwrap();

    let ticket = repo
        .create_ticket(&NewTicket {
            hub_id: hub(),
            property_id: property.id,
            owner_id: Some(owner.id),
            subject: TicketSubject::new("Dead patch").unwrap(),
            description: TicketText::new("Near the <script>x</script>gate").unwrap(),
            priority: TicketPriority::High,
        })
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Open);
    assert!(!ticket.description.as_str().contains("<script>"));

    let mine = repo
        .list_tickets(TicketListQuery::new(hub()).owner(owner.id))
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].property_name, "Pine Lot");
    assert_eq!(mine[0].owner_email.as_deref(), Some("sam@example.com"));

    repo.update_ticket(
        ticket.id,
        hub(),
        &TicketAdminUpdate {
            status: TicketStatus::Resolved,
            priority: TicketPriority::High,
            admin_comment: Some("Reseeded".to_string()),
        },
    )
    .unwrap();

    let open = repo
        .list_tickets(TicketListQuery::new(hub()).status(TicketStatus::Open))
        .unwrap();
    assert!(open.is_empty());

    let other = repo
        .create_property(&NewProperty::new(hub(), details("Fir Depot", "Plano")))
        .unwrap();
    let on_property = repo
        .list_tickets(TicketListQuery::new(hub()).property(property.id))
        .unwrap();
    assert_eq!(on_property.len(), 1);
    assert!(
        repo.list_tickets(TicketListQuery::new(hub()).property(other.id))
            .unwrap()
            .is_empty()
    );

    repo.delete_property(property.id, hub()).unwrap();
    assert!(repo.get_ticket_by_id(ticket.id, hub()).unwrap().is_none());
}

#[test]
fn test_regions_upsert_and_quote_conversion() {
    let test_db = common::TestDb::new("test_regions_upsert_and_quote_conversion.db");
    let repo = DieselRepository::new(test_db.pool());

    let new_region = NewRegion {
        hub_id: hub(),
        state: RegionPart::new("TX").unwrap(),
        city: RegionPart::new("Frisco").unwrap(),
        property_type: RegionPart::new("Small Industrial").unwrap(),
        labor_factor: 1.0,
        material_factor: 1.0,
    };
    let region = repo.create_region(&new_region).unwrap();
    assert_eq!(repo.create_region(&new_region).unwrap().id, region.id);

    let entry = NewCatalogEntry {
        hub_id: hub(),
        code: ServiceCode::new("mowing").unwrap(),
        display_name: CatalogName::new("Mowing").unwrap(),
        default_times_per_year: VisitCount::new(22).unwrap(),
    };
    repo.upsert_catalog_entry(&entry).unwrap();
    repo.upsert_catalog_entry(&NewCatalogEntry {
        display_name: CatalogName::new("Lawn Mowing").unwrap(),
        ..entry
    })
    .unwrap();
    let catalog = repo.list_catalog_entries(hub()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].display_name.as_str(), "Lawn Mowing");

    let rate = NewRegionRate {
        region_id: region.id,
        service_code: ServiceCode::new("MOWING").unwrap(),
        base_price_per_visit: Amount::new(60.0).unwrap(),
        min_sqft: Some(0),
        max_sqft: Some(8000),
        active: true,
    };
    repo.upsert_region_rate(&rate).unwrap();
    repo.upsert_region_rate(&NewRegionRate {
        active: false,
        ..rate
    })
    .unwrap();
    assert!(repo.list_region_rates(region.id, true).unwrap().is_empty());
    assert_eq!(repo.list_region_rates(region.id, false).unwrap().len(), 1);

    let lines = vec![
        NewQuoteLineItem::new(
            ServiceCode::new("MOWING").unwrap(),
            "Mowing",
            VisitCount::new(22).unwrap(),
            Amount::new(60.0).unwrap(),
            true,
        ),
        NewQuoteLineItem::new(
            ServiceCode::new("MULCH").unwrap(),
            "Mulch",
            VisitCount::new(2).unwrap(),
            Amount::new(600.0).unwrap(),
            false,
        ),
    ];
    let quote = repo
        .create_quote(
            &NewQuote {
                hub_id: hub(),
                region_label: region.label(),
                customer_name: Some("Acme".to_string()),
                customer_email: None,
                property_name: Some("Acme Depot".to_string()),
                property_size_band: None,
                sqft_estimate: Some(8000),
                notes: None,
                annual_quote: Amount::new(1320.0).unwrap(),
            },
            &lines,
        )
        .unwrap();

    let items = repo.list_quote_line_items(quote.id).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(repo.list_quotes(hub()).unwrap().len(), 1);

    let conversion = quote.conversion(&items).unwrap();
    let property = repo.convert_quote(quote.id, hub(), &conversion).unwrap();
    assert_eq!(property.name.as_str(), "Acme Depot");
    assert_eq!(repo.list_property_services(property.id).unwrap().len(), 1);

    let stored = repo.get_quote_by_id(quote.id, hub()).unwrap().unwrap();
    assert_eq!(stored.converted_property_id, Some(property.id));
    assert!(matches!(
        repo.convert_quote(quote.id, hub(), &conversion),
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

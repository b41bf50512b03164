//! Services for properties, their service plans and fulfilment exports.

use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::fulfilment::property_fulfilment;
use crate::domain::property::{Property, PropertyFinancials};
use crate::domain::property_service::PropertyService;
use crate::domain::service_event::ScheduledVisit;
use crate::domain::types::{Amount, HubId, PropertyId, PropertyServiceId};
use crate::dto::CsvDownload;
use crate::dto::properties::{PropertiesPageData, PropertiesQuery, PropertyPageData};
use crate::export::{property_fulfilment_csv, property_fulfilment_filename};
use crate::forms::properties::{PropertyForm, PropertyPayload, ServiceForm, ServicePayload};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    OwnerReader, PriceEntryReader, PropertyListQuery, PropertyReader, PropertyWriter,
    ServiceEventListQuery, ServiceEventReader, TicketListQuery, TicketReader,
};
use crate::services::tickets::remove_ticket_uploads;
use crate::services::{ServiceError, ServiceResult, ensure_role, year_bounds, year_choices};

/// Loads one page of the hub's properties, optionally filtered by name.
pub fn list_properties<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PropertiesQuery,
) -> ServiceResult<PropertiesPageData>
where
    R: PropertyReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let page = query.page.unwrap_or(1).max(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut list_query = PropertyListQuery::new(hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, properties) = repo.list_properties(list_query).map_err(|err| {
        log::error!("Failed to list properties: {err}");
        err
    })?;

    Ok(PropertiesPageData {
        properties: Paginated::new(properties, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search_query,
    })
}

/// Visits of one property dated within `year`.
pub(crate) fn property_visits_in_year<R>(
    repo: &R,
    hub_id: HubId,
    property_id: PropertyId,
    year: i32,
) -> ServiceResult<Vec<ScheduledVisit>>
where
    R: ServiceEventReader + ?Sized,
{
    let (first, last) = year_bounds(year)?;
    let visits = repo.list_service_events(
        ServiceEventListQuery::new(hub_id)
            .property(property_id)
            .between(first, last),
    )?;
    Ok(visits)
}

/// Loads the property page: plan, owners, visits and fulfilment of `year`
/// (the current year when not given).
pub fn show_property<R>(
    repo: &R,
    user: &AuthenticatedUser,
    property_id: i32,
    year: Option<i32>,
    today: NaiveDate,
) -> ServiceResult<PropertyPageData>
where
    R: PropertyReader + OwnerReader + ServiceEventReader + PriceEntryReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let property_id = PropertyId::new(property_id)?;
    let year = year.unwrap_or_else(|| today.year());

    let property = repo
        .get_property_by_id(property_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let services = repo.list_property_services(property_id)?;
    let owners = repo.list_property_owners(property_id, hub_id)?;
    let events = property_visits_in_year(repo, hub_id, property_id, year)?;
    let price_entries = repo.list_price_entries(hub_id)?;

    let plain_events: Vec<_> = events.iter().map(|visit| visit.event.clone()).collect();
    let fulfilment = property_fulfilment(&property, &services, &plain_events, year);

    Ok(PropertyPageData {
        property,
        services,
        owners,
        events,
        fulfilment,
        year,
        year_choices: year_choices(today.year()),
        price_entries,
    })
}

pub fn create_property<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PropertyForm,
) -> ServiceResult<Property>
where
    R: PropertyWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = PropertyPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;

    let property = repo
        .create_property(&payload.into_domain(hub_id))
        .map_err(|err| {
            log::error!("Failed to create property: {err}");
            err
        })?;

    Ok(property)
}

pub fn update_property<R>(
    repo: &R,
    user: &AuthenticatedUser,
    property_id: i32,
    form: PropertyForm,
) -> ServiceResult<Property>
where
    R: PropertyWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = PropertyPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;
    let property_id = PropertyId::new(property_id)?;

    let property = repo.update_property(property_id, hub_id, &payload.into_update())?;

    Ok(property)
}

/// Deletes the property; services, visits and tickets go with it, and so do
/// the attachment files stored for those tickets under `upload_dir`.
pub fn delete_property<R>(
    repo: &R,
    user: &AuthenticatedUser,
    property_id: i32,
    upload_dir: &Path,
) -> ServiceResult<()>
where
    R: PropertyWriter + TicketReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let property_id = PropertyId::new(property_id)?;

    let tickets = repo.list_tickets(TicketListQuery::new(hub_id).property(property_id))?;

    repo.delete_property(property_id, hub_id).map_err(|err| {
        log::error!("Failed to delete property {property_id}: {err}");
        err
    })?;

    for listing in &tickets {
        remove_ticket_uploads(upload_dir, listing.ticket.id);
    }

    Ok(())
}

/// Re-derives the annual cost, quote and credited amounts from the plan.
pub fn recalculate_financials<R>(
    repo: &R,
    user: &AuthenticatedUser,
    property_id: i32,
) -> ServiceResult<Property>
where
    R: PropertyReader + PropertyWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let property_id = PropertyId::new(property_id)?;

    repo.get_property_by_id(property_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let services = repo.list_property_services(property_id)?;
    let financials = PropertyFinancials::from_services(&services);

    let property = repo.update_property_financials(property_id, hub_id, &financials)?;

    Ok(property)
}

fn load_property<R>(repo: &R, user: &AuthenticatedUser, property_id: i32) -> ServiceResult<Property>
where
    R: PropertyReader + ?Sized,
{
    let hub_id = HubId::new(user.hub_id)?;
    let property_id = PropertyId::new(property_id)?;
    repo.get_property_by_id(property_id, hub_id)?
        .ok_or(ServiceError::NotFound)
}

/// Adds a service line. Without an explicit cost the price master entry for
/// the same category and frequency supplies it, else zero.
pub fn add_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    property_id: i32,
    form: ServiceForm,
) -> ServiceResult<PropertyService>
where
    R: PropertyReader + PropertyWriter + PriceEntryReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = ServicePayload::try_from(form)?;
    let property = load_property(repo, user, property_id)?;

    let fallback_cost = if payload.each_time_cost.is_some() {
        Amount::ZERO
    } else {
        repo.find_price_entry(property.hub_id, &payload.category, &payload.frequency)?
            .map(|entry| entry.default_cost)
            .unwrap_or(Amount::ZERO)
    };

    let service = repo.create_property_service(property.id, &payload.into_domain(fallback_cost))?;

    Ok(service)
}

/// Updates a service line; a blank cost keeps the current one.
pub fn update_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    property_id: i32,
    service_id: i32,
    form: ServiceForm,
) -> ServiceResult<PropertyService>
where
    R: PropertyReader + PropertyWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = ServicePayload::try_from(form)?;
    let property = load_property(repo, user, property_id)?;
    let service_id = PropertyServiceId::new(service_id)?;

    let current = repo
        .get_property_service_by_id(service_id, property.id)?
        .ok_or(ServiceError::NotFound)?;

    let service = repo.update_property_service(
        service_id,
        property.id,
        &payload.into_domain(current.each_time_cost),
    )?;

    Ok(service)
}

pub fn delete_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    property_id: i32,
    service_id: i32,
) -> ServiceResult<()>
where
    R: PropertyReader + PropertyWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let property = load_property(repo, user, property_id)?;
    let service_id = PropertyServiceId::new(service_id)?;

    repo.delete_property_service(service_id, property.id)?;

    Ok(())
}

/// Builds the fulfilment spreadsheet of one property for `year`.
pub fn export_property_fulfilment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    property_id: i32,
    year: i32,
) -> ServiceResult<CsvDownload>
where
    R: PropertyReader + ServiceEventReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let property = load_property(repo, user, property_id)?;
    let services = repo.list_property_services(property.id)?;
    let events: Vec<_> = property_visits_in_year(repo, property.hub_id, property.id, year)?
        .into_iter()
        .map(|visit| visit.event)
        .collect();

    let fulfilment = property_fulfilment(&property, &services, &events, year);
    let content = property_fulfilment_csv(&fulfilment)?;

    Ok(CsvDownload {
        filename: property_fulfilment_filename(property.id.get(), year),
        content,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::price_entry::PriceEntry;
    use crate::domain::ticket::TicketListing;
    use crate::domain::types::{EventStatus, PriceEntryId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        HUB, admin_user, property, role_only_user, service, ticket, viewer_user, visit,
    };

    fn listing(ticket_id: i32, property_id: i32) -> TicketListing {
        TicketListing {
            ticket: ticket(ticket_id, property_id, None),
            property_name: "Oak Court".to_string(),
            owner_email: None,
        }
    }

    fn stored_upload(root: &Path, ticket_id: i32) -> std::path::PathBuf {
        let dir = root.join(format!("ticket_{ticket_id}"));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("photo.png"), b"png").unwrap();
        dir
    }

    fn service_form(cost: &str) -> ServiceForm {
        ServiceForm {
            category: "Mowing".to_string(),
            frequency: "Weekly (22 Visits)".to_string(),
            times_per_year: "22".to_string(),
            each_time_cost: cost.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn list_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_properties().times(0);

        let result = list_properties(&repo, &viewer_user(), PropertiesQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn delete_removes_stored_ticket_uploads() {
        let uploads = tempfile::tempdir().unwrap();
        let doomed = stored_upload(uploads.path(), 5);
        let unrelated = stored_upload(uploads.path(), 6);

        let mut repo = MockRepository::new();
        repo.expect_list_tickets()
            .withf(|query| query.property_id == Some(PropertyId::new(3).unwrap()))
            .times(1)
            .returning(|_| Ok(vec![listing(5, 3), listing(7, 3)]));
        repo.expect_delete_property()
            .withf(|id, hub_id| id.get() == 3 && hub_id.get() == HUB)
            .times(1)
            .returning(|_, _| Ok(()));

        delete_property(&repo, &admin_user(), 3, uploads.path()).expect("deletes");

        assert!(!doomed.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn failed_delete_keeps_ticket_uploads() {
        let uploads = tempfile::tempdir().unwrap();
        let kept = stored_upload(uploads.path(), 5);

        let mut repo = MockRepository::new();
        repo.expect_list_tickets()
            .returning(|_| Ok(vec![listing(5, 3)]));
        repo.expect_delete_property()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let result = delete_property(&repo, &admin_user(), 3, uploads.path());

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert!(kept.exists());
    }

    #[test]
    fn admin_role_alone_does_not_grant_access() {
        let mut repo = MockRepository::new();
        repo.expect_list_properties().times(0);

        let user = role_only_user(SERVICE_ADMIN_ROLE);
        let result = list_properties(&repo, &user, PropertiesQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn list_paginates_and_trims_search() {
        let mut repo = MockRepository::new();
        repo.expect_list_properties()
            .withf(|query| {
                query.hub_id.get() == HUB
                    && query.search.as_deref() == Some("oak")
                    && query.pagination.as_ref().map(|p| p.page) == Some(2)
            })
            .times(1)
            .returning(|_| Ok((45, vec![property(1, "Oak Court")])));

        let data = list_properties(
            &repo,
            &admin_user(),
            PropertiesQuery {
                search: Some("  oak ".to_string()),
                page: Some(2),
            },
        )
        .expect("lists properties");

        assert_eq!(data.search_query.as_deref(), Some("oak"));
        assert_eq!(data.properties.items.len(), 1);
        assert_eq!(data.properties.pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn new_service_without_cost_uses_price_master() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_find_price_entry()
            .withf(|_, category, frequency| {
                category.as_str() == "Mowing" && frequency == "Weekly (22 Visits)"
            })
            .times(1)
            .returning(|hub_id, category, frequency| {
                Ok(Some(PriceEntry {
                    id: PriceEntryId::new(1).unwrap(),
                    hub_id,
                    category: category.clone(),
                    frequency: frequency.to_string(),
                    default_cost: Amount::new(60.0).unwrap(),
                    notes: None,
                }))
            });
        repo.expect_create_property_service()
            .withf(|_, new_service| new_service.each_time_cost.get() == 60.0)
            .times(1)
            .returning(|property_id, _| Ok(service(5, property_id.get(), "Mowing", 22, 60.0)));

        let created = add_service(&repo, &admin_user(), 1, service_form("")).expect("adds");
        assert_eq!(created.each_time_cost.get(), 60.0);
    }

    #[test]
    fn new_service_without_price_entry_costs_zero() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_find_price_entry().returning(|_, _, _| Ok(None));
        repo.expect_create_property_service()
            .withf(|_, new_service| new_service.each_time_cost == Amount::ZERO)
            .times(1)
            .returning(|property_id, _| Ok(service(5, property_id.get(), "Mowing", 22, 0.0)));

        add_service(&repo, &admin_user(), 1, service_form("")).expect("adds");
    }

    #[test]
    fn explicit_cost_skips_price_master() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_find_price_entry().times(0);
        repo.expect_create_property_service()
            .withf(|_, new_service| new_service.each_time_cost.get() == 55.0)
            .times(1)
            .returning(|property_id, _| Ok(service(5, property_id.get(), "Mowing", 22, 55.0)));

        add_service(&repo, &admin_user(), 1, service_form("55")).expect("adds");
    }

    #[test]
    fn service_on_foreign_property_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id().returning(|_, _| Ok(None));
        repo.expect_create_property_service().times(0);

        let result = add_service(&repo, &admin_user(), 99, service_form("10"));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn recalculation_stores_derived_financials() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_list_property_services().returning(|property_id| {
            Ok(vec![
                service(1, property_id.get(), "Mowing", 22, 60.0),
                service(2, property_id.get(), "Weed Control", 3, 85.0),
            ])
        });
        repo.expect_update_property_financials()
            .withf(|_, hub_id, financials| {
                hub_id.get() == HUB
                    && (financials.annual_cost.get() - 1575.0).abs() < 1e-9
                    && (financials.annual_quote.get() - 2047.5).abs() < 1e-9
            })
            .times(1)
            .returning(|id, _, _| Ok(property(id.get(), "Oak Court")));

        recalculate_financials(&repo, &admin_user(), 1).expect("recalculates");
    }

    #[test]
    fn show_property_builds_fulfilment_for_requested_year() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_list_property_services()
            .returning(|property_id| Ok(vec![service(10, property_id.get(), "Mowing", 4, 60.0)]));
        repo.expect_list_property_owners().returning(|_, _| Ok(vec![]));
        repo.expect_list_price_entries().returning(|_| Ok(vec![]));
        repo.expect_list_service_events()
            .withf(|query| {
                query.from == NaiveDate::from_ymd_opt(2024, 1, 1)
                    && query.to == NaiveDate::from_ymd_opt(2024, 12, 31)
                    && query.property_id.map(PropertyId::get) == Some(1)
            })
            .times(1)
            .returning(|_| {
                Ok(vec![
                    visit(1, 1, Some(10), (2024, 5, 1), EventStatus::Completed),
                    visit(2, 1, Some(10), (2024, 6, 1), EventStatus::Scheduled),
                ])
            });

        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let data = show_property(&repo, &admin_user(), 1, Some(2024), today).expect("loads");

        assert_eq!(data.year, 2024);
        assert_eq!(data.year_choices, vec![2025, 2024, 2023]);
        assert_eq!(data.fulfilment.tally.planned, 4);
        assert_eq!(data.fulfilment.tally.completed, 1);
        assert_eq!(data.fulfilment.tally.scheduled, 1);
        assert_eq!(data.events.len(), 2);
    }

    #[test]
    fn export_names_file_after_property_and_year() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_list_property_services()
            .returning(|property_id| Ok(vec![service(10, property_id.get(), "Mowing", 2, 60.0)]));
        repo.expect_list_service_events().returning(|_| Ok(vec![]));

        let download =
            export_property_fulfilment(&repo, &admin_user(), 3, 2025).expect("exports");

        assert_eq!(download.filename, "property_3_fulfilment_2025.csv");
        let text = String::from_utf8(download.content).unwrap();
        assert!(text.contains("Mowing"));
        assert!(text.contains("Not Started"));
    }
}

//! Portfolio-wide reports offered as CSV downloads.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::fulfilment::{PropertyFulfilment, portfolio_fulfilment};
use crate::domain::portfolio::consolidated_rows;
use crate::domain::types::HubId;
use crate::dto::CsvDownload;
use crate::export::{
    CONSOLIDATED_FILENAME, consolidated_csv, portfolio_fulfilment_csv,
    portfolio_fulfilment_filename,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    PropertyListQuery, PropertyReader, ServiceEventListQuery, ServiceEventReader,
};
use crate::services::{ServiceResult, ensure_role, year_bounds};

/// Fulfilment of every property of the hub in `year`, ordered by name.
pub(crate) fn load_portfolio_fulfilment<R>(
    repo: &R,
    hub_id: HubId,
    year: i32,
) -> ServiceResult<Vec<PropertyFulfilment>>
where
    R: PropertyReader + ServiceEventReader + ?Sized,
{
    let (first, last) = year_bounds(year)?;
    let (_, properties) = repo.list_properties(PropertyListQuery::new(hub_id))?;
    let services = repo.list_hub_property_services(hub_id)?;
    let events: Vec<_> = repo
        .list_service_events(ServiceEventListQuery::new(hub_id).between(first, last))?
        .into_iter()
        .map(|visit| visit.event)
        .collect();

    Ok(portfolio_fulfilment(&properties, &services, &events, year))
}

pub fn export_portfolio_fulfilment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    year: i32,
) -> ServiceResult<CsvDownload>
where
    R: PropertyReader + ServiceEventReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let rows = load_portfolio_fulfilment(repo, hub_id, year).map_err(|err| {
        log::error!("Failed to load portfolio fulfilment for {year}: {err}");
        err
    })?;

    Ok(CsvDownload {
        filename: portfolio_fulfilment_filename(year),
        content: portfolio_fulfilment_csv(&rows)?,
    })
}

/// Per-property visits, cost, quote, credit, margin and ROI.
pub fn export_consolidated<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<CsvDownload>
where
    R: PropertyReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let (_, properties) = repo.list_properties(PropertyListQuery::new(hub_id))?;
    let services = repo.list_hub_property_services(hub_id)?;

    Ok(CsvDownload {
        filename: CONSOLIDATED_FILENAME.to_string(),
        content: consolidated_csv(&consolidated_rows(&properties, &services))?,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::types::EventStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{admin_user, property, service, viewer_user, visit};

    #[test]
    fn portfolio_export_is_limited_to_the_year() {
        let mut repo = MockRepository::new();
        repo.expect_list_properties()
            .withf(|query| query.pagination.is_none())
            .returning(|_| Ok((2, vec![property(1, "Birch"), property(2, "Oak")])));
        repo.expect_list_hub_property_services().returning(|_| {
            Ok(vec![
                service(10, 1, "Mowing", 22, 60.0),
                service(20, 2, "Mulch", 2, 600.0),
            ])
        });
        repo.expect_list_service_events()
            .withf(|query| {
                query.from == NaiveDate::from_ymd_opt(2024, 1, 1)
                    && query.to == NaiveDate::from_ymd_opt(2024, 12, 31)
            })
            .returning(|_| {
                Ok(vec![
                    visit(1, 1, Some(10), (2024, 4, 1), EventStatus::Completed),
                    visit(2, 2, Some(20), (2024, 5, 1), EventStatus::Completed),
                    visit(3, 2, Some(20), (2024, 11, 1), EventStatus::Completed),
                ])
            });

        let download = export_portfolio_fulfilment(&repo, &admin_user(), 2024).expect("exports");
        assert_eq!(download.filename, "portfolio_fulfilment_2024.csv");
        let text = String::from_utf8(download.content).unwrap();
        assert!(text.contains("Birch"));
        assert!(text.contains("On Track"));
    }

    #[test]
    fn consolidated_export_uses_fixed_name() {
        let mut repo = MockRepository::new();
        repo.expect_list_properties()
            .returning(|_| Ok((1, vec![property(1, "Birch")])));
        repo.expect_list_hub_property_services()
            .returning(|_| Ok(vec![service(10, 1, "Mowing", 10, 70.0)]));

        let download = export_consolidated(&repo, &admin_user()).expect("exports");
        assert_eq!(download.filename, "consolidated_report.csv");
        assert!(!download.content.is_empty());
    }

    #[test]
    fn viewer_cannot_export() {
        let repo = MockRepository::new();
        let result = export_consolidated(&repo, &viewer_user());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}

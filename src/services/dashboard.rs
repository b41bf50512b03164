use chrono::{Datelike, Duration, NaiveDate};

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::portfolio::{ModuleHealth, PortfolioTotals};
use crate::domain::types::{EventStatus, HubId, TicketStatus};
use crate::dto::dashboard::DashboardPageData;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    PriceEntryReader, PropertyListQuery, PropertyReader, ServiceEventListQuery,
    ServiceEventReader, ServicePersonReader, TicketListQuery, TicketReader,
};
use crate::services::reports::load_portfolio_fulfilment;
use crate::services::{ServiceResult, ensure_role, year_choices};

/// Headline financials, module health counters and the portfolio
/// fulfilment of `year` (the current year when not given).
pub fn show_dashboard<R>(
    repo: &R,
    user: &AuthenticatedUser,
    year: Option<i32>,
    today: NaiveDate,
) -> ServiceResult<DashboardPageData>
where
    R: PropertyReader
        + ServiceEventReader
        + TicketReader
        + ServicePersonReader
        + PriceEntryReader
        + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let year = year.unwrap_or_else(|| today.year());

    let (_, properties) = repo
        .list_properties(PropertyListQuery::new(hub_id))
        .map_err(|err| {
            log::error!("Failed to load dashboard properties: {err}");
            err
        })?;
    let totals = PortfolioTotals::from_properties(&properties);

    let health = ModuleHealth {
        open_tickets: repo
            .list_tickets(TicketListQuery::new(hub_id).status(TicketStatus::Open))?
            .len(),
        overdue_events: repo
            .list_service_events(
                ServiceEventListQuery::new(hub_id)
                    .until(today - Duration::days(1))
                    .status(EventStatus::Scheduled),
            )?
            .len(),
        active_staff: repo.list_service_people(hub_id, true)?.len(),
        price_entries: repo.list_price_entries(hub_id)?.len(),
    };

    let fulfilment = load_portfolio_fulfilment(repo, hub_id, year)?;

    Ok(DashboardPageData {
        totals,
        health,
        fulfilment,
        year,
        year_choices: year_choices(today.year()),
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{admin_user, person, property, viewer_user, visit};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    #[test]
    fn dashboard_counts_module_health() {
        let mut repo = MockRepository::new();
        repo.expect_list_properties()
            .returning(|_| Ok((2, vec![property(1, "Birch"), property(2, "Oak")])));
        repo.expect_list_tickets()
            .withf(|query| query.status == Some(TicketStatus::Open))
            .returning(|_| Ok(vec![]))
            .times(1);
        repo.expect_list_service_events()
            .withf(|query| query.status == Some(EventStatus::Scheduled))
            .times(1)
            .returning(|query| {
                assert_eq!(query.to, NaiveDate::from_ymd_opt(2025, 5, 9));
                assert!(query.from.is_none());
                Ok(vec![visit(1, 1, None, (2025, 5, 1), EventStatus::Scheduled)])
            });
        repo.expect_list_service_events()
            .withf(|query| query.status.is_none())
            .returning(|_| Ok(vec![]));
        repo.expect_list_service_people()
            .returning(|_, _| Ok(vec![person(1, None, None)]));
        repo.expect_list_price_entries().returning(|_| Ok(vec![]));
        repo.expect_list_hub_property_services()
            .returning(|_| Ok(vec![]));

        let data = show_dashboard(&repo, &admin_user(), None, today()).expect("loads");
        assert_eq!(data.year, 2025);
        assert_eq!(data.totals.property_count, 2);
        assert_eq!(data.totals.total_credited, 1900.0);
        assert_eq!(data.health.overdue_events, 1);
        assert_eq!(data.health.active_staff, 1);
        assert_eq!(data.fulfilment.len(), 2);
    }

    #[test]
    fn dashboard_requires_admin() {
        let repo = MockRepository::new();
        let result = show_dashboard(&repo, &viewer_user(), Some(2024), today());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}

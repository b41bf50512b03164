use chrono::{Datelike, NaiveDate};

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::types::HubId;
use crate::dto::api::{FulfilmentResponse, PropertiesApiQuery, PropertiesResponse};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{PropertyListQuery, PropertyReader, ServiceEventReader};
use crate::services::reports::load_portfolio_fulfilment;
use crate::services::{ServiceResult, ensure_role};

/// Returns the filtered list of properties of the user's hub. Without a
/// page number every match is returned.
pub fn list_properties<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: PropertiesApiQuery,
) -> ServiceResult<PropertiesResponse>
where
    R: PropertyReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let mut query = PropertyListQuery::new(HubId::new(user.hub_id)?);

    if let Some(page) = params.page {
        query = query.paginate(page.max(1), DEFAULT_ITEMS_PER_PAGE);
    }

    if let Some(term) = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        query = query.search(term);
    }

    let (total, properties) = repo.list_properties(query)?;

    Ok(PropertiesResponse { total, properties })
}

pub fn portfolio_fulfilment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    year: Option<i32>,
    today: NaiveDate,
) -> ServiceResult<FulfilmentResponse>
where
    R: PropertyReader + ServiceEventReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let year = year.unwrap_or_else(|| today.year());
    let properties = load_portfolio_fulfilment(repo, hub_id, year)?;

    Ok(FulfilmentResponse { year, properties })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::Pagination;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{admin_user, property, viewer_user};

    #[test]
    fn search_and_page_are_forwarded() {
        let mut repo = MockRepository::new();
        repo.expect_list_properties()
            .withf(|query| {
                query.search.as_deref() == Some("oak")
                    && query.pagination
                        == Some(Pagination {
                            page: 2,
                            per_page: DEFAULT_ITEMS_PER_PAGE,
                        })
            })
            .times(1)
            .returning(|_| Ok((21, vec![property(21, "Oak Court")])));

        let response = list_properties(
            &repo,
            &admin_user(),
            PropertiesApiQuery {
                search: Some("  oak ".to_string()),
                page: Some(2),
            },
        )
        .expect("lists");

        assert_eq!(response.total, 21);
        assert_eq!(response.properties.len(), 1);
    }

    #[test]
    fn api_requires_admin() {
        let repo = MockRepository::new();
        let result = list_properties(&repo, &viewer_user(), PropertiesApiQuery::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn fulfilment_defaults_to_current_year() {
        let mut repo = MockRepository::new();
        repo.expect_list_properties().returning(|_| Ok((0, vec![])));
        repo.expect_list_hub_property_services()
            .returning(|_| Ok(vec![]));
        repo.expect_list_service_events().returning(|_| Ok(vec![]));

        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let response =
            portfolio_fulfilment(&repo, &admin_user(), None, today).expect("loads");
        assert_eq!(response.year, 2025);
        assert!(response.properties.is_empty());
    }
}

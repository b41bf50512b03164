//! Owner portal.

use chrono::{Datelike, NaiveDate};

use crate::SERVICE_OWNER_ROLE;
use crate::domain::fulfilment::property_fulfilment;
use crate::domain::owner::{NewOwner, Owner};
use crate::domain::types::{Email, HubId, PersonName};
use crate::dto::portal::{OwnedProperty, PortalPageData};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{OwnerWriter, PropertyReader, ServiceEventReader};
use crate::services::properties::property_visits_in_year;
use crate::services::{ServiceResult, ensure_role};

/// Creates or refreshes the owner row of the signed-in user. The link to a
/// property is left as administrators set it.
pub(crate) fn resolve_owner<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Owner>
where
    R: OwnerWriter + ?Sized,
{
    ensure_role(user, SERVICE_OWNER_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let email = Email::new(user.email.as_str())?;
    let name = PersonName::new(user.name.as_str())
        .or_else(|_| PersonName::new(email.as_str()))?;

    let owner = repo
        .upsert_owner_user(&NewOwner {
            hub_id,
            name,
            email,
            phone: None,
            property_id: None,
            is_user: true,
        })
        .map_err(|err| {
            log::error!("Failed to register owner {}: {err}", user.email);
            err
        })?;

    Ok(owner)
}

/// The owner's property with its plan, this year's fulfilment and visits.
pub fn show_portal<R>(
    repo: &R,
    user: &AuthenticatedUser,
    today: NaiveDate,
) -> ServiceResult<PortalPageData>
where
    R: OwnerWriter + PropertyReader + ServiceEventReader + ?Sized,
{
    let owner = resolve_owner(repo, user)?;

    let Some(property_id) = owner.property_id else {
        return Ok(PortalPageData {
            owner,
            property: None,
        });
    };

    let Some(property) = repo.get_property_by_id(property_id, owner.hub_id)? else {
        log::warn!("Owner {} is linked to a missing property", owner.id);
        return Ok(PortalPageData {
            owner,
            property: None,
        });
    };

    let year = today.year();
    let services = repo.list_property_services(property.id)?;
    let events = property_visits_in_year(repo, owner.hub_id, property.id, year)?;
    let plain: Vec<_> = events.iter().map(|v| v.event.clone()).collect();
    let fulfilment = property_fulfilment(&property, &services, &plain, year);

    Ok(PortalPageData {
        owner,
        property: Some(OwnedProperty {
            property,
            services,
            fulfilment,
            events,
        }),
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::types::{EventStatus, PropertyId};
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{
        HUB, admin_user, owner, owner_user, property, role_only_user, service, visit,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn admin_without_owner_role_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_owner_user().times(0);

        let result = show_portal(&repo, &admin_user(), today());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn owner_role_alone_does_not_grant_access() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_owner_user().times(0);

        let user = role_only_user(SERVICE_OWNER_ROLE);
        let result = show_portal(&repo, &user, today());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn owner_is_registered_as_user() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_owner_user()
            .withf(|new_owner| {
                new_owner.is_user
                    && new_owner.hub_id.get() == HUB
                    && new_owner.email.as_str() == "owner@example.com"
                    && new_owner.property_id.is_none()
            })
            .times(1)
            .returning(|_| Ok(owner(1, "owner@example.com", None)));
        repo.expect_get_property_by_id().times(0);

        let data = show_portal(&repo, &owner_user(), today()).expect("shows");
        assert!(data.property.is_none());
    }

    #[test]
    fn linked_owner_sees_property_fulfilment() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_owner_user()
            .returning(|_| Ok(owner(1, "owner@example.com", Some(3))));
        repo.expect_get_property_by_id()
            .withf(|id, _| id.get() == 3)
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_list_property_services()
            .returning(|id| Ok(vec![service(10, id.get(), "Mowing", 22, 60.0)]));
        repo.expect_list_service_events()
            .withf(|query| query.property_id == Some(PropertyId::new(3).unwrap()))
            .returning(|_| {
                Ok(vec![
                    visit(1, 3, Some(10), (2025, 4, 2), EventStatus::Completed),
                    visit(2, 3, Some(10), (2025, 6, 9), EventStatus::Scheduled),
                ])
            });

        let data = show_portal(&repo, &owner_user(), today()).expect("shows");
        let owned = data.property.expect("linked property");
        assert_eq!(owned.fulfilment.tally.planned, 22);
        assert_eq!(owned.fulfilment.tally.completed, 1);
        assert_eq!(owned.fulfilment.tally.scheduled, 1);
        assert_eq!(owned.events.len(), 2);
    }
}

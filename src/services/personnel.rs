//! Crew administration.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::service_person::ServicePerson;
use crate::domain::types::{HubId, ServicePersonId};
use crate::dto::personnel::PersonnelPageData;
use crate::forms::personnel::{ServicePersonForm, ServicePersonPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ServicePersonReader, ServicePersonWriter};
use crate::services::{ServiceResult, ensure_role};

/// Loads every crew member of the hub, inactive ones included.
pub fn list_personnel<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<PersonnelPageData>
where
    R: ServicePersonReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let people = repo.list_service_people(hub_id, false).map_err(|err| {
        log::error!("Failed to list service people: {err}");
        err
    })?;

    Ok(PersonnelPageData { people })
}

pub fn add_person<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ServicePersonForm,
) -> ServiceResult<ServicePerson>
where
    R: ServicePersonWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = ServicePersonPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;

    let person = repo.create_service_person(&payload.into_domain(hub_id))?;

    Ok(person)
}

pub fn update_person<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: ServicePersonForm,
) -> ServiceResult<ServicePerson>
where
    R: ServicePersonWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = ServicePersonPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;
    let person_id = ServicePersonId::new(person_id)?;

    let person = repo.update_service_person(person_id, hub_id, &payload.into_update())?;

    Ok(person)
}

/// Soft-deletes the person; past visits keep their provider.
pub fn deactivate_person<R>(repo: &R, user: &AuthenticatedUser, person_id: i32) -> ServiceResult<()>
where
    R: ServicePersonWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let person_id = ServicePersonId::new(person_id)?;

    repo.deactivate_service_person(person_id, hub_id)
        .map_err(|err| {
            log::error!("Failed to deactivate service person {person_id}: {err}");
            err
        })?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{HUB, admin_user, person, viewer_user};

    fn form(email: &str) -> ServicePersonForm {
        ServicePersonForm {
            full_name: "Maria Lopez".to_string(),
            email: email.to_string(),
            phone: String::new(),
            role: String::new(),
            notes: String::new(),
            is_active: None,
        }
    }

    #[test]
    fn listing_includes_inactive_people() {
        let mut repo = MockRepository::new();
        repo.expect_list_service_people()
            .withf(|hub_id, active_only| hub_id.get() == HUB && !active_only)
            .times(1)
            .returning(|_, _| Ok(vec![person(1, None, None)]));

        let data = list_personnel(&repo, &admin_user()).expect("lists");
        assert_eq!(data.people.len(), 1);
    }

    #[test]
    fn add_rejects_invalid_email_before_storage() {
        let mut repo = MockRepository::new();
        repo.expect_create_service_person().times(0);

        let result = add_person(&repo, &admin_user(), form("nope"));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn add_stores_person_in_user_hub() {
        let mut repo = MockRepository::new();
        repo.expect_create_service_person()
            .withf(|new_person| {
                new_person.hub_id.get() == HUB
                    && new_person.details.email.as_ref().map(|e| e.as_str())
                        == Some("maria@example.com")
            })
            .times(1)
            .returning(|_| Ok(person(3, Some("maria@example.com"), None)));

        add_person(&repo, &admin_user(), form("Maria@Example.com")).expect("adds");
    }

    #[test]
    fn deactivate_missing_person_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_deactivate_service_person()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let result = deactivate_person(&repo, &admin_user(), 5);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn viewer_cannot_deactivate() {
        let mut repo = MockRepository::new();
        repo.expect_deactivate_service_person().times(0);

        let result = deactivate_person(&repo, &viewer_user(), 5);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}

//! Owner administration: linking owner e-mails to properties.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::owner::Owner;
use crate::domain::types::{HubId, OwnerId, PropertyId};
use crate::dto::owners::OwnersPageData;
use crate::forms::owners::{OwnerForm, OwnerPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;
use crate::repository::{OwnerReader, OwnerWriter, PropertyListQuery, PropertyReader};
use crate::services::{ServiceError, ServiceResult, ensure_role};

pub fn list_owners<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<OwnersPageData>
where
    R: OwnerReader + PropertyReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let owners = repo.list_owners(hub_id)?;
    let (_, properties) = repo.list_properties(PropertyListQuery::new(hub_id))?;

    Ok(OwnersPageData { owners, properties })
}

/// Rejects property ids that do not belong to the hub.
fn check_property<R>(repo: &R, hub_id: HubId, property_id: Option<PropertyId>) -> ServiceResult<()>
where
    R: PropertyReader + ?Sized,
{
    if let Some(property_id) = property_id
        && repo.get_property_by_id(property_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form("Unknown property.".to_string()));
    }
    Ok(())
}

fn duplicate_as_form_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation(_) => {
            ServiceError::Form("An owner with this e-mail already exists.".to_string())
        }
        other => other.into(),
    }
}

pub fn add_owner<R>(repo: &R, user: &AuthenticatedUser, form: OwnerForm) -> ServiceResult<Owner>
where
    R: OwnerWriter + PropertyReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = OwnerPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;
    check_property(repo, hub_id, payload.property_id)?;

    repo.create_owner(&payload.into_domain(hub_id))
        .map_err(duplicate_as_form_error)
}

pub fn update_owner<R>(
    repo: &R,
    user: &AuthenticatedUser,
    owner_id: i32,
    form: OwnerForm,
) -> ServiceResult<Owner>
where
    R: OwnerWriter + PropertyReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = OwnerPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;
    let owner_id = OwnerId::new(owner_id)?;
    check_property(repo, hub_id, payload.property_id)?;

    repo.update_owner(owner_id, hub_id, &payload.into_update())
        .map_err(duplicate_as_form_error)
}

pub fn delete_owner<R>(repo: &R, user: &AuthenticatedUser, owner_id: i32) -> ServiceResult<()>
where
    R: OwnerWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let owner_id = OwnerId::new(owner_id)?;

    repo.delete_owner(owner_id, hub_id)?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, owner, property};

    fn form(property_id: &str) -> OwnerForm {
        OwnerForm {
            name: "Olivia Owner".to_string(),
            email: "olivia@example.com".to_string(),
            phone: String::new(),
            property_id: property_id.to_string(),
        }
    }

    #[test]
    fn owner_cannot_be_linked_to_foreign_property() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id().returning(|_, _| Ok(None));
        repo.expect_create_owner().times(0);

        let result = add_owner(&repo, &admin_user(), form("77"));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn owner_is_linked_to_hub_property() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_create_owner()
            .withf(|new_owner| new_owner.property_id.map(PropertyId::get) == Some(3))
            .times(1)
            .returning(|_| Ok(owner(1, "olivia@example.com", Some(3))));

        let created = add_owner(&repo, &admin_user(), form("3")).expect("adds");
        assert_eq!(created.property_id.map(PropertyId::get), Some(3));
    }

    #[test]
    fn unassigned_owner_skips_property_check() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id().times(0);
        repo.expect_create_owner()
            .times(1)
            .returning(|_| Ok(owner(1, "olivia@example.com", None)));

        add_owner(&repo, &admin_user(), form("")).expect("adds");
    }
}

//! Price master maintenance.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::price_entry::PriceEntry;
use crate::domain::types::{HubId, PriceEntryId};
use crate::dto::price_master::PriceMasterPageData;
use crate::forms::price_master::{PriceEntryForm, PriceEntryPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;
use crate::repository::{PriceEntryReader, PriceEntryWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Duplicate `(category, frequency)` pairs surface as a form message.
fn duplicate_as_form_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation(_) => ServiceError::Form(
            "A price entry for this category and frequency already exists.".to_string(),
        ),
        other => other.into(),
    }
}

/// Loads the price master ordered by category and frequency.
pub fn list_price_entries<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<PriceMasterPageData>
where
    R: PriceEntryReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let entries = repo.list_price_entries(hub_id).map_err(|err| {
        log::error!("Failed to list price entries: {err}");
        err
    })?;

    Ok(PriceMasterPageData { entries })
}

pub fn add_price_entry<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PriceEntryForm,
) -> ServiceResult<PriceEntry>
where
    R: PriceEntryWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = PriceEntryPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;

    repo.create_price_entry(&payload.into_domain(hub_id))
        .map_err(duplicate_as_form_error)
}

pub fn update_price_entry<R>(
    repo: &R,
    user: &AuthenticatedUser,
    entry_id: i32,
    form: PriceEntryForm,
) -> ServiceResult<PriceEntry>
where
    R: PriceEntryWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = PriceEntryPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;
    let entry_id = PriceEntryId::new(entry_id)?;

    repo.update_price_entry(entry_id, hub_id, &payload.into_update())
        .map_err(duplicate_as_form_error)
}

pub fn delete_price_entry<R>(repo: &R, user: &AuthenticatedUser, entry_id: i32) -> ServiceResult<()>
where
    R: PriceEntryWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let entry_id = PriceEntryId::new(entry_id)?;

    repo.delete_price_entry(entry_id, hub_id)?;

    Ok(())
}

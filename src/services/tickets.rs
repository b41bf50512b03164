//! Owner tickets and their attachments.
//!
//! Owners work with the tickets they raised; administrators see every ticket
//! of the hub. The stored files live under `{upload_dir}/ticket_{id}/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::ticket::{
    NewTicket, NewTicketAttachment, Ticket, TicketAdminUpdate, TicketAttachment,
};
use crate::domain::types::{AttachmentId, HubId, TicketId, TicketStatus};
use crate::dto::NotifyOutcome;
use crate::dto::tickets::{AttachmentFile, OwnerTicketsPageData, TicketPageData, TicketsPageData};
use crate::forms::tickets::{AttachmentUpload, NewTicketForm, NewTicketPayload, TicketAdminForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::zmq::ZmqNotification;
use crate::notify::Notifier;
use crate::repository::{
    OwnerReader, OwnerWriter, PropertyReader, TicketListQuery, TicketReader, TicketWriter,
};
use crate::services::portal::resolve_owner;
use crate::services::{ServiceError, ServiceResult, deliver, ensure_role, has_role};

/// Loads a ticket the user may access. Owners only reach their own tickets;
/// anything else looks missing to them.
fn authorize_ticket<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ticket_id: TicketId,
) -> ServiceResult<Ticket>
where
    R: TicketReader + OwnerWriter + ?Sized,
{
    let hub_id = HubId::new(user.hub_id)?;

    if has_role(user, SERVICE_ADMIN_ROLE) {
        return repo
            .get_ticket_by_id(ticket_id, hub_id)?
            .ok_or(ServiceError::NotFound);
    }

    let owner = resolve_owner(repo, user)?;
    match repo.get_ticket_by_id(ticket_id, hub_id)? {
        Some(ticket) if ticket.owner_id == Some(owner.id) => Ok(ticket),
        _ => Err(ServiceError::NotFound),
    }
}

pub fn list_owner_tickets<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<OwnerTicketsPageData>
where
    R: TicketReader + OwnerWriter + ?Sized,
{
    let owner = resolve_owner(repo, user)?;
    let tickets = repo.list_tickets(TicketListQuery::new(owner.hub_id).owner(owner.id))?;

    Ok(OwnerTicketsPageData { owner, tickets })
}

/// Raises a ticket about the owner's linked property.
pub fn create_owner_ticket<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: NewTicketForm,
) -> ServiceResult<Ticket>
where
    R: TicketWriter + OwnerWriter + ?Sized,
{
    let owner = resolve_owner(repo, user)?;
    let payload = NewTicketPayload::try_from(form)?;

    let property_id = owner.property_id.ok_or_else(|| {
        ServiceError::Form("Your account is not linked to a property yet.".to_string())
    })?;

    let ticket = repo
        .create_ticket(&NewTicket {
            hub_id: owner.hub_id,
            property_id,
            owner_id: Some(owner.id),
            subject: payload.subject,
            description: payload.description,
            priority: payload.priority,
        })
        .map_err(|err| {
            log::error!("Failed to create ticket for owner {}: {err}", owner.id);
            err
        })?;

    Ok(ticket)
}

/// Every ticket of the hub, optionally narrowed to one status.
pub fn list_admin_tickets<R>(
    repo: &R,
    user: &AuthenticatedUser,
    status: Option<&str>,
) -> ServiceResult<TicketsPageData>
where
    R: TicketReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let status_filter = match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Some(
            value
                .parse::<TicketStatus>()
                .map_err(|_| ServiceError::Form(format!("Unknown ticket status {value}")))?,
        ),
        None => None,
    };

    let mut query = TicketListQuery::new(hub_id);
    if let Some(status) = status_filter {
        query = query.status(status);
    }
    let tickets = repo.list_tickets(query)?;

    Ok(TicketsPageData {
        tickets,
        status_filter,
    })
}

pub fn show_ticket<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ticket_id: i32,
) -> ServiceResult<TicketPageData>
where
    R: TicketReader + OwnerWriter + PropertyReader + ?Sized,
{
    let ticket_id = TicketId::new(ticket_id)?;
    let ticket = authorize_ticket(repo, user, ticket_id)?;

    let property_name = repo
        .get_property_by_id(ticket.property_id, ticket.hub_id)?
        .map(|p| p.name.into_inner())
        .unwrap_or_default();
    let attachments = repo.list_ticket_attachments(ticket.id)?;

    Ok(TicketPageData {
        ticket,
        property_name,
        attachments,
    })
}

/// Applies an administrator's changes. The owner is e-mailed when the
/// status moves.
pub fn update_ticket<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    ticket_id: i32,
    form: TicketAdminForm,
) -> ServiceResult<(Ticket, NotifyOutcome)>
where
    R: TicketReader + TicketWriter + OwnerReader + ?Sized,
    N: Notifier + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let update = TicketAdminUpdate::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;
    let ticket_id = TicketId::new(ticket_id)?;

    let current = repo
        .get_ticket_by_id(ticket_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let ticket = repo.update_ticket(ticket_id, hub_id, &update)?;

    if ticket.status == current.status {
        return Ok((ticket, NotifyOutcome::default()));
    }

    let owner = match ticket.owner_id {
        Some(owner_id) => repo.get_owner_by_id(owner_id, hub_id)?,
        None => None,
    };
    let Some(owner) = owner else {
        return Ok((ticket, NotifyOutcome::default()));
    };

    let mut body = format!(
        "Your ticket \"{}\" is now {}.",
        ticket.subject, ticket.status
    );
    if let Some(comment) = &ticket.admin_comment {
        body.push_str("\n\n");
        body.push_str(comment);
    }
    let message = ZmqNotification::email(
        hub_id.get(),
        owner.email.as_str(),
        format!("Ticket #{} {}", ticket.id, ticket.status),
        body,
    );
    let outcome = deliver(notifier, &[message]);

    Ok((ticket, outcome))
}

fn ticket_upload_dir(upload_dir: &Path, ticket_id: TicketId) -> PathBuf {
    upload_dir.join(format!("ticket_{ticket_id}"))
}

/// Removes the stored files of a ticket whose rows are already gone.
pub(crate) fn remove_ticket_uploads(upload_dir: &Path, ticket_id: TicketId) {
    let dir = ticket_upload_dir(upload_dir, ticket_id);
    match fs::remove_dir_all(&dir) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("Failed to remove uploads in {}: {err}", dir.display()),
    }
}

/// Copies the uploaded file next to the ticket's other attachments and
/// records it.
pub fn upload_ticket_attachment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ticket_id: i32,
    upload: &AttachmentUpload<'_>,
    upload_dir: &Path,
    max_bytes: u64,
) -> ServiceResult<TicketAttachment>
where
    R: TicketReader + TicketWriter + OwnerWriter + ?Sized,
{
    let ticket_id = TicketId::new(ticket_id)?;
    let ticket = authorize_ticket(repo, user, ticket_id)?;

    if upload.size_bytes > max_bytes {
        return Err(ServiceError::Form(format!(
            "The file is larger than {} KiB.",
            max_bytes / 1024
        )));
    }

    let dir = ticket_upload_dir(upload_dir, ticket.id);
    let target = dir.join(format!("{}_{}", Uuid::new_v4(), upload.filename));

    fs::create_dir_all(&dir)
        .and_then(|_| fs::copy(upload.source, &target))
        .map_err(|err| {
            log::error!("Failed to store attachment {}: {err}", target.display());
            ServiceError::Internal(err.to_string())
        })?;

    let size_bytes = i64::try_from(upload.size_bytes)
        .map_err(|_| ServiceError::Form("The file is too large.".to_string()))?;

    let attachment = repo
        .create_ticket_attachment(&NewTicketAttachment {
            ticket_id: ticket.id,
            filename: upload.filename.clone(),
            stored_path: target.to_string_lossy().into_owned(),
            mime_type: upload.mime_type.clone(),
            size_bytes,
        })
        .map_err(|err| {
            if let Err(cleanup) = fs::remove_file(&target) {
                log::warn!("Failed to remove orphan {}: {cleanup}", target.display());
            }
            err
        })?;

    Ok(attachment)
}

/// Locates a stored attachment for download.
pub fn attachment_file<R>(
    repo: &R,
    user: &AuthenticatedUser,
    ticket_id: i32,
    attachment_id: i32,
) -> ServiceResult<AttachmentFile>
where
    R: TicketReader + OwnerWriter + ?Sized,
{
    let ticket_id = TicketId::new(ticket_id)?;
    let attachment_id = AttachmentId::new(attachment_id)?;
    let ticket = authorize_ticket(repo, user, ticket_id)?;

    let attachment = repo
        .get_ticket_attachment(attachment_id, ticket.id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(AttachmentFile {
        path: PathBuf::from(attachment.stored_path),
        filename: attachment.filename,
    })
}

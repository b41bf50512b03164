use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AttachmentId, HubId, OwnerId, PropertyId, TicketId, TicketPriority, TicketStatus,
    TicketSubject, TicketText,
};

/// File extensions accepted for ticket attachments.
pub const ALLOWED_ATTACHMENT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf"];

/// Issue raised by an owner about a property.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: TicketId,
    pub hub_id: HubId,
    pub property_id: PropertyId,
    pub owner_id: Option<OwnerId>,
    pub subject: TicketSubject,
    pub description: TicketText,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub admin_comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTicket {
    pub hub_id: HubId,
    pub property_id: PropertyId,
    pub owner_id: Option<OwnerId>,
    pub subject: TicketSubject,
    pub description: TicketText,
    pub priority: TicketPriority,
}

/// Changes an administrator can make to a ticket.
#[derive(Clone, Debug, PartialEq)]
pub struct TicketAdminUpdate {
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub admin_comment: Option<String>,
}

/// Ticket joined with the names shown in listings.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TicketListing {
    pub ticket: Ticket,
    pub property_name: String,
    pub owner_email: Option<String>,
}

/// File uploaded to a ticket.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TicketAttachment {
    pub id: AttachmentId,
    pub ticket_id: TicketId,
    pub filename: String,
    pub stored_path: String,
    pub mime_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTicketAttachment {
    pub ticket_id: TicketId,
    pub filename: String,
    pub stored_path: String,
    pub mime_type: Option<String>,
    pub size_bytes: i64,
}

/// Returns the lower-cased extension when it is one of the accepted types.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_ATTACHMENT_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Reduces an uploaded file name to a safe single path component.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned.to_string()
    }
}

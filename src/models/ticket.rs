use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::ticket::{
    NewTicket as DomainNewTicket, NewTicketAttachment as DomainNewTicketAttachment,
    Ticket as DomainTicket, TicketAdminUpdate, TicketAttachment as DomainTicketAttachment,
};
use crate::domain::types::{
    AttachmentId, HubId, OwnerId, PropertyId, TicketId, TicketPriority, TicketStatus,
    TicketSubject, TicketText, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::tickets)]
pub struct Ticket {
    pub id: i32,
    pub hub_id: i32,
    pub property_id: i32,
    pub owner_id: Option<i32>,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub admin_comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tickets)]
pub struct NewTicket<'a> {
    pub hub_id: i32,
    pub property_id: i32,
    pub owner_id: Option<i32>,
    pub subject: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub priority: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::tickets)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateTicket<'a> {
    pub status: &'a str,
    pub priority: &'a str,
    pub admin_comment: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Ticket, foreign_key = ticket_id))]
#[diesel(table_name = crate::schema::ticket_attachments)]
pub struct TicketAttachment {
    pub id: i32,
    pub ticket_id: i32,
    pub filename: String,
    pub stored_path: String,
    pub mime_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ticket_attachments)]
pub struct NewTicketAttachment<'a> {
    pub ticket_id: i32,
    pub filename: &'a str,
    pub stored_path: &'a str,
    pub mime_type: Option<&'a str>,
    pub size_bytes: i64,
    pub uploaded_at: NaiveDateTime,
}

impl TryFrom<Ticket> for DomainTicket {
    type Error = TypeConstraintError;

    fn try_from(row: Ticket) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TicketId::try_from(row.id)?,
            hub_id: HubId::try_from(row.hub_id)?,
            property_id: PropertyId::try_from(row.property_id)?,
            owner_id: row.owner_id.map(OwnerId::try_from).transpose()?,
            subject: TicketSubject::new(row.subject)?,
            description: TicketText::new(row.description)?,
            status: row.status.parse::<TicketStatus>()?,
            priority: row.priority.parse::<TicketPriority>()?,
            admin_comment: row.admin_comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl<'a> NewTicket<'a> {
    pub fn from_domain(ticket: &'a DomainNewTicket, now: NaiveDateTime) -> Self {
        Self {
            hub_id: ticket.hub_id.get(),
            property_id: ticket.property_id.get(),
            owner_id: ticket.owner_id.map(OwnerId::get),
            subject: ticket.subject.as_str(),
            description: ticket.description.as_str(),
            status: TicketStatus::Open.as_str(),
            priority: ticket.priority.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateTicket<'a> {
    pub fn from_domain(update: &'a TicketAdminUpdate, now: NaiveDateTime) -> Self {
        Self {
            status: update.status.as_str(),
            priority: update.priority.as_str(),
            admin_comment: update.admin_comment.as_deref(),
            updated_at: now,
        }
    }
}

impl TryFrom<TicketAttachment> for DomainTicketAttachment {
    type Error = TypeConstraintError;

    fn try_from(row: TicketAttachment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AttachmentId::try_from(row.id)?,
            ticket_id: TicketId::try_from(row.ticket_id)?,
            filename: row.filename,
            stored_path: row.stored_path,
            mime_type: row.mime_type,
            size_bytes: row.size_bytes,
            uploaded_at: row.uploaded_at,
        })
    }
}

impl<'a> NewTicketAttachment<'a> {
    pub fn from_domain(attachment: &'a DomainNewTicketAttachment, now: NaiveDateTime) -> Self {
        Self {
            ticket_id: attachment.ticket_id.get(),
            filename: attachment.filename.as_str(),
            stored_path: attachment.stored_path.as_str(),
            mime_type: attachment.mime_type.as_deref(),
            size_bytes: attachment.size_bytes,
            uploaded_at: now,
        }
    }
}

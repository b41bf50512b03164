//! DTOs for owner and admin ticket pages.

use std::path::PathBuf;

use crate::domain::owner::Owner;
use crate::domain::ticket::{Ticket, TicketAttachment, TicketListing};
use crate::domain::types::TicketStatus;

#[derive(Debug)]
pub struct TicketsPageData {
    pub tickets: Vec<TicketListing>,
    pub status_filter: Option<TicketStatus>,
}

/// Tickets raised by the signed-in owner.
#[derive(Debug)]
pub struct OwnerTicketsPageData {
    pub owner: Owner,
    pub tickets: Vec<TicketListing>,
}

#[derive(Debug)]
pub struct TicketPageData {
    pub ticket: Ticket,
    pub property_name: String,
    pub attachments: Vec<TicketAttachment>,
}

/// Stored file located for download.
#[derive(Debug)]
pub struct AttachmentFile {
    pub path: PathBuf,
    pub filename: String,
}

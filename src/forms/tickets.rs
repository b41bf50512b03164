//! Ticket forms for owners and administrators.

use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::property::clean_optional;
use crate::domain::ticket::{TicketAdminUpdate, allowed_extension, sanitize_filename};
use crate::domain::types::{TicketPriority, TicketStatus, TicketSubject, TicketText};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct NewTicketForm {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub priority: String,
}

pub struct NewTicketPayload {
    pub subject: TicketSubject,
    pub description: TicketText,
    pub priority: TicketPriority,
}

impl TryFrom<NewTicketForm> for NewTicketPayload {
    type Error = FormError;

    fn try_from(form: NewTicketForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let priority = match non_blank(&form.priority) {
            Some(value) => value
                .parse::<TicketPriority>()
                .map_err(|_| FormError::InvalidPriority)?,
            None => TicketPriority::default(),
        };

        Ok(Self {
            subject: TicketSubject::new(form.subject)
                .map_err(|e| FormError::Malformed(format!("subject: {e}")))?,
            description: TicketText::new(form.description)
                .map_err(|e| FormError::Malformed(format!("description: {e}")))?,
            priority,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TicketAdminForm {
    pub status: String,
    pub priority: String,
    #[serde(default)]
    pub admin_comment: String,
}

impl TryFrom<TicketAdminForm> for TicketAdminUpdate {
    type Error = FormError;

    fn try_from(form: TicketAdminForm) -> Result<Self, Self::Error> {
        let admin_comment =
            clean_optional(Some(form.admin_comment)).map(|comment| ammonia::clean(&comment));

        Ok(Self {
            status: form
                .status
                .parse::<TicketStatus>()
                .map_err(|_| FormError::InvalidStatus)?,
            priority: form
                .priority
                .parse::<TicketPriority>()
                .map_err(|_| FormError::InvalidPriority)?,
            admin_comment,
        })
    }
}

#[derive(MultipartForm)]
pub struct UploadAttachmentForm {
    #[multipart(limit = "25MB")]
    pub file: TempFile,
}

/// Uploaded file checked against the accepted extensions. The temporary
/// file stays owned by the multipart form.
#[derive(Debug)]
pub struct AttachmentUpload<'a> {
    pub filename: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub source: &'a Path,
}

impl<'a> AttachmentUpload<'a> {
    pub fn new(
        original_name: &str,
        mime_type: Option<String>,
        size_bytes: u64,
        source: &'a Path,
    ) -> Result<Self, FormError> {
        let filename = sanitize_filename(original_name);
        allowed_extension(&filename).ok_or(FormError::UnsupportedAttachment)?;

        Ok(Self {
            filename,
            mime_type,
            size_bytes,
            source,
        })
    }
}

impl<'a> TryFrom<&'a UploadAttachmentForm> for AttachmentUpload<'a> {
    type Error = FormError;

    fn try_from(form: &'a UploadAttachmentForm) -> Result<Self, Self::Error> {
        let original_name = form.file.file_name.as_deref().unwrap_or_default();
        Self::new(
            original_name,
            form.file.content_type.as_ref().map(ToString::to_string),
            form.file.size as u64,
            form.file.file.path(),
        )
    }
}

use std::path::Path;

use actix_files::NamedFile;
use actix_multipart::form::MultipartForm;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::forms::tickets::{AttachmentUpload, NewTicketForm, TicketAdminForm, UploadAttachmentForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::notify::ZmqNotifier;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, flash_notify_outcome, redirect, redirect_on_error, render_template,
};
use crate::services::{ServiceError, tickets as tickets_service};

#[derive(Deserialize)]
struct StatusParams {
    status: Option<String>,
}

#[get("/my/tickets")]
pub async fn show_my_tickets(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match tickets_service::list_owner_tickets(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "my", &server_config.auth_service_url);
            context.insert("owner", &data.owner);
            context.insert("tickets", &data.tickets);

            render_template(&tera, "portal/tickets.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list owner tickets: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/my/tickets/add")]
pub async fn add_my_ticket(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<NewTicketForm>,
) -> impl Responder {
    match tickets_service::create_owner_ticket(repo.get_ref(), &user, form) {
        Ok(ticket) => {
            FlashMessage::success("Ticket submitted.").send();
            redirect(&format!("/tickets/{}", ticket.id))
        }
        Err(err) => redirect_on_error(err, "/my/tickets", "Failed to submit the ticket"),
    }
}

#[get("/tickets")]
pub async fn show_tickets(
    params: web::Query<StatusParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let status = params.status.as_deref().filter(|s| !s.is_empty());

    match tickets_service::list_admin_tickets(repo.get_ref(), &user, status) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "tickets",
                &server_config.auth_service_url,
            );
            context.insert("tickets", &data.tickets);
            context.insert("status_filter", &data.status_filter);

            render_template(&tera, "tickets/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/tickets")
        }
        Err(err) => {
            log::error!("Failed to list tickets: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/tickets/{ticket_id}")]
pub async fn show_ticket(
    ticket_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match tickets_service::show_ticket(repo.get_ref(), &user, ticket_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "tickets",
                &server_config.auth_service_url,
            );
            context.insert("ticket", &data.ticket);
            context.insert("property_name", &data.property_name);
            context.insert("attachments", &data.attachments);

            render_template(&tera, "tickets/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Ticket not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the ticket: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/tickets/{ticket_id}/save")]
pub async fn save_ticket(
    ticket_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<ZmqNotifier>,
    web::Form(form): web::Form<TicketAdminForm>,
) -> impl Responder {
    let ticket_id = ticket_id.into_inner();
    let back = format!("/tickets/{ticket_id}");

    match tickets_service::update_ticket(repo.get_ref(), notifier.get_ref(), &user, ticket_id, form)
    {
        Ok((ticket, outcome)) => {
            FlashMessage::success(format!("Ticket is now {}.", ticket.status)).send();
            flash_notify_outcome(outcome);
            redirect(&back)
        }
        Err(err) => redirect_on_error(err, &back, "Failed to update the ticket"),
    }
}

#[post("/tickets/{ticket_id}/attachments")]
pub async fn upload_attachment(
    ticket_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadAttachmentForm>,
) -> impl Responder {
    let ticket_id = ticket_id.into_inner();
    let back = format!("/tickets/{ticket_id}");

    let upload = match AttachmentUpload::try_from(&form) {
        Ok(upload) => upload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match tickets_service::upload_ticket_attachment(
        repo.get_ref(),
        &user,
        ticket_id,
        &upload,
        Path::new(&server_config.upload_dir),
        server_config.max_attachment_bytes,
    ) {
        Ok(attachment) => {
            FlashMessage::success(format!("Attached {}.", attachment.filename)).send();
            redirect(&back)
        }
        Err(err) => redirect_on_error(err, &back, "Failed to store the attachment"),
    }
}

#[get("/tickets/{ticket_id}/attachments/{attachment_id}")]
pub async fn download_attachment(
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> HttpResponse {
    let (ticket_id, attachment_id) = path.into_inner();
    let back = format!("/tickets/{ticket_id}");

    let file = match tickets_service::attachment_file(
        repo.get_ref(),
        &user,
        ticket_id,
        attachment_id,
    ) {
        Ok(file) => file,
        Err(err) => return redirect_on_error(err, &back, "Failed to load the attachment"),
    };

    match NamedFile::open(&file.path) {
        Ok(named) => named
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(file.filename)],
            })
            .into_response(&req),
        Err(err) => {
            log::error!(
                "Failed to open attachment {}: {err}",
                file.path.display()
            );
            FlashMessage::error("The attachment file is missing.").send();
            redirect(&back)
        }
    }
}

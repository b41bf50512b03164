//! Actix handlers. Each handler calls one service and turns its result into
//! a rendered page, a redirect with a flash message, or a download.

use actix_identity::Identity;
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use chrono::{NaiveDate, Utc};
use tera::{Context, Tera};

use crate::dto::{CsvDownload, NotifyOutcome};
use crate::export::CSV_CONTENT_TYPE;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

pub mod api;
pub mod events;
pub mod main;
pub mod owners;
pub mod personnel;
pub mod portal;
pub mod price_master;
pub mod properties;
pub mod quotes;
pub mod regions;
pub mod tickets;

/// Maps a flash message level to the Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: alerts, the current user and menu entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Serves generated CSV content as an attachment.
pub fn csv_response(download: CsvDownload) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(CSV_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(download.filename)],
        })
        .body(download.content)
}

/// Current UTC date used for due states and default years.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Shared error handling of form submissions: a flash message and a
/// redirect back to `back`.
pub fn redirect_on_error(err: ServiceError, back: &str, failure: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        ServiceError::NotFound => {
            FlashMessage::error("Not found.").send();
            redirect(back)
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        err => {
            log::error!("{failure}: {err}");
            FlashMessage::error(format!("{failure}.")).send();
            redirect(back)
        }
    }
}

/// Tells the user how many notifications went out and how many failed.
pub fn flash_notify_outcome(outcome: NotifyOutcome) {
    if outcome.failed > 0 {
        FlashMessage::warning(format!(
            "{} notification(s) could not be delivered.",
            outcome.failed
        ))
        .send();
    }
    if outcome.sent > 0 {
        FlashMessage::info(format!("{} notification(s) sent.", outcome.sent)).send();
    }
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );

    render_template(&tera, "main/not_assigned.html", &context)
}

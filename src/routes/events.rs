use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::NaiveDate;
use serde::Deserialize;
use tera::Tera;

use crate::dto::events::EventsQuery;
use crate::forms::events::{EventStatusForm, ScheduleEventForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::notify::ZmqNotifier;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, flash_notify_outcome, redirect, redirect_on_error, render_template, today,
};
use crate::services::{ServiceError, events as events_service};

#[derive(Deserialize)]
struct WindowParams {
    from: Option<String>,
    to: Option<String>,
}

/// Parses an optional `YYYY-MM-DD` bound. Empty values mean "not set";
/// malformed ones are reported and ignored.
fn parse_bound(value: Option<&str>, label: &str) -> Option<NaiveDate> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            FlashMessage::warning(format!("Ignoring invalid {label} date '{value}'.")).send();
            None
        }
    }
}

#[get("/events")]
pub async fn show_events(
    params: web::Query<WindowParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = EventsQuery {
        from: parse_bound(params.from.as_deref(), "start"),
        to: parse_bound(params.to.as_deref(), "end"),
    };

    match events_service::list_events(repo.get_ref(), &user, query, today()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "events",
                &server_config.auth_service_url,
            );
            context.insert("rows", &data.rows);
            context.insert("from", &data.from);
            context.insert("to", &data.to);
            context.insert("properties", &data.properties);
            context.insert("services", &data.services);
            context.insert("providers", &data.providers);

            render_template(&tera, "events/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/events")
        }
        Err(err) => {
            log::error!("Failed to list events: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/events/add")]
pub async fn add_event(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ScheduleEventForm>,
) -> impl Responder {
    match events_service::schedule_event(repo.get_ref(), &user, form) {
        Ok(event) => {
            FlashMessage::success(format!("Visit scheduled for {}.", event.scheduled_date)).send();
            redirect("/events")
        }
        Err(err) => redirect_on_error(err, "/events", "Failed to schedule the visit"),
    }
}

#[post("/events/{event_id}/status")]
pub async fn update_event_status(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<ZmqNotifier>,
    web::Form(form): web::Form<EventStatusForm>,
) -> impl Responder {
    match events_service::update_event_status(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        event_id.into_inner(),
        form,
    ) {
        Ok(outcome) => {
            FlashMessage::success("Visit updated.").send();
            flash_notify_outcome(outcome);
            redirect("/events")
        }
        Err(err) => redirect_on_error(err, "/events", "Failed to update the visit"),
    }
}

#[post("/events/{event_id}/delete")]
pub async fn delete_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match events_service::delete_event(repo.get_ref(), &user, event_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Visit deleted.").send();
            redirect("/events")
        }
        Err(err) => redirect_on_error(err, "/events", "Failed to delete the visit"),
    }
}

#[post("/events/{event_id}/remind")]
pub async fn send_reminder(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<ZmqNotifier>,
) -> impl Responder {
    match events_service::send_reminder(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        event_id.into_inner(),
    ) {
        Ok(outcome) => {
            flash_notify_outcome(outcome);
            redirect("/events")
        }
        Err(err) => redirect_on_error(err, "/events", "Failed to send the reminder"),
    }
}

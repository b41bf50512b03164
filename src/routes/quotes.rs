use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::notify::ZmqNotifier;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, csv_response, flash_notify_outcome, redirect, redirect_on_error,
    render_template,
};
use crate::services::{ServiceError, quotes as quotes_service};

#[derive(Deserialize)]
struct BuilderParams {
    region: Option<i32>,
}

#[get("/quotes/builder")]
pub async fn show_builder(
    params: web::Query<BuilderParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match quotes_service::quote_builder(repo.get_ref(), &user, params.region) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "quotes",
                &server_config.auth_service_url,
            );
            context.insert("regions", &data.regions);
            context.insert("selected", &data.selected);
            context.insert("services", &data.services);
            context.insert("size_bands", &data.size_bands);
            context.insert("default_sqft", &data.default_sqft);

            render_template(&tera, "quotes/builder.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Region not found.").send();
            redirect("/quotes/builder")
        }
        Err(err) => {
            log::error!("Failed to load the quote builder: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/quotes/save")]
pub async fn save_quote(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Bytes,
) -> impl Responder {
    match quotes_service::save_quote(repo.get_ref(), &user, form.as_ref()) {
        Ok(quote) => {
            FlashMessage::success(format!("Quote saved: {:.2} per year.", quote.annual_quote.get()))
                .send();
            redirect(&format!("/quote/{}", quote.id))
        }
        Err(err) => redirect_on_error(err, "/quotes/builder", "Failed to save the quote"),
    }
}

#[get("/quotes")]
pub async fn show_quotes(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match quotes_service::list_quotes(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "quotes",
                &server_config.auth_service_url,
            );
            context.insert("quotes", &data.quotes);

            render_template(&tera, "quotes/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list quotes: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/quote/{quote_id}")]
pub async fn show_quote(
    quote_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match quotes_service::show_quote(repo.get_ref(), &user, quote_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "quotes",
                &server_config.auth_service_url,
            );
            context.insert("quote", &data.quote);
            context.insert("items", &data.items);
            context.insert("summary", &data.summary);

            render_template(&tera, "quotes/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Quote not found.").send();
            redirect("/quotes")
        }
        Err(err) => {
            log::error!("Failed to load the quote: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/quote/{quote_id}/export.csv")]
pub async fn export_quote(
    quote_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let quote_id = quote_id.into_inner();
    match quotes_service::export_quote(repo.get_ref(), &user, quote_id) {
        Ok(download) => csv_response(download),
        Err(err) => redirect_on_error(
            err,
            &format!("/quote/{quote_id}"),
            "Failed to export the quote",
        ),
    }
}

#[post("/quote/{quote_id}/email")]
pub async fn email_quote(
    quote_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<ZmqNotifier>,
) -> impl Responder {
    let quote_id = quote_id.into_inner();
    let back = format!("/quote/{quote_id}");

    match quotes_service::email_quote(repo.get_ref(), notifier.get_ref(), &user, quote_id) {
        Ok(outcome) => {
            flash_notify_outcome(outcome);
            redirect(&back)
        }
        Err(err) => redirect_on_error(err, &back, "Failed to e-mail the quote"),
    }
}

#[post("/quote/{quote_id}/convert")]
pub async fn convert_quote(
    quote_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let quote_id = quote_id.into_inner();

    match quotes_service::convert_quote(repo.get_ref(), &user, quote_id) {
        Ok(property) => {
            FlashMessage::success(format!("Quote converted into {}.", property.name)).send();
            redirect(&format!("/property/{}", property.id))
        }
        Err(err) => redirect_on_error(
            err,
            &format!("/quote/{quote_id}"),
            "Failed to convert the quote",
        ),
    }
}

use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Datelike;
use serde::Deserialize;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, csv_response, redirect, render_template, today};
use crate::services::{
    ServiceError, dashboard as dashboard_service, has_role, reports as reports_service,
};
use crate::{SERVICE_ADMIN_ROLE, SERVICE_OWNER_ROLE};

#[derive(Deserialize)]
struct YearParams {
    year: Option<i32>,
}

#[get("/")]
pub async fn show_index(
    params: web::Query<YearParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if !has_role(&user, SERVICE_ADMIN_ROLE) && has_role(&user, SERVICE_OWNER_ROLE) {
        return redirect("/my");
    }

    match dashboard_service::show_dashboard(repo.get_ref(), &user, params.year, today()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("totals", &data.totals);
            context.insert("health", &data.health);
            context.insert("fulfilment", &data.fulfilment);
            context.insert("year", &data.year);
            context.insert("year_choices", &data.year_choices);

            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/reports/portfolio.csv")]
pub async fn export_portfolio(
    params: web::Query<YearParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let year = params.year.unwrap_or_else(|| today().year());
    match reports_service::export_portfolio_fulfilment(repo.get_ref(), &user, year) {
        Ok(download) => csv_response(download),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to export portfolio fulfilment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/reports/consolidated.csv")]
pub async fn export_consolidated(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match reports_service::export_consolidated(repo.get_ref(), &user) {
        Ok(download) => csv_response(download),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to export the consolidated report: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::regions::{CatalogEntryForm, RegionForm, RegionRateForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, redirect_on_error, render_template};
use crate::services::{ServiceError, regions as regions_service};

#[get("/regions")]
pub async fn show_regions(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match regions_service::list_regions(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "regions",
                &server_config.auth_service_url,
            );
            context.insert("regions", &data.regions);
            context.insert("catalog", &data.catalog);

            render_template(&tera, "regions/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list regions: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/regions/add")]
pub async fn add_region(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RegionForm>,
) -> impl Responder {
    match regions_service::add_region(repo.get_ref(), &user, form) {
        Ok(region) => {
            FlashMessage::success(format!("Region {} added.", region.label())).send();
            redirect("/regions")
        }
        Err(err) => redirect_on_error(err, "/regions", "Failed to add the region"),
    }
}

#[post("/catalog/add")]
pub async fn add_catalog_entry(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CatalogEntryForm>,
) -> impl Responder {
    match regions_service::add_catalog_entry(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Catalogue service added.").send();
            redirect("/regions")
        }
        Err(err) => redirect_on_error(err, "/regions", "Failed to add the catalogue service"),
    }
}

#[post("/regions/rates")]
pub async fn save_rate(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RegionRateForm>,
) -> impl Responder {
    match regions_service::upsert_rate(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Rate saved.").send();
            redirect("/regions")
        }
        Err(err) => redirect_on_error(err, "/regions", "Failed to save the rate"),
    }
}

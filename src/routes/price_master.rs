use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::price_master::PriceEntryForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, redirect_on_error, render_template};
use crate::services::{ServiceError, price_master as price_master_service};

#[get("/price-master")]
pub async fn show_price_master(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match price_master_service::list_price_entries(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "price_master",
                &server_config.auth_service_url,
            );
            context.insert("entries", &data.entries);

            render_template(&tera, "price_master/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list price entries: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/price-master/add")]
pub async fn add_price_entry(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PriceEntryForm>,
) -> impl Responder {
    match price_master_service::add_price_entry(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Price entry added.").send();
            redirect("/price-master")
        }
        Err(err) => redirect_on_error(err, "/price-master", "Failed to add the price entry"),
    }
}

#[post("/price-master/{entry_id}/save")]
pub async fn save_price_entry(
    entry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PriceEntryForm>,
) -> impl Responder {
    match price_master_service::update_price_entry(
        repo.get_ref(),
        &user,
        entry_id.into_inner(),
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("Price entry saved.").send();
            redirect("/price-master")
        }
        Err(err) => redirect_on_error(err, "/price-master", "Failed to save the price entry"),
    }
}

#[post("/price-master/{entry_id}/delete")]
pub async fn delete_price_entry(
    entry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match price_master_service::delete_price_entry(repo.get_ref(), &user, entry_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Price entry deleted.").send();
            redirect("/price-master")
        }
        Err(err) => redirect_on_error(err, "/price-master", "Failed to delete the price entry"),
    }
}

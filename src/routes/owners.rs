use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::owners::OwnerForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, redirect_on_error, render_template};
use crate::services::{ServiceError, owners as owners_service};

#[get("/owners")]
pub async fn show_owners(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match owners_service::list_owners(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "owners",
                &server_config.auth_service_url,
            );
            context.insert("owners", &data.owners);
            context.insert("properties", &data.properties);

            render_template(&tera, "owners/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list owners: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/owners/add")]
pub async fn add_owner(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<OwnerForm>,
) -> impl Responder {
    match owners_service::add_owner(repo.get_ref(), &user, form) {
        Ok(owner) => {
            FlashMessage::success(format!("Owner {} added.", owner.email)).send();
            redirect("/owners")
        }
        Err(err) => redirect_on_error(err, "/owners", "Failed to add the owner"),
    }
}

#[post("/owners/{owner_id}/save")]
pub async fn save_owner(
    owner_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<OwnerForm>,
) -> impl Responder {
    match owners_service::update_owner(repo.get_ref(), &user, owner_id.into_inner(), form) {
        Ok(_) => {
            FlashMessage::success("Owner saved.").send();
            redirect("/owners")
        }
        Err(err) => redirect_on_error(err, "/owners", "Failed to save the owner"),
    }
}

#[post("/owners/{owner_id}/delete")]
pub async fn delete_owner(
    owner_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match owners_service::delete_owner(repo.get_ref(), &user, owner_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Owner removed.").send();
            redirect("/owners")
        }
        Err(err) => redirect_on_error(err, "/owners", "Failed to remove the owner"),
    }
}

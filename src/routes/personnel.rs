use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::personnel::ServicePersonForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, redirect_on_error, render_template};
use crate::services::{ServiceError, personnel as personnel_service};

#[get("/personnel")]
pub async fn show_personnel(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match personnel_service::list_personnel(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "personnel",
                &server_config.auth_service_url,
            );
            context.insert("people", &data.people);

            render_template(&tera, "personnel/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list personnel: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/personnel/add")]
pub async fn add_person(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ServicePersonForm>,
) -> impl Responder {
    match personnel_service::add_person(repo.get_ref(), &user, form) {
        Ok(person) => {
            FlashMessage::success(format!("{} added to the crew.", person.full_name)).send();
            redirect("/personnel")
        }
        Err(err) => redirect_on_error(err, "/personnel", "Failed to add the crew member"),
    }
}

#[post("/personnel/{person_id}/save")]
pub async fn save_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ServicePersonForm>,
) -> impl Responder {
    match personnel_service::update_person(repo.get_ref(), &user, person_id.into_inner(), form) {
        Ok(_) => {
            FlashMessage::success("Crew member saved.").send();
            redirect("/personnel")
        }
        Err(err) => redirect_on_error(err, "/personnel", "Failed to save the crew member"),
    }
}

#[post("/personnel/{person_id}/deactivate")]
pub async fn deactivate_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match personnel_service::deactivate_person(repo.get_ref(), &user, person_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Crew member deactivated.").send();
            redirect("/personnel")
        }
        Err(err) => redirect_on_error(err, "/personnel", "Failed to deactivate the crew member"),
    }
}

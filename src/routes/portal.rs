use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, today};
use crate::services::{ServiceError, portal as portal_service};

#[get("/my")]
pub async fn show_portal(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match portal_service::show_portal(repo.get_ref(), &user, today()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "my", &server_config.auth_service_url);
            context.insert("owner", &data.owner);
            if let Some(owned) = &data.property {
                context.insert("property", &owned.property);
                context.insert("services", &owned.services);
                context.insert("fulfilment", &owned.fulfilment);
                context.insert("events", &owned.events);
            }

            render_template(&tera, "portal/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the owner portal: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

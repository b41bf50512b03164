#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::notify::ZmqNotifier;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::api::{api_v1_fulfilment, api_v1_properties};
#[cfg(feature = "server")]
use crate::routes::events::{
    add_event, delete_event, send_reminder, show_events, update_event_status,
};
#[cfg(feature = "server")]
use crate::routes::main::{export_consolidated, export_portfolio, show_index};
#[cfg(feature = "server")]
use crate::routes::owners::{add_owner, delete_owner, save_owner, show_owners};
#[cfg(feature = "server")]
use crate::routes::personnel::{add_person, deactivate_person, save_person, show_personnel};
#[cfg(feature = "server")]
use crate::routes::portal::show_portal;
#[cfg(feature = "server")]
use crate::routes::price_master::{
    add_price_entry, delete_price_entry, save_price_entry, show_price_master,
};
#[cfg(feature = "server")]
use crate::routes::properties::{
    add_property, add_service, delete_property, delete_service, export_fulfilment,
    recalculate_property, save_property, save_service, show_properties, show_property,
};
#[cfg(feature = "server")]
use crate::routes::quotes::{
    convert_quote, email_quote, export_quote, save_quote, show_builder, show_quote, show_quotes,
};
#[cfg(feature = "server")]
use crate::routes::regions::{add_catalog_entry, add_region, save_rate, show_regions};
#[cfg(feature = "server")]
use crate::routes::tickets::{
    add_my_ticket, download_attachment, save_ticket, show_my_tickets, show_ticket, show_tickets,
    upload_attachment,
};
#[cfg(feature = "server")]
use crate::routes::{logout, not_assigned};

pub mod db;
pub mod domain;
pub mod models;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod export;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod notify;
#[cfg(feature = "server")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Base role required to use the service at all. Every other role is
/// checked on top of it.
pub const SERVICE_ACCESS_ROLE: &str = "grounds";
/// Role required for every administrative operation.
pub const SERVICE_ADMIN_ROLE: &str = "grounds_admin";
/// Role of property owners using the portal.
pub const SERVICE_OWNER_ROLE: &str = "grounds_owner";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // PUB socket used for outbound email and SMS notifications.
    let notifier = ZmqNotifier::connect(&server_config.zmq_notifier_pub)
        .map_err(|e| std::io::Error::other(format!("Failed to start ZMQ notifier: {e}")))?;
    let notifier = web::Data::new(notifier);

    let pool = establish_connection_pool(&server_config.database_url, &server_config.database)
        .map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    std::fs::create_dir_all(&server_config.upload_dir)?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting server on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(
                web::scope("/api")
                    .service(api_v1_properties)
                    .service(api_v1_fulfilment),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(export_portfolio)
                    .service(export_consolidated)
                    .service(show_properties)
                    .service(add_property)
                    .service(show_property)
                    .service(save_property)
                    .service(delete_property)
                    .service(recalculate_property)
                    .service(add_service)
                    .service(save_service)
                    .service(delete_service)
                    .service(export_fulfilment)
                    .service(show_personnel)
                    .service(add_person)
                    .service(save_person)
                    .service(deactivate_person)
                    .service(show_price_master)
                    .service(add_price_entry)
                    .service(save_price_entry)
                    .service(delete_price_entry)
                    .service(show_owners)
                    .service(add_owner)
                    .service(save_owner)
                    .service(delete_owner)
                    .service(show_events)
                    .service(add_event)
                    .service(update_event_status)
                    .service(delete_event)
                    .service(send_reminder)
                    .service(show_portal)
                    .service(show_my_tickets)
                    .service(add_my_ticket)
                    .service(show_tickets)
                    .service(show_ticket)
                    .service(save_ticket)
                    .service(upload_attachment)
                    .service(download_attachment)
                    .service(show_regions)
                    .service(add_region)
                    .service(add_catalog_entry)
                    .service(save_rate)
                    .service(show_builder)
                    .service(save_quote)
                    .service(show_quotes)
                    .service(show_quote)
                    .service(export_quote)
                    .service(email_quote)
                    .service(convert_quote)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(notifier.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}

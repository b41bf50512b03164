use std::path::Path;

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Datelike;
use serde::Deserialize;
use tera::Tera;

use crate::dto::properties::PropertiesQuery;
use crate::forms::properties::{PropertyForm, ServiceForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, csv_response, redirect, redirect_on_error, render_template, today,
};
use crate::services::{ServiceError, properties as properties_service};

#[derive(Deserialize)]
struct IndexQueryParams {
    q: Option<String>,
    page: Option<usize>,
}

#[derive(Deserialize)]
struct YearParams {
    year: Option<i32>,
}

#[get("/properties")]
pub async fn show_properties(
    params: web::Query<IndexQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = PropertiesQuery {
        search: params.q,
        page: params.page,
    };

    match properties_service::list_properties(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "properties",
                &server_config.auth_service_url,
            );
            context.insert("properties", &data.properties);
            if let Some(search_query) = &data.search_query {
                context.insert("search_query", search_query);
            }

            render_template(&tera, "properties/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list properties: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/properties/add")]
pub async fn add_property(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PropertyForm>,
) -> impl Responder {
    match properties_service::create_property(repo.get_ref(), &user, form) {
        Ok(property) => {
            FlashMessage::success("Property added.").send();
            redirect(&format!("/property/{}", property.id))
        }
        Err(err) => redirect_on_error(err, "/properties", "Failed to add the property"),
    }
}

#[get("/property/{property_id}")]
pub async fn show_property(
    property_id: web::Path<i32>,
    params: web::Query<YearParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match properties_service::show_property(
        repo.get_ref(),
        &user,
        property_id.into_inner(),
        params.year,
        today(),
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "properties",
                &server_config.auth_service_url,
            );
            context.insert("property", &data.property);
            context.insert("services", &data.services);
            context.insert("owners", &data.owners);
            context.insert("events", &data.events);
            context.insert("fulfilment", &data.fulfilment);
            context.insert("year", &data.year);
            context.insert("year_choices", &data.year_choices);
            context.insert("price_entries", &data.price_entries);

            render_template(&tera, "properties/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Property not found.").send();
            redirect("/properties")
        }
        Err(err) => {
            log::error!("Failed to load the property: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/property/{property_id}/save")]
pub async fn save_property(
    property_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PropertyForm>,
) -> impl Responder {
    let property_id = property_id.into_inner();
    let back = format!("/property/{property_id}");

    match properties_service::update_property(repo.get_ref(), &user, property_id, form) {
        Ok(_) => {
            FlashMessage::success("Property saved.").send();
            redirect(&back)
        }
        Err(err) => redirect_on_error(err, &back, "Failed to save the property"),
    }
}

#[post("/property/{property_id}/delete")]
pub async fn delete_property(
    property_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match properties_service::delete_property(
        repo.get_ref(),
        &user,
        property_id.into_inner(),
        Path::new(&server_config.upload_dir),
    ) {
        Ok(()) => {
            FlashMessage::success("Property deleted.").send();
            redirect("/properties")
        }
        Err(err) => redirect_on_error(err, "/properties", "Failed to delete the property"),
    }
}

#[post("/property/{property_id}/recalculate")]
pub async fn recalculate_property(
    property_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let property_id = property_id.into_inner();
    let back = format!("/property/{property_id}");

    match properties_service::recalculate_financials(repo.get_ref(), &user, property_id) {
        Ok(property) => {
            FlashMessage::success(format!(
                "Financials recalculated: annual cost {:.2}, quote {:.2}.",
                property.annual_cost.get(),
                property.annual_quote.get()
            ))
            .send();
            redirect(&back)
        }
        Err(err) => redirect_on_error(err, &back, "Failed to recalculate financials"),
    }
}

#[post("/property/{property_id}/services/add")]
pub async fn add_service(
    property_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ServiceForm>,
) -> impl Responder {
    let property_id = property_id.into_inner();
    let back = format!("/property/{property_id}");

    match properties_service::add_service(repo.get_ref(), &user, property_id, form) {
        Ok(_) => {
            FlashMessage::success("Service added.").send();
            redirect(&back)
        }
        Err(err) => redirect_on_error(err, &back, "Failed to add the service"),
    }
}

#[post("/property/{property_id}/services/{service_id}/save")]
pub async fn save_service(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ServiceForm>,
) -> impl Responder {
    let (property_id, service_id) = path.into_inner();
    let back = format!("/property/{property_id}");

    match properties_service::update_service(repo.get_ref(), &user, property_id, service_id, form)
    {
        Ok(_) => {
            FlashMessage::success("Service saved.").send();
            redirect(&back)
        }
        Err(err) => redirect_on_error(err, &back, "Failed to save the service"),
    }
}

#[post("/property/{property_id}/services/{service_id}/delete")]
pub async fn delete_service(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (property_id, service_id) = path.into_inner();
    let back = format!("/property/{property_id}");

    match properties_service::delete_service(repo.get_ref(), &user, property_id, service_id) {
        Ok(()) => {
            FlashMessage::success("Service removed.").send();
            redirect(&back)
        }
        Err(err) => redirect_on_error(err, &back, "Failed to remove the service"),
    }
}

#[get("/property/{property_id}/fulfilment.csv")]
pub async fn export_fulfilment(
    property_id: web::Path<i32>,
    params: web::Query<YearParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let property_id = property_id.into_inner();
    let year = params.year.unwrap_or_else(|| today().year());

    match properties_service::export_property_fulfilment(repo.get_ref(), &user, property_id, year)
    {
        Ok(download) => csv_response(download),
        Err(err) => redirect_on_error(
            err,
            &format!("/property/{property_id}"),
            "Failed to export fulfilment",
        ),
    }
}

use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::dto::api::PropertiesApiQuery;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::today;
use crate::services::{ServiceError, api as api_service};

#[derive(Deserialize)]
struct ApiV1PropertiesQueryParams {
    #[serde(alias = "query")]
    search: Option<String>,
    page: Option<usize>,
}

#[derive(Deserialize)]
struct ApiV1FulfilmentQueryParams {
    year: Option<i32>,
}

#[get("/v1/properties")]
pub async fn api_v1_properties(
    params: web::Query<ApiV1PropertiesQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = PropertiesApiQuery {
        search: params.search,
        page: params.page,
    };

    match api_service::list_properties(repo.get_ref(), &user, query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to list properties: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/fulfilment")]
pub async fn api_v1_fulfilment(
    params: web::Query<ApiV1FulfilmentQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::portfolio_fulfilment(repo.get_ref(), &user, params.year, today()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to compute fulfilment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use pushkind_grounds::middleware::{RedirectUnauthorized, SIGNIN_PATH};
use pushkind_grounds::models::auth::AuthenticatedUser;

async fn dashboard(_user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().body("dashboard")
}

#[actix_web::test]
async fn page_without_session_redirects_to_signin() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .route("/", web::get().to(dashboard)),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), SIGNIN_PATH);
}

#[actix_web::test]
async fn explicit_unauthorized_response_redirects() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .route(
                "/api/v1/properties",
                web::get().to(|| async { HttpResponse::Unauthorized().finish() }),
            ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/properties")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[actix_web::test]
async fn other_statuses_pass_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .route("/na", web::get().to(|| async { HttpResponse::Ok().finish() }))
            .route(
                "/tickets/9",
                web::get().to(|| async { HttpResponse::Forbidden().finish() }),
            ),
    )
    .await;

    let req = test::TestRequest::get().uri("/na").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/tickets/9").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.headers().get(header::LOCATION).is_none());
}

//! Router assembly. Public routes (register, login, health) sit outside the
//! access gate; everything else is wrapped in it via `route_layer`, so the
//! gate runs only for routes that actually exist.

use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware, routing::post};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use portico_core::api::ApiResponse;

use crate::auth::handlers as auth_handlers;
use crate::auth::middleware::access_gate;
use crate::infra::app_state::AppState;
use crate::infra::extract::Json;
use crate::users::{admin_handlers, user_handlers};

pub fn create_app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/auth/register", post(auth_handlers::register))
        .route("/api/v1/auth/login", post(auth_handlers::login));

    let protected_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth_handlers::logout))
        .route(
            "/api/v1/users/me",
            get(user_handlers::get_current_user).patch(user_handlers::update_current_user),
        )
        .route("/api/v1/admin/users", get(admin_handlers::list_users))
        .route(
            "/api/v1/admin/users/{id}",
            get(admin_handlers::get_user)
                .patch(admin_handlers::update_user)
                .delete(admin_handlers::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), access_gate));

    public_routes
        .merge(protected_routes)
        .layer(build_cors_layer(&state.config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "skipping malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
        ]))
        .allow_credentials(true)
}

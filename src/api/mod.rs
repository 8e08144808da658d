// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    models::{
        AuthResponse, CreateProductRequest, LoginRequest, MessageResponse, Product,
        RegisterRequest, UpdateProductRequest, UserSummary,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod products;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{product_id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        );

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Role,
            LoginRequest,
            RegisterRequest,
            UserSummary,
            AuthResponse,
            MessageResponse,
            Product,
            CreateProductRequest,
            UpdateProductRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Products", description = "Product catalogue"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product endpoints.
//!
//! Reads need a live session; writes additionally need the admin role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{AdminOnly, Auth},
    error::ApiError,
    models::{CreateProductRequest, Product, UpdateProductRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All products", body = [Product]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_products(Auth(_claims): Auth, State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.products.read().await.list())
}

#[utoipa::path(
    get,
    path = "/v1/products/{product_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = Product),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Auth(_claims): Auth,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state.products.read().await.get(&product_id)?;
    Ok(Json(product))
}

/// Create a product. Admin only.
#[utoipa::path(
    post,
    path = "/v1/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_product(
    AdminOnly(claims): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.write().await.create(request)?;
    tracing::info!(product_id = %product.id, subject_id = %claims.subject, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's fields. Admin only.
#[utoipa::path(
    put,
    path = "/v1/products/{product_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    AdminOnly(claims): AdminOnly,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let product = state.products.write().await.update(&product_id, request)?;
    tracing::info!(product_id = %product.id, subject_id = %claims.subject, "product updated");
    Ok(Json(product))
}

/// Delete a product. Admin only.
#[utoipa::path(
    delete,
    path = "/v1/products/{product_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    AdminOnly(claims): AdminOnly,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.products.write().await.delete(&product_id)?;
    tracing::info!(%product_id, subject_id = %claims.subject, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

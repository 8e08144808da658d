// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory product store.
//!
//! Lives behind a `tokio::sync::RwLock` in `AppState`. Validation happens
//! here so handlers stay thin.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CreateProductRequest, Product, UpdateProductRequest};

#[derive(Default)]
pub struct ProductStore {
    products: HashMap<String, Product>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All products, ordered by name then id.
    pub fn list(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        products
    }

    pub fn get(&self, product_id: &str) -> Result<Product, ApiError> {
        self.products
            .get(product_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Product not found"))
    }

    pub fn create(&mut self, request: CreateProductRequest) -> Result<Product, ApiError> {
        let name = validate_product(&request.name, request.price, request.stock)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name,
            description: request.description.trim().to_string(),
            price: request.price,
            stock: request.stock,
            created_at: now,
            updated_at: now,
        };
        self.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    pub fn update(
        &mut self,
        product_id: &str,
        request: UpdateProductRequest,
    ) -> Result<Product, ApiError> {
        let name = validate_product(&request.name, request.price, request.stock)?;

        let Some(product) = self.products.get_mut(product_id) else {
            return Err(ApiError::not_found("Product not found"));
        };

        product.name = name;
        product.description = request.description.trim().to_string();
        product.price = request.price;
        product.stock = request.stock;
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    pub fn delete(&mut self, product_id: &str) -> Result<(), ApiError> {
        if self.products.remove(product_id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found("Product not found"))
        }
    }
}

/// Returns the trimmed name.
fn validate_product(name: &str, price: f64, stock: i64) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }

    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::bad_request("price must be a non-negative number"));
    }

    if stock < 0 {
        return Err(ApiError::bad_request("stock must not be negative"));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn widget() -> CreateProductRequest {
        CreateProductRequest {
            name: "  Widget ".into(),
            description: "A widget".into(),
            price: 9.5,
            stock: 3,
        }
    }

    #[test]
    fn create_get_and_list() {
        let mut store = ProductStore::new();
        let created = store.create(widget()).unwrap();
        assert_eq!(created.name, "Widget");
        assert_eq!(store.get(&created.id).unwrap(), created);

        let mut gadget = widget();
        gadget.name = "Gadget".into();
        store.create(gadget).unwrap();

        let names: Vec<String> = store.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Gadget", "Widget"]);
    }

    #[test]
    fn validate_product_inputs() {
        let mut store = ProductStore::new();

        let mut req = widget();
        req.name = "   ".into();
        assert_eq!(store.create(req).unwrap_err().status, StatusCode::BAD_REQUEST);

        let mut req = widget();
        req.price = -1.0;
        assert_eq!(store.create(req).unwrap_err().status, StatusCode::BAD_REQUEST);

        let mut req = widget();
        req.price = f64::NAN;
        assert_eq!(store.create(req).unwrap_err().status, StatusCode::BAD_REQUEST);

        let mut req = widget();
        req.stock = -2;
        assert_eq!(store.create(req).unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn update_replaces_fields() {
        let mut store = ProductStore::new();
        let created = store.create(widget()).unwrap();

        let updated = store
            .update(
                &created.id,
                UpdateProductRequest {
                    name: "Widget Pro".into(),
                    description: String::new(),
                    price: 19.0,
                    stock: 0,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Widget Pro");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn missing_products_are_not_found() {
        let mut store = ProductStore::new();
        assert_eq!(store.get("missing").unwrap_err().status, StatusCode::NOT_FOUND);
        assert_eq!(store.delete("missing").unwrap_err().status, StatusCode::NOT_FOUND);

        let err = store
            .update(
                "missing",
                UpdateProductRequest {
                    name: "x".into(),
                    description: String::new(),
                    price: 1.0,
                    stock: 1,
                },
            )
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}

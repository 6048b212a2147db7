//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::ProductService;
use crate::AppState;
use shared::{CreateProductInput, Product, UpdateProductInput};

/// Query options for product listings
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Create a product (admin)
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = ProductService::new(state.db);
    let product = service
        .create(current_user.0.require_distributor()?, input)
        .await?;
    Ok(Json(product))
}

/// List the distributor's products
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service
        .list(
            current_user.0.require_distributor()?,
            query.include_inactive,
        )
        .await?;
    Ok(Json(products))
}

/// Get a product by id
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .get(current_user.0.require_distributor()?, product_id)
        .await?;
    Ok(Json(product))
}

/// Update a product (admin)
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = ProductService::new(state.db);
    let product = service
        .update(current_user.0.require_distributor()?, product_id, input)
        .await?;
    Ok(Json(product))
}

/// Deactivate a product (admin)
pub async fn deactivate_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = ProductService::new(state.db);
    service
        .deactivate(current_user.0.require_distributor()?, product_id)
        .await?;
    Ok(Json(()))
}

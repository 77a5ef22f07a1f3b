use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Category, Product, ProductQuery},
    queries::product_queries,
    utils::extractors::AppPath,
    validation,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let category = params
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(validation::validate_category)
        .transpose()?;

    list(&state, category).await
}

pub async fn category_products(
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> Result<Json<Vec<Product>>> {
    let category = category
        .parse::<Category>()
        .map_err(AppError::NotFound)?;

    list(&state, Some(category)).await
}

pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Product>> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    Ok(Json(product.into()))
}

async fn list(state: &AppState, category: Option<Category>) -> Result<Json<Vec<Product>>> {
    let products = product_queries::list_products(&state.db, category).await?;

    Ok(Json(products.into_iter().map(Product::from).collect()))
}

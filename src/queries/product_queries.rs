use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Category, ProductDraft, ProductPatch, ProductRow, StoredImage},
};

pub async fn list_products(pool: &PgPool, category: Option<Category>) -> Result<Vec<ProductRow>> {
    let products = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT * FROM products
        WHERE ($1::product_category IS NULL OR category = $1)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<ProductRow>> {
    let product = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn create_product(
    pool: &PgPool,
    draft: &ProductDraft,
    image: &StoredImage,
) -> Result<ProductRow> {
    let product = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO products (
            name, description, price, category, stock,
            image_data, image_content_type, image_alt
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.description)
    .bind(draft.price)
    .bind(draft.category)
    .bind(draft.stock)
    .bind(&image.data)
    .bind(&image.content_type)
    .bind(&image.alt)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Returns `None` when no product has the given id.
pub async fn update_product(
    pool: &PgPool,
    id: i32,
    patch: &ProductPatch,
    image: Option<&StoredImage>,
) -> Result<Option<ProductRow>> {
    let product = sqlx::query_as::<_, ProductRow>(
        r#"
        UPDATE products
        SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            category = COALESCE($4, category),
            stock = COALESCE($5, stock),
            image_data = COALESCE($6, image_data),
            image_content_type = COALESCE($7, image_content_type),
            image_alt = COALESCE($8, image_alt),
            updated_at = NOW()
        WHERE id = $9
        RETURNING *
        "#,
    )
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(patch.price)
    .bind(patch.category)
    .bind(patch.stock)
    .bind(image.map(|i| &i.data))
    .bind(image.map(|i| &i.content_type))
    .bind(image.map(|i| &i.alt))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

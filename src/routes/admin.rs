use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{NormalizedImageResponse, Product, ProductForm, StoredImage},
    queries::product_queries,
    utils::{
        extractors::{AppJson, AppPath},
        jwt::Claims,
    },
};

const IMAGE_FIELD: &str = "image";

struct UploadedFile {
    content_type: String,
    bytes: Vec<u8>,
}

/// Multipart product form: text fields plus an optional raw image file.
#[derive(Default)]
struct ProductUpload {
    form: ProductForm,
    alt: Option<String>,
    image: Option<UploadedFile>,
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(form): AppJson<ProductForm>,
) -> Result<(StatusCode, Json<Product>)> {
    let draft = form.validate_create()?;

    let payload = form
        .image
        .filter(|image| !image.is_empty())
        .ok_or_else(|| AppError::BadRequest("Product image is required".to_string()))?;

    let bytes = payload.decode_data()?;
    let alt = alt_text(Some(&payload.alt), &draft.name);
    let image = store_image(&state, payload.content_type, bytes, alt).await?;

    let product = product_queries::create_product(&state.db, &draft, &image).await?;

    tracing::info!("Product {} created by {}", product.id, claims.email);

    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn upload_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let upload = read_upload(multipart).await?;
    let draft = upload.form.validate_create()?;

    let file = upload
        .image
        .ok_or_else(|| AppError::BadRequest("Product image is required".to_string()))?;

    let alt = alt_text(upload.alt.as_deref(), &draft.name);
    let image = store_image(&state, file.content_type, file.bytes, alt).await?;

    let product = product_queries::create_product(&state.db, &draft, &image).await?;

    tracing::info!("Product {} uploaded by {}", product.id, claims.email);

    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
    AppJson(form): AppJson<ProductForm>,
) -> Result<Json<Product>> {
    let patch = form.validate_update()?;
    let payload = form.image.filter(|image| !image.is_empty());

    if patch.is_empty() && payload.is_none() {
        return Err(AppError::BadRequest(
            "At least one field must be provided".to_string(),
        ));
    }

    let existing = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    let image = match payload {
        Some(payload) => {
            let bytes = payload.decode_data()?;
            let name = patch.name.as_deref().unwrap_or(&existing.name);
            let alt = alt_text(Some(&payload.alt), name);
            Some(store_image(&state, payload.content_type, bytes, alt).await?)
        }
        None => None,
    };

    let product = product_queries::update_product(&state.db, id, &patch, image.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    tracing::info!("Product {} updated by {}", product.id, claims.email);

    Ok(Json(product.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let deleted = product_queries::delete_product(&state.db, id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound(format!(
            "Product with id {} not found",
            id
        )));
    }

    tracing::info!("Product {} deleted by {}", id, claims.email);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn normalize_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<NormalizedImageResponse>> {
    let upload = read_upload(multipart).await?;

    let file = upload
        .image
        .ok_or_else(|| AppError::BadRequest("Image file is required".to_string()))?;

    let normalized = state
        .images
        .process_blocking(file.content_type, file.bytes)
        .await?;

    let (width, height, size) = (normalized.width, normalized.height, normalized.bytes.len());

    Ok(Json(NormalizedImageResponse {
        image: normalized.into_payload(upload.alt.unwrap_or_default()),
        width,
        height,
        size,
    }))
}

async fn store_image(
    state: &AppState,
    content_type: String,
    bytes: Vec<u8>,
    alt: String,
) -> Result<StoredImage> {
    let normalized = state.images.process_blocking(content_type, bytes).await?;

    Ok(StoredImage {
        content_type: normalized.content_type().to_string(),
        data: normalized.bytes,
        alt,
    })
}

fn alt_text(candidate: Option<&str>, name: &str) -> String {
    candidate
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .unwrap_or(name)
        .to_string()
}

async fn read_upload(mut multipart: Multipart) -> Result<ProductUpload> {
    let mut upload = ProductUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid image upload: {}", e)))?;

            // browsers send an empty part when no file was picked
            if !bytes.is_empty() {
                upload.image = Some(UploadedFile {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid form data: {}", e)))?;

        match name.as_str() {
            "name" => upload.form.name = Some(value),
            "description" => upload.form.description = Some(value),
            "price" => upload.form.price = Some(value),
            "category" => upload.form.category = Some(value),
            "stock" => upload.form.stock = Some(value),
            "alt" => upload.alt = Some(value),
            other => tracing::debug!("Ignoring unknown form field {}", other),
        }
    }

    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alt_text_falls_back_to_product_name() {
        assert_eq!(alt_text(Some("  "), "Linen shirt"), "Linen shirt");
        assert_eq!(alt_text(None, "Linen shirt"), "Linen shirt");
        assert_eq!(alt_text(Some(" Front view "), "Linen shirt"), "Front view");
    }
}

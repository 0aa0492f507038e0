use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};

use crate::{
    AppState,
    error::{AppError, Result, ValidationErrors},
    models::{ProductDetails, ProductFormFields, ProductFormView, ProductInput},
    utils::extractors::{ProductSubmission, parse_id},
};

pub const INDEX_PATH: &str = "/admin/products";

pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductDetails>>> {
    let products = state.store.list_products().await?;
    Ok(Json(products))
}

pub async fn create_form(State(state): State<AppState>) -> Result<Json<ProductFormView>> {
    form_view(&state, None).await
}

/// Inserts the row first since the image is named after the generated id.
/// Until the image path is saved the row stays in the pending-image state.
pub async fn create(
    State(state): State<AppState>,
    submission: ProductSubmission,
) -> Result<Redirect> {
    let input = submission.fields.validate()?;
    ensure_references(&state, &input, &submission.fields).await?;

    let product = state.store.insert_product(&input).await?;

    let image = match &submission.file {
        Some(upload) => state.images.save_upload(product.id, upload).await?,
        None => state.images.copy_default(product.id).await?,
    };
    state.store.set_product_image(product.id, &image).await?;

    tracing::info!("Created product {} with image {}", product.id, image);

    Ok(Redirect::to(INDEX_PATH))
}

/// Backs the edit, details and delete-confirmation views.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductFormView>> {
    let id = parse_id(&id)?;
    let product = state
        .store
        .find_product_details(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    form_view(&state, Some(product)).await
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    submission: ProductSubmission,
) -> Result<Redirect> {
    let id = parse_id(&id)?;
    if submission.fields.submitted_id() != Some(id) {
        return Err(not_found(id));
    }

    let input = submission.fields.validate()?;
    ensure_references(&state, &input, &submission.fields).await?;

    let existing = state
        .store
        .find_product(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let image = match &submission.file {
        Some(upload) => Some(
            state
                .images
                .replace(id, existing.image.as_deref(), upload)
                .await?,
        ),
        None => submission.fields.explicit_image().or(existing.image),
    };

    state
        .store
        .update_product(id, &input, image.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!("Updated product {}", id);

    Ok(Redirect::to(INDEX_PATH))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = parse_id(&id)?;
    let product = state
        .store
        .find_product(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !state.images.remove(product.id, product.image.as_deref()).await? {
        tracing::debug!("Product {} had no image file to remove", id);
    }
    state.store.delete_product(id).await?;

    tracing::info!("Deleted product {}", id);

    Ok(Redirect::to(INDEX_PATH))
}

async fn form_view(state: &AppState, product: Option<ProductDetails>) -> Result<Json<ProductFormView>> {
    let product_types = state.store.list_product_types().await?;
    let special_tags = state.store.list_special_tags().await?;

    Ok(Json(ProductFormView {
        product,
        product_types,
        special_tags,
    }))
}

/// The selected type and tag must exist so the dropdowns can't point at deleted rows.
async fn ensure_references(
    state: &AppState,
    input: &ProductInput,
    fields: &ProductFormFields,
) -> Result<()> {
    let mut errors = ValidationErrors::new();

    if state
        .store
        .find_product_type(input.product_type_id)
        .await?
        .is_none()
    {
        errors.add("product_type_id", "Product type does not exist");
    }

    if state
        .store
        .find_special_tag(input.special_tag_id)
        .await?
        .is_none()
    {
        errors.add("special_tag_id", "Special tag does not exist");
    }

    errors.with_form(fields).into_result()
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Product with id {} not found", id))
}

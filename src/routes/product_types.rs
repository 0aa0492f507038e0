use axum::{
    Form, Json,
    extract::{Path, State},
    response::Redirect,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{NameForm, ProductType},
    utils::extractors::parse_id,
};

pub const INDEX_PATH: &str = "/admin/product-types";

pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductType>>> {
    let product_types = state.store.list_product_types().await?;
    Ok(Json(product_types))
}

pub async fn create_form() -> Json<NameForm> {
    Json(NameForm::default())
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> Result<Redirect> {
    let name = form.validate()?;
    let product_type = state.store.insert_product_type(&name).await?;

    tracing::info!(
        "Created product type {} ({})",
        product_type.id,
        product_type.name
    );

    Ok(Redirect::to(INDEX_PATH))
}

/// Backs the edit, details and delete-confirmation views.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductType>> {
    let id = parse_id(&id)?;
    let product_type = find(&state, id).await?;
    Ok(Json(product_type))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<NameForm>,
) -> Result<Redirect> {
    let id = parse_id(&id)?;
    if form.submitted_id() != Some(id) {
        return Err(not_found(id));
    }

    let name = form.validate()?;
    state
        .store
        .update_product_type(id, &name)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!("Updated product type {}", id);

    Ok(Redirect::to(INDEX_PATH))
}

/// Deleting a product type that no longer exists succeeds. One still used by a
/// product is kept and reported as a conflict.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = parse_id(&id)?;

    if state.store.find_product_type(id).await?.is_none() {
        tracing::debug!("Product type {} already deleted", id);
        return Ok(Redirect::to(INDEX_PATH));
    }

    let in_use = state.store.count_products_with_type(id).await?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "Product type with id {} is used by {} product(s)",
            id, in_use
        )));
    }

    state.store.delete_product_type(id).await?;
    tracing::info!("Deleted product type {}", id);

    Ok(Redirect::to(INDEX_PATH))
}

async fn find(state: &AppState, id: i32) -> Result<ProductType> {
    state
        .store
        .find_product_type(id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Product type with id {} not found", id))
}

use axum::{
    Form, Json,
    extract::{Path, State},
    response::Redirect,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{NameForm, SpecialTag},
    utils::extractors::parse_id,
};

pub const INDEX_PATH: &str = "/admin/special-tags";

pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<SpecialTag>>> {
    let special_tags = state.store.list_special_tags().await?;
    Ok(Json(special_tags))
}

pub async fn create_form() -> Json<NameForm> {
    Json(NameForm::default())
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> Result<Redirect> {
    let name = form.validate()?;
    let special_tag = state.store.insert_special_tag(&name).await?;

    tracing::info!(
        "Created special tag {} ({})",
        special_tag.id,
        special_tag.name
    );

    Ok(Redirect::to(INDEX_PATH))
}

/// Backs the edit, details and delete-confirmation views.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SpecialTag>> {
    let id = parse_id(&id)?;
    let special_tag = find(&state, id).await?;
    Ok(Json(special_tag))
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
        .update_special_tag(id, &name)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!("Updated special tag {}", id);

    Ok(Redirect::to(INDEX_PATH))
}

/// Deleting a special tag that no longer exists succeeds. One still used by a
/// product is kept and reported as a conflict.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = parse_id(&id)?;

    if state.store.find_special_tag(id).await?.is_none() {
        tracing::debug!("Special tag {} already deleted", id);
        return Ok(Redirect::to(INDEX_PATH));
    }

    let in_use = state.store.count_products_with_tag(id).await?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "Special tag with id {} is used by {} product(s)",
            id, in_use
        )));
    }

    state.store.delete_special_tag(id).await?;
    tracing::info!("Deleted special tag {}", id);

    Ok(Redirect::to(INDEX_PATH))
}

async fn find(state: &AppState, id: i32) -> Result<SpecialTag> {
    state
        .store
        .find_special_tag(id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Special tag with id {} not found", id))
}

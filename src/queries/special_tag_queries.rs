use sqlx::PgPool;

use crate::{error::Result, models::SpecialTag, queries::restricted_delete};

pub async fn get_all(pool: &PgPool) -> Result<Vec<SpecialTag>> {
    let special_tags =
        sqlx::query_as::<_, SpecialTag>("SELECT id, name FROM special_tags ORDER BY id ASC")
            .fetch_all(pool)
            .await?;

    Ok(special_tags)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<SpecialTag>> {
    let special_tag =
        sqlx::query_as::<_, SpecialTag>("SELECT id, name FROM special_tags WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(special_tag)
}

pub async fn create_special_tag(pool: &PgPool, name: &str) -> Result<SpecialTag> {
    let special_tag = sqlx::query_as::<_, SpecialTag>(
        "INSERT INTO special_tags (name) VALUES ($1) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(special_tag)
}

pub async fn update_special_tag(pool: &PgPool, id: i32, name: &str) -> Result<Option<SpecialTag>> {
    let special_tag = sqlx::query_as::<_, SpecialTag>(
        "UPDATE special_tags SET name = $1 WHERE id = $2 RETURNING id, name",
    )
    .bind(name)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(special_tag)
}

pub async fn delete_special_tag(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM special_tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            restricted_delete(e, || {
                format!("Special tag with id {} is still used by a product", id)
            })
        })?;

    Ok(result.rows_affected() > 0)
}

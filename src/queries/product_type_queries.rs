use sqlx::PgPool;

use crate::{error::Result, models::ProductType, queries::restricted_delete};

pub async fn get_all(pool: &PgPool) -> Result<Vec<ProductType>> {
    let product_types =
        sqlx::query_as::<_, ProductType>("SELECT id, name FROM product_types ORDER BY id ASC")
            .fetch_all(pool)
            .await?;

    Ok(product_types)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<ProductType>> {
    let product_type =
        sqlx::query_as::<_, ProductType>("SELECT id, name FROM product_types WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(product_type)
}

pub async fn create_product_type(pool: &PgPool, name: &str) -> Result<ProductType> {
    let product_type = sqlx::query_as::<_, ProductType>(
        "INSERT INTO product_types (name) VALUES ($1) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(product_type)
}

pub async fn update_product_type(pool: &PgPool, id: i32, name: &str) -> Result<Option<ProductType>> {
    let product_type = sqlx::query_as::<_, ProductType>(
        "UPDATE product_types SET name = $1 WHERE id = $2 RETURNING id, name",
    )
    .bind(name)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product_type)
}

pub async fn delete_product_type(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM product_types WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            restricted_delete(e, || {
                format!("Product type with id {} is still used by a product", id)
            })
        })?;

    Ok(result.rows_affected() > 0)
}

use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Product, ProductDetails, ProductInput, ProductType, SpecialTag},
};

const DETAILS_SELECT: &str = r#"
    SELECT
        p.*,
        pt.name AS product_type_name,
        st.name AS special_tag_name
    FROM products p
    LEFT JOIN product_types pt ON pt.id = p.product_type_id
    LEFT JOIN special_tags st ON st.id = p.special_tag_id
"#;

#[derive(sqlx::FromRow)]
struct ProductDetailsRow {
    #[sqlx(flatten)]
    product: Product,
    product_type_name: Option<String>,
    special_tag_name: Option<String>,
}

impl From<ProductDetailsRow> for ProductDetails {
    fn from(row: ProductDetailsRow) -> Self {
        let product_type = row.product_type_name.map(|name| ProductType {
            id: row.product.product_type_id,
            name,
        });
        let special_tag = row.special_tag_name.map(|name| SpecialTag {
            id: row.product.special_tag_id,
            name,
        });

        ProductDetails {
            product: row.product,
            product_type,
            special_tag,
        }
    }
}

pub async fn get_all_with_details(pool: &PgPool) -> Result<Vec<ProductDetails>> {
    let query = format!("{} ORDER BY p.id ASC", DETAILS_SELECT);
    let rows = sqlx::query_as::<_, ProductDetailsRow>(&query)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(ProductDetails::from).collect())
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn find_details_by_id(pool: &PgPool, id: i32) -> Result<Option<ProductDetails>> {
    let query = format!("{} WHERE p.id = $1", DETAILS_SELECT);
    let row = sqlx::query_as::<_, ProductDetailsRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(ProductDetails::from))
}

/// Inserts a product with no image yet.
pub async fn create_product(pool: &PgPool, input: &ProductInput) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            name, price, available, shade_color, product_type_id, special_tag_id
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(input.price)
    .bind(input.available)
    .bind(&input.shade_color)
    .bind(input.product_type_id)
    .bind(input.special_tag_id)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    input: &ProductInput,
    image: Option<&str>,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = $1,
            price = $2,
            available = $3,
            shade_color = $4,
            product_type_id = $5,
            special_tag_id = $6,
            image = $7,
            updated_at = NOW()
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(input.price)
    .bind(input.available)
    .bind(&input.shade_color)
    .bind(input.product_type_id)
    .bind(input.special_tag_id)
    .bind(image)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn set_image(pool: &PgPool, id: i32, image: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE products SET image = $1, updated_at = NOW() WHERE id = $2")
        .bind(image)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_by_product_type(pool: &PgPool, product_type_id: i32) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE product_type_id = $1")
        .bind(product_type_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn count_by_special_tag(pool: &PgPool, special_tag_id: i32) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE special_tag_id = $1")
        .bind(special_tag_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Products still waiting for their image after a create.
pub async fn find_pending_images(pool: &PgPool) -> Result<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE image IS NULL ORDER BY id ASC")
            .fetch_all(pool)
            .await?;

    Ok(products)
}

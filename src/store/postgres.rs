use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    database,
    error::Result,
    models::{Product, ProductDetails, ProductInput, ProductType, SpecialTag},
    queries::{product_queries, product_type_queries, special_tag_queries},
    store::CatalogStore,
};

#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }

    async fn list_product_types(&self) -> Result<Vec<ProductType>> {
        product_type_queries::get_all(&self.pool).await
    }

    async fn find_product_type(&self, id: i32) -> Result<Option<ProductType>> {
        product_type_queries::find_by_id(&self.pool, id).await
    }

    async fn insert_product_type(&self, name: &str) -> Result<ProductType> {
        product_type_queries::create_product_type(&self.pool, name).await
    }

    async fn update_product_type(&self, id: i32, name: &str) -> Result<Option<ProductType>> {
        product_type_queries::update_product_type(&self.pool, id, name).await
    }

    async fn delete_product_type(&self, id: i32) -> Result<bool> {
        product_type_queries::delete_product_type(&self.pool, id).await
    }

    async fn list_special_tags(&self) -> Result<Vec<SpecialTag>> {
        special_tag_queries::get_all(&self.pool).await
    }

    async fn find_special_tag(&self, id: i32) -> Result<Option<SpecialTag>> {
        special_tag_queries::find_by_id(&self.pool, id).await
    }

    async fn insert_special_tag(&self, name: &str) -> Result<SpecialTag> {
        special_tag_queries::create_special_tag(&self.pool, name).await
    }

    async fn update_special_tag(&self, id: i32, name: &str) -> Result<Option<SpecialTag>> {
        special_tag_queries::update_special_tag(&self.pool, id, name).await
    }

    async fn delete_special_tag(&self, id: i32) -> Result<bool> {
        special_tag_queries::delete_special_tag(&self.pool, id).await
    }

    async fn list_products(&self) -> Result<Vec<ProductDetails>> {
        product_queries::get_all_with_details(&self.pool).await
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        product_queries::find_by_id(&self.pool, id).await
    }

    async fn find_product_details(&self, id: i32) -> Result<Option<ProductDetails>> {
        product_queries::find_details_by_id(&self.pool, id).await
    }

    async fn insert_product(&self, input: &ProductInput) -> Result<Product> {
        product_queries::create_product(&self.pool, input).await
    }

    async fn update_product(
        &self,
        id: i32,
        input: &ProductInput,
        image: Option<&str>,
    ) -> Result<Option<Product>> {
        product_queries::update_product(&self.pool, id, input, image).await
    }

    async fn set_product_image(&self, id: i32, image: &str) -> Result<bool> {
        product_queries::set_image(&self.pool, id, image).await
    }

    async fn delete_product(&self, id: i32) -> Result<bool> {
        product_queries::delete_product(&self.pool, id).await
    }

    async fn count_products_with_type(&self, product_type_id: i32) -> Result<i64> {
        product_queries::count_by_product_type(&self.pool, product_type_id).await
    }

    async fn count_products_with_tag(&self, special_tag_id: i32) -> Result<i64> {
        product_queries::count_by_special_tag(&self.pool, special_tag_id).await
    }

    async fn list_pending_image_products(&self) -> Result<Vec<Product>> {
        product_queries::find_pending_images(&self.pool).await
    }
}

//! Storage seam for the catalog.
//!
//! Handlers only see [`CatalogStore`]. Production runs on [`PgCatalogStore`];
//! [`MemoryCatalogStore`] backs local runs with `DB_URL=memory` and the tests.

mod memory;
mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{Product, ProductDetails, ProductInput, ProductType, SpecialTag},
};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Round-trip to the backing store, used by the readiness probe.
    async fn ping(&self) -> Result<()>;

    async fn list_product_types(&self) -> Result<Vec<ProductType>>;
    async fn find_product_type(&self, id: i32) -> Result<Option<ProductType>>;
    async fn insert_product_type(&self, name: &str) -> Result<ProductType>;
    /// `None` when no row has `id`.
    async fn update_product_type(&self, id: i32, name: &str) -> Result<Option<ProductType>>;
    /// `true` when a row was removed. A row still used by a product is a `Conflict`.
    async fn delete_product_type(&self, id: i32) -> Result<bool>;

    async fn list_special_tags(&self) -> Result<Vec<SpecialTag>>;
    async fn find_special_tag(&self, id: i32) -> Result<Option<SpecialTag>>;
    async fn insert_special_tag(&self, name: &str) -> Result<SpecialTag>;
    async fn update_special_tag(&self, id: i32, name: &str) -> Result<Option<SpecialTag>>;
    /// Same contract as `delete_product_type`.
    async fn delete_special_tag(&self, id: i32) -> Result<bool>;

    async fn list_products(&self) -> Result<Vec<ProductDetails>>;
    async fn find_product(&self, id: i32) -> Result<Option<Product>>;
    async fn find_product_details(&self, id: i32) -> Result<Option<ProductDetails>>;
    /// Inserts with `image = None`; the image path is recorded by [`Self::set_product_image`].
    async fn insert_product(&self, input: &ProductInput) -> Result<Product>;
    /// Overwrites every scalar field and the image path.
    async fn update_product(
        &self,
        id: i32,
        input: &ProductInput,
        image: Option<&str>,
    ) -> Result<Option<Product>>;
    async fn set_product_image(&self, id: i32, image: &str) -> Result<bool>;
    async fn delete_product(&self, id: i32) -> Result<bool>;

    async fn count_products_with_type(&self, product_type_id: i32) -> Result<i64>;
    async fn count_products_with_tag(&self, special_tag_id: i32) -> Result<i64>;
    async fn list_pending_image_products(&self) -> Result<Vec<Product>>;
}

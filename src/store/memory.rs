use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::{AppError, Result},
    models::{Product, ProductDetails, ProductInput, ProductType, SpecialTag},
    store::CatalogStore,
};

#[derive(Debug, Default)]
struct Tables {
    product_types: BTreeMap<i32, ProductType>,
    special_tags: BTreeMap<i32, SpecialTag>,
    products: BTreeMap<i32, Product>,
    last_product_type_id: i32,
    last_special_tag_id: i32,
    last_product_id: i32,
}

impl Tables {
    fn details(&self, product: &Product) -> ProductDetails {
        ProductDetails {
            product: product.clone(),
            product_type: self.product_types.get(&product.product_type_id).cloned(),
            special_tag: self.special_tags.get(&product.special_tag_id).cloned(),
        }
    }
}

fn next_id(last: &mut i32) -> i32 {
    *last += 1;
    *last
}

/// In-process catalog store. Identifiers are generated sequentially from 1 and
/// never reused, like a database serial column.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::InternalError("Catalog store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AppError::InternalError("Catalog store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }

    async fn list_product_types(&self) -> Result<Vec<ProductType>> {
        Ok(self.read()?.product_types.values().cloned().collect())
    }

    async fn find_product_type(&self, id: i32) -> Result<Option<ProductType>> {
        Ok(self.read()?.product_types.get(&id).cloned())
    }

    async fn insert_product_type(&self, name: &str) -> Result<ProductType> {
        let mut tables = self.write()?;
        let product_type = ProductType {
            id: next_id(&mut tables.last_product_type_id),
            name: name.to_string(),
        };
        tables
            .product_types
            .insert(product_type.id, product_type.clone());
        Ok(product_type)
    }

    async fn update_product_type(&self, id: i32, name: &str) -> Result<Option<ProductType>> {
        let mut tables = self.write()?;
        Ok(tables.product_types.get_mut(&id).map(|product_type| {
            product_type.name = name.to_string();
            product_type.clone()
        }))
    }

    async fn delete_product_type(&self, id: i32) -> Result<bool> {
        let mut tables = self.write()?;
        if tables.products.values().any(|p| p.product_type_id == id) {
            return Err(AppError::Conflict(format!(
                "Product type with id {} is still used by a product",
                id
            )));
        }
        Ok(tables.product_types.remove(&id).is_some())
    }

    async fn list_special_tags(&self) -> Result<Vec<SpecialTag>> {
        Ok(self.read()?.special_tags.values().cloned().collect())
    }

    async fn find_special_tag(&self, id: i32) -> Result<Option<SpecialTag>> {
        Ok(self.read()?.special_tags.get(&id).cloned())
    }

    async fn insert_special_tag(&self, name: &str) -> Result<SpecialTag> {
        let mut tables = self.write()?;
        let special_tag = SpecialTag {
            id: next_id(&mut tables.last_special_tag_id),
            name: name.to_string(),
        };
        tables
            .special_tags
            .insert(special_tag.id, special_tag.clone());
        Ok(special_tag)
    }

    async fn update_special_tag(&self, id: i32, name: &str) -> Result<Option<SpecialTag>> {
        let mut tables = self.write()?;
        Ok(tables.special_tags.get_mut(&id).map(|special_tag| {
            special_tag.name = name.to_string();
            special_tag.clone()
        }))
    }

    async fn delete_special_tag(&self, id: i32) -> Result<bool> {
        let mut tables = self.write()?;
        if tables.products.values().any(|p| p.special_tag_id == id) {
            return Err(AppError::Conflict(format!(
                "Special tag with id {} is still used by a product",
                id
            )));
        }
        Ok(tables.special_tags.remove(&id).is_some())
    }

    async fn list_products(&self) -> Result<Vec<ProductDetails>> {
        let tables = self.read()?;
        Ok(tables
            .products
            .values()
            .map(|product| tables.details(product))
            .collect())
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn find_product_details(&self, id: i32) -> Result<Option<ProductDetails>> {
        let tables = self.read()?;
        Ok(tables.products.get(&id).map(|product| tables.details(product)))
    }

    async fn insert_product(&self, input: &ProductInput) -> Result<Product> {
        let mut tables = self.write()?;
        let now = Utc::now();
        let product = Product {
            id: next_id(&mut tables.last_product_id),
            name: input.name.clone(),
            price: input.price,
            available: input.available,
            shade_color: input.shade_color.clone(),
            image: None,
            product_type_id: input.product_type_id,
            special_tag_id: input.special_tag_id,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        input: &ProductInput,
        image: Option<&str>,
    ) -> Result<Option<Product>> {
        let mut tables = self.write()?;
        Ok(tables.products.get_mut(&id).map(|product| {
            product.name = input.name.clone();
            product.price = input.price;
            product.available = input.available;
            product.shade_color = input.shade_color.clone();
            product.product_type_id = input.product_type_id;
            product.special_tag_id = input.special_tag_id;
            product.image = image.map(str::to_string);
            product.updated_at = Utc::now();
            product.clone()
        }))
    }

    async fn set_product_image(&self, id: i32, image: &str) -> Result<bool> {
        let mut tables = self.write()?;
        Ok(match tables.products.get_mut(&id) {
            Some(product) => {
                product.image = Some(image.to_string());
                product.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn delete_product(&self, id: i32) -> Result<bool> {
        Ok(self.write()?.products.remove(&id).is_some())
    }

    async fn count_products_with_type(&self, product_type_id: i32) -> Result<i64> {
        let tables = self.read()?;
        Ok(tables
            .products
            .values()
            .filter(|p| p.product_type_id == product_type_id)
            .count() as i64)
    }

    async fn count_products_with_tag(&self, special_tag_id: i32) -> Result<i64> {
        let tables = self.read()?;
        Ok(tables
            .products
            .values()
            .filter(|p| p.special_tag_id == special_tag_id)
            .count() as i64)
    }

    async fn list_pending_image_products(&self) -> Result<Vec<Product>> {
        let tables = self.read()?;
        Ok(tables
            .products
            .values()
            .filter(|p| p.image.is_none())
            .cloned()
            .collect())
    }
}

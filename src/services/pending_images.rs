use crate::{error::Result, services::ImageStore, store::CatalogStore};

/// Finishes products left without an image between the row insert and the image
/// save of a create, giving each one a copy of the default image.
///
/// Running it again once everything is repaired does nothing.
pub async fn repair_pending_images(store: &dyn CatalogStore, images: &ImageStore) -> Result<usize> {
    let pending = store.list_pending_image_products().await?;
    if pending.is_empty() {
        return Ok(0);
    }

    tracing::warn!("Found {} product(s) with a pending image", pending.len());

    let mut repaired = 0;
    for product in pending {
        let image = images.copy_default(product.id).await?;
        if store.set_product_image(product.id, &image).await? {
            tracing::info!("Assigned default image {} to product {}", image, product.id);
            repaired += 1;
        }
    }

    Ok(repaired)
}

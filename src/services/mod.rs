pub mod image_store;
pub mod pending_images;

pub use image_store::ImageStore;

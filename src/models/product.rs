use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ValidationErrors},
    models::{MAX_NAME_LEN, ProductType, SpecialTag},
};

pub const MAX_SHADE_COLOR_LEN: usize = 50;

/// Prices are stored as `NUMERIC(12, 2)`.
pub const PRICE_SCALE: u32 = 2;
pub const PRICE_INTEGER_DIGITS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub available: bool,
    pub shade_color: Option<String>,
    /// Web path of the stored image. `None` while the image is still pending.
    pub image: Option<String>,
    pub product_type_id: i32,
    pub special_tag_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product joined with its type and tag. Dangling references join as `None`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub product_type: Option<ProductType>,
    pub special_tag: Option<SpecialTag>,
}

/// Everything a product form needs: the product plus the dropdown lists.
#[derive(Debug, Serialize)]
pub struct ProductFormView {
    pub product: Option<ProductDetails>,
    pub product_types: Vec<ProductType>,
    pub special_tags: Vec<SpecialTag>,
}

/// Validated scalar fields of a product submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub available: bool,
    pub shade_color: Option<String>,
    pub product_type_id: i32,
    pub special_tag_id: i32,
}

/// Raw text fields of a product form, kept as submitted so they can be echoed back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFormFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub available: Option<String>,
    pub shade_color: Option<String>,
    pub product_type_id: Option<String>,
    pub special_tag_id: Option<String>,
    pub image: Option<String>,
}

impl ProductFormFields {
    /// Stores a named text field. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "id" => &mut self.id,
            "name" => &mut self.name,
            "price" => &mut self.price,
            "available" => &mut self.available,
            "shade_color" => &mut self.shade_color,
            "product_type_id" => &mut self.product_type_id,
            "special_tag_id" => &mut self.special_tag_id,
            "image" => &mut self.image,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn submitted_id(&self) -> Option<i32> {
        non_blank(&self.id).and_then(|id| id.parse().ok())
    }

    /// Image path supplied explicitly in the form, if any.
    pub fn explicit_image(&self) -> Option<String> {
        non_blank(&self.image).map(str::to_string)
    }

    pub fn validate(&self) -> Result<ProductInput> {
        let mut errors = ValidationErrors::new();

        let name = non_blank(&self.name).unwrap_or_default();
        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.add(
                "name",
                format!("Name must be at most {} characters", MAX_NAME_LEN),
            );
        }

        let price = match non_blank(&self.price) {
            None => {
                errors.add("price", "Price is required");
                None
            }
            Some(raw) => match Decimal::from_str(raw) {
                Ok(price) if price < Decimal::ZERO => {
                    errors.add("price", "Price must not be negative");
                    None
                }
                Ok(price) if price.normalize().scale() > PRICE_SCALE => {
                    errors.add(
                        "price",
                        format!("Price must have at most {} decimal places", PRICE_SCALE),
                    );
                    None
                }
                Ok(price) if price.trunc() >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) => {
                    errors.add(
                        "price",
                        format!(
                            "Price must have at most {} digits before the decimal point",
                            PRICE_INTEGER_DIGITS
                        ),
                    );
                    None
                }
                Ok(price) => Some(price),
                Err(_) => {
                    errors.add("price", "Price must be a number");
                    None
                }
            },
        };

        let shade_color = non_blank(&self.shade_color).map(str::to_string);
        if let Some(shade) = &shade_color {
            if shade.chars().count() > MAX_SHADE_COLOR_LEN {
                errors.add(
                    "shade_color",
                    format!(
                        "Shade color must be at most {} characters",
                        MAX_SHADE_COLOR_LEN
                    ),
                );
            }
        }

        let product_type_id =
            required_id(&self.product_type_id, "product_type_id", "Product type", &mut errors);
        let special_tag_id =
            required_id(&self.special_tag_id, "special_tag_id", "Special tag", &mut errors);

        let errors = errors.with_form(self);
        match (price, product_type_id, special_tag_id) {
            (Some(price), Some(product_type_id), Some(special_tag_id)) if errors.is_empty() => {
                Ok(ProductInput {
                    name: name.to_string(),
                    price,
                    available: checkbox(&self.available),
                    shade_color,
                    product_type_id,
                    special_tag_id,
                })
            }
            _ => Err(errors.into()),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required_id(
    value: &Option<String>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<i32> {
    match non_blank(value) {
        None => {
            errors.add(field, format!("{} is required", label));
            None
        }
        Some(raw) => match raw.parse::<i32>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(field, format!("{} is invalid", label));
                None
            }
        },
    }
}

/// HTML checkbox semantics: absent means unchecked.
fn checkbox(value: &Option<String>) -> bool {
    match non_blank(value) {
        None => false,
        Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "false" | "off" | "0"),
    }
}

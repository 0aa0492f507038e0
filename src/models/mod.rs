mod name_form;
mod product;
mod product_type;
mod special_tag;
mod user;

pub use name_form::*;
pub use product::*;
pub use product_type::*;
pub use special_tag::*;
pub use user::*;

mod app_error;
mod validation;

pub use app_error::AppError;
pub use validation::ValidationErrors;

pub type Result<T> = std::result::Result<T, AppError>;

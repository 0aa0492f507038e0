use crate::error::AppError;

pub mod product_queries;
pub mod product_type_queries;
pub mod special_tag_queries;

/// Postgres `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.as_ref() == FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}

/// Reports a delete blocked by `ON DELETE RESTRICT` as a conflict.
pub(crate) fn restricted_delete(err: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::Conflict(message())
    } else {
        AppError::DatabaseError(err)
    }
}

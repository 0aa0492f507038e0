use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};

use crate::{
    error::{AppError, Result},
    models::ProductFormFields,
};

/// Multipart field carrying the product image.
pub const IMAGE_FILE_FIELD: &str = "file";

/// Parses a path identifier. A malformed identifier is treated like a missing one.
pub fn parse_id(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::NotFound(format!("No record with id '{}'", raw)))
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A product create/edit form posted as `multipart/form-data`.
#[derive(Debug, Default)]
pub struct ProductSubmission {
    pub fields: ProductFormFields,
    pub file: Option<UploadedFile>,
}

impl<S> FromRequest<S> for ProductSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut submission = ProductSubmission::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;

                // Browsers send an empty part when no file was chosen.
                if submission.file.is_none() && !file_name.is_empty() && !bytes.is_empty() {
                    submission.file = Some(UploadedFile { file_name, bytes });
                }
                continue;
            }

            let value = field.text().await?;
            submission.fields.set(&name, value);
        }

        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id(""), Err(AppError::NotFound(_))));
    }
}

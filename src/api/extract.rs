//! Request extraction helpers shared by the resource handlers.

use crate::errors::{Error, Result};
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use std::collections::HashMap;

/// JSON extractor whose rejection maps into the crate's validation error, so
/// a missing or malformed field comes back as a 400 with the usual
/// `{"error": ...}` body naming the field.
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(Error::Validation {
                message: rejection.body_text(),
            }),
        }
    }
}

/// A fully read multipart form: text fields plus at most one uploaded file
/// from the `file` part.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    /// Client filename and raw bytes of the uploaded file, when present
    pub file: Option<(String, Vec<u8>)>,
}

impl MultipartForm {
    /// Drains an axum [`Multipart`] body into memory.
    pub async fn read(multipart: &mut Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "file" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                // A file input submitted empty arrives as a nameless part
                if !filename.is_empty() {
                    form.file = Some((filename, bytes.to_vec()));
                }
            } else {
                let value = field.text().await.map_err(bad_multipart)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A required text field; missing fields are a validation error naming
    /// the field.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::Validation {
                message: format!("missing required field: {name}"),
            })
    }

    /// An optional text field; empty strings count as absent, the way HTML
    /// forms submit untouched inputs.
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Parses an integer form field, naming the field in the error.
pub fn parse_int_field(name: &str, value: &str) -> Result<i32> {
    value.trim().parse().map_err(|_| Error::Validation {
        message: format!("{name} must be an integer"),
    })
}

/// Parses a numeric form field, naming the field in the error.
pub fn parse_float_field(name: &str, value: &str) -> Result<f64> {
    value.trim().parse().map_err(|_| Error::Validation {
        message: format!("{name} must be a number"),
    })
}

fn bad_multipart(error: MultipartError) -> Error {
    Error::Validation {
        message: format!("invalid multipart payload: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_field_names_the_field() {
        let err = parse_int_field("created_by", "abc").unwrap_err();
        assert!(err.to_string().contains("created_by"));
    }

    #[test]
    fn test_parse_float_field() {
        assert!(matches!(parse_float_field("grade", "8.5"), Ok(v) if (v - 8.5).abs() < f64::EPSILON));
        assert!(parse_float_field("grade", "high").is_err());
    }
}

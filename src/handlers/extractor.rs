//! Custom JSON extractor with relay-shaped error responses
//!
//! Wraps Axum's `Json` extractor so every deserialization failure — missing
//! body, malformed JSON, absent or invalid `messages` — produces the same
//! `400 { "error": ... }` body as every other client error, instead of
//! Axum's plain-text rejection. Validation therefore terminates a bad
//! request before the handler runs and before any outbound call is made.

use crate::error::AppError;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON extractor that rejects with the application error shape
pub struct ApiJson<T>(pub T);

/// Rejection produced when the request body cannot be deserialized
pub struct ApiJsonRejection(JsonRejection);

impl IntoResponse for ApiJsonRejection {
    fn into_response(self) -> Response {
        AppError::Validation(self.0.body_text()).into_response()
    }
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiJsonRejection(rejection)),
        }
    }
}

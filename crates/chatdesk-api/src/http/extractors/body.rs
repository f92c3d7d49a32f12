//! Body extractor accepting either a urlencoded form or JSON.

use axum::extract::{Form, FromRequest, Json, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::http::error::AppError;

/// A request body decoded from JSON or `application/x-www-form-urlencoded`,
/// depending on `Content-Type`. `is_json` records which one it was so the
/// handler can answer in kind.
pub struct FormOrJson<T> {
    pub value: T,
    pub is_json: bool,
}

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let value = if is_json {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            value
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            value
        };
        Ok(Self { value, is_json })
    }
}

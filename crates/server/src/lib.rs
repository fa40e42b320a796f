use std::collections::BTreeMap;

use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, FieldErrors, NON_FIELD_ERRORS};

use serde::Serialize;
pub use server::{app, run_with_listener};

mod expenses;
mod health;
mod server;

pub enum ServerError {
    Engine(EngineError),
    /// The request body is not a JSON object.
    Malformed(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::InvalidId(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn engine_error_response(err: EngineError) -> axum::response::Response {
    let status = status_for_engine_error(&err);
    match err {
        EngineError::Validation(errors) => (status, Json(errors)).into_response(),
        EngineError::Store(store_err) => {
            tracing::error!("store error: {store_err}");
            let error = "internal server error".to_string();
            (status, Json(Error { error })).into_response()
        }
        other => (status, Json(Error { error: other.to_string() })).into_response(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(err) => engine_error_response(err),
            ServerError::Malformed(message) => {
                let errors = BTreeMap::from([(NON_FIELD_ERRORS, vec![message])]);
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<FieldErrors> for ServerError {
    fn from(value: FieldErrors) -> Self {
        Self::Engine(EngineError::Validation(value))
    }
}

#[cfg(test)]
mod tests {
    use engine::StoreError;
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let mut errors = FieldErrors::new();
        errors.add("amount", "This field is required.");
        let res = ServerError::from(errors).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_id_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidId("bad".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res =
            ServerError::from(EngineError::NotFound("Expense not found".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn store_fault_maps_to_500_without_detail() {
        let err = EngineError::Store(StoreError::Unreachable("10.0.0.7:5432 refused".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"error": "internal server error"})
        );
    }

    #[tokio::test]
    async fn validation_body_is_keyed_by_field() {
        let mut errors = FieldErrors::new();
        errors.add("amount", "A valid number is required.");
        let res = ServerError::from(errors).into_response();
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"amount": ["A valid number is required."]})
        );
    }

    #[test]
    fn malformed_maps_to_400() {
        let res = ServerError::Malformed("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A failed request. Logged when turned into a response; the caller only
/// sees the status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub context: &'static str,
    pub source: anyhow::Error,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        context: &'static str,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self {
            status,
            context,
            source: source.into(),
        }
    }

    pub fn bad_request(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, context, source)
    }

    pub fn internal(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, context, source)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let cause = format!("{:#}", self.source);
        tracing::error!(
            status = self.status.as_u16(),
            error = %cause,
            "{}",
            self.context
        );
        self.status.into_response()
    }
}

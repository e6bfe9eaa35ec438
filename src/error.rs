use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::aws::sts::ExchangeError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

impl AppError {
    fn message(&self) -> String {
        match self {
            AppError::Exchange(e) => e.summary().to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Exchange(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Exchange(_) => "token_exchange_failed",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.code(),
            message: self.message(),
        });
        (self.status(), body).into_response()
    }
}

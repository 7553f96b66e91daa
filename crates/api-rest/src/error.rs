//! HTTP presentation of the failure taxonomy.
//!
//! A missing record sends the browser back to the patient list; a missing
//! identity goes to sign-in; bad path input is a client error page; a
//! failing data source is a failure page rather than a crashed render.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use chartview_core::{ChartError, IdError};

use crate::render;

/// Route for the patient list, the fallback destination for missing
/// records.
pub const PATIENT_LIST_PATH: &str = "/patients";

#[derive(Debug)]
pub enum ApiError {
    /// No demographics row for the requested patient.
    NotFound,
    /// No acceptable identity on a protected route.
    AuthDenied { sign_in_path: String },
    /// Malformed path or query input.
    BadRequest(String),
    /// Data-source failure; details stay in the log.
    Internal,
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::NotFound => ApiError::NotFound,
            ChartError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ChartError::DataSource(err) => {
                tracing::error!("data source failure: {err}");
                ApiError::Internal
            }
            ChartError::AuthDenied(_) => ApiError::AuthDenied {
                sign_in_path: chartview_core::config::DEFAULT_SIGN_IN_PATH.to_owned(),
            },
        }
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => Redirect::to(PATIENT_LIST_PATH).into_response(),
            ApiError::AuthDenied { sign_in_path } => Redirect::to(&sign_in_path).into_response(),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Html(render::error_page("Bad request", &msg)),
            )
                .into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::error_page(
                    "Something went wrong",
                    "The record store could not be reached. Try again shortly.",
                )),
            )
                .into_response(),
        }
    }
}

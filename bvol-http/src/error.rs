use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bvol_core::{BvolError, XyzError};

use crate::payload::{STATUS_FAILURE, StatusBody};

#[derive(Debug)]
pub enum ApiError {
    Core(BvolError),
    MissingField(&'static str),
    BadField { field: &'static str, reason: String },
    MoleculeNotFound,
    Internal(String),
}

impl From<BvolError> for ApiError {
    fn from(e: BvolError) -> Self {
        ApiError::Core(e)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Core(BvolError::Io(e))
    }
}

impl From<XyzError> for ApiError {
    fn from(e: XyzError) -> Self {
        ApiError::Core(BvolError::InvalidStructure(e))
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(BvolError::NoCenterAtomFound) => StatusCode::NOT_FOUND,
            ApiError::Core(BvolError::ArtifactNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Core(BvolError::MeasurementFailed(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(BvolError::InvalidStructure(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(BvolError::ArtifactPersistFailed(_) | BvolError::Io(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::MissingField(_) | ApiError::BadField { .. } => StatusCode::BAD_REQUEST,
            ApiError::MoleculeNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Core(BvolError::NoCenterAtomFound) => "no center provided".into(),
            ApiError::Core(BvolError::ArtifactNotFound(_)) => "Failed to retrieve plot".into(),
            ApiError::Core(e) => e.to_string(),
            ApiError::MissingField(field) => format!("missing field `{field}`"),
            ApiError::BadField { field, reason } => format!("invalid field `{field}`: {reason}"),
            ApiError::MoleculeNotFound => "molecule not found".into(),
            ApiError::Internal(msg) => format!("internal error: {msg}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();
        if status.is_server_error() {
            tracing::warn!(%status, %message, "request failed");
        } else {
            tracing::debug!(%status, %message, "request rejected");
        }
        (status, Json(StatusBody::new(STATUS_FAILURE, message))).into_response()
    }
}

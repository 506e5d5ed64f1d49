use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Rejection of a raw cell payload before it reaches validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellValueError {
    #[error("cell value '{0}' is not a number")]
    NotNumeric(String),
    #[error("cell value must be a finite number")]
    NotFinite,
    #[error("unknown cell '{0}'")]
    UnknownCell(String),
}

impl From<CellValueError> for ApiError {
    fn from(value: CellValueError) -> Self {
        ApiError::new(ErrorCode::Validation, value.to_string())
    }
}

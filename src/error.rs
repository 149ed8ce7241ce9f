use std::fmt::{Display, Formatter};

use statement_table_extract::ExtractError;
use worker::{Response, Result};

use crate::models::{ErrorResponse, NO_FILE_MESSAGE};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    Extraction(String),
    Internal(String),
}

impl ApiError {
    pub fn no_file() -> Self {
        Self::BadRequest(NO_FILE_MESSAGE.to_string())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Extraction(_) => "extraction_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::PayloadTooLarge(message)
            | Self::Extraction(message)
            | Self::Internal(message) => message,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::Extraction(_) | Self::Internal(_) => 500,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message().to_string(),
        }
    }

    pub fn into_response(self) -> Result<Response> {
        let mut response = Response::from_json(&self.body())?;
        response.headers_mut().set("Cache-Control", "no-store")?;
        Ok(response.with_status(self.status_code()))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<worker::Error> for ApiError {
    fn from(error: worker::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<ExtractError> for ApiError {
    fn from(error: ExtractError) -> Self {
        Self::Extraction(format!("failed to extract tables from PDF: {error}"))
    }
}

use serde::{Deserialize, Serialize};
use statement_table_extract::Row;

/// Multipart field that carries the uploaded PDF.
pub const UPLOAD_FIELD: &str = "file";
pub const NO_FILE_MESSAGE: &str = "No file uploaded";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "*";
pub const CORS_MAX_AGE_SECONDS: u32 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableResponse {
    pub table: Vec<Row>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

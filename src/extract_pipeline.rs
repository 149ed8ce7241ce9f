use statement_table_extract::{ExtractOptions, ExtractionReport, extract_rows_from_bytes};

use crate::error::ApiError;
use crate::models::TableResponse;

/// Rejects uploads whose declared size is over the limit, before the body is read.
pub fn check_upload_size(size: usize, max_upload_bytes: usize) -> Result<(), ApiError> {
    if size > max_upload_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "uploaded file exceeds {max_upload_bytes} bytes"
        )));
    }
    Ok(())
}

/// An absent or empty upload counts as no file at all.
pub fn require_upload(bytes: Option<Vec<u8>>) -> Result<Vec<u8>, ApiError> {
    match bytes {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(ApiError::no_file()),
    }
}

pub fn extract_table(pdf: &[u8]) -> Result<(TableResponse, ExtractionReport), ApiError> {
    let (table, report) = extract_rows_from_bytes(pdf, &ExtractOptions::default())?;
    Ok((TableResponse { table }, report))
}

pub fn summarize(report: &ExtractionReport) -> String {
    format!(
        "extracted profile={} pages={} tables={} rows={} warnings={}",
        report.profile.as_str(),
        report.page_count,
        report.table_count,
        report.row_count,
        report.warnings.len()
    )
}

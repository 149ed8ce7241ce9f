use serde::Serialize;
use worker::{
    Context, Cors, Env, File, FormEntry, Method, Request, Response, Result, RouteContext, Router,
};

use crate::error::ApiError;
use crate::extract_pipeline;
use crate::models::{
    CORS_MAX_AGE_SECONDS, DEFAULT_ALLOWED_ORIGIN, DEFAULT_MAX_UPLOAD_BYTES, TableResponse,
    UPLOAD_FIELD,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub max_upload_bytes: usize,
    pub allowed_origin: String,
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let max_upload_bytes =
        parse_max_upload_bytes(env.var("MAX_UPLOAD_BYTES").ok().map(|value| value.to_string()));
    let allowed_origin = env
        .var("CORS_ALLOW_ORIGIN")
        .map(|value| value.to_string())
        .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string());

    let state = AppState {
        max_upload_bytes,
        allowed_origin,
    };

    Router::with_data(state)
        .post_async("/extract", extract_route)
        .options("/extract", preflight_route)
        .run(req, env)
        .await
}

/// Positive byte counts only; anything else falls back to the default limit.
pub fn parse_max_upload_bytes(raw: Option<String>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
}

fn cors_policy(allowed_origin: &str) -> Cors {
    Cors::new()
        .with_origins(vec![allowed_origin.to_string()])
        .with_methods(vec![Method::Post, Method::Options])
        .with_allowed_headers(vec!["Content-Type".to_string()])
        .with_max_age(CORS_MAX_AGE_SECONDS)
}

fn preflight_route(_req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    Response::empty()?
        .with_status(204)
        .with_cors(&cors_policy(&ctx.data.allowed_origin))
}

async fn extract_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    let response = match extract_response(&mut req, &ctx.data).await {
        Ok(payload) => json_response(&payload)?,
        Err(error) => {
            if error.status_code() >= 500 {
                worker::console_error!("extract failed: {error}");
            }
            error.into_response()?
        }
    };
    response.with_cors(&cors_policy(&ctx.data.allowed_origin))
}

async fn extract_response(req: &mut Request, state: &AppState) -> Result<TableResponse, ApiError> {
    let upload = read_upload(req, state.max_upload_bytes).await?;
    let (payload, report) = extract_pipeline::extract_table(&upload)?;
    worker::console_log!("{}", extract_pipeline::summarize(&report));
    Ok(payload)
}

/// Only a file part counts as an upload. A missing part, a text part and an
/// unreadable form (passed as `None`) are all "no file".
pub fn upload_file(entry: Option<FormEntry>) -> Result<File, ApiError> {
    match entry {
        Some(FormEntry::File(file)) => Ok(file),
        Some(FormEntry::Field(_)) | None => Err(ApiError::no_file()),
    }
}

async fn read_upload(req: &mut Request, max_upload_bytes: usize) -> Result<Vec<u8>, ApiError> {
    let entry = req
        .form_data()
        .await
        .ok()
        .and_then(|form| form.get(UPLOAD_FIELD));
    let file = upload_file(entry)?;

    extract_pipeline::check_upload_size(file.size(), max_upload_bytes)?;
    let bytes = file.bytes().await?;
    extract_pipeline::require_upload(Some(bytes))
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

/// HTTP request handlers for the short-link API

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{CALCULATOR_PATH, STATE_QUERY_PARAM};
use crate::error::ApiError;
use crate::metrics::{self, RequestTimer};
use crate::AppState;

/// Create short link request
#[derive(Debug, Deserialize)]
pub struct CreateShortUrlRequest {
    pub state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortUrlResponse {
    pub short_url: String,
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveShortUrlResponse {
    pub state: String,
}

fn status_of<T>(result: &Result<T, ApiError>) -> u16 {
    match result {
        Ok(_) => StatusCode::OK.as_u16(),
        Err(e) => e.status().as_u16(),
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Encoded states are base64url; anything else is not forwarded in a URL.
fn is_url_safe(state: &str) -> bool {
    state
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
}

/// Store an encoded state and answer with its short link
pub async fn create_short_url(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<Json<CreateShortUrlResponse>, ApiError> {
    let timer = RequestTimer::start("create");
    let result = create(state, &headers, payload).await;
    timer.finish(status_of(&result));
    result
}

async fn create(
    state: AppState,
    headers: &HeaderMap,
    payload: Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<Json<CreateShortUrlResponse>, ApiError> {
    let encoded = match payload {
        Ok(Json(request)) => request.state.filter(|s| !s.is_empty()),
        Err(rejection) => {
            warn!("Rejected create request body: {}", rejection);
            None
        }
    }
    .ok_or(ApiError::MissingState)?;

    let store = state.store.clone();
    let (id, record_count) = tokio::task::spawn_blocking(move || {
        let id = store.store(&encoded);
        (id, store.stats().record_count)
    })
    .await
    .map_err(|e| ApiError::CreateFailed(e.to_string()))?;
    metrics::STORED_RECORDS.set(record_count as i64);

    let base_url = state.config.base_url(
        header(headers, "host"),
        header(headers, "x-forwarded-proto"),
    );
    let short_url = format!("{}/s/{}", base_url, id);
    info!("Created short URL {}", short_url);

    Ok(Json(CreateShortUrlResponse { short_url, id }))
}

/// Return the encoded state behind a short id
pub async fn resolve_short_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResolveShortUrlResponse>, ApiError> {
    let timer = RequestTimer::start("resolve");
    let result = resolve(state, id).await.map(|s| Json(ResolveShortUrlResponse { state: s }));
    timer.finish(status_of(&result));
    result
}

/// `/api/shorturl/` with nothing after the slash
pub async fn missing_id() -> ApiError {
    let timer = RequestTimer::start("resolve");
    timer.finish(ApiError::MissingId.status().as_u16());
    ApiError::MissingId
}

async fn resolve(state: AppState, id: String) -> Result<String, ApiError> {
    if id.is_empty() {
        return Err(ApiError::MissingId);
    }

    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.resolve(&id))
        .await
        .map_err(|e| ApiError::ResolveFailed(e.to_string()))?
        .ok_or(ApiError::NotFound)
}

/// Forward a short link to the calculator, or to the landing page
pub async fn redirect_short_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Redirect {
    let timer = RequestTimer::start("redirect");
    let target = match resolve(state, id.clone()).await {
        Ok(encoded) if is_url_safe(&encoded) => {
            format!("{}?{}={}", CALCULATOR_PATH, STATE_QUERY_PARAM, encoded)
        }
        Ok(_) => {
            warn!("Short URL {} holds a state that cannot be embedded in a URL", id);
            "/".to_string()
        }
        Err(e) => {
            warn!("Short URL {} not resolvable: {}", id, e);
            "/".to_string()
        }
    };
    timer.finish(StatusCode::TEMPORARY_REDIRECT.as_u16());
    Redirect::temporary(&target)
}

/// Root endpoint
pub async fn root() -> &'static str {
    "Erasmus budget short links - POST /api/shorturl to share a budget"
}

pub async fn health_handler() -> &'static str {
    "OK"
}

pub async fn metrics_handler() -> String {
    metrics::encode_metrics().unwrap_or_else(|e| {
        tracing::error!("Failed to encode metrics: {}", e);
        String::from("# Error encoding metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url_safe() {
        assert!(is_url_safe("KLUv_QBYZQ-abc"));
        assert!(!is_url_safe("a b"));
        assert!(!is_url_safe("line\nbreak"));
        assert!(!is_url_safe("x&y=z"));
    }
}

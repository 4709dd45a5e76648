use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::{header, HeaderMap, Method};
use axum::response::{IntoResponse, Json, Response};
use pagestore_store::{DocumentKey, UpsertRequest};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::asset;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Query string of the editor endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct EditorQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub path: Option<String>,
}

/// Liveness probe.
pub async fn ping() -> &'static str {
    "pong!"
}

/// Editor endpoint: dispatches on `?type=` to the document or asset handlers.
///
/// Every request is refused outside development mode, before the query
/// string is looked at.
pub async fn handle_editor(
    State(state): State<AppState>,
    query: Result<Query<EditorQuery>, QueryRejection>,
    request: Request,
) -> ServerResult<Response> {
    state.mode.ensure_editable()?;
    let Query(query) = query.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    match query.kind.as_deref() {
        Some("data") => handle_data(state, request).await,
        Some("asset") => handle_asset(&state, request.method(), query.path.as_deref()).await,
        _ => Err(ServerError::InvalidType),
    }
}

async fn handle_data(state: AppState, request: Request) -> ServerResult<Response> {
    let method = request.method().clone();
    match method {
        Method::GET => {
            let documents = state.store.load_all().await?;
            debug!(count = documents.len(), "snapshot served");
            Ok(Json(documents).into_response())
        }
        Method::POST if is_multipart(request.headers()) => {
            let multipart = Multipart::from_request(request, &state)
                .await
                .map_err(|e| ServerError::BadRequest(e.body_text()))?;
            let urls = upload_files(&state, multipart).await?;
            Ok(Json(urls).into_response())
        }
        Method::POST => {
            let body = Bytes::from_request(request, &state)
                .await
                .map_err(|e| ServerError::BadRequest(e.body_text()))?;
            let upsert: UpsertRequest = serde_json::from_slice(&body)
                .map_err(|e| ServerError::BadRequest(format!("invalid document body: {e}")))?;
            let key = DocumentKey::parse(&upsert.path)?;
            state.store.upsert(&key, &upsert.data).await?;
            info!(key = %key, "document saved");
            Ok(Json(json!({})).into_response())
        }
        _ => Err(ServerError::NotAllowed),
    }
}

async fn handle_asset(
    state: &AppState,
    method: &Method,
    path: Option<&str>,
) -> ServerResult<Response> {
    if *method != Method::GET {
        return Err(ServerError::NotAllowed);
    }
    let path = path.ok_or_else(|| ServerError::BadRequest("missing asset path".into()))?;
    let (bytes, content_type) = asset::read_asset(&state.assets_root, path).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Store every file field of a multipart upload; non-file fields are ignored.
async fn upload_files(state: &AppState, mut multipart: Multipart) -> ServerResult<Vec<String>> {
    let mut urls = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?
    {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;
        urls.push(state.uploads.save(&file_name, &data).await?);
    }
    Ok(urls)
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn multipart_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_multipart(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=xyz"),
        );
        assert!(is_multipart(&headers));
    }

    #[tokio::test]
    async fn ping_pongs() {
        assert_eq!(ping().await, "pong!");
    }
}

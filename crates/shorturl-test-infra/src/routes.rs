use crate::backend::{BackendState, Store};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use shorturl_core::{AccessLog, ApiVariant, CreateBody, ListFormat, Mapping, Payload, ShortCode};

pub(crate) fn router(state: BackendState) -> Router {
    let router = match state.variant {
        ApiVariant::Legacy => Router::new()
            .route("/api/all", get(legacy_list))
            .route("/api/new", post(legacy_create))
            .route("/api/{short_code}", delete(delete_mapping)),
        ApiVariant::V1 => keyed_routes("/v1"),
        ApiVariant::Configurable { ref base } => keyed_routes(base.trim_end_matches('/')),
    };
    router.with_state(state)
}

fn keyed_routes(base: &str) -> Router<BackendState> {
    Router::new()
        .route(base, get(probe))
        .route(&format!("{base}/urls"), get(json_list))
        .route(&format!("{base}/logs"), get(access_logs))
        .route(
            &format!("{base}/url/{{short_code}}"),
            post(json_create).delete(delete_mapping),
        )
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
}

fn insert(store: &mut Store, mapping: Mapping) -> Response {
    if store
        .mappings
        .iter()
        .any(|m| m.short_code == mapping.short_code)
    {
        return (
            StatusCode::CONFLICT,
            "Failed. UNIQUE constraint failed: short_urls.short_code",
        )
            .into_response();
    }

    store.logs.retain(|log| log.code != mapping.short_code);
    store.logs.push(AccessLog {
        code: mapping.short_code.clone(),
        url: Some(mapping.long_url.clone()),
        last_access: None,
        access_count: 0,
    });
    store.mappings.push(mapping);
    (StatusCode::CREATED, "Added.").into_response()
}

async fn probe(State(state): State<BackendState>, uri: Uri, headers: HeaderMap) -> Response {
    state.record("GET", uri.path(), &headers, "");
    if state.is_authorized(&headers) {
        (StatusCode::OK, "ok").into_response()
    } else {
        unauthorized()
    }
}

async fn json_list(State(state): State<BackendState>, uri: Uri, headers: HeaderMap) -> Response {
    state.record("GET", uri.path(), &headers, "");
    if !state.is_authorized(&headers) {
        return unauthorized();
    }
    Json(state.store.lock().mappings.clone()).into_response()
}

async fn legacy_list(State(state): State<BackendState>, uri: Uri, headers: HeaderMap) -> Response {
    state.record("GET", uri.path(), &headers, "");
    let store = state.store.lock();
    match ListFormat::DelimitedText.encode(&store.mappings) {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn access_logs(State(state): State<BackendState>, uri: Uri, headers: HeaderMap) -> Response {
    state.record("GET", uri.path(), &headers, "");
    if !state.is_authorized(&headers) {
        return unauthorized();
    }
    Json(state.store.lock().logs.clone()).into_response()
}

async fn json_create(
    State(state): State<BackendState>,
    Path(short_code): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.record("POST", uri.path(), &headers, &body);
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let Ok(request) = serde_json::from_str::<CreateBody>(&body) else {
        return (StatusCode::BAD_REQUEST, "BAD_REQUEST").into_response();
    };
    let mapping = Mapping::new(short_code, request.url);
    insert(&mut state.store.lock(), mapping)
}

async fn legacy_create(
    State(state): State<BackendState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.record("POST", uri.path(), &headers, &body);
    match Payload::parse_text(&body) {
        Ok(mapping) => insert(&mut state.store.lock(), mapping),
        Err(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST").into_response(),
    }
}

async fn delete_mapping(
    State(state): State<BackendState>,
    Path(short_code): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record("DELETE", uri.path(), &headers, "");
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let code = ShortCode::new(short_code);
    let mut store = state.store.lock();
    let Some(index) = store.mappings.iter().position(|m| m.short_code == code) else {
        return (StatusCode::BAD_REQUEST, "Item does not exists.").into_response();
    };

    store.mappings.remove(index);
    if let Some(log) = store.logs.iter_mut().find(|log| log.code == code) {
        log.url = None;
    }
    (StatusCode::OK, "Removed.").into_response()
}

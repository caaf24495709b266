//! REST HTTP server.
//!
//! Exposes the snippet service as a JSON API consumed by the frontend.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/snippets` | Summarize and store a snippet (201) |
//! | `GET`  | `/snippets` | List all snippets |
//! | `GET`  | `/snippets/{id}` | Fetch one snippet |
//! | `GET`  | `/health` | Process, database, and provider status |
//!
//! # Response Contract
//!
//! Success bodies are `{ "message": "...", "data": ... }`. Error bodies are
//!
//! ```json
//! { "message": "Error creating snippet",
//!   "error": "Snippet validation failed: text: Text is required",
//!   "errors": [{ "field": "text", "message": "Text is required" }] }
//! ```
//!
//! `error` and `errors` are omitted when empty. Status codes: `400` for
//! malformed bodies, invalid input and malformed ids, `404` for missing
//! snippets and unknown routes, `500` for store or provider failures.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser frontend
//! can be served from a different origin.
//!
//! # Security Headers
//!
//! Every response, including errors and the 404 fallback, carries the
//! headers in [`SECURITY_HEADERS`] (content-type sniffing off, framing
//! restricted to same origin, no referrer, and so on).

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderName, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use snippet_core::{ErrorKind, FieldError, HealthReport, Snippet, SnippetError, SnippetService};

use crate::config::Config;

/// Routes listed in the body of a 404 for an unknown path.
pub const AVAILABLE_ROUTES: [&str; 4] = [
    "GET /health",
    "POST /snippets",
    "GET /snippets",
    "GET /snippets/:id",
];

/// Hardening headers set on every response. Names must be lowercase.
pub const SECURITY_HEADERS: [(&str, &str); 12] = [
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    (
        "strict-transport-security",
        "max-age=15552000; includeSubDomains",
    ),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    service: Arc<SnippetService>,
}

/// Build the application router around a service.
///
/// Separate from [`run_server`] so tests can drive the router directly.
pub fn router(service: Arc<SnippetService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/snippets", get(handle_list).post(handle_create))
        .route("/snippets/{id}", get(handle_get))
        .route("/health", get(handle_health))
        .fallback(handle_route_not_found)
        .layer(cors);

    for (name, value) in SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }

    app.with_state(AppState { service })
}

/// Serve the API on `[server].bind` until Ctrl-C or SIGTERM.
///
/// Returns once in-flight requests have drained. The caller owns the
/// store and closes it afterwards.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(config: &Config, service: Arc<SnippetService>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(service);
    let shutdown = shutdown_signal()?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("snippet API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Register the shutdown signals and return a future that resolves on the
/// first one. SIGTERM is hooked up front so a signal sent right after the
/// listener starts is not lost.
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    Ok(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            sigterm.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
        tracing::info!("shutdown signal received");
    })
}

// ============ Responses ============

/// Success envelope.
#[derive(Serialize)]
struct DataResponse<T> {
    message: &'static str,
    data: T,
}

/// Error envelope.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    body: ErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                error: Some(error.into()),
                errors: None,
            },
        }
    }

    /// Map a service error, using `context` as the message for failures
    /// that have no more specific one.
    fn from_service(context: &'static str, err: SnippetError) -> Self {
        match &err {
            SnippetError::InvalidId(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "Invalid ID format",
                "The provided id is not a valid snippet identifier",
            ),
            SnippetError::NotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                err.to_string(),
                format!("No snippet exists with id {}", id),
            ),
            _ => {
                let status = match err.kind() {
                    ErrorKind::Validation => StatusCode::BAD_REQUEST,
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::Dependency => {
                        tracing::error!(error = %err, "{}", context);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let mut app_err = Self::new(status, context, err.to_string());
                app_err.body.errors = err.field_errors().map(<[FieldError]>::to_vec);
                app_err
            }
        }
    }

    fn malformed_body(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        match rejection {
            JsonRejection::JsonDataError(e) => {
                Self::new(StatusCode::BAD_REQUEST, "Invalid request body", e.body_text())
            }
            _ => Self::new(
                StatusCode::BAD_REQUEST,
                "Invalid JSON format",
                "The request body contains invalid JSON or wrong content type",
            ),
        }
    }
}

// ============ POST /snippets ============

/// Request body for `POST /snippets`. `text` may be absent; that is a
/// validation failure, not a malformed body.
#[derive(Debug, Deserialize)]
pub struct CreateSnippetRequest {
    #[serde(default)]
    pub text: Option<String>,
}

async fn handle_create(
    State(state): State<AppState>,
    payload: Result<Json<CreateSnippetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Snippet>>), AppError> {
    let Json(request) = payload.map_err(AppError::malformed_body)?;

    let snippet = state
        .service
        .create_snippet(request.text.as_deref())
        .await
        .map_err(|e| AppError::from_service("Error creating snippet", e))?;

    tracing::info!(id = %snippet.id, "snippet created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            message: "Snippet created successfully",
            data: snippet,
        }),
    ))
}

// ============ GET /snippets/{id} ============

async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Snippet>>, AppError> {
    let snippet = state
        .service
        .get_snippet(&id)
        .await
        .map_err(|e| AppError::from_service("Error retrieving snippet", e))?;

    Ok(Json(DataResponse {
        message: "Snippet retrieved successfully",
        data: snippet,
    }))
}

// ============ GET /snippets ============

async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Snippet>>>, AppError> {
    let snippets = state
        .service
        .list_snippets()
        .await
        .map_err(|e| AppError::from_service("Error retrieving snippets", e))?;

    Ok(Json(DataResponse {
        message: "Snippets retrieved successfully",
        data: snippets,
    }))
}

// ============ GET /health ============

async fn handle_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.service.health().await)
}

// ============ fallback ============

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteNotFound {
    message: &'static str,
    error: String,
    available_routes: [&'static str; 4],
}

async fn handle_route_not_found(uri: Uri) -> (StatusCode, Json<RouteNotFound>) {
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFound {
            message: "Route not found",
            error: format!("The requested route {} does not exist", uri.path()),
            available_routes: AVAILABLE_ROUTES,
        }),
    )
}

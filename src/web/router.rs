//! Router configuration for the filestash HTTP surface.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    file::MULTIPART_BUFFER_LIMIT, index, serve_file, upload_file, upload_preflight, AppState,
};
use super::middleware::create_cors_layer;

/// OpenAPI document for the file API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::handlers::file::upload_file,
        crate::web::handlers::file::serve_file,
    ),
    components(schemas(
        crate::web::dto::UploadResponse,
        crate::web::error::ErrorBody,
    )),
    tags(
        (name = "files", description = "File upload and download")
    ),
    info(
        title = "filestash",
        description = "Minimal HTTP file storage server"
    )
)]
pub struct ApiDoc;

/// Create the main router.
///
/// The panic-catch layer converts a panicking handler into a generic 500 so
/// one bad request cannot take the process down.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload_file).options(upload_preflight))
        .route("/files/:filename", get(serve_file))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::new())
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(MULTIPART_BUFFER_LIMIT)),
        )
        .with_state(app_state)
}

/// Create a router serving the Swagger UI and the OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

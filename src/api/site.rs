use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::schema::SchemaManager;
use crate::site::SiteConfigService;

pub async fn get_site_config(Extension(site): Extension<SiteConfigService>) -> Response {
    match site.get().await {
        Ok(config) => (StatusCode::OK, Json(config)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

pub async fn run_setup(Extension(schema): Extension<SchemaManager>) -> Response {
    schema.initialize_schema().await;
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "message": "Schema provisioning finished"})),
    )
        .into_response()
}

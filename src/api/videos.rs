use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::VideoCatalog;
use crate::models::SortOption;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    #[serde(default)]
    pub sort: SortOption,
    pub search: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    12
}

pub async fn list_videos(
    Extension(catalog): Extension<VideoCatalog>,
    Query(params): Query<ListParams>,
) -> Response {
    match catalog
        .list_paginated(
            params.page,
            params.per_page,
            params.sort,
            params.search.as_deref(),
        )
        .await
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

pub async fn get_video(
    Extension(catalog): Extension<VideoCatalog>,
    Path(video_id): Path<String>,
) -> Response {
    match catalog.get_one(&video_id).await {
        Some(video) => (StatusCode::OK, Json(video)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Video not found"})),
        )
            .into_response(),
    }
}

pub async fn get_video_url(
    Extension(catalog): Extension<VideoCatalog>,
    Path(video_id): Path<String>,
) -> Response {
    match catalog.get_video_file_url(&video_id).await {
        Some(url) => (StatusCode::OK, Json(json!({"url": url}))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Video unavailable"})),
        )
            .into_response(),
    }
}

pub async fn record_view(
    Extension(catalog): Extension<VideoCatalog>,
    Path(video_id): Path<String>,
) -> Response {
    // Best-effort; the catalog swallows increment failures.
    catalog.increment_views(&video_id).await;
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}

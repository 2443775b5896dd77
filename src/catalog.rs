use std::cmp::Reverse;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::backend::{Backend, BackendError};
use crate::config::AppConfig;
use crate::models::video::{parse_duration, SortOption, VideoView};

/// Documents requested for the full-catalog fetch. Search, sorting and
/// paging all happen in memory over this set; catalogs are expected to stay
/// well under the limit.
const CATALOG_FETCH_LIMIT: u32 = 500;

/// One page of the sorted, filtered catalog.
#[derive(Clone, Debug, Serialize)]
pub struct VideoPage {
    pub videos: Vec<VideoView>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Outcome of resolving a video's playable asset URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlResolution {
    Found(String),
    /// The record is missing or carries no file reference.
    NotConfigured,
    /// A reference exists but the backend could not resolve it.
    Failed,
}

/// Read side of the video catalog.
///
/// Error policy, by tier: the full-catalog fetch is the one hard failure and
/// propagates to the caller; everything per-record (thumbnails, single
/// fetches, view counts, file URLs) is logged and degraded to a safe default
/// so a browsing page renders with placeholders instead of crashing.
#[derive(Clone)]
pub struct VideoCatalog {
    backend: Arc<dyn Backend>,
    config: AppConfig,
}

impl VideoCatalog {
    pub fn new(backend: Arc<dyn Backend>, config: AppConfig) -> Self {
        Self { backend, config }
    }

    /// Full catalog, normalized, filtered by `search` and sorted.
    pub async fn list_all(
        &self,
        sort: SortOption,
        search: Option<&str>,
    ) -> Result<Vec<VideoView>, BackendError> {
        let documents = self
            .backend
            .list_documents(&self.config.videos_collection, CATALOG_FETCH_LIMIT)
            .await?;

        let mut videos: Vec<VideoView> = documents
            .iter()
            .map(|doc| VideoView::from_document(doc, &self.config.placeholder_thumbnail_url))
            .collect();

        if let Some(query) = search.map(str::trim).filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            videos.retain(|v| {
                v.title.to_lowercase().contains(&needle)
                    || v.description.to_lowercase().contains(&needle)
            });
        }

        for video in &mut videos {
            video.thumbnail_url = self
                .resolve_thumbnail(video.thumbnail_file_id.as_deref())
                .await;
        }

        apply_sort(&mut videos, sort);
        Ok(videos)
    }

    /// Page slice over the full sorted, filtered set. Out-of-range pages
    /// yield an empty slice, not an error.
    pub async fn list_paginated(
        &self,
        page: usize,
        per_page: usize,
        sort: SortOption,
        search: Option<&str>,
    ) -> Result<VideoPage, BackendError> {
        let all = self.list_all(sort, search).await?;

        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = all.len();
        let total_pages = (total + per_page - 1) / per_page;

        let start = (page - 1).saturating_mul(per_page);
        let videos = if start >= total {
            Vec::new()
        } else {
            all[start..(start + per_page).min(total)].to_vec()
        };

        Ok(VideoPage {
            videos,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    /// Single video by id. Absent both when the record does not exist and
    /// when the backend fails; the latter is logged, but callers cannot tell
    /// the two apart from the return value alone.
    pub async fn get_one(&self, video_id: &str) -> Option<VideoView> {
        match self
            .backend
            .get_document(&self.config.videos_collection, video_id)
            .await
        {
            Ok(doc) => {
                let mut video =
                    VideoView::from_document(&doc, &self.config.placeholder_thumbnail_url);
                video.thumbnail_url = self
                    .resolve_thumbnail(video.thumbnail_file_id.as_deref())
                    .await;
                Some(video)
            }
            Err(BackendError::NotFound { .. }) => None,
            Err(e) => {
                tracing::error!("Failed to fetch video {}: {}", video_id, e);
                None
            }
        }
    }

    /// Best-effort view counter. Read-modify-write with no concurrency
    /// control: simultaneous viewers can lose an increment, which is
    /// acceptable for an advisory count. Failures are logged and swallowed.
    pub async fn increment_views(&self, video_id: &str) {
        let current = match self
            .backend
            .get_document(&self.config.videos_collection, video_id)
            .await
        {
            Ok(doc) => doc
                .field("views")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            Err(e) => {
                tracing::warn!("View increment skipped for {}: {}", video_id, e);
                return;
            }
        };

        match self
            .backend
            .update_document(
                &self.config.videos_collection,
                video_id,
                json!({ "views": current + 1 }),
            )
            .await
        {
            Ok(_) => crate::metrics::increment_video_views(),
            Err(e) => tracing::warn!("Failed to write view count for {}: {}", video_id, e),
        }
    }

    /// Resolves the playable asset URL, keeping the cases distinct.
    pub async fn resolve_video_url(&self, video_id: &str) -> UrlResolution {
        let doc = match self
            .backend
            .get_document(&self.config.videos_collection, video_id)
            .await
        {
            Ok(doc) => doc,
            Err(BackendError::NotFound { .. }) => {
                tracing::debug!("Video {} not found for URL resolution", video_id);
                return UrlResolution::NotConfigured;
            }
            Err(e) => {
                tracing::error!("Failed to fetch video {} for URL resolution: {}", video_id, e);
                return UrlResolution::Failed;
            }
        };

        let file_id = ["video_file_id", "videoId"].iter().find_map(|key| {
            doc.field(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        });
        let Some(file_id) = file_id else {
            return UrlResolution::NotConfigured;
        };

        match self
            .backend
            .get_file_view_url(&self.config.media_bucket, file_id)
            .await
        {
            Ok(url) => UrlResolution::Found(url),
            Err(e) => {
                tracing::warn!("Video URL resolution failed for file {}: {}", file_id, e);
                crate::metrics::increment_url_resolution_failed("video");
                UrlResolution::Failed
            }
        }
    }

    /// Collapsed form of [`resolve_video_url`]: missing record, missing
    /// reference and resolution failure all read as unavailable.
    pub async fn get_video_file_url(&self, video_id: &str) -> Option<String> {
        match self.resolve_video_url(video_id).await {
            UrlResolution::Found(url) => Some(url),
            UrlResolution::NotConfigured | UrlResolution::Failed => None,
        }
    }

    async fn resolve_thumbnail(&self, file_id: Option<&str>) -> String {
        let Some(file_id) = file_id else {
            return self.config.placeholder_thumbnail_url.clone();
        };
        match self
            .backend
            .get_file_view_url(&self.config.media_bucket, file_id)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Thumbnail resolution failed for file {}: {}", file_id, e);
                crate::metrics::increment_url_resolution_failed("thumbnail");
                self.config.placeholder_thumbnail_url.clone()
            }
        }
    }
}

fn apply_sort(videos: &mut [VideoView], sort: SortOption) {
    match sort {
        SortOption::Newest => videos.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOption::PriceAsc => videos.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOption::PriceDesc => videos.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOption::ViewsDesc => videos.sort_by_key(|v| Reverse(v.views)),
        // Orders by the display string parsed back into seconds; the round
        // trip is exact for whole seconds under a day.
        SortOption::DurationDesc => videos.sort_by_key(|v| Reverse(parse_duration(&v.duration))),
    }
}

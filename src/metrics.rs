use crate::catalog::VideoCatalog;
use crate::models::SortOption;

pub async fn init_metrics(catalog: &VideoCatalog) {
    // Catalog size gauge, set once at boot.
    match catalog.list_all(SortOption::Newest, None).await {
        Ok(videos) => {
            metrics::gauge!("vidshop_videos_total").set(videos.len() as f64);
            tracing::info!("Initialized metrics: Videos={}", videos.len());
        }
        Err(e) => tracing::warn!("Skipping catalog size gauge: {}", e),
    }
}

pub fn increment_video_views() {
    metrics::counter!("vidshop_video_views_total").increment(1);
}

pub fn increment_url_resolution_failed(kind: &str) {
    metrics::counter!("vidshop_url_resolution_failed_total", "kind" => kind.to_string())
        .increment(1);
}

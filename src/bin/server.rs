use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;

use vidshop_server::api;
use vidshop_server::backend::{http::HttpBackend, Backend};
use vidshop_server::catalog::VideoCatalog;
use vidshop_server::config::AppConfig;
use vidshop_server::schema::SchemaManager;
use vidshop_server::site::SiteConfigService;

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    vidshop_server::telemetry::init_telemetry("vidshop-server");

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    let config = AppConfig::from_env();
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config));

    // Bring the collections up to the declared attribute sets. Best-effort:
    // a partially provisioned backend completes on the next start.
    let schema = SchemaManager::new(backend.clone(), config.clone());
    schema.initialize_schema().await;

    let catalog = VideoCatalog::new(backend.clone(), config.clone());
    let site = SiteConfigService::new(backend, config.clone());

    // Initialize Metrics
    vidshop_server::metrics::init_metrics(&catalog).await;

    let app = app(
        catalog,
        site,
        schema,
        &config,
        prometheus_layer,
        metric_handle,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> &'static str {
    "OK"
}

fn app(
    catalog: VideoCatalog,
    site: SiteConfigService,
    schema: SchemaManager,
    config: &AppConfig,
    prometheus_layer: axum_prometheus::PrometheusMetricLayer<'static>,
    metric_handle: metrics_exporter_prometheus::PrometheusHandle,
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/videos", get(api::videos::list_videos))
        .route("/videos/:id", get(api::videos::get_video))
        .route("/videos/:id/url", get(api::videos::get_video_url))
        .route("/videos/:id/view", post(api::videos::record_view))
        .route("/site-config", get(api::site::get_site_config))
        .route("/admin/setup", post(api::site::run_setup))
        .layer(Extension(catalog))
        .layer(Extension(site))
        .layer(Extension(schema))
        .layer(prometheus_layer)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // Dynamic Span Name: "METHOD /path" (e.g., "GET /videos")
                    let span_name = if let Some(path) = matched_path {
                        format!("{} {}", request.method(), path)
                    } else {
                        format!("{} {}", request.method(), request.uri().path())
                    };

                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        // status and latency recorded on response
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));

                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(
                    config
                        .frontend_origin
                        .parse::<axum::http::HeaderValue>()
                        .expect("invalid FRONTEND_ORIGIN"),
                )
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        )
        .route("/metrics", get(|| async move { metric_handle.render() }))
}

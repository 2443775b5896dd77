use std::env;

/// Runtime configuration for the hosted backend and the storefront.
///
/// Everything comes from the environment (a `.env` file is loaded by the
/// server binary). Collection and bucket ids default to the names the setup
/// flow provisions, so a fresh deployment only needs the endpoint, project
/// and API key.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend_endpoint: String,
    pub backend_project: String,
    pub backend_api_key: String,
    pub database_id: String,
    pub videos_collection: String,
    pub site_config_collection: String,
    pub users_collection: String,
    pub sessions_collection: String,
    pub media_bucket: String,
    pub placeholder_thumbnail_url: String,
    pub frontend_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            backend_endpoint: env::var("BACKEND_ENDPOINT")
                .unwrap_or_else(|_| "https://cloud.appwrite.io/v1".to_string()),
            backend_project: env::var("BACKEND_PROJECT_ID").expect("BACKEND_PROJECT_ID must be set"),
            backend_api_key: env::var("BACKEND_API_KEY").expect("BACKEND_API_KEY must be set"),
            database_id: env::var("BACKEND_DATABASE_ID").unwrap_or_else(|_| "main".to_string()),
            videos_collection: env::var("VIDEOS_COLLECTION_ID")
                .unwrap_or_else(|_| "videos".to_string()),
            site_config_collection: env::var("SITE_CONFIG_COLLECTION_ID")
                .unwrap_or_else(|_| "site_config".to_string()),
            users_collection: env::var("USERS_COLLECTION_ID")
                .unwrap_or_else(|_| "users".to_string()),
            sessions_collection: env::var("SESSIONS_COLLECTION_ID")
                .unwrap_or_else(|_| "sessions".to_string()),
            media_bucket: env::var("MEDIA_BUCKET_ID").unwrap_or_else(|_| "media".to_string()),
            placeholder_thumbnail_url: env::var("PLACEHOLDER_THUMBNAIL_URL")
                .unwrap_or_else(|_| "https://placehold.co/480x270?text=Video".to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}

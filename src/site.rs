use std::sync::Arc;

use crate::backend::{Backend, BackendError};
use crate::config::AppConfig;
use crate::models::SiteConfig;

/// Read side of the storefront settings. The site-config collection holds a
/// single document; an empty collection yields the defaults.
#[derive(Clone)]
pub struct SiteConfigService {
    backend: Arc<dyn Backend>,
    config: AppConfig,
}

impl SiteConfigService {
    pub fn new(backend: Arc<dyn Backend>, config: AppConfig) -> Self {
        Self { backend, config }
    }

    pub async fn get(&self) -> Result<SiteConfig, BackendError> {
        let documents = self
            .backend
            .list_documents(&self.config.site_config_collection, 1)
            .await?;
        Ok(documents
            .first()
            .map(SiteConfig::from_document)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{test_config, MockBackend};
    use serde_json::json;

    #[tokio::test]
    async fn empty_collection_yields_defaults() {
        let backend = Arc::new(MockBackend::new());
        let service = SiteConfigService::new(backend, test_config());

        let config = service.get().await.unwrap();
        assert_eq!(config.site_name, "VidShop");
    }

    #[tokio::test]
    async fn reads_the_stored_document() {
        let backend = Arc::new(MockBackend::new());
        backend.insert_document(
            "site_config",
            "cfg",
            json!({ "site_name": "Clips & Co", "telegram_username": "clipsco" }),
        );
        let service = SiteConfigService::new(backend, test_config());

        let config = service.get().await.unwrap();
        assert_eq!(config.site_name, "Clips & Co");
        assert_eq!(config.telegram_username.as_deref(), Some("clipsco"));
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_collection("site_config");
        let service = SiteConfigService::new(backend, test_config());

        assert!(service.get().await.is_err());
    }
}

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::backend::{Backend, BackendError};
use crate::config::AppConfig;

pub mod fields;

use fields::FieldSpec;

/// Time to let the backend finish activating a freshly created attribute
/// before the next schema call touches the collection.
const ATTRIBUTE_ACTIVATION_DELAY: Duration = Duration::from_secs(1);

/// Brings the four collections' attribute sets up to the declared superset.
///
/// Provisioning is best-effort: a collection that fails to reconcile is
/// logged and picked up again on the next run. Nothing is ever altered or
/// removed, so re-running against a fully provisioned backend is a no-op.
#[derive(Clone)]
pub struct SchemaManager {
    backend: Arc<dyn Backend>,
    config: AppConfig,
    activation_delay: Duration,
}

impl SchemaManager {
    pub fn new(backend: Arc<dyn Backend>, config: AppConfig) -> Self {
        Self {
            backend,
            config,
            activation_delay: ATTRIBUTE_ACTIVATION_DELAY,
        }
    }

    pub fn with_activation_delay(mut self, delay: Duration) -> Self {
        self.activation_delay = delay;
        self
    }

    /// Reconciles all four collections concurrently and waits for every one
    /// of them. Individual collection failures are logged here and never
    /// bubble up; partially provisioned collections complete on the next run.
    pub async fn initialize_schema(&self) {
        let jobs = vec![
            (self.config.videos_collection.clone(), fields::video_fields()),
            (
                self.config.site_config_collection.clone(),
                fields::site_config_fields(),
            ),
            (self.config.users_collection.clone(), fields::user_fields()),
            (
                self.config.sessions_collection.clone(),
                fields::session_fields(),
            ),
        ];

        join_all(jobs.into_iter().map(|(collection, specs)| async move {
            if let Err(e) = self.ensure_collection_fields(&collection, &specs).await {
                tracing::error!("Schema provisioning failed for {}: {}", collection, e);
            }
        }))
        .await;
    }

    async fn ensure_collection_fields(
        &self,
        collection_id: &str,
        required: &[FieldSpec],
    ) -> Result<(), BackendError> {
        let existing = self.backend.list_attributes(collection_id).await?;
        let existing_keys: HashSet<&str> = existing.iter().map(|a| a.key.as_str()).collect();

        let mut created = 0usize;
        for spec in required {
            if existing_keys.contains(spec.key) {
                continue;
            }
            self.backend.create_attribute(collection_id, spec).await?;
            created += 1;
            tracing::info!("Created attribute {} on {}", spec.key, collection_id);
            // The backend activates attributes asynchronously; give it a
            // moment before the next call depends on this one.
            tokio::time::sleep(self.activation_delay).await;
        }

        if created > 0 {
            tracing::info!(
                "Provisioned {} attribute(s) on {}",
                created,
                collection_id
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{test_config, MockBackend};

    fn manager(backend: Arc<MockBackend>) -> SchemaManager {
        SchemaManager::new(backend, test_config()).with_activation_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn provisions_all_declared_attributes() {
        let backend = Arc::new(MockBackend::new());
        manager(backend.clone()).initialize_schema().await;

        let video_keys = backend.attribute_keys("videos");
        for key in [
            "title",
            "description",
            "price",
            "duration",
            "video_file_id",
            "thumbnail_file_id",
            "created_at",
            "is_active",
            "views",
            "product_link",
        ] {
            assert!(video_keys.contains(&key.to_string()), "missing {}", key);
        }
        assert_eq!(backend.attribute_keys("users").len(), 4);
        assert_eq!(backend.attribute_keys("sessions").len(), 6);
        assert_eq!(backend.attribute_keys("site_config").len(), 13);
    }

    #[tokio::test]
    async fn reprovisioning_issues_zero_creates() {
        let backend = Arc::new(MockBackend::new());
        let schema = manager(backend.clone());

        schema.initialize_schema().await;
        let after_first = backend.create_calls();
        assert!(after_first > 0);

        schema.initialize_schema().await;
        assert_eq!(backend.create_calls(), after_first);
    }

    #[tokio::test]
    async fn only_missing_attributes_are_created() {
        let backend = Arc::new(MockBackend::new());
        backend.seed_attribute("users", "email");
        backend.seed_attribute("users", "name");

        manager(backend.clone())
            .ensure_collection_fields("users", &fields::user_fields())
            .await
            .unwrap();

        assert_eq!(backend.create_calls(), 2);
        assert_eq!(backend.attribute_keys("users").len(), 4);
    }

    #[tokio::test]
    async fn one_failing_collection_does_not_stop_the_rest() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_collection("videos");

        manager(backend.clone()).initialize_schema().await;

        assert!(backend.attribute_keys("videos").is_empty());
        assert_eq!(backend.attribute_keys("users").len(), 4);
        assert_eq!(backend.attribute_keys("sessions").len(), 6);
    }
}

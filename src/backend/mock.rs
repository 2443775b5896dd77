//! In-memory `Backend` used by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::AppConfig;
use crate::schema::fields::FieldSpec;

use super::{AttributeInfo, Backend, BackendError, Document};

#[derive(Default)]
struct MockState {
    attributes: HashMap<String, Vec<AttributeInfo>>,
    documents: HashMap<String, Vec<Document>>,
    files: HashSet<String>,
    create_calls: usize,
    failing_collections: HashSet<String>,
    fail_files: bool,
    // When set, get_document serves reads from this snapshot while writes
    // keep landing in `documents`, simulating worst-case read staleness.
    read_snapshot: Option<HashMap<String, Vec<Document>>>,
}

#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        backend_endpoint: "https://backend.test/v1".to_string(),
        backend_project: "test-project".to_string(),
        backend_api_key: "test-key".to_string(),
        database_id: "main".to_string(),
        videos_collection: "videos".to_string(),
        site_config_collection: "site_config".to_string(),
        users_collection: "users".to_string(),
        sessions_collection: "sessions".to_string(),
        media_bucket: "media".to_string(),
        placeholder_thumbnail_url: "https://placehold.co/480x270?text=Video".to_string(),
        frontend_origin: "http://localhost:3000".to_string(),
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_document(&self, collection: &str, id: &str, data: Value) {
        let mut state = self.state.lock().unwrap();
        state
            .documents
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.to_string(),
                created_at: None,
                data,
            });
    }

    pub fn seed_attribute(&self, collection: &str, key: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .attributes
            .entry(collection.to_string())
            .or_default()
            .push(AttributeInfo {
                key: key.to_string(),
                kind: "string".to_string(),
            });
    }

    pub fn add_file(&self, file_id: &str) {
        self.state.lock().unwrap().files.insert(file_id.to_string());
    }

    pub fn fail_collection(&self, collection: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_collections
            .insert(collection.to_string());
    }

    pub fn fail_files(&self) {
        self.state.lock().unwrap().fail_files = true;
    }

    pub fn freeze_reads(&self) {
        let mut state = self.state.lock().unwrap();
        state.read_snapshot = Some(state.documents.clone());
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn attribute_keys(&self, collection: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .attributes
            .get(collection)
            .map(|attrs| attrs.iter().map(|a| a.key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn document_data(&self, collection: &str, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .documents
            .get(collection)?
            .iter()
            .find(|doc| doc.id == id)
            .map(|doc| doc.data.clone())
    }

    fn check_collection(state: &MockState, collection: &str) -> Result<(), BackendError> {
        if state.failing_collections.contains(collection) {
            return Err(BackendError::Api {
                status: 500,
                message: format!("collection {} is unavailable", collection),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_attributes(
        &self,
        collection_id: &str,
    ) -> Result<Vec<AttributeInfo>, BackendError> {
        let state = self.state.lock().unwrap();
        Self::check_collection(&state, collection_id)?;
        Ok(state
            .attributes
            .get(collection_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_attribute(
        &self,
        collection_id: &str,
        spec: &FieldSpec,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        Self::check_collection(&state, collection_id)?;
        state.create_calls += 1;
        state
            .attributes
            .entry(collection_id.to_string())
            .or_default()
            .push(AttributeInfo {
                key: spec.key.to_string(),
                kind: spec.kind.endpoint_segment().to_string(),
            });
        Ok(())
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        _limit: u32,
    ) -> Result<Vec<Document>, BackendError> {
        let state = self.state.lock().unwrap();
        Self::check_collection(&state, collection_id)?;
        Ok(state
            .documents
            .get(collection_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_document(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Document, BackendError> {
        let state = self.state.lock().unwrap();
        Self::check_collection(&state, collection_id)?;
        let source = state
            .read_snapshot
            .as_ref()
            .unwrap_or(&state.documents);
        source
            .get(collection_id)
            .and_then(|docs| docs.iter().find(|doc| doc.id == document_id))
            .cloned()
            .ok_or_else(|| BackendError::NotFound {
                collection: collection_id.to_string(),
                id: document_id.to_string(),
            })
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document, BackendError> {
        let mut state = self.state.lock().unwrap();
        Self::check_collection(&state, collection_id)?;
        let doc = state
            .documents
            .get_mut(collection_id)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == document_id))
            .ok_or_else(|| BackendError::NotFound {
                collection: collection_id.to_string(),
                id: document_id.to_string(),
            })?;
        if let (Some(updates), Some(fields)) = (data.as_object(), doc.data.as_object_mut()) {
            for (key, value) in updates {
                fields.insert(key.clone(), value.clone());
            }
        }
        Ok(doc.clone())
    }

    async fn get_file_view_url(
        &self,
        bucket_id: &str,
        file_id: &str,
    ) -> Result<String, BackendError> {
        let state = self.state.lock().unwrap();
        if state.fail_files {
            return Err(BackendError::Api {
                status: 500,
                message: "storage is unavailable".to_string(),
            });
        }
        if !state.files.contains(file_id) {
            return Err(BackendError::NotFound {
                collection: bucket_id.to_string(),
                id: file_id.to_string(),
            });
        }
        Ok(format!(
            "https://backend.test/v1/storage/buckets/{}/files/{}/view?project=test-project",
            bucket_id, file_id
        ))
    }
}

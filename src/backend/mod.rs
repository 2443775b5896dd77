use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::schema::fields::FieldSpec;

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("unexpected backend response: {0}")]
    InvalidResponse(String),
}

/// A raw document as stored in the hosted backend. `data` keeps the full
/// attribute map untyped; shaping into display types happens in `models`.
#[derive(Clone, Debug)]
pub struct Document {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub data: Value,
}

impl Document {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// One attribute as reported by the backend's schema introspection.
#[derive(Clone, Debug)]
pub struct AttributeInfo {
    pub key: String,
    pub kind: String,
}

/// The capability surface this service consumes from the hosted backend:
/// schema introspection and attribute creation, document CRUD, and public
/// view-URL resolution for files in the object store. Every call is a single
/// attempt; retries and timeouts are left to the transport.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_attributes(&self, collection_id: &str)
        -> Result<Vec<AttributeInfo>, BackendError>;

    async fn create_attribute(
        &self,
        collection_id: &str,
        spec: &FieldSpec,
    ) -> Result<(), BackendError>;

    async fn list_documents(
        &self,
        collection_id: &str,
        limit: u32,
    ) -> Result<Vec<Document>, BackendError>;

    async fn get_document(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Document, BackendError>;

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document, BackendError>;

    async fn get_file_view_url(
        &self,
        bucket_id: &str,
        file_id: &str,
    ) -> Result<String, BackendError>;
}

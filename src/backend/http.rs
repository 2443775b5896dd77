use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::schema::fields::{FieldKind, FieldSpec};

use super::{AttributeInfo, Backend, BackendError, Document};

/// Client for the hosted backend's REST surface. All database and object
/// store calls go through the same endpoint, authenticated with the project
/// id and a server-side API key.
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    project: String,
    api_key: String,
    database_id: String,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.backend_endpoint.trim_end_matches('/').to_string(),
            project: config.backend_project.clone(),
            api_key: config.backend_api_key.clone(),
            database_id: config.database_id.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.endpoint, path))
            .header("X-Appwrite-Project", &self.project)
            .header("X-Appwrite-Key", &self.api_key)
    }

    fn collection_path(&self, collection_id: &str) -> String {
        format!(
            "/databases/{}/collections/{}",
            self.database_id, collection_id
        )
    }

    async fn check(&self, res: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let message = res
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn parse_document(value: Value) -> Result<Document, BackendError> {
    let id = value
        .get("$id")
        .and_then(Value::as_str)
        .ok_or_else(|| BackendError::InvalidResponse("document missing $id".to_string()))?
        .to_string();
    let created_at = value
        .get("$createdAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    Ok(Document {
        id,
        created_at,
        data: value,
    })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_attributes(
        &self,
        collection_id: &str,
    ) -> Result<Vec<AttributeInfo>, BackendError> {
        let path = format!("{}/attributes", self.collection_path(collection_id));
        let res = self.request(Method::GET, &path).send().await?;
        let value: Value = self.check(res).await?.json().await?;

        let attributes = value
            .get("attributes")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                BackendError::InvalidResponse("missing attributes array".to_string())
            })?;

        Ok(attributes
            .iter()
            .filter_map(|attr| {
                let key = attr.get("key").and_then(Value::as_str)?;
                let kind = attr.get("type").and_then(Value::as_str).unwrap_or("");
                Some(AttributeInfo {
                    key: key.to_string(),
                    kind: kind.to_string(),
                })
            })
            .collect())
    }

    async fn create_attribute(
        &self,
        collection_id: &str,
        spec: &FieldSpec,
    ) -> Result<(), BackendError> {
        let path = format!(
            "{}/attributes/{}",
            self.collection_path(collection_id),
            spec.kind.endpoint_segment()
        );

        let mut body = serde_json::Map::new();
        body.insert("key".to_string(), json!(spec.key));
        body.insert("required".to_string(), json!(spec.required));
        match &spec.kind {
            FieldKind::String { size, array } => {
                body.insert("size".to_string(), json!(size));
                if *array {
                    body.insert("array".to_string(), json!(true));
                }
            }
            FieldKind::Integer | FieldKind::Float => {
                if let Some(min) = spec.min {
                    body.insert("min".to_string(), json!(min));
                }
                if let Some(max) = spec.max {
                    body.insert("max".to_string(), json!(max));
                }
            }
            FieldKind::Boolean | FieldKind::Datetime => {}
        }
        if let Some(default) = &spec.default {
            body.insert("default".to_string(), default.clone());
        }

        let res = self
            .request(Method::POST, &path)
            .json(&Value::Object(body))
            .send()
            .await?;
        self.check(res).await?;
        Ok(())
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        limit: u32,
    ) -> Result<Vec<Document>, BackendError> {
        let path = format!("{}/documents", self.collection_path(collection_id));
        let res = self
            .request(Method::GET, &path)
            .query(&[("queries[]", format!("limit({})", limit))])
            .send()
            .await?;
        let value: Value = self.check(res).await?.json().await?;

        let documents = value
            .get("documents")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                BackendError::InvalidResponse("missing documents array".to_string())
            })?;

        documents.iter().cloned().map(parse_document).collect()
    }

    async fn get_document(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Document, BackendError> {
        let path = format!(
            "{}/documents/{}",
            self.collection_path(collection_id),
            document_id
        );
        let res = self.request(Method::GET, &path).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                collection: collection_id.to_string(),
                id: document_id.to_string(),
            });
        }
        let value: Value = self.check(res).await?.json().await?;
        parse_document(value)
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document, BackendError> {
        let path = format!(
            "{}/documents/{}",
            self.collection_path(collection_id),
            document_id
        );
        let res = self
            .request(Method::PATCH, &path)
            .json(&json!({ "data": data }))
            .send()
            .await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                collection: collection_id.to_string(),
                id: document_id.to_string(),
            });
        }
        let value: Value = self.check(res).await?.json().await?;
        parse_document(value)
    }

    async fn get_file_view_url(
        &self,
        bucket_id: &str,
        file_id: &str,
    ) -> Result<String, BackendError> {
        // Confirm the file exists before handing out a view URL; dangling
        // references surface as NotFound here.
        let path = format!("/storage/buckets/{}/files/{}", bucket_id, file_id);
        let res = self.request(Method::GET, &path).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                collection: bucket_id.to_string(),
                id: file_id.to_string(),
            });
        }
        self.check(res).await?;

        Ok(format!(
            "{}/storage/buckets/{}/files/{}/view?project={}",
            self.endpoint, bucket_id, file_id, self.project
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_document_envelope() {
        let doc = parse_document(json!({
            "$id": "abc123",
            "$createdAt": "2026-03-01T10:00:00.000+00:00",
            "title": "Intro"
        }))
        .unwrap();

        assert_eq!(doc.id, "abc123");
        assert!(doc.created_at.is_some());
        assert_eq!(doc.field("title").and_then(Value::as_str), Some("Intro"));
    }

    #[test]
    fn rejects_document_without_id() {
        assert!(parse_document(json!({ "title": "Intro" })).is_err());
    }
}

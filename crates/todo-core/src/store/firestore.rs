//! Firestore REST (v1) implementation of `RemoteStore`.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{CreatedDocument, RemoteStore};
use crate::config::RemoteEndpoint;
use crate::models::{TodoDocument, TodoId, TodoPatch};
use crate::util::compact_text;
use crate::{Error, Result};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const LIST_PAGE_SIZE: &str = "300";
const CREATED_AT_FIELD: &str = "createdAt";
// Older documents carry their creation time under this name.
const LEGACY_CREATED_AT_FIELD: &str = "timestamp";

/// Firestore-backed document store
#[derive(Clone)]
pub struct FirestoreStore {
    project_id: String,
    api_key: String,
    id_token: Option<String>,
    client: Client,
}

impl FirestoreStore {
    pub fn new(endpoint: &RemoteEndpoint) -> Result<Self> {
        Ok(Self {
            project_id: endpoint.project_id.clone(),
            api_key: endpoint.api_key.clone(),
            id_token: None,
            client: Client::builder().build()?,
        })
    }

    /// Attach the signed-in user's ID token to every request.
    #[must_use]
    pub fn with_id_token(mut self, id_token: Option<String>) -> Self {
        self.id_token = id_token;
        self
    }

    fn documents_root(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn document_name(&self, collection: &str, id: &TodoId) -> String {
        format!("{}/{collection}/{id}", self.documents_root())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.query(&[("key", self.api_key.as_str())]);
        match &self.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Remote(parse_api_error(status, &body)))
    }
}

impl RemoteStore for FirestoreStore {
    async fn create(&self, collection: &str, document: &TodoDocument) -> Result<CreatedDocument> {
        let id = TodoId::generate();
        let payload = json!({
            "writes": [{
                "update": {
                    "name": self.document_name(collection, &id),
                    "fields": encode_document(document),
                },
                "updateTransforms": [{
                    "fieldPath": CREATED_AT_FIELD,
                    "setToServerValue": "REQUEST_TIME",
                }],
                "currentDocument": { "exists": false },
            }],
        });

        tracing::debug!(%collection, %id, "creating document");
        let url = format!("{FIRESTORE_BASE_URL}/{}:commit", self.documents_root());
        let response = self.send(self.client.post(url).json(&payload)).await?;
        let commit = response.json::<CommitResponse>().await?;

        Ok(CreatedDocument {
            id,
            created_at: commit.server_timestamp(),
        })
    }

    async fn update(&self, collection: &str, id: &TodoId, patch: &TodoPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mask: Vec<(&str, &str)> = patch
            .field_paths()
            .into_iter()
            .map(|path| ("updateMask.fieldPaths", path))
            .collect();
        let payload = json!({ "fields": encode_patch(patch) });

        tracing::debug!(%collection, %id, fields = ?patch.field_paths(), "updating document");
        let url = format!("{FIRESTORE_BASE_URL}/{}", self.document_name(collection, id));
        let request = self
            .client
            .patch(url)
            .query(&mask)
            .query(&[("currentDocument.exists", "true")])
            .json(&payload);
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &TodoId) -> Result<()> {
        tracing::debug!(%collection, %id, "deleting document");
        let url = format!("{FIRESTORE_BASE_URL}/{}", self.document_name(collection, id));
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<(TodoId, TodoDocument)>> {
        let url = format!("{FIRESTORE_BASE_URL}/{}/{collection}", self.documents_root());
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", LIST_PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page = self.send(request).await?.json::<ListResponse>().await?;
            for raw in page.documents {
                match decode_document(raw) {
                    Ok(entry) => documents.push(entry),
                    Err(error) => tracing::warn!("Skipping malformed todo document: {}", error),
                }
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(%collection, count = documents.len(), "listed documents");
        Ok(documents)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    create_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    write_results: Vec<WriteResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteResult {
    #[serde(default)]
    transform_results: Vec<Value>,
}

impl CommitResponse {
    fn server_timestamp(&self) -> Option<DateTime<Utc>> {
        self.write_results
            .first()?
            .transform_results
            .first()
            .and_then(decode_timestamp)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
    status: Option<String>,
}

fn encode_timestamp(value: Option<DateTime<Utc>>) -> Value {
    match value {
        Some(timestamp) => {
            json!({ "timestampValue": timestamp.to_rfc3339_opts(SecondsFormat::Millis, true) })
        }
        None => json!({ "nullValue": null }),
    }
}

fn encode_document(document: &TodoDocument) -> Value {
    json!({
        "text": { "stringValue": document.text },
        "done": { "booleanValue": document.done },
        "reminder": encode_timestamp(document.reminder),
    })
}

fn encode_patch(patch: &TodoPatch) -> Value {
    let mut fields = Map::new();
    if let Some(text) = &patch.text {
        fields.insert("text".to_string(), json!({ "stringValue": text }));
    }
    if let Some(done) = patch.done {
        fields.insert("done".to_string(), json!({ "booleanValue": done }));
    }
    if let Some(reminder) = patch.reminder {
        fields.insert("reminder".to_string(), encode_timestamp(reminder));
    }
    Value::Object(fields)
}

fn decode_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.get("timestampValue")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

fn decode_document(raw: RawDocument) -> Result<(TodoId, TodoDocument)> {
    let id: TodoId = raw
        .name
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .parse()?;

    let text = raw
        .fields
        .get("text")
        .and_then(|value| value.get("stringValue"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Remote(format!("document {id} has no text field")))?
        .to_string();
    let done = raw
        .fields
        .get("done")
        .and_then(|value| value.get("booleanValue"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let reminder = raw.fields.get("reminder").and_then(decode_timestamp);
    let created_at = raw
        .fields
        .get(CREATED_AT_FIELD)
        .or_else(|| raw.fields.get(LEGACY_CREATED_AT_FIELD))
        .and_then(decode_timestamp)
        .or_else(|| {
            raw.create_time
                .as_deref()
                .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
                .map(|timestamp| timestamp.with_timezone(&Utc))
        });

    Ok((
        id,
        TodoDocument {
            text,
            done,
            reminder,
            created_at,
        },
    ))
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(ApiErrorBody {
        error: Some(detail),
    }) = serde_json::from_str::<ApiErrorBody>(body)
    {
        if let Some(message) = detail.message.or(detail.status) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

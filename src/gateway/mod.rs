//! # Persistence Gateway
//!
//! Remote CRUD surface the session persists through. The trait keeps the
//! session decoupled from the transport so tests inject an in-memory
//! implementation; the real one speaks the backend's REST API.
//!
//! Every failure carries a human-readable message. An [`GatewayError::Unauthorized`]
//! failure is distinguished because it forces a session reset.

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collection::node::{Collection, Folder, Method, NodeId, Request};

pub use http::{AuthSession, AuthUser, HttpGateway};
pub use mock::MockGateway;

/// Failures surfaced by a gateway call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The session token is missing, expired, or rejected. Callers must
    /// reset local state and re-authenticate; this is never retried.
    #[error("session expired, please log in again")]
    Unauthorized,
    /// The server processed the call and refused it; the message is the
    /// server's own.
    #[error("{0}")]
    Api(String),
    /// The call never produced a server answer (connection, DNS, TLS, …).
    #[error("request failed: {0}")]
    Transport(String),
}

/// Summary row of a collection, as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Fields of a collection-level update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionUpdate {
    pub name: String,
    pub description: String,
}

/// Payload for creating a folder. `position` is carried for the wire
/// contract but ordering is array order; the core always sends 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderCreate {
    pub id: String,
    pub collection_id: String,
    pub parent_folder_id: Option<String>,
    pub name: String,
    pub description: String,
    pub position: i64,
}

impl FolderCreate {
    pub fn from_folder(collection_id: &str, parent: Option<&NodeId>, folder: &Folder) -> Self {
        Self {
            id: folder.id.to_string(),
            collection_id: collection_id.to_string(),
            parent_folder_id: parent.map(ToString::to_string),
            name: folder.name.clone(),
            description: folder.description.clone(),
            position: 0,
        }
    }
}

/// Fields of a folder update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderUpdate {
    pub name: String,
    pub description: String,
    pub position: i64,
}

impl FolderUpdate {
    pub fn from_folder(folder: &Folder) -> Self {
        Self {
            name: folder.name.clone(),
            description: folder.description.clone(),
            position: 0,
        }
    }
}

/// Payload for creating a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCreate {
    pub id: String,
    pub collection_id: String,
    pub folder_id: Option<String>,
    pub name: String,
    pub method: Method,
    pub url: String,
    pub body: String,
    #[serde(rename = "responseExample")]
    pub response_example: String,
    pub notes: String,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
    pub position: i64,
}

impl RequestCreate {
    pub fn from_request(collection_id: &str, parent: Option<&NodeId>, request: &Request) -> Self {
        Self {
            id: request.id.to_string(),
            collection_id: collection_id.to_string(),
            folder_id: parent.map(ToString::to_string),
            name: request.name.clone(),
            method: request.method,
            url: request.url.clone(),
            body: request.body.clone(),
            response_example: request.response_example.clone(),
            notes: request.notes.clone(),
            is_complete: request.is_complete,
            position: 0,
        }
    }
}

/// Fields of a request update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestUpdate {
    pub name: String,
    pub method: Method,
    pub url: String,
    pub body: String,
    #[serde(rename = "responseExample")]
    pub response_example: String,
    pub notes: String,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
    pub position: i64,
}

impl RequestUpdate {
    pub fn from_request(request: &Request) -> Self {
        Self {
            name: request.name.clone(),
            method: request.method,
            url: request.url.clone(),
            body: request.body.clone(),
            response_example: request.response_example.clone(),
            notes: request.notes.clone(),
            is_complete: request.is_complete,
            position: 0,
        }
    }
}

/// Remote CRUD operations, keyed by node id.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<CollectionInfo>, GatewayError>;
    async fn create_collection(&self, info: &CollectionInfo) -> Result<(), GatewayError>;
    async fn get_collection(&self, id: &str) -> Result<Collection, GatewayError>;
    async fn update_collection(&self, id: &str, update: &CollectionUpdate)
        -> Result<(), GatewayError>;
    async fn delete_collection(&self, id: &str) -> Result<(), GatewayError>;

    async fn create_folder(&self, folder: &FolderCreate) -> Result<(), GatewayError>;
    async fn update_folder(&self, id: &str, update: &FolderUpdate) -> Result<(), GatewayError>;
    async fn delete_folder(&self, id: &str) -> Result<(), GatewayError>;

    async fn create_request(&self, request: &RequestCreate) -> Result<(), GatewayError>;
    async fn update_request(&self, id: &str, update: &RequestUpdate) -> Result<(), GatewayError>;
    async fn delete_request(&self, id: &str) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_payloads_should_use_wire_field_names() {
        let request = Request::new("Login");
        let payload = RequestCreate::from_request("c1", None, &request);
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("responseExample").is_some());
        assert!(json.get("isComplete").is_some());
        assert_eq!(json["position"], 0);
        assert_eq!(json["method"], "GET");
        assert_eq!(json["folder_id"], serde_json::Value::Null);
    }

    #[test]
    fn folder_payload_should_carry_parent_linkage() {
        let folder = Folder::new("Group");
        let parent = NodeId::from("f0");
        let payload = FolderCreate::from_folder("c1", Some(&parent), &folder);

        assert_eq!(payload.parent_folder_id.as_deref(), Some("f0"));
        assert_eq!(payload.collection_id, "c1");
        assert_eq!(payload.position, 0);
    }
}

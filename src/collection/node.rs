//! # Collection Data Model
//!
//! Canonical tree model for an API collection: a root [`Collection`]
//! containing an ordered forest of [`Node`]s, where each node is either a
//! folder (with children) or a request (a documented endpoint).
//!
//! The serialized shape keeps the wire field names used by the persistence
//! backend (`responseExample`, `isComplete`, a lowercase `type` tag), so a
//! canonical tree round-trips through the gateway unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a node or collection, unique across the whole tree.
///
/// Generated once at creation and immutable afterwards. Uniqueness is an
/// invariant the tree operations rely on; it is never repaired after the
/// fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP method of a documented request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// Parse a method string leniently, falling back to `GET` for anything
    /// unrecognized (imported payloads are not trusted to be well-formed).
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            _ => Self::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::Get
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A folder node: named grouping with an ordered list of children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<Node>,
}

impl Folder {
    /// Create an empty folder with a fresh id and default fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            name: name.into(),
            description: String::new(),
            items: Vec::new(),
        }
    }
}

/// A request node: one documented endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, rename = "responseExample")]
    pub response_example: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, rename = "isComplete")]
    pub is_complete: bool,
}

impl Request {
    /// Create a request with a fresh id and default fields (`GET`, empty
    /// url/body/notes, incomplete).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            name: name.into(),
            method: Method::Get,
            url: String::new(),
            body: String::new(),
            response_example: String::new(),
            notes: String::new(),
            is_complete: false,
        }
    }
}

/// A node in the collection tree.
///
/// The `type` tag ("folder" / "request") is the discriminant used on the
/// wire; in memory the enum is the discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(Folder),
    Request(Request),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::Request(request) => &request.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::Request(request) => &request.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Children of a folder node; `None` for requests.
    pub fn items(&self) -> Option<&[Node]> {
        match self {
            Self::Folder(folder) => Some(&folder.items),
            Self::Request(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Request(_) => None,
        }
    }

    pub fn as_request(&self) -> Option<&Request> {
        match self {
            Self::Request(request) => Some(request),
            Self::Folder(_) => None,
        }
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<Request> for Node {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

/// The root container of a collection tree.
///
/// Not itself a [`Node`] (it carries no `type` discriminant), but it walks
/// like a folder: all tree operations start from its `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<Node>,
}

impl Collection {
    /// Create an empty collection with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate().to_string(),
            name: name.into(),
            description: String::new(),
            items: Vec::new(),
        }
    }

    /// The built-in workspace shown before anything is loaded, and the
    /// fallback after a session reset.
    pub fn starter() -> Self {
        Self {
            id: "default-collection".to_string(),
            name: "Bluebook".to_string(),
            description: "API collection workspace for precision endpoint documentation."
                .to_string(),
            items: Vec::new(),
        }
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::starter()
    }
}

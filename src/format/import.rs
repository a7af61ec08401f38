//! # Import Normalization
//!
//! Turns an arbitrary JSON payload into a canonical [`Collection`].
//! Classification attempts each known schema in a fixed precedence order:
//! Postman (an `info` object plus an `item` array), then the legacy native
//! shape (top-level `items` array), then the newer native shape (top-level
//! `endpoints` array). Anything else is rejected as an unrecognized format.
//!
//! Postman entries get fresh ids (the source ids are discarded); native
//! payloads are trusted as already canonical-shaped nodes, with field-name
//! leniency so a previously exported file reads back in.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::collection::node::{Collection, Folder, Method, Node, NodeId, Request};

/// Failures while reading an import payload. Both variants leave the
/// caller's state untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("error parsing JSON file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid format: not a recognized Postman or bluebook collection file")]
    UnrecognizedShape,
}

/// Which known schema a payload matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// Postman collection export (`info` + `item`).
    Postman,
    /// Legacy native shape (top-level `items`).
    LegacyItems,
    /// Newer native shape (top-level `endpoints`, as produced by export).
    LegacyEndpoints,
}

/// A classified, normalized import payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDocument {
    pub format: ImportFormat,
    pub collection: Collection,
}

/// Classify and normalize a raw JSON payload.
pub fn parse(payload: &str) -> Result<ImportDocument, ImportError> {
    let value: Value = serde_json::from_str(payload)?;

    if value.get("info").is_some_and(Value::is_object) && value.get("item").is_some_and(Value::is_array)
    {
        let file: PostmanFile = serde_json::from_value(value)?;
        return Ok(ImportDocument {
            format: ImportFormat::Postman,
            collection: convert_postman(file),
        });
    }

    if value.get("items").is_some_and(Value::is_array) {
        return normalize_native(value, "items", ImportFormat::LegacyItems);
    }
    if value.get("endpoints").is_some_and(Value::is_array) {
        return normalize_native(value, "endpoints", ImportFormat::LegacyEndpoints);
    }

    Err(ImportError::UnrecognizedShape)
}

// ── Postman ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PostmanFile {
    info: PostmanInfo,
    item: Vec<PostmanEntry>,
}

#[derive(Debug, Deserialize)]
struct PostmanInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PostmanEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    item: Option<Vec<PostmanEntry>>,
    #[serde(default)]
    request: Option<PostmanRequest>,
}

#[derive(Debug, Deserialize)]
struct PostmanRequest {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    url: Option<Value>,
    #[serde(default)]
    body: Option<PostmanBody>,
}

#[derive(Debug, Deserialize)]
struct PostmanBody {
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    formdata: Option<Value>,
    #[serde(default)]
    urlencoded: Option<Value>,
}

/// Postman descriptions are either a plain string or `{ "content": ... }`.
fn description_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Object(map)) => map
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn convert_postman(file: PostmanFile) -> Collection {
    let mut collection = Collection::new(
        file.info
            .name
            .unwrap_or_else(|| "Imported Postman Collection".to_string()),
    );
    collection.description = description_text(file.info.description.as_ref());
    collection.items = file
        .item
        .into_iter()
        .filter_map(convert_postman_entry)
        .collect();
    collection
}

/// Folder if the entry carries a nested `item` array, request if it carries
/// a `request` object; anything else is dropped.
fn convert_postman_entry(entry: PostmanEntry) -> Option<Node> {
    if let Some(children) = entry.item {
        let folder = Folder {
            id: NodeId::generate(),
            name: entry.name.unwrap_or_else(|| "Unnamed Folder".to_string()),
            description: description_text(entry.description.as_ref()),
            items: children.into_iter().filter_map(convert_postman_entry).collect(),
        };
        return Some(Node::Folder(folder));
    }

    let request = entry.request?;
    let url = match request.url {
        Some(Value::String(raw)) => raw,
        Some(Value::Object(map)) => map
            .get("raw")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };
    let body = request.body.map(postman_body_text).unwrap_or_default();

    Some(Node::Request(Request {
        id: NodeId::generate(),
        name: entry.name.unwrap_or_else(|| "Unnamed Request".to_string()),
        method: request
            .method
            .as_deref()
            .map(Method::from_str_loose)
            .unwrap_or_default(),
        url,
        body,
        response_example: String::new(),
        notes: description_text(entry.description.as_ref()),
        is_complete: false,
    }))
}

/// `raw` wins, then pretty-printed `formdata`, then pretty-printed
/// `urlencoded`, then empty.
fn postman_body_text(body: PostmanBody) -> String {
    if let Some(raw) = body.raw {
        return raw;
    }
    body.formdata
        .or(body.urlencoded)
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_default()
}

// ── Native shapes ───────────────────────────────────────────────────

/// Lenient node shape for native payloads: accepts the canonical wire names
/// plus the names the export transform writes (`API`, `example_requests`,
/// `example_response`), so an exported file re-imports.
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "API")]
    items: Option<Vec<RawNode>>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, alias = "example_requests")]
    body: Option<String>,
    #[serde(
        default,
        rename = "responseExample",
        alias = "response_example",
        alias = "example_response"
    )]
    response_example: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default, rename = "isComplete", alias = "is_complete")]
    is_complete: Option<bool>,
}

/// A raw node is a folder when it has a child list or an explicit folder
/// tag; everything else becomes a request. Ids are kept where present and
/// generated where absent.
fn normalize_node(raw: RawNode) -> Node {
    let id = raw.id.map(NodeId::from).unwrap_or_else(NodeId::generate);
    let is_folder = raw.items.is_some() || raw.kind.as_deref() == Some("folder");

    if is_folder {
        Node::Folder(Folder {
            id,
            name: raw.name.unwrap_or_else(|| "Unnamed Folder".to_string()),
            description: raw.description.unwrap_or_default(),
            items: raw
                .items
                .unwrap_or_default()
                .into_iter()
                .map(normalize_node)
                .collect(),
        })
    } else {
        Node::Request(Request {
            id,
            name: raw.name.unwrap_or_else(|| "Unnamed Request".to_string()),
            method: raw
                .method
                .as_deref()
                .map(Method::from_str_loose)
                .unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            body: raw.body.unwrap_or_default(),
            response_example: raw.response_example.unwrap_or_default(),
            notes: raw.notes.unwrap_or_default(),
            is_complete: raw.is_complete.unwrap_or(false),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct NativeInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn normalize_native(
    mut value: Value,
    items_key: &str,
    format: ImportFormat,
) -> Result<ImportDocument, ImportError> {
    let raw_items: Vec<RawNode> = serde_json::from_value(value[items_key].take())?;

    // Naming metadata may be wrapped under either key; `api_info` wins.
    let info: NativeInfo = value
        .get("api_info")
        .filter(|meta| meta.is_object())
        .or_else(|| value.get("collection_info").filter(|meta| meta.is_object()))
        .cloned()
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();

    let defaults = Collection::starter();
    let mut collection = Collection::new(info.name.unwrap_or(defaults.name));
    collection.description = info.description.unwrap_or(defaults.description);
    collection.items = raw_items.into_iter().map(normalize_node).collect();

    Ok(ImportDocument { format, collection })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postman_payload_should_convert_folders_and_requests() {
        let payload = r#"{
            "info": { "name": "X" },
            "item": [
                {
                    "name": "F",
                    "item": [
                        {
                            "name": "R",
                            "request": {
                                "method": "POST",
                                "url": "http://a",
                                "body": { "raw": "{}" }
                            }
                        }
                    ]
                }
            ]
        }"#;

        let doc = parse(payload).unwrap();
        assert_eq!(doc.format, ImportFormat::Postman);
        assert_eq!(doc.collection.name, "X");
        assert_eq!(doc.collection.items.len(), 1);

        let folder = doc.collection.items[0].as_folder().expect("folder");
        assert_eq!(folder.name, "F");
        let request = folder.items[0].as_request().expect("request");
        assert_eq!(request.name, "R");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://a");
        assert_eq!(request.body, "{}");
        assert!(request.response_example.is_empty());
    }

    #[test]
    fn postman_url_object_should_use_raw() {
        let payload = r#"{
            "info": { "name": "X" },
            "item": [
                { "name": "R", "request": { "url": { "raw": "http://b/path" } } }
            ]
        }"#;

        let doc = parse(payload).unwrap();
        let request = doc.collection.items[0].as_request().unwrap();
        assert_eq!(request.url, "http://b/path");
        assert_eq!(request.method, Method::Get);
    }

    #[test]
    fn postman_formdata_body_should_be_stringified() {
        let payload = r#"{
            "info": { "name": "X" },
            "item": [
                {
                    "name": "Upload",
                    "request": {
                        "method": "POST",
                        "url": "http://a",
                        "body": { "formdata": [ { "key": "file", "value": "v" } ] }
                    }
                }
            ]
        }"#;

        let doc = parse(payload).unwrap();
        let request = doc.collection.items[0].as_request().unwrap();
        assert!(request.body.contains("\"key\""));
        assert!(request.body.contains("file"));
    }

    #[test]
    fn postman_entries_without_item_or_request_should_be_dropped() {
        let payload = r#"{
            "info": { "name": "X" },
            "item": [ { "name": "neither" }, { "name": "R", "request": {} } ]
        }"#;

        let doc = parse(payload).unwrap();
        assert_eq!(doc.collection.items.len(), 1);
        assert_eq!(doc.collection.items[0].name(), "R");
    }

    #[test]
    fn postman_ids_should_be_regenerated() {
        let payload = r#"{
            "info": { "name": "X" },
            "item": [ { "name": "R", "id": "keep-me", "request": {} } ]
        }"#;

        let doc = parse(payload).unwrap();
        assert_ne!(doc.collection.items[0].id().as_str(), "keep-me");
    }

    #[test]
    fn postman_should_take_precedence_over_native_keys() {
        let payload = r#"{
            "info": { "name": "X" },
            "item": [],
            "items": [ { "type": "request", "id": "r1", "name": "R" } ]
        }"#;

        let doc = parse(payload).unwrap();
        assert_eq!(doc.format, ImportFormat::Postman);
        assert!(doc.collection.items.is_empty());
    }

    #[test]
    fn legacy_items_should_keep_ids_and_structure() {
        let payload = r#"{
            "collection_info": { "name": "Mine", "description": "d" },
            "items": [
                {
                    "type": "folder",
                    "id": "f1",
                    "name": "F",
                    "items": [
                        { "type": "request", "id": "r1", "name": "R", "method": "PUT" }
                    ]
                }
            ]
        }"#;

        let doc = parse(payload).unwrap();
        assert_eq!(doc.format, ImportFormat::LegacyItems);
        assert_eq!(doc.collection.name, "Mine");
        assert_eq!(doc.collection.description, "d");

        let folder = doc.collection.items[0].as_folder().unwrap();
        assert_eq!(folder.id.as_str(), "f1");
        let request = folder.items[0].as_request().unwrap();
        assert_eq!(request.id.as_str(), "r1");
        assert_eq!(request.method, Method::Put);
    }

    #[test]
    fn endpoints_shape_should_accept_exported_field_names() {
        let payload = r#"{
            "api_info": { "name": "Exported", "description": "" },
            "endpoints": [
                {
                    "name": "F",
                    "description": "grp",
                    "API": [
                        {
                            "name": "R",
                            "method": "POST",
                            "url": "http://a",
                            "notes": "n",
                            "example_requests": "{\"a\":1}",
                            "example_response": "[]"
                        }
                    ]
                }
            ]
        }"#;

        let doc = parse(payload).unwrap();
        assert_eq!(doc.format, ImportFormat::LegacyEndpoints);

        let folder = doc.collection.items[0].as_folder().unwrap();
        assert_eq!(folder.description, "grp");
        let request = folder.items[0].as_request().unwrap();
        assert_eq!(request.body, "{\"a\":1}");
        assert_eq!(request.response_example, "[]");
        assert_eq!(request.notes, "n");
    }

    #[test]
    fn native_nodes_without_ids_should_get_fresh_ones() {
        let payload = r#"{ "endpoints": [ { "name": "R", "method": "GET" } ] }"#;
        let doc = parse(payload).unwrap();
        assert!(!doc.collection.items[0].id().as_str().is_empty());
    }

    #[test]
    fn malformed_json_should_be_a_parse_error() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn unrecognized_shape_should_be_rejected() {
        let err = parse(r#"{ "something": "else" }"#).unwrap_err();
        assert!(matches!(err, ImportError::UnrecognizedShape));
        let err = parse(r#"{ "info": {}, "item": "not an array" }"#).unwrap_err();
        assert!(matches!(err, ImportError::UnrecognizedShape));
    }
}

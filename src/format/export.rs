//! # Export Transform
//!
//! Serializes the canonical tree into the interchange shape written to
//! `.mb` files: the root becomes `{ api_info, endpoints }`, folder children
//! move under an `API` key, and request payload fields are renamed to
//! `example_requests` / `example_response`. Internal metadata (ids, the
//! type tag, the completion flag, position) never appears in the output.

use serde_json::{json, Value};

use crate::collection::node::{Collection, Node};

/// Suggested file extension for exported collections.
pub const FILE_EXTENSION: &str = "mb";

/// Transform a collection into the export shape.
pub fn to_value(collection: &Collection) -> Value {
    json!({
        "api_info": {
            "name": collection.name,
            "description": collection.description,
        },
        "endpoints": collection.items.iter().map(node_value).collect::<Vec<_>>(),
    })
}

/// Transform a collection into pretty-printed export JSON.
pub fn to_string(collection: &Collection) -> String {
    // Pretty-printing a Value built from strings cannot fail.
    serde_json::to_string_pretty(&to_value(collection)).unwrap_or_default()
}

fn node_value(node: &Node) -> Value {
    match node {
        Node::Folder(folder) => json!({
            "name": folder.name,
            "description": folder.description,
            "API": folder.items.iter().map(node_value).collect::<Vec<_>>(),
        }),
        Node::Request(request) => json!({
            "name": request.name,
            "method": request.method.as_str(),
            "url": request.url,
            "notes": request.notes,
            "example_requests": request.body,
            "example_response": request.response_example,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::node::{Folder, Method, Request};

    fn sample_collection() -> Collection {
        let mut request = Request::new("Create user");
        request.method = Method::Post;
        request.url = "http://a/users".to_string();
        request.body = "{}".to_string();
        request.response_example = "[]".to_string();
        request.notes = "n".to_string();
        request.is_complete = true;

        let mut folder = Folder::new("Users");
        folder.description = "User management".to_string();
        folder.items.push(Node::Request(request));

        let mut collection = Collection::new("My API");
        collection.description = "d".to_string();
        collection.items.push(Node::Folder(folder));
        collection.items.push(Node::Folder(Folder::new("Empty")));
        collection
    }

    #[test]
    fn root_should_become_api_info_and_endpoints() {
        let value = to_value(&sample_collection());
        assert_eq!(value["api_info"]["name"], "My API");
        assert_eq!(value["api_info"]["description"], "d");
        assert!(value["endpoints"].is_array());
        assert_eq!(value["endpoints"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn requests_should_rename_payload_fields_and_drop_metadata() {
        let value = to_value(&sample_collection());
        let request = &value["endpoints"][0]["API"][0];

        assert_eq!(request["example_requests"], "{}");
        assert_eq!(request["example_response"], "[]");
        assert_eq!(request["method"], "POST");
        assert_eq!(request["notes"], "n");

        let keys = request.as_object().unwrap();
        assert!(!keys.contains_key("body"));
        assert!(!keys.contains_key("responseExample"));
        assert!(!keys.contains_key("id"));
        assert!(!keys.contains_key("type"));
        assert!(!keys.contains_key("isComplete"));
        assert!(!keys.contains_key("position"));
    }

    #[test]
    fn empty_folders_should_keep_an_empty_api_list() {
        let value = to_value(&sample_collection());
        let empty = &value["endpoints"][1];
        assert_eq!(empty["API"], json!([]));
        assert!(!empty.as_object().unwrap().contains_key("items"));
    }

    #[test]
    fn empty_payload_fields_should_export_as_empty_strings() {
        let mut collection = Collection::new("X");
        collection.items.push(Node::Request(Request::new("Bare")));

        let value = to_value(&collection);
        assert_eq!(value["endpoints"][0]["example_requests"], "");
        assert_eq!(value["endpoints"][0]["example_response"], "");
    }

    #[test]
    fn export_should_round_trip_through_the_endpoints_import() {
        let collection = sample_collection();
        let exported = to_string(&collection);

        let doc = crate::format::import::parse(&exported).unwrap();
        assert_eq!(
            doc.format,
            crate::format::import::ImportFormat::LegacyEndpoints
        );
        assert_eq!(doc.collection.name, collection.name);
        assert_eq!(doc.collection.description, collection.description);

        let folder = doc.collection.items[0].as_folder().unwrap();
        assert_eq!(folder.name, "Users");
        assert_eq!(folder.description, "User management");

        let request = folder.items[0].as_request().unwrap();
        assert_eq!(request.name, "Create user");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, "{}");
        assert_eq!(request.response_example, "[]");
    }
}

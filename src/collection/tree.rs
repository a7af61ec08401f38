//! # Tree Operations
//!
//! Recursive structural operations over the collection tree. Mutating
//! operations rebuild the `items` sequence of every folder along the path
//! to the touched node and leave everything else untouched, so the
//! collection can be handed out as an immutable snapshot after each change.
//!
//! Lookup misses are normal outcomes; `insert` and `remove` against an id
//! that does not resolve are silent no-ops. Callers that need strict
//! failure check preconditions with [`find`] first.

use crate::collection::node::{Collection, Node, NodeId};

/// Depth-first search for the first node with the given id, descending into
/// folder children in order.
pub fn find<'a>(items: &'a [Node], id: &NodeId) -> Option<&'a Node> {
    for item in items {
        if item.id() == id {
            return Some(item);
        }
        if let Some(children) = item.items() {
            if let Some(found) = find(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Rebuild the tree with the node matching `updated.id()` swapped in place,
/// preserving its position among siblings.
pub fn replace(items: &[Node], updated: &Node) -> Vec<Node> {
    items
        .iter()
        .map(|item| {
            if item.id() == updated.id() {
                return updated.clone();
            }
            match item {
                Node::Folder(folder) => {
                    let mut folder = folder.clone();
                    folder.items = replace(&folder.items, updated);
                    Node::Folder(folder)
                }
                request => request.clone(),
            }
        })
        .collect()
}

/// Rebuild the tree with `new_node` appended to the folder matching
/// `parent_id`. No-op when the parent is missing or is a request.
pub fn insert(items: &[Node], parent_id: &NodeId, new_node: &Node) -> Vec<Node> {
    items
        .iter()
        .map(|item| match item {
            Node::Folder(folder) if folder.id == *parent_id => {
                let mut folder = folder.clone();
                folder.items.push(new_node.clone());
                Node::Folder(folder)
            }
            Node::Folder(folder) => {
                let mut folder = folder.clone();
                folder.items = insert(&folder.items, parent_id, new_node);
                Node::Folder(folder)
            }
            request => request.clone(),
        })
        .collect()
}

/// Rebuild the tree with the node matching `id` filtered out. Removing a
/// folder drops its entire subtree with it.
pub fn remove(items: &[Node], id: &NodeId) -> Vec<Node> {
    items
        .iter()
        .filter(|item| item.id() != id)
        .map(|item| match item {
            Node::Folder(folder) => {
                let mut folder = folder.clone();
                folder.items = remove(&folder.items, id);
                Node::Folder(folder)
            }
            request => request.clone(),
        })
        .collect()
}

/// Depth-first walk returning `(node, depth)` pairs in display order.
pub fn flatten(items: &[Node]) -> Vec<(&Node, usize)> {
    fn collect<'a>(items: &'a [Node], depth: usize, out: &mut Vec<(&'a Node, usize)>) {
        for item in items {
            out.push((item, depth));
            if let Some(children) = item.items() {
                collect(children, depth + 1, out);
            }
        }
    }

    let mut out = Vec::new();
    collect(items, 0, &mut out);
    out
}

/// Whether a node survives a sidebar-style name filter: its own name
/// matches, or (for folders) any descendant's name matches.
pub fn matches_filter(node: &Node, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    if node.name().to_lowercase().contains(&needle) {
        return true;
    }
    node.items()
        .map(|children| children.iter().any(|child| matches_filter(child, filter)))
        .unwrap_or(false)
}

impl Collection {
    /// Depth-first lookup starting from the root's items.
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        find(&self.items, id)
    }

    /// Append `node` to the folder matching `parent` (or to the root when
    /// `parent` is `None`). A parent id that does not resolve to a folder
    /// leaves the tree unchanged.
    pub fn insert(&mut self, parent: Option<&NodeId>, node: Node) {
        match parent {
            None => self.items.push(node),
            Some(parent_id) => self.items = insert(&self.items, parent_id, &node),
        }
    }

    /// Commit an edited node back into the tree, rebuilding every ancestor
    /// folder along the path.
    pub fn replace(&mut self, updated: &Node) {
        self.items = replace(&self.items, updated);
    }

    /// Remove the node with the given id, cascading to its subtree.
    pub fn remove(&mut self, id: &NodeId) {
        self.items = remove(&self.items, id);
    }

    /// Display-order walk of the whole tree.
    pub fn flatten(&self) -> Vec<(&Node, usize)> {
        flatten(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::node::{Folder, Method, Request};

    fn request(id: &str, name: &str) -> Node {
        let mut r = Request::new(name);
        r.id = NodeId::from(id);
        Node::Request(r)
    }

    fn folder(id: &str, name: &str, items: Vec<Node>) -> Node {
        let mut f = Folder::new(name);
        f.id = NodeId::from(id);
        f.items = items;
        Node::Folder(f)
    }

    /// root: [r1, f1[r2, f2[r3]], r4]
    fn fixture() -> Collection {
        let mut collection = Collection::new("Fixture");
        collection.items = vec![
            request("r1", "Ping"),
            folder(
                "f1",
                "Auth",
                vec![
                    request("r2", "Login"),
                    folder("f2", "Tokens", vec![request("r3", "Refresh")]),
                ],
            ),
            request("r4", "Health"),
        ];
        collection
    }

    #[test]
    fn find_should_locate_nested_nodes() {
        let collection = fixture();
        assert_eq!(collection.find(&"r3".into()).unwrap().name(), "Refresh");
        assert_eq!(collection.find(&"f2".into()).unwrap().name(), "Tokens");
        assert!(collection.find(&"missing".into()).is_none());
    }

    #[test]
    fn replace_should_swap_node_and_preserve_sibling_order() {
        let mut collection = fixture();
        let mut updated = Request::new("Login v2");
        updated.id = NodeId::from("r2");
        updated.method = Method::Post;
        collection.replace(&Node::Request(updated.clone()));

        let found = collection.find(&"r2".into()).unwrap();
        assert_eq!(found, &Node::Request(updated));

        let ids: Vec<&str> = collection.items.iter().map(|n| n.id().as_str()).collect();
        assert_eq!(ids, vec!["r1", "f1", "r4"]);
        let auth = collection.find(&"f1".into()).unwrap().as_folder().unwrap();
        let child_ids: Vec<&str> = auth.items.iter().map(|n| n.id().as_str()).collect();
        assert_eq!(child_ids, vec!["r2", "f2"]);
    }

    #[test]
    fn remove_should_cascade_to_the_whole_subtree() {
        let mut collection = fixture();
        collection.remove(&"f1".into());

        assert!(collection.find(&"f1".into()).is_none());
        assert!(collection.find(&"r2".into()).is_none());
        assert!(collection.find(&"f2".into()).is_none());
        assert!(collection.find(&"r3".into()).is_none());

        let ids: Vec<&str> = collection.items.iter().map(|n| n.id().as_str()).collect();
        assert_eq!(ids, vec!["r1", "r4"]);
    }

    #[test]
    fn remove_missing_id_should_be_a_no_op() {
        let mut collection = fixture();
        let before = collection.clone();
        collection.remove(&"missing".into());
        assert_eq!(collection, before);
    }

    #[test]
    fn insert_should_append_as_last_child() {
        let mut collection = fixture();
        collection.insert(Some(&"f2".into()), request("r5", "Revoke"));

        let tokens = collection.find(&"f2".into()).unwrap().as_folder().unwrap();
        assert_eq!(tokens.items.last().unwrap().id().as_str(), "r5");
        assert!(collection.find(&"r5".into()).is_some());
    }

    #[test]
    fn insert_without_parent_should_append_to_root() {
        let mut collection = fixture();
        collection.insert(None, request("r5", "Metrics"));
        assert_eq!(collection.items.last().unwrap().id().as_str(), "r5");
    }

    #[test]
    fn insert_under_request_or_missing_parent_should_be_a_no_op() {
        let mut collection = fixture();
        let before = collection.clone();

        collection.insert(Some(&"r1".into()), request("r9", "Orphan"));
        assert_eq!(collection, before);

        collection.insert(Some(&"missing".into()), request("r9", "Orphan"));
        assert_eq!(collection, before);
    }

    #[test]
    fn flatten_should_walk_depth_first_with_depths() {
        let collection = fixture();
        let rows: Vec<(&str, usize)> = collection
            .flatten()
            .into_iter()
            .map(|(node, depth)| (node.id().as_str(), depth))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("r1", 0),
                ("f1", 0),
                ("r2", 1),
                ("f2", 1),
                ("r3", 2),
                ("r4", 0),
            ]
        );
    }

    #[test]
    fn filter_should_match_folders_by_descendant_names() {
        let collection = fixture();
        let auth = collection.find(&"f1".into()).unwrap();
        assert!(matches_filter(auth, "refresh"));
        assert!(matches_filter(auth, "AUTH"));
        assert!(!matches_filter(auth, "metrics"));
        assert!(matches_filter(auth, ""));
    }
}

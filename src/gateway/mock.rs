//! # Mock Gateway
//!
//! In-memory [`PersistenceGateway`] used by the test suites (and handy for
//! demos without a backend). It keeps real collection trees and applies the
//! same tree operations a backend would, so a session driven against it
//! observes realistic create/update/delete/reload behavior. Calls are
//! recorded for assertions, and failures can be injected.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::collection::node::{Collection, Folder, Node, NodeId, Request};
use crate::gateway::{
    CollectionInfo, CollectionUpdate, FolderCreate, FolderUpdate, GatewayError,
    PersistenceGateway, RequestCreate, RequestUpdate,
};

#[derive(Default)]
struct MockState {
    collections: Vec<Collection>,
    calls: Vec<String>,
    fail_unauthorized: bool,
    fail_message: Option<String>,
}

/// In-memory gateway with call recording and failure injection. Clones
/// share state, so tests keep a handle to a gateway they hand to a session
/// as a boxed trait object.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with one stored collection.
    pub fn with_collection(collection: Collection) -> Self {
        let gateway = Self::new();
        gateway.push_collection(collection);
        gateway
    }

    /// Store an additional collection.
    pub fn push_collection(&self, collection: Collection) {
        self.lock().collections.push(collection);
    }

    /// Snapshot of a stored collection, for assertions.
    pub fn collection(&self, id: &str) -> Option<Collection> {
        self.lock().collections.iter().find(|c| c.id == id).cloned()
    }

    /// The calls recorded so far, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Make every subsequent call fail with [`GatewayError::Unauthorized`].
    pub fn set_unauthorized(&self, on: bool) {
        self.lock().fail_unauthorized = on;
    }

    /// Make every subsequent call fail with the given server message.
    pub fn set_failure(&self, message: Option<&str>) {
        self.lock().fail_message = message.map(str::to_string);
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock gateway state poisoned")
    }

    /// Record the call and apply any injected failure.
    fn enter(&self, call: String) -> Result<MutexGuard<'_, MockState>, GatewayError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.fail_unauthorized {
            return Err(GatewayError::Unauthorized);
        }
        if let Some(message) = &state.fail_message {
            return Err(GatewayError::Api(message.clone()));
        }
        Ok(state)
    }
}

#[async_trait]
impl PersistenceGateway for MockGateway {
    async fn list_collections(&self) -> Result<Vec<CollectionInfo>, GatewayError> {
        let state = self.enter("list_collections".to_string())?;
        Ok(state
            .collections
            .iter()
            .map(|c| CollectionInfo {
                id: c.id.clone(),
                name: c.name.clone(),
                description: c.description.clone(),
            })
            .collect())
    }

    async fn create_collection(&self, info: &CollectionInfo) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("create_collection {}", info.id))?;
        state.collections.push(Collection {
            id: info.id.clone(),
            name: info.name.clone(),
            description: info.description.clone(),
            items: Vec::new(),
        });
        Ok(())
    }

    async fn get_collection(&self, id: &str) -> Result<Collection, GatewayError> {
        let state = self.enter(format!("get_collection {id}"))?;
        state
            .collections
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::Api("collection not found".to_string()))
    }

    async fn update_collection(
        &self,
        id: &str,
        update: &CollectionUpdate,
    ) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("update_collection {id}"))?;
        let collection = state
            .collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| GatewayError::Api("collection not found".to_string()))?;
        collection.name = update.name.clone();
        collection.description = update.description.clone();
        Ok(())
    }

    async fn delete_collection(&self, id: &str) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("delete_collection {id}"))?;
        state.collections.retain(|c| c.id != id);
        Ok(())
    }

    async fn create_folder(&self, folder: &FolderCreate) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("create_folder {}", folder.id))?;
        let collection = state
            .collections
            .iter_mut()
            .find(|c| c.id == folder.collection_id)
            .ok_or_else(|| GatewayError::Api("collection not found".to_string()))?;

        let node = Node::Folder(Folder {
            id: NodeId::from(folder.id.clone()),
            name: folder.name.clone(),
            description: folder.description.clone(),
            items: Vec::new(),
        });
        let parent = folder.parent_folder_id.clone().map(NodeId::from);
        collection.insert(parent.as_ref(), node);
        Ok(())
    }

    async fn update_folder(&self, id: &str, update: &FolderUpdate) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("update_folder {id}"))?;
        let node_id = NodeId::from(id);
        for collection in state.collections.iter_mut() {
            if let Some(Node::Folder(existing)) = collection.find(&node_id) {
                let mut folder = existing.clone();
                folder.name = update.name.clone();
                folder.description = update.description.clone();
                collection.replace(&Node::Folder(folder));
                return Ok(());
            }
        }
        Err(GatewayError::Api("folder not found".to_string()))
    }

    async fn delete_folder(&self, id: &str) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("delete_folder {id}"))?;
        let node_id = NodeId::from(id);
        for collection in state.collections.iter_mut() {
            collection.remove(&node_id);
        }
        Ok(())
    }

    async fn create_request(&self, request: &RequestCreate) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("create_request {}", request.id))?;
        let collection = state
            .collections
            .iter_mut()
            .find(|c| c.id == request.collection_id)
            .ok_or_else(|| GatewayError::Api("collection not found".to_string()))?;

        let node = Node::Request(Request {
            id: NodeId::from(request.id.clone()),
            name: request.name.clone(),
            method: request.method,
            url: request.url.clone(),
            body: request.body.clone(),
            response_example: request.response_example.clone(),
            notes: request.notes.clone(),
            is_complete: request.is_complete,
        });
        let parent = request.folder_id.clone().map(NodeId::from);
        collection.insert(parent.as_ref(), node);
        Ok(())
    }

    async fn update_request(&self, id: &str, update: &RequestUpdate) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("update_request {id}"))?;
        let node_id = NodeId::from(id);
        for collection in state.collections.iter_mut() {
            if let Some(Node::Request(existing)) = collection.find(&node_id) {
                let updated = Request {
                    id: existing.id.clone(),
                    name: update.name.clone(),
                    method: update.method,
                    url: update.url.clone(),
                    body: update.body.clone(),
                    response_example: update.response_example.clone(),
                    notes: update.notes.clone(),
                    is_complete: update.is_complete,
                };
                collection.replace(&Node::Request(updated));
                return Ok(());
            }
        }
        Err(GatewayError::Api("request not found".to_string()))
    }

    async fn delete_request(&self, id: &str) -> Result<(), GatewayError> {
        let mut state = self.enter(format!("delete_request {id}"))?;
        let node_id = NodeId::from(id);
        for collection in state.collections.iter_mut() {
            collection.remove(&node_id);
        }
        Ok(())
    }
}

//! # Session
//!
//! The single context object behind every user gesture: it owns the live
//! [`Collection`], the [`DraftController`], the boxed persistence gateway,
//! and the list of known collections. All mutating actions run to
//! completion before the next one is processed; gateway calls are the only
//! await points.
//!
//! Guarded actions do not prompt. When unsaved edits are in the way, the
//! action returns [`Outcome::ConfirmationRequired`] carrying a
//! [`PendingAction`]; once the user has decided, the caller resumes it with
//! [`Session::proceed`] or simply drops it.
//!
//! Failures are converted at this boundary: the local tree reflects only
//! confirmed gateway results, nothing is retried, and an unauthorized
//! response resets the whole session before the error is surfaced.

use anyhow::{bail, Context, Result};

use crate::collection::{
    Collection, DraftController, DraftTarget, Folder, JsonField, Node, NodeId, Request,
    SelectOutcome,
};
use crate::format::{self, ImportDocument, ImportFormat};
use crate::gateway::{
    CollectionInfo, CollectionUpdate, FolderCreate, FolderUpdate, GatewayError,
    PersistenceGateway, RequestCreate, RequestUpdate,
};

/// What a completed action did, for the caller's notification layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CollectionLoaded { id: String },
    SelectionChanged { id: Option<NodeId> },
    DraftSaved { id: Option<NodeId> },
    NodeCreated { id: NodeId },
    NodeDeleted { id: NodeId },
    NodeRenamed { id: NodeId },
    CollectionCreated { id: String },
    CollectionRenamed { id: String },
    CollectionDeleted { id: String },
    Imported { format: ImportFormat, name: String },
}

/// An action suspended on the unsaved-changes guard (or, for imports, on
/// the import confirmation). Resume with [`Session::proceed`].
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Select(Option<NodeId>),
    AddRequest(Option<NodeId>),
    AddFolder(Option<NodeId>),
    Delete(NodeId),
    Rename { id: NodeId, name: String },
    SwitchCollection(String),
    CreateCollection(String),
    Import(ImportDocument),
}

/// Result of a guarded action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(SessionEvent),
    ConfirmationRequired(PendingAction),
}

/// Per-open-collection editing session.
pub struct Session {
    gateway: Box<dyn PersistenceGateway>,
    collection: Collection,
    drafts: DraftController,
    collections: Vec<CollectionInfo>,
    current_id: Option<String>,
}

impl Session {
    pub fn new(gateway: Box<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            collection: Collection::starter(),
            drafts: DraftController::new(),
            collections: Vec::new(),
            current_id: None,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn collections(&self) -> &[CollectionInfo] {
        &self.collections
    }

    pub fn current_collection_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn drafts(&self) -> &DraftController {
        &self.drafts
    }

    pub fn is_dirty(&self) -> bool {
        self.drafts.is_dirty()
    }

    /// Apply an edit to the current draft; the store is untouched until the
    /// next [`Session::save`].
    pub fn edit_draft(&mut self, apply: impl FnOnce(&mut DraftTarget)) -> bool {
        self.drafts.edit(apply)
    }

    /// Reformat a JSON field of the drafted request.
    pub fn prettify_draft(&mut self, field: JsonField) -> Result<()> {
        self.drafts.prettify(field)
    }

    /// Back to the built-in workspace: no collections, no draft, nothing
    /// selected. Used at startup and forced by an unauthorized gateway
    /// response.
    pub fn reset(&mut self) {
        self.collection = Collection::starter();
        self.collections.clear();
        self.current_id = None;
        self.drafts.clear();
    }

    /// Convert a gateway failure at the action boundary. Unauthorized
    /// resets the session before the error is surfaced; nothing is retried.
    fn check<T>(&mut self, result: Result<T, GatewayError>) -> Result<T> {
        result.map_err(|err| {
            match err {
                GatewayError::Unauthorized => {
                    tracing::warn!("unauthorized response from gateway, resetting session");
                    self.reset();
                }
                ref other => tracing::error!(error = %other, "gateway call failed"),
            }
            anyhow::Error::new(err)
        })
    }

    fn require_current(&self) -> Result<String> {
        self.current_id
            .clone()
            .context("no collection is open")
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Fetch the collection list and open the first entry, or fall back to
    /// the built-in workspace when the account has none.
    pub async fn initialize(&mut self) -> Result<SessionEvent> {
        self.refresh_collections().await?;
        match self.collections.first().map(|info| info.id.clone()) {
            Some(first) => self.load_collection(&first).await,
            None => {
                self.collection = Collection::starter();
                self.current_id = None;
                self.drafts.select_discarding(None, &self.collection);
                Ok(SessionEvent::CollectionLoaded {
                    id: self.collection.id.clone(),
                })
            }
        }
    }

    /// Refresh the known-collections list.
    pub async fn refresh_collections(&mut self) -> Result<usize> {
        let result = self.gateway.list_collections().await;
        self.collections = self.check(result).context("failed to load collections")?;
        Ok(self.collections.len())
    }

    /// Fetch one collection and make it the live tree. Selection falls back
    /// to the root; any draft is replaced by a fresh root copy. On failure
    /// the previous tree stays in place.
    pub async fn load_collection(&mut self, id: &str) -> Result<SessionEvent> {
        let result = self.gateway.get_collection(id).await;
        let collection = self.check(result).context("failed to load collection")?;

        tracing::info!(id, name = %collection.name, "collection loaded");
        self.collection = collection;
        self.current_id = Some(id.to_string());
        self.drafts.select_discarding(None, &self.collection);
        Ok(SessionEvent::CollectionLoaded { id: id.to_string() })
    }

    async fn reload(&mut self) -> Result<()> {
        let id = self.require_current()?;
        self.load_collection(&id).await?;
        Ok(())
    }

    // ── Selection & saving ──────────────────────────────────────────

    /// Select a node (or the root with `None`) for viewing/editing.
    pub fn select(&mut self, id: Option<NodeId>) -> Outcome {
        match self.drafts.select(id.clone(), &self.collection) {
            SelectOutcome::ConfirmationRequired => {
                Outcome::ConfirmationRequired(PendingAction::Select(id))
            }
            SelectOutcome::Selected => Outcome::Completed(SessionEvent::SelectionChanged { id }),
        }
    }

    /// Commit the draft: persist it through the gateway and, only on
    /// success, fold it into the live tree and return to viewing. A failed
    /// save leaves both the tree and the dirty draft exactly as they were.
    pub async fn save(&mut self) -> Result<SessionEvent> {
        let Some(target) = self.drafts.draft().cloned() else {
            bail!("nothing is selected");
        };

        match target {
            DraftTarget::Root(root) => {
                let id = self.require_current()?;
                let update = CollectionUpdate {
                    name: root.name.clone(),
                    description: root.description.clone(),
                };
                let result = self.gateway.update_collection(&id, &update).await;
                self.check(result).context("failed to save")?;

                self.collection.name = root.name;
                self.collection.description = root.description;
                // Keep the collection list labels in step; a stale list is
                // not worth failing a successful save over.
                if let Ok(list) = self.gateway.list_collections().await {
                    self.collections = list;
                }
                self.drafts.mark_saved();
                Ok(SessionEvent::DraftSaved { id: None })
            }
            DraftTarget::Node(node) => {
                match &node {
                    Node::Folder(folder) => {
                        let update = FolderUpdate::from_folder(folder);
                        let result = self.gateway.update_folder(folder.id.as_str(), &update).await;
                        self.check(result).context("failed to save")?;
                    }
                    Node::Request(request) => {
                        let update = RequestUpdate::from_request(request);
                        let result = self
                            .gateway
                            .update_request(request.id.as_str(), &update)
                            .await;
                        self.check(result).context("failed to save")?;
                    }
                }
                self.collection.replace(&node);
                self.drafts.mark_saved();
                tracing::info!(id = %node.id(), "draft saved");
                Ok(SessionEvent::DraftSaved {
                    id: Some(node.id().clone()),
                })
            }
        }
    }

    // ── Guarded tree mutations ──────────────────────────────────────

    /// Create a request under `parent` (root when `None`) and select it.
    pub async fn add_request(&mut self, parent: Option<NodeId>) -> Result<Outcome> {
        if self.drafts.is_dirty() {
            return Ok(Outcome::ConfirmationRequired(PendingAction::AddRequest(
                parent,
            )));
        }
        self.add_request_now(parent).await.map(Outcome::Completed)
    }

    async fn add_request_now(&mut self, parent: Option<NodeId>) -> Result<SessionEvent> {
        let collection_id = self.require_current()?;
        let request = Request::new("New Request");
        let payload = RequestCreate::from_request(&collection_id, parent.as_ref(), &request);

        let result = self.gateway.create_request(&payload).await;
        self.check(result).context("failed to create request")?;
        self.reload().await?;
        self.drafts
            .select_discarding(Some(request.id.clone()), &self.collection);
        Ok(SessionEvent::NodeCreated { id: request.id })
    }

    /// Create a folder under `parent` (root when `None`) and select it.
    pub async fn add_folder(&mut self, parent: Option<NodeId>) -> Result<Outcome> {
        if self.drafts.is_dirty() {
            return Ok(Outcome::ConfirmationRequired(PendingAction::AddFolder(
                parent,
            )));
        }
        self.add_folder_now(parent).await.map(Outcome::Completed)
    }

    async fn add_folder_now(&mut self, parent: Option<NodeId>) -> Result<SessionEvent> {
        let collection_id = self.require_current()?;
        let folder = Folder::new("New Folder");
        let payload = FolderCreate::from_folder(&collection_id, parent.as_ref(), &folder);

        let result = self.gateway.create_folder(&payload).await;
        self.check(result).context("failed to create folder")?;
        self.reload().await?;
        self.drafts
            .select_discarding(Some(folder.id.clone()), &self.collection);
        Ok(SessionEvent::NodeCreated { id: folder.id })
    }

    /// Delete a node; a folder takes its whole subtree with it. An id that
    /// no longer resolves is a silent no-op.
    pub async fn delete(&mut self, id: NodeId) -> Result<Outcome> {
        if self.drafts.is_dirty() {
            return Ok(Outcome::ConfirmationRequired(PendingAction::Delete(id)));
        }
        self.delete_now(id).await.map(Outcome::Completed)
    }

    async fn delete_now(&mut self, id: NodeId) -> Result<SessionEvent> {
        let Some(node) = self.collection.find(&id) else {
            tracing::debug!(%id, "delete target already gone");
            return Ok(SessionEvent::NodeDeleted { id });
        };

        let result = match node {
            Node::Folder(_) => self.gateway.delete_folder(id.as_str()).await,
            Node::Request(_) => self.gateway.delete_request(id.as_str()).await,
        };
        self.check(result).context("failed to delete")?;
        self.reload().await?;
        Ok(SessionEvent::NodeDeleted { id })
    }

    /// Rename a node in place (persists the full node with the new name).
    pub async fn rename(&mut self, id: NodeId, name: String) -> Result<Outcome> {
        if self.drafts.is_dirty() {
            return Ok(Outcome::ConfirmationRequired(PendingAction::Rename {
                id,
                name,
            }));
        }
        self.rename_now(id, name).await.map(Outcome::Completed)
    }

    async fn rename_now(&mut self, id: NodeId, name: String) -> Result<SessionEvent> {
        let Some(node) = self.collection.find(&id).cloned() else {
            tracing::debug!(%id, "rename target not found");
            return Ok(SessionEvent::NodeRenamed { id });
        };

        let result = match node {
            Node::Folder(mut folder) => {
                folder.name = name;
                let update = FolderUpdate::from_folder(&folder);
                self.gateway.update_folder(id.as_str(), &update).await
            }
            Node::Request(mut request) => {
                request.name = name;
                let update = RequestUpdate::from_request(&request);
                self.gateway.update_request(id.as_str(), &update).await
            }
        };
        self.check(result).context("failed to rename")?;
        self.reload().await?;
        Ok(SessionEvent::NodeRenamed { id })
    }

    // ── Collection management ───────────────────────────────────────

    /// Open another collection.
    pub async fn switch_collection(&mut self, id: String) -> Result<Outcome> {
        if self.drafts.is_dirty() {
            return Ok(Outcome::ConfirmationRequired(
                PendingAction::SwitchCollection(id),
            ));
        }
        self.load_collection(&id).await.map(Outcome::Completed)
    }

    /// Create an empty collection and switch to it.
    pub async fn create_collection(&mut self, name: String) -> Result<Outcome> {
        if self.drafts.is_dirty() {
            return Ok(Outcome::ConfirmationRequired(
                PendingAction::CreateCollection(name),
            ));
        }
        self.create_collection_now(name).await.map(Outcome::Completed)
    }

    async fn create_collection_now(&mut self, name: String) -> Result<SessionEvent> {
        let info = CollectionInfo {
            id: NodeId::generate().to_string(),
            name,
            description: String::new(),
        };
        let result = self.gateway.create_collection(&info).await;
        self.check(result).context("failed to create collection")?;

        self.refresh_collections().await?;
        self.load_collection(&info.id).await?;
        Ok(SessionEvent::CollectionCreated { id: info.id })
    }

    /// Rename the open collection (keeps its description).
    pub async fn rename_collection(&mut self, name: String) -> Result<SessionEvent> {
        let id = self.require_current()?;
        let update = CollectionUpdate {
            name: name.clone(),
            description: self.collection.description.clone(),
        };
        let result = self.gateway.update_collection(&id, &update).await;
        self.check(result).context("failed to rename collection")?;

        self.collection.name = name;
        if let Ok(list) = self.gateway.list_collections().await {
            self.collections = list;
        }
        Ok(SessionEvent::CollectionRenamed { id })
    }

    /// Delete the open collection and fall back to the first remaining one,
    /// or to the built-in workspace when none are left.
    pub async fn delete_collection(&mut self) -> Result<SessionEvent> {
        let id = self.require_current()?;
        let result = self.gateway.delete_collection(&id).await;
        self.check(result).context("failed to delete collection")?;

        self.refresh_collections().await?;
        match self.collections.first().map(|info| info.id.clone()) {
            Some(next) => {
                self.load_collection(&next).await?;
            }
            None => {
                self.collection = Collection::starter();
                self.current_id = None;
                self.drafts.select_discarding(None, &self.collection);
            }
        }
        Ok(SessionEvent::CollectionDeleted { id })
    }

    // ── Import & export ─────────────────────────────────────────────

    /// Classify an import payload. Parse and shape errors surface without
    /// touching any state; a recognized payload always suspends on
    /// confirmation, since importing replaces or adds a whole collection.
    pub fn import(&self, payload: &str) -> Result<Outcome> {
        let document = format::import::parse(payload)?;
        tracing::debug!(format = ?document.format, "import payload classified");
        Ok(Outcome::ConfirmationRequired(PendingAction::Import(
            document,
        )))
    }

    async fn import_now(&mut self, document: ImportDocument) -> Result<SessionEvent> {
        let format = document.format;
        let name = document.collection.name.clone();
        match format {
            ImportFormat::Postman => {
                // A Postman import becomes a brand-new collection; the one
                // currently open is never overwritten.
                let collection = document.collection;
                let info = CollectionInfo {
                    id: collection.id.clone(),
                    name: collection.name.clone(),
                    description: collection.description.clone(),
                };
                let result = self.gateway.create_collection(&info).await;
                self.check(result).context("import failed")?;
                self.persist_forest(&collection.id, None, &collection.items)
                    .await?;

                self.refresh_collections().await?;
                self.load_collection(&collection.id).await?;
            }
            ImportFormat::LegacyItems | ImportFormat::LegacyEndpoints => {
                // Native shapes replace the live tree locally; the open
                // collection keeps its identity.
                self.collection.name = document.collection.name;
                self.collection.description = document.collection.description;
                self.collection.items = document.collection.items;
                self.drafts.select_discarding(None, &self.collection);
            }
        }
        tracing::info!(?format, name = %name, "collection imported");
        Ok(SessionEvent::Imported { format, name })
    }

    /// Persist an imported forest depth-first, parents before children.
    fn persist_forest<'a>(
        &'a mut self,
        collection_id: &'a str,
        parent: Option<NodeId>,
        items: &'a [Node],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            for node in items {
                match node {
                    Node::Folder(folder) => {
                        let payload =
                            FolderCreate::from_folder(collection_id, parent.as_ref(), folder);
                        let result = self.gateway.create_folder(&payload).await;
                        self.check(result).context("import failed")?;
                        self.persist_forest(
                            collection_id,
                            Some(folder.id.clone()),
                            &folder.items,
                        )
                        .await?;
                    }
                    Node::Request(request) => {
                        let payload =
                            RequestCreate::from_request(collection_id, parent.as_ref(), request);
                        let result = self.gateway.create_request(&payload).await;
                        self.check(result).context("import failed")?;
                    }
                }
            }
            Ok(())
        })
    }

    /// The export payload for the live collection. A dirty draft is simply
    /// not part of it; callers that care warn first.
    pub fn export(&self) -> String {
        format::export::to_string(&self.collection)
    }

    // ── Confirmation resume ─────────────────────────────────────────

    /// Resume an action the user confirmed. The pending edits stop counting
    /// as unsaved; the follow-up transition replaces the draft.
    pub async fn proceed(&mut self, action: PendingAction) -> Result<SessionEvent> {
        self.drafts.discard_edits();
        match action {
            PendingAction::Select(id) => {
                self.drafts.select_discarding(id.clone(), &self.collection);
                Ok(SessionEvent::SelectionChanged { id })
            }
            PendingAction::AddRequest(parent) => self.add_request_now(parent).await,
            PendingAction::AddFolder(parent) => self.add_folder_now(parent).await,
            PendingAction::Delete(id) => self.delete_now(id).await,
            PendingAction::Rename { id, name } => self.rename_now(id, name).await,
            PendingAction::SwitchCollection(id) => self.load_collection(&id).await,
            PendingAction::CreateCollection(name) => self.create_collection_now(name).await,
            PendingAction::Import(document) => self.import_now(document).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;

    fn seeded_session() -> Session {
        let mut request = Request::new("Ping");
        request.id = NodeId::from("r1");
        let mut collection = Collection::new("Workspace");
        collection.id = "c1".to_string();
        collection.items.push(Node::Request(request));
        Session::new(Box::new(MockGateway::with_collection(collection)))
    }

    #[tokio::test]
    async fn save_should_persist_before_committing_locally() {
        let mut session = seeded_session();
        session.initialize().await.unwrap();
        session.select(Some("r1".into()));
        session.edit_draft(|target| {
            if let DraftTarget::Node(Node::Request(request)) = target {
                request.url = "http://a".to_string();
            }
        });

        let event = session.save().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::DraftSaved {
                id: Some("r1".into())
            }
        );
        assert!(!session.is_dirty());

        let stored = session.collection().find(&"r1".into()).unwrap();
        assert_eq!(stored.as_request().unwrap().url, "http://a");
    }

    #[tokio::test]
    async fn failed_save_should_leave_tree_and_draft_untouched() {
        let mut request = Request::new("Ping");
        request.id = NodeId::from("r1");
        let mut collection = Collection::new("Workspace");
        collection.id = "c1".to_string();
        collection.items.push(Node::Request(request));

        let gateway = MockGateway::with_collection(collection);
        let mut session = Session::new(Box::new(gateway.clone()));
        session.initialize().await.unwrap();
        session.select(Some("r1".into()));
        session.edit_draft(|target| {
            if let DraftTarget::Node(Node::Request(request)) = target {
                request.url = "http://a".to_string();
            }
        });

        gateway.set_failure(Some("write refused"));
        let err = session.save().await.unwrap_err();
        assert!(format!("{err:#}").contains("write refused"));

        assert!(session.is_dirty());
        let stored = session.collection().find(&"r1".into()).unwrap();
        assert!(stored.as_request().unwrap().url.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_should_reset_the_session() {
        let mut collection = Collection::new("Workspace");
        collection.id = "c1".to_string();

        let gateway = MockGateway::with_collection(collection);
        let mut session = Session::new(Box::new(gateway.clone()));
        session.initialize().await.unwrap();
        assert_eq!(session.current_collection_id(), Some("c1"));

        gateway.set_unauthorized(true);
        let err = session.refresh_collections().await.unwrap_err();
        assert!(format!("{err:#}").contains("session expired"));

        assert!(session.current_collection_id().is_none());
        assert_eq!(session.collection().name, Collection::starter().name);
        assert!(!session.drafts().has_draft());
    }
}

//! # Bluebook - API Collection Manager
//!
//! A headless manager for hierarchical API collections: folders and
//! documented requests, edited through an isolated draft and synchronized
//! with a remote store, with Postman import and `.mb` export.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   guarded actions   ┌──────────────┐
//! │   Caller     │────────────────────►│   Session    │
//! │ (CLI / UI)   │◄────────────────────│              │
//! └──────────────┘  events / pending   │ - Collection │
//!                    confirmations     │ - Drafts     │
//!                                      └──────┬───────┘
//!                                             │ async CRUD
//!                        ┌────────────────────┼────────────────────┐
//!                        ▼                    ▼                    ▼
//!                ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//!                │  Tree ops    │     │ Format       │     │ Persistence  │
//!                │ find/insert/ │     │ adapter      │     │ gateway      │
//!                │ replace/rm   │     │ import/export│     │ (HTTP, mock) │
//!                └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Edits never touch the live tree directly: the draft controller holds a
//! deep copy of one target, and a save persists it remotely before folding
//! it back in. Transitions that would lose unsaved edits suspend on an
//! explicit confirmation outcome instead of prompting.

pub mod cmd_args;
pub mod collection;
pub mod config;
pub mod format;
pub mod gateway;
pub mod session;

// Re-export main types for easy access
pub use collection::{Collection, DraftTarget, Folder, Method, Node, NodeId, Request};
pub use gateway::{GatewayError, HttpGateway, MockGateway, PersistenceGateway};
pub use session::{Outcome, PendingAction, Session, SessionEvent};

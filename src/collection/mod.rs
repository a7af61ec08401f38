//! # Collection Module
//!
//! The canonical tree model and everything that manipulates it locally:
//! node/collection types, recursive tree operations, and the draft editing
//! state machine.

pub mod draft;
pub mod node;
pub mod tree;

pub use draft::{DraftController, DraftTarget, JsonField, SelectOutcome};
pub use node::{Collection, Folder, Method, Node, NodeId, Request};

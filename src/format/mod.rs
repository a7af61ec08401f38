//! # Format Adapter
//!
//! Bidirectional transformation between the canonical tree shape and the
//! interchange formats: Postman collections and the two native shapes on
//! the way in, the `.mb` export shape on the way out.

pub mod export;
pub mod import;

pub use import::{ImportDocument, ImportError, ImportFormat};

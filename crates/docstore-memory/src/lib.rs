//! In-process hierarchical document store.
//!
//! Implements `DocumentService` over a map of named documents guarded by a
//! single async mutex, so every statement applies atomically. The service
//! counts sessions opened and closed, which lets tests assert that a run
//! leaks no handles.

mod document;
mod service;

pub use document::Element;
pub use service::{MemoryService, MemorySession, SessionStats};

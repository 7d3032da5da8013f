//! SurrealDB document store implementation.
//!
//! Each store is a SurrealDB database inside a fixed namespace. The
//! document is the record `document:root`, whose `children` array holds the
//! names of its child elements in document order.

mod classify;
mod service;

pub use service::{SurrealConfig, SurrealService, SurrealSession};

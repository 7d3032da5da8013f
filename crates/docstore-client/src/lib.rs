//! Document store capability abstraction.
//!
//! Provides the `DocumentService` and `Session` traits the stress harness
//! drives, so the same orchestration runs against the in-process store and
//! against a SurrealDB server.

mod credential;
mod error;
mod statement;
mod traits;

pub use credential::Credential;
pub use error::StoreError;
pub use statement::Statement;
pub use traits::{DocumentService, Session};

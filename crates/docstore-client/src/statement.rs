//! Typed mutation statements.
//!
//! Each backend translates a `Statement` into its own query language; the
//! `Display` form is only used for logs and error messages.

use serde::{Deserialize, Serialize};

/// A structural mutation against a store's root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    /// Append one leaf element named `child` under the root.
    InsertChild { store: String, child: String },
    /// Remove the first child element named `child` under the root.
    DeleteFirstChild { store: String, child: String },
    /// Append `count` leaf elements named `child` under the root.
    BulkInsert {
        store: String,
        child: String,
        count: usize,
    },
}

impl Statement {
    /// Name of the store the statement targets.
    pub fn store(&self) -> &str {
        match self {
            Statement::InsertChild { store, .. }
            | Statement::DeleteFirstChild { store, .. }
            | Statement::BulkInsert { store, .. } => store,
        }
    }

    /// Name of the child elements the statement touches.
    pub fn child(&self) -> &str {
        match self {
            Statement::InsertChild { child, .. }
            | Statement::DeleteFirstChild { child, .. }
            | Statement::BulkInsert { child, .. } => child,
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::InsertChild { store, child } => {
                write!(f, "insert <{child}/> into {store}/root")
            }
            Statement::DeleteFirstChild { store, child } => {
                write!(f, "delete ({store}/root/{child})[1]")
            }
            Statement::BulkInsert {
                store,
                child,
                count,
            } => write!(f, "for 1 to {count} insert <{child}/> into {store}/root"),
        }
    }
}

//! Error types for the stress framework.

use docstore_client::StoreError;
use thiserror::Error;

/// Errors that abort a run before any worker starts.
///
/// Failures that happen once workers are running are recorded on the
/// `RunReport` instead.
#[derive(Error, Debug)]
pub enum StressError {
    /// Bad client/run counts or an impossible scenario sizing.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Store creation or precondition setup failed.
    #[error("Setup of store '{store}' failed: {source}")]
    Setup {
        store: String,
        #[source]
        source: StoreError,
    },
}

impl StressError {
    pub(crate) fn setup(store: &str, source: StoreError) -> Self {
        StressError::Setup {
            store: store.to_string(),
            source,
        }
    }
}

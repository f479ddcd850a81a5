//! Error type for the suggestion service.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Failures outside the tree itself. Tree operations never fail.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The corpus file is missing, unreadable or not UTF-8.
    #[error("failed to read corpus {}: {source}", path.display())]
    Corpus {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The HTTP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested listen address
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// A background reload task panicked or was cancelled.
    #[error("reload task failed: {0}")]
    Reload(#[from] tokio::task::JoinError),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, SuggestError>;

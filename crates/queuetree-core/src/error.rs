// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for queuetree.

use thiserror::Error;

/// Top-level error type for all queuetree operations.
#[derive(Debug, Error)]
pub enum QueueTreeError {
    // -- Remote errors --
    #[error("cannot connect to {host}: {reason}")]
    ConnectFailure { host: String, reason: String },

    #[error("{host} does not support {operation}")]
    UnsupportedOperation { host: String, operation: String },

    #[error("IPP request failed: {0}")]
    IppRequest(String),

    #[error("queue {name} not found on {host}")]
    QueueNotFound { host: String, name: String },

    // -- Local errors --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueueTreeError {
    /// Whether this error came from a remote host.
    ///
    /// Remote errors met while following a class or a backend reference turn
    /// that branch into a leaf; they never abort sibling branches.
    pub fn collapses_branch(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailure { .. }
                | Self::UnsupportedOperation { .. }
                | Self::IppRequest(_)
                | Self::QueueNotFound { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QueueTreeError>;

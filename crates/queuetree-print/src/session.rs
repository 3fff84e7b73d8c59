// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Connection abstraction consumed by the topology resolver.
//
// A `Connector` opens a `Session` to a named host; the session answers the
// three queries the walk needs.  Sessions are plain values handed down the
// recursion, so there is no process-wide "current server".

// The resolver drives these futures on one task, so no `Send` bound is needed.
#![allow(async_fn_in_trait)]

use queuetree_core::error::Result;
use queuetree_core::types::{ClassTable, QueueAttrs, QueueTable};

/// An open session with one print server.
pub trait Session {
    /// The host this session talks to.
    fn host(&self) -> &str;

    /// Every printer and class on the host, in the order reported.
    async fn list_printers(&self) -> Result<QueueTable>;

    /// Class name to ordered member names.
    async fn list_classes(&self) -> Result<ClassTable>;

    /// Attributes of a single queue.
    async fn get_printer_attributes(&self, name: &str) -> Result<QueueAttrs>;
}

/// Opens sessions to print servers.
pub trait Connector {
    type Session: Session;

    /// Connect to `host`.
    ///
    /// Fails with `QueueTreeError::ConnectFailure` when the host cannot be
    /// reached.  Every call opens a fresh session.
    async fn connect(&self, host: &str) -> Result<Self::Session>;
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory print network.
//
// Holds a fixed set of hosts with their printer and class tables and serves
// them through the same `Connector`/`Session` traits as the IPP client.  A
// network can be loaded from a JSON snapshot, which lets a recorded topology
// be rendered offline.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use queuetree_core::error::{QueueTreeError, Result};
use queuetree_core::types::{ClassTable, QueueAttrs, QueueTable};

use crate::session::{Connector, Session};

/// One simulated print server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHost {
    #[serde(default)]
    pub printers: QueueTable,
    #[serde(default)]
    pub classes: ClassTable,
    /// Refuse connections, as a host that is down would.
    #[serde(default)]
    pub unreachable: bool,
    /// Reject the CUPS enumeration operations, as a plain IPP printer would.
    #[serde(default)]
    pub unsupported: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a queue with explicit attributes.
    pub fn queue(mut self, name: &str, attrs: QueueAttrs) -> Self {
        self.printers.insert(name, attrs);
        self
    }

    /// Add a simple printer.
    pub fn printer(self, name: &str, device_uri: &str, info: Option<&str>) -> Self {
        self.queue(name, QueueAttrs::printer(device_uri, info))
    }

    /// Add a local class.  Like CUPS, the class is listed among the printers
    /// as well as in the class table.
    pub fn class(mut self, name: &str, members: &[&str]) -> Self {
        self.printers.insert(name, QueueAttrs::class(""));
        self.members(name, members)
    }

    /// Set the member list of a class without touching the printer table.
    pub fn members(mut self, name: &str, members: &[&str]) -> Self {
        self.classes.insert(
            name.to_owned(),
            members.iter().map(|m| (*m).to_owned()).collect(),
        );
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn unsupported(mut self) -> Self {
        self.unsupported = true;
        self
    }
}

/// A `Connector` over a fixed map of hosts.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryConnector {
    hosts: HashMap<String, MemoryHost>,
    /// Hosts passed to `connect`, in call order.
    #[serde(skip)]
    connects: Mutex<Vec<String>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, name: &str, host: MemoryHost) -> Self {
        self.hosts.insert(name.to_owned(), host);
        self
    }

    /// Load a network snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let connector: Self = serde_json::from_str(&data)?;
        debug!(path = %path.display(), hosts = connector.hosts.len(), "loaded network snapshot");
        Ok(connector)
    }

    /// Every host `connect` has been called with so far.
    pub fn connect_log(&self) -> Vec<String> {
        self.connects
            .lock()
            .expect("connect log lock poisoned")
            .clone()
    }
}

impl Connector for MemoryConnector {
    type Session = MemorySession;

    async fn connect(&self, host: &str) -> Result<MemorySession> {
        self.connects
            .lock()
            .expect("connect log lock poisoned")
            .push(host.to_owned());

        let state = self
            .hosts
            .get(host)
            .filter(|h| !h.unreachable)
            .ok_or_else(|| QueueTreeError::ConnectFailure {
                host: host.to_owned(),
                reason: "connection refused".into(),
            })?;

        Ok(MemorySession {
            host: host.to_owned(),
            state: state.clone(),
        })
    }
}

/// A snapshot of one host taken at connect time.
#[derive(Debug)]
pub struct MemorySession {
    host: String,
    state: MemoryHost,
}

impl MemorySession {
    fn check_supported(&self, operation: &str) -> Result<()> {
        if self.state.unsupported {
            return Err(QueueTreeError::UnsupportedOperation {
                host: self.host.clone(),
                operation: operation.into(),
            });
        }
        Ok(())
    }
}

impl Session for MemorySession {
    fn host(&self) -> &str {
        &self.host
    }

    async fn list_printers(&self) -> Result<QueueTable> {
        self.check_supported("CUPS-Get-Printers")?;
        Ok(self.state.printers.clone())
    }

    async fn list_classes(&self) -> Result<ClassTable> {
        self.check_supported("CUPS-Get-Classes")?;
        Ok(self.state.classes.clone())
    }

    async fn get_printer_attributes(&self, name: &str) -> Result<QueueAttrs> {
        self.state
            .printers
            .get(name)
            .cloned()
            .ok_or_else(|| QueueTreeError::QueueNotFound {
                host: self.host.clone(),
                name: name.to_owned(),
            })
    }
}

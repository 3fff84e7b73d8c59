// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: queues, the per-host printer/class tables, and the nodes
// emitted while walking the queue topology.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The attributes of a queue that the topology walk consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueAttrs {
    /// Whether the queue is a class (a grouping of member queues).
    #[serde(default)]
    pub is_class: bool,
    /// The backend the queue prints through (`device-uri`).
    #[serde(default)]
    pub device_uri: String,
    /// Descriptive text (`printer-info`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl QueueAttrs {
    pub fn printer(device_uri: impl Into<String>, info: Option<&str>) -> Self {
        Self {
            is_class: false,
            device_uri: device_uri.into(),
            info: info.map(String::from),
        }
    }

    pub fn class(device_uri: impl Into<String>) -> Self {
        Self {
            is_class: true,
            device_uri: device_uri.into(),
            info: None,
        }
    }
}

/// A named queue as reported by one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub name: String,
    #[serde(flatten)]
    pub attrs: QueueAttrs,
}

/// Printers reported by a host, in the order the host reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Queue>", into = "Vec<Queue>")]
pub struct QueueTable {
    queues: Vec<Queue>,
    index: HashMap<String, usize>,
}

impl QueueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a queue, replacing the attributes of an existing entry with the
    /// same name in place.
    pub fn insert(&mut self, name: impl Into<String>, attrs: QueueAttrs) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&slot) => self.queues[slot].attrs = attrs,
            None => {
                self.index.insert(name.clone(), self.queues.len());
                self.queues.push(Queue { name, attrs });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&QueueAttrs> {
        self.index.get(name).map(|&slot| &self.queues[slot].attrs)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Queue> {
        self.queues.iter()
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

impl From<Vec<Queue>> for QueueTable {
    fn from(queues: Vec<Queue>) -> Self {
        let mut table = Self::new();
        for queue in queues {
            table.insert(queue.name, queue.attrs);
        }
        table
    }
}

impl From<QueueTable> for Vec<Queue> {
    fn from(table: QueueTable) -> Self {
        table.queues
    }
}

impl FromIterator<(String, QueueAttrs)> for QueueTable {
    fn from_iter<I: IntoIterator<Item = (String, QueueAttrs)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, attrs) in iter {
            table.insert(name, attrs);
        }
        table
    }
}

/// Class name to ordered member names, as reported by one host.
pub type ClassTable = HashMap<String, Vec<String>>;

/// Why a node was rendered without being expanded further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeMarker {
    /// The node is already on the current path; expanding it would loop.
    Cycle,
    /// Expansion stopped at the configured maximum depth.
    DepthLimit,
}

impl NodeMarker {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cycle => "cycle",
            Self::DepthLimit => "depth limit",
        }
    }
}

/// One visited queue in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Expansion and remote-follow steps from the top-level queue.
    pub depth: usize,
    /// The host that reported this queue.
    pub host: String,
    pub name: String,
    pub is_class: bool,
    /// Device URI, present for simple printers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<NodeMarker>,
}

impl TreeNode {
    /// Build the node for a queue at `depth` on `host`.
    ///
    /// Classes carry no device URI or info; those are only shown for simple
    /// printers.
    pub fn visit(depth: usize, host: &str, name: &str, attrs: &QueueAttrs) -> Self {
        let (device_uri, info) = if attrs.is_class {
            (None, None)
        } else {
            (Some(attrs.device_uri.clone()), attrs.info.clone())
        };
        Self {
            depth,
            host: host.to_owned(),
            name: name.to_owned(),
            is_class: attrs.is_class,
            device_uri,
            info,
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: NodeMarker) -> Self {
        self.marker = Some(marker);
        self
    }
}

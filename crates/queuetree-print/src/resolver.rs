// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Depth-first resolution of the queue topology.
//
// Starting from one queue on one host, classes are expanded into their member
// queues and queues whose backend is `ipp://` are followed to the server they
// forward to.  Nodes are emitted in pre-order.  Remote failures turn the
// branch into a leaf and never abort siblings.

use tracing::{debug, error, warn};

use queuetree_core::config::TreeConfig;
use queuetree_core::error::Result;
use queuetree_core::types::{ClassTable, NodeMarker, QueueAttrs, QueueTable, TreeNode};

use crate::backend_uri::{HostRef, parse_backend_host};
use crate::session::{Connector, Session};

/// Printer and class tables fetched from one host.
#[derive(Debug, Clone, Default)]
pub struct HostTables {
    pub printers: QueueTable,
    pub classes: ClassTable,
}

impl HostTables {
    /// Fetch both tables over an open session.
    pub async fn fetch<S: Session>(session: &S) -> Result<Self> {
        let printers = session.list_printers().await?;
        let classes = session.list_classes().await?;
        debug!(
            host = %session.host(),
            printers = printers.len(),
            classes = classes.len(),
            "fetched queue tables"
        );
        Ok(Self { printers, classes })
    }
}

/// Knobs for a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Follow `ipp://` backends onto other hosts.
    pub follow_remote: bool,
    /// Nodes at this depth are rendered but not expanded.
    pub max_depth: Option<usize>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            follow_remote: true,
            max_depth: None,
        }
    }
}

impl From<&TreeConfig> for ResolveOptions {
    fn from(config: &TreeConfig) -> Self {
        Self {
            follow_remote: config.follow_remote,
            max_depth: config.max_depth,
        }
    }
}

/// Walks queues, connecting to further hosts through a [`Connector`].
pub struct Resolver<'a, C> {
    connector: &'a C,
    options: ResolveOptions,
}

/// `(host, queue)` pairs from the top-level queue down to the current node.
type Path = Vec<(String, String)>;

impl<'a, C: Connector> Resolver<'a, C> {
    pub fn new(connector: &'a C, options: ResolveOptions) -> Self {
        Self { connector, options }
    }

    /// Resolve one queue on `host` and everything reachable below it.
    ///
    /// `tables` must be the tables of `host`.  The returned nodes are in
    /// pre-order, starting with the queue itself at `depth`.
    pub async fn resolve(
        &self,
        host: &str,
        name: &str,
        attrs: &QueueAttrs,
        depth: usize,
        tables: &HostTables,
    ) -> Vec<TreeNode> {
        let mut nodes = Vec::new();
        let mut path = Path::new();
        self.walk(host, name, attrs, depth, tables, &mut path, &mut nodes)
            .await;
        nodes
    }

    #[allow(clippy::too_many_arguments)]
    async fn walk(
        &self,
        host: &str,
        name: &str,
        attrs: &QueueAttrs,
        depth: usize,
        tables: &HostTables,
        path: &mut Path,
        out: &mut Vec<TreeNode>,
    ) {
        let node = TreeNode::visit(depth, host, name, attrs);

        if path.iter().any(|(h, n)| h == host && n == name) {
            warn!(host = %host, queue = %name, depth, "queue loops back onto its own path");
            out.push(node.with_marker(NodeMarker::Cycle));
            return;
        }

        let remote = self.remote_target(&attrs.device_uri);
        let members = if attrs.is_class && remote.is_none() {
            tables.classes.get(name)
        } else {
            None
        };
        let expandable = remote.is_some() || members.is_some_and(|m| !m.is_empty());

        if expandable && self.options.max_depth.is_some_and(|max| depth >= max) {
            debug!(host = %host, queue = %name, depth, "depth limit reached");
            out.push(node.with_marker(NodeMarker::DepthLimit));
            return;
        }

        out.push(node);
        path.push((host.to_owned(), name.to_owned()));

        if let Some(target) = remote {
            self.follow(&target, name, depth, path, out).await;
        } else if let Some(members) = members {
            for member in members {
                self.expand_member(host, member, depth + 1, tables, path, out)
                    .await;
            }
        } else if attrs.is_class {
            debug!(host = %host, class = %name, "class has no member list");
        }

        path.pop();
    }

    async fn expand_member(
        &self,
        host: &str,
        member: &str,
        depth: usize,
        tables: &HostTables,
        path: &mut Path,
        out: &mut Vec<TreeNode>,
    ) {
        let attrs = match tables.printers.get(member) {
            Some(attrs) => attrs.clone(),
            None if tables.classes.contains_key(member) => QueueAttrs::class(""),
            None => {
                warn!(host = %host, member = %member, "class member not reported by host");
                out.push(TreeNode {
                    depth,
                    host: host.to_owned(),
                    name: member.to_owned(),
                    is_class: false,
                    device_uri: None,
                    info: None,
                    marker: None,
                });
                return;
            }
        };
        Box::pin(self.walk(host, member, &attrs, depth, tables, path, out)).await;
    }

    /// Cross to the server a backend forwards to and resolve the same queue
    /// name there, one level deeper.
    async fn follow(
        &self,
        target: &HostRef,
        name: &str,
        depth: usize,
        path: &mut Path,
        out: &mut Vec<TreeNode>,
    ) {
        debug!(host = %target.host, resource = %target.resource, queue = %name, "following IPP backend");
        match self.fetch_remote(&target.host, name).await {
            Ok((tables, attrs)) => {
                Box::pin(self.walk(&target.host, name, &attrs, depth + 1, &tables, path, out))
                    .await;
            }
            Err(e) if e.collapses_branch() => {
                warn!(host = %target.host, queue = %name, error = %e, "remote branch collapsed to a leaf");
            }
            Err(e) => {
                error!(host = %target.host, queue = %name, error = %e, "remote branch aborted");
            }
        }
    }

    /// Open a session, snapshot the host's tables and the queue's attributes,
    /// and close the session again before recursing.
    async fn fetch_remote(&self, host: &str, name: &str) -> Result<(HostTables, QueueAttrs)> {
        let session = self.connector.connect(host).await?;
        let tables = HostTables::fetch(&session).await?;
        let attrs = session.get_printer_attributes(name).await?;
        Ok((tables, attrs))
    }

    fn remote_target(&self, device_uri: &str) -> Option<HostRef> {
        if !self.options.follow_remote {
            return None;
        }
        parse_backend_host(device_uri).ok()
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Top-level entry point: resolve every queue on a starting host.

use tracing::{info, instrument};

use queuetree_core::config::TreeConfig;
use queuetree_core::error::Result;
use queuetree_core::types::TreeNode;

use crate::resolver::{HostTables, ResolveOptions, Resolver};
use crate::session::Connector;

/// Walk the full topology reachable from `host`.
///
/// With no host the configured default (normally `localhost`) is used.  Every
/// queue the starting host reports is resolved at depth 0, in the order the
/// host reported them.  Failing to reach or enumerate the starting host is the
/// only error; anything that goes wrong further down only shortens a branch.
#[instrument(skip(connector, config))]
pub async fn discover<C: Connector>(
    connector: &C,
    host: Option<&str>,
    config: &TreeConfig,
) -> Result<Vec<TreeNode>> {
    let host = host.unwrap_or(&config.default_host);

    let session = connector.connect(host).await?;
    let tables = HostTables::fetch(&session).await?;
    drop(session);

    let resolver = Resolver::new(connector, ResolveOptions::from(config));
    let mut nodes = Vec::new();
    for queue in tables.printers.iter() {
        let branch = resolver
            .resolve(host, &queue.name, &queue.attrs, 0, &tables)
            .await;
        nodes.extend(branch);
    }

    info!(host = %host, queues = tables.printers.len(), nodes = nodes.len(), "topology resolved");
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryConnector, MemoryHost};
    use crate::render::TreeRenderer;
    use queuetree_core::error::QueueTreeError;

    fn summary(nodes: &[TreeNode]) -> Vec<(usize, &str, &str)> {
        nodes
            .iter()
            .map(|n| (n.depth, n.host.as_str(), n.name.as_str()))
            .collect()
    }

    fn class_network() -> MemoryConnector {
        MemoryConnector::new().host(
            "s",
            MemoryHost::new()
                .printer("P1", "file:///dev/null", None)
                .class("C1", &["P1", "P2"])
                .printer("P2", "file:///dev/null", None),
        )
    }

    #[tokio::test]
    async fn members_are_expanded_even_when_also_top_level() {
        let nodes = discover(&class_network(), Some("s"), &TreeConfig::default())
            .await
            .unwrap();
        assert_eq!(
            summary(&nodes),
            [
                (0, "s", "P1"),
                (0, "s", "C1"),
                (1, "s", "P1"),
                (1, "s", "P2"),
                (0, "s", "P2"),
            ]
        );
    }

    #[tokio::test]
    async fn forwarded_queue_shows_remote_details() {
        let net = MemoryConnector::new()
            .host(
                "S",
                MemoryHost::new().printer("P3", "ipp://T:631/printers/P3", Some("on S")),
            )
            .host(
                "T",
                MemoryHost::new().printer("P3", "usb://HP/LaserJet", Some("on T")),
            );
        let nodes = discover(&net, Some("S"), &TreeConfig::default())
            .await
            .unwrap();

        let text = TreeRenderer::default().render_tree(&nodes);
        assert_eq!(
            text,
            "* Name:\tP3[@S]\nURI:\tipp://T:631/printers/P3\nInfo:\ton S\n\
             \x20 * Name:\tP3[@T]\n  URI:\tusb://HP/LaserJet\n  Info:\ton T\n\n"
        );
    }

    #[tokio::test]
    async fn unreachable_remote_leaves_siblings_intact() {
        let net = MemoryConnector::new()
            .host(
                "S",
                MemoryHost::new()
                    .printer("P3", "ipp://T:631/printers/P3", None)
                    .printer("P4", "file:///dev/null", None),
            )
            .host("T", MemoryHost::new().unreachable());
        let nodes = discover(&net, Some("S"), &TreeConfig::default())
            .await
            .unwrap();
        assert_eq!(summary(&nodes), [(0, "S", "P3"), (0, "S", "P4")]);
        assert_eq!(net.connect_log(), ["S", "T"]);
    }

    #[tokio::test]
    async fn unreachable_starting_host_is_fatal() {
        let net = MemoryConnector::new().host("S", MemoryHost::new().unreachable());
        let result = discover(&net, Some("S"), &TreeConfig::default()).await;
        assert!(matches!(result, Err(QueueTreeError::ConnectFailure { .. })));
    }

    #[tokio::test]
    async fn default_host_is_used_when_none_given() {
        let net = MemoryConnector::new().host(
            "localhost",
            MemoryHost::new().printer("p", "file:///dev/null", None),
        );
        let nodes = discover(&net, None, &TreeConfig::default()).await.unwrap();
        assert_eq!(summary(&nodes), [(0, "localhost", "p")]);
    }

    #[tokio::test]
    async fn repeated_discovery_is_identical() {
        let net = class_network();
        let config = TreeConfig::default();
        let first = discover(&net, Some("s"), &config).await.unwrap();
        let second = discover(&net, Some("s"), &config).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn demo_snapshot_resolves() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos/network.json");
        let net = MemoryConnector::load(&path).unwrap();
        let nodes = discover(&net, None, &TreeConfig::default())
            .await
            .unwrap();
        assert_eq!(
            summary(&nodes),
            [
                (0, "localhost", "P1"),
                (0, "localhost", "C1"),
                (1, "localhost", "P1"),
                (1, "localhost", "P2"),
                (0, "localhost", "P2"),
                (0, "localhost", "P3"),
                (1, "T", "P3"),
                (0, "localhost", "P5"),
            ]
        );
    }

    #[tokio::test]
    async fn depth_counts_expansion_and_follow_steps() {
        let net = MemoryConnector::new()
            .host(
                "a",
                MemoryHost::new()
                    .class("all", &["fwd"])
                    .printer("fwd", "ipp://b/printers/fwd", None),
            )
            .host(
                "b",
                MemoryHost::new().printer("fwd", "ipp://c/printers/fwd", None),
            )
            .host("c", MemoryHost::new().printer("fwd", "file:///dev/null", None));
        let nodes = discover(&net, Some("a"), &TreeConfig::default())
            .await
            .unwrap();
        assert_eq!(
            summary(&nodes),
            [
                (0, "a", "all"),
                (1, "a", "fwd"),
                (2, "b", "fwd"),
                (3, "c", "fwd"),
                (0, "a", "fwd"),
                (1, "b", "fwd"),
                (2, "c", "fwd"),
            ]
        );
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text rendering of resolved queue nodes.

use std::fmt::Write as _;

use queuetree_core::types::TreeNode;

/// Spaces per depth level unless configured otherwise.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Formats nodes as an indented tree.
///
/// ```text
/// * Name:	lab[@cups.example.com] (class)
///   * Name:	laser[@cups.example.com]
///   URI:	socket://10.0.0.5:9100
///   Info:	Second floor laser
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer {
    indent_width: usize,
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

impl TreeRenderer {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// Render one node.  Simple printers get `URI:` and `Info:` lines below
    /// the name line.  No trailing newline.
    pub fn render(&self, node: &TreeNode) -> String {
        let indent = " ".repeat(self.indent_width * node.depth);
        let mut out = format!("{indent}* Name:\t{}[@{}]", node.name, node.host);
        if node.is_class {
            out.push_str(" (class)");
        }
        if let Some(marker) = node.marker {
            let _ = write!(out, " ({})", marker.label());
        }
        if let Some(uri) = &node.device_uri {
            let _ = write!(out, "\n{indent}URI:\t{uri}");
        }
        if let Some(info) = &node.info {
            let _ = write!(out, "\n{indent}Info:\t{info}");
        }
        out
    }

    /// Render a whole walk.  Each top-level tree is followed by a blank line.
    pub fn render_tree(&self, nodes: &[TreeNode]) -> String {
        let mut out = String::new();
        for (i, node) in nodes.iter().enumerate() {
            if node.depth == 0 && i > 0 {
                out.push('\n');
            }
            out.push_str(&self.render(node));
            out.push('\n');
        }
        if !nodes.is_empty() {
            out.push('\n');
        }
        out
    }
}

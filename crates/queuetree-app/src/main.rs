// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// queuetree — print the printer/class topology reachable from a CUPS server.
//
// Entry point. Initialises logging, loads configuration, resolves the tree,
// and writes it to stdout.

mod cli;

use std::process::ExitCode;

use queuetree_core::config::TreeConfig;
use queuetree_core::error::Result;
use queuetree_core::types::TreeNode;
use queuetree_print::{IppConnector, MemoryConnector, TreeRenderer, discover};

use cli::CommandLine;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CommandLine::parse_args();

    // Logs go to stderr so they never interleave with the tree on stdout.
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "discovery failed");
            eprintln!("queuetree: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &CommandLine) -> Result<()> {
    let mut config = TreeConfig::load(&args.config_path())?;
    args.apply(&mut config);
    tracing::debug!(?config, "configuration loaded");

    let host = args.host.as_deref();
    let nodes = match &args.snapshot {
        Some(path) => discover(&MemoryConnector::load(path)?, host, &config).await?,
        None => discover(&IppConnector::from_config(&config), host, &config).await?,
    };

    print_nodes(&nodes, &config, args.json)
}

fn print_nodes(nodes: &[TreeNode], config: &TreeConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(nodes)?);
    } else {
        print!("{}", TreeRenderer::new(config.indent_width).render_tree(nodes));
    }
    Ok(())
}

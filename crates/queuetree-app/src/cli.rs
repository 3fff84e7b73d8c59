// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use queuetree_core::config::TreeConfig;

#[derive(Debug, Parser)]
#[command(name = "queuetree")]
#[command(about = "Print the printer and class tree of a CUPS server, following IPP backends.")]
pub struct CommandLine {
    /// Starting server (defaults to the configured host, normally localhost)
    pub host: Option<String>,

    /// IPP port on every server
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Render a recorded network snapshot instead of querying servers
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Emit the nodes as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not expand below this depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Do not follow ipp:// backends to other servers
    #[arg(long)]
    pub no_follow: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Where to read the config file from.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(TreeConfig::default_path)
    }

    /// Overlay the flags that were given onto the loaded config.
    pub fn apply(&self, config: &mut TreeConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = Some(max_depth);
        }
        if self.no_follow {
            config.follow_remote = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_optional() {
        let args = CommandLine::try_parse_from(["queuetree"]).unwrap();
        assert_eq!(args.host, None);
        assert!(!args.json);
    }

    #[test]
    fn flags_override_config() {
        let args = CommandLine::try_parse_from([
            "queuetree",
            "cups.example.com",
            "--port",
            "8631",
            "--max-depth",
            "3",
            "--no-follow",
        ])
        .unwrap();
        let mut config = TreeConfig::default();
        args.apply(&mut config);

        assert_eq!(args.host.as_deref(), Some("cups.example.com"));
        assert_eq!(config.port, 8631);
        assert_eq!(config.max_depth, Some(3));
        assert!(!config.follow_remote);
    }

    #[test]
    fn absent_flags_keep_config() {
        let args = CommandLine::try_parse_from(["queuetree"]).unwrap();
        let mut config = TreeConfig {
            port: 1631,
            max_depth: Some(2),
            ..TreeConfig::default()
        };
        args.apply(&mut config);
        assert_eq!(config.port, 1631);
        assert_eq!(config.max_depth, Some(2));
        assert!(config.follow_remote);
    }
}

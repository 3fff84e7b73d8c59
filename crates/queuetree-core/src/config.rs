// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resolver configuration and its JSON persistence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QueueTreeError, Result};

const CONFIG_FILE: &str = "config.json";

/// Settings for a topology walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Host used when no starting host is given.
    pub default_host: String,
    /// IPP port on every host (default 631).
    pub port: u16,
    /// How long to wait for a TCP connection to a host.
    pub connect_timeout_secs: u64,
    /// Spaces of indentation per depth level.
    pub indent_width: usize,
    /// Follow `ipp://` backends onto other hosts.
    pub follow_remote: bool,
    /// Stop expanding below this depth.
    pub max_depth: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            default_host: "localhost".into(),
            port: 631,
            connect_timeout_secs: 10,
            indent_width: 2,
            follow_remote: true,
            max_depth: None,
        }
    }
}

impl TreeConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Load settings from a JSON file.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data)
            .map_err(|e| QueueTreeError::Config(format!("{}: {e}", path.display())))
    }

    /// Write settings as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// The conventional config file location.
    pub fn default_path() -> PathBuf {
        config_dir().join("queuetree").join(CONFIG_FILE)
    }
}

fn config_dir() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    PathBuf::from(".")
}

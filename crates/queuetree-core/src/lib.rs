// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// queuetree — Core types, error definitions, and configuration shared by the
// resolver and the command-line front end.

pub mod config;
pub mod error;
pub mod types;

pub use config::TreeConfig;
pub use error::QueueTreeError;
pub use types::*;

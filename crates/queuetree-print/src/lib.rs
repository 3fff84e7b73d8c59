// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// queuetree print layer — walks the printer/class topology of one or more
// CUPS servers.  Classes are expanded into their members and queues whose
// backend is `ipp://` are followed onto the server they forward to.

pub mod backend_uri;
pub mod discover;
pub mod ipp_client;
pub mod memory;
pub mod render;
pub mod resolver;
pub mod session;

pub use backend_uri::{HostRef, NotRemote, parse_backend_host};
pub use discover::discover;
pub use ipp_client::{IppConnector, IppSession};
pub use memory::{MemoryConnector, MemoryHost};
pub use render::TreeRenderer;
pub use resolver::{HostTables, ResolveOptions, Resolver};
pub use session::{Connector, Session};

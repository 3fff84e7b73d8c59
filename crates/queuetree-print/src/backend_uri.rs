// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parsing of queue `device-uri` strings that forward to another IPP server.
//
// A CUPS queue whose backend is `ipp://host[:port]/resource` relays every job
// to a queue on `host`.  Anything else (usb, socket, file, lpd, ...) is local
// as far as the topology walk is concerned.

use std::fmt;

use thiserror::Error;

/// Backend schemes that name another IPP server.
const BACKEND_SCHEMES: [&str; 2] = ["ipp:", "ipps:"];

/// The device URI does not forward to another IPP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("device URI does not reference a remote IPP server")]
pub struct NotRemote;

/// The server a forwarding backend points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRef {
    /// Host name or address.  IPv6 literals keep their brackets.
    pub host: String,
    /// Explicit port, when the URI carries a numeric one.
    pub port: Option<u16>,
    /// Resource path including the leading `/`, or empty.
    pub resource: String,
}

impl HostRef {
    /// Last non-empty segment of the resource path (`/printers/foo` -> `foo`).
    pub fn queue_name(&self) -> Option<&str> {
        self.resource.rsplit('/').find(|segment| !segment.is_empty())
    }
}

impl fmt::Display for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.host),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Extract the target server from a queue's device URI.
///
/// The scheme is stripped and the host runs up to the port delimiter (`:`)
/// or, failing that, the path delimiter (`/`).  A `:` inside the path is not
/// taken as a port.  With neither present the whole remainder is the host.  Malformed or non-IPP strings give
/// [`NotRemote`], never a panic.
pub fn parse_backend_host(device_uri: &str) -> Result<HostRef, NotRemote> {
    let rest = BACKEND_SCHEMES
        .iter()
        .find_map(|scheme| device_uri.strip_prefix(scheme))
        .ok_or(NotRemote)?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);

    let (authority, resource) = match rest.find('/') {
        Some(slash) => rest.split_at(slash),
        None => (rest, ""),
    };

    let (host, port) = split_host_port(authority);
    if host.is_empty() {
        return Err(NotRemote);
    }

    Ok(HostRef {
        host: host.to_owned(),
        port: port.and_then(|p| p.parse().ok()),
        resource: resource.to_owned(),
    })
}

fn split_host_port(authority: &str) -> (&str, Option<&str>) {
    if authority.starts_with('[')
        && let Some(close) = authority.find(']')
    {
        let (host, after) = authority.split_at(close + 1);
        return (host, after.strip_prefix(':'));
    }
    match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_with_port() {
        let target = parse_backend_host("ipp://host.example.com:631/printers/foo").unwrap();
        assert_eq!(target.host, "host.example.com");
        assert_eq!(target.port, Some(631));
        assert_eq!(target.resource, "/printers/foo");
        assert_eq!(target.queue_name(), Some("foo"));
    }

    #[test]
    fn host_without_port() {
        let target = parse_backend_host("ipp://host.example.com/printers/foo").unwrap();
        assert_eq!(target.host, "host.example.com");
        assert_eq!(target.port, None);
    }

    #[test]
    fn local_backends_are_not_remote() {
        assert_eq!(parse_backend_host("usb://EPSON/Stylus%20D78"), Err(NotRemote));
        assert_eq!(parse_backend_host("file:///dev/null"), Err(NotRemote));
        assert_eq!(parse_backend_host("socket://10.0.0.5:9100"), Err(NotRemote));
        assert_eq!(parse_backend_host(""), Err(NotRemote));
    }

    #[test]
    fn bare_host_without_delimiters() {
        let target = parse_backend_host("ipp://printhost").unwrap();
        assert_eq!(target.host, "printhost");
        assert_eq!(target.resource, "");
        assert_eq!(target.queue_name(), None);
    }

    #[test]
    fn empty_host_is_not_remote() {
        assert_eq!(parse_backend_host("ipp://"), Err(NotRemote));
        assert_eq!(parse_backend_host("ipp:///printers/foo"), Err(NotRemote));
        assert_eq!(parse_backend_host("ipp://:631/printers/foo"), Err(NotRemote));
    }

    #[test]
    fn ipps_scheme_is_remote() {
        let target = parse_backend_host("ipps://secure.example.com:443/ipp/print").unwrap();
        assert_eq!(target.host, "secure.example.com");
        assert_eq!(target.port, Some(443));
        assert_eq!(target.to_string(), "secure.example.com:443");
    }

    #[test]
    fn ipv6_literal_keeps_brackets() {
        let target = parse_backend_host("ipp://[fe80::1]:631/printers/lab").unwrap();
        assert_eq!(target.host, "[fe80::1]");
        assert_eq!(target.port, Some(631));
    }

    #[test]
    fn colon_in_path_is_not_a_port() {
        let target = parse_backend_host("ipp://h/printers/a:b").unwrap();
        assert_eq!(target.host, "h");
        assert_eq!(target.port, None);
        assert_eq!(target.resource, "/printers/a:b");
        assert_eq!(target.queue_name(), Some("a:b"));
    }

    #[test]
    fn non_numeric_port_still_yields_host() {
        let target = parse_backend_host("ipp://host:ipp/printers/foo").unwrap();
        assert_eq!(target.host, "host");
        assert_eq!(target.port, None);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// IPP sessions with CUPS servers.
//
// Uses the `ipp` crate's async API to send:
//   - CUPS-Get-Printers       (CUPS extension, operation 0x4002)
//   - CUPS-Get-Classes        (CUPS extension, operation 0x4005)
//   - Get-Printer-Attributes  (RFC 8011 §4.2.5)
//
// `IppConnector::connect` first checks that the server accepts TCP
// connections so that an unreachable host is reported as such, rather than as
// a failed request further down.

use std::time::Duration;

use ipp::operation::IppOperation;
use ipp::prelude::*;
use tokio::net::TcpStream;
use tracing::{debug, error, instrument};

use queuetree_core::config::TreeConfig;
use queuetree_core::error::{QueueTreeError, Result};
use queuetree_core::types::{ClassTable, QueueAttrs, QueueTable};

use crate::session::{Connector, Session};

/// `printer-type` bit marking a class.  Bit `0x0002` only says the queue is
/// shared from another server and applies to printers as well.
const CUPS_PRINTER_CLASS: i32 = 0x0001;

/// Attributes requested from CUPS-Get-Printers and CUPS-Get-Classes.
const QUEUE_ATTRIBUTES: [&str; 5] = [
    "printer-name",
    "printer-type",
    "device-uri",
    "printer-info",
    "member-names",
];

/// Opens IPP sessions on a fixed port.
#[derive(Debug, Clone)]
pub struct IppConnector {
    port: u16,
    connect_timeout: Duration,
}

impl IppConnector {
    pub fn new(port: u16, connect_timeout: Duration) -> Self {
        Self {
            port,
            connect_timeout,
        }
    }

    pub fn from_config(config: &TreeConfig) -> Self {
        Self::new(config.port, config.connect_timeout())
    }
}

impl Connector for IppConnector {
    type Session = IppSession;

    #[instrument(skip(self), fields(port = self.port))]
    async fn connect(&self, host: &str) -> Result<IppSession> {
        let addr = format!("{host}:{}", self.port);
        let connect_failure = |reason: String| QueueTreeError::ConnectFailure {
            host: host.to_owned(),
            reason,
        };

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| {
                connect_failure(format!(
                    "timed out after {}s",
                    self.connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| connect_failure(e.to_string()))?;
        drop(stream);

        debug!(addr = %addr, "server reachable");
        IppSession::new(host, self.port)
    }
}

/// A session with one CUPS server.
///
/// Each request goes out as its own HTTP exchange; the session only pins the
/// server address.
pub struct IppSession {
    host: String,
    port: u16,
    /// Server root URI, used for the CUPS enumeration operations.
    uri: Uri,
}

impl IppSession {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let uri = parse_uri(&format!("ipp://{host}:{port}/"))?;
        Ok(Self {
            host: host.to_owned(),
            port,
            uri,
        })
    }

    /// URI of a named queue on this server.
    pub fn queue_uri(&self, name: &str) -> String {
        format!("ipp://{}:{}/printers/{name}", self.host, self.port)
    }

    /// Send a CUPS enumeration request and return its printer groups.
    async fn enumerate(&self, operation: Operation, label: &str) -> Result<Vec<QueueRecord>> {
        let request = CupsQuery {
            operation,
            requested: &QUEUE_ATTRIBUTES,
        };
        let client = AsyncIppClient::new(self.uri.clone());

        debug!("sending {label}");
        let response = client
            .send(request)
            .await
            .map_err(|e| QueueTreeError::IppRequest(format!("{label}: {e}")))?;
        self.check_status(&response, label)?;

        let records = queue_records(response.attributes());
        debug!(count = records.len(), "received {label} response");
        Ok(records)
    }

    fn check_status(&self, response: &IppRequestResponse, label: &str) -> Result<()> {
        let code = response.header().status_code();
        if code.is_success() {
            return Ok(());
        }
        if code == StatusCode::ServerErrorOperationNotSupported {
            return Err(QueueTreeError::UnsupportedOperation {
                host: self.host.clone(),
                operation: label.to_owned(),
            });
        }
        error!(status = ?code, "{label} failed");
        Err(QueueTreeError::IppRequest(format!(
            "{label} returned status {code:?}"
        )))
    }
}

impl Session for IppSession {
    fn host(&self) -> &str {
        &self.host
    }

    #[instrument(skip(self), fields(host = %self.host))]
    async fn list_printers(&self) -> Result<QueueTable> {
        let records = self
            .enumerate(Operation::CupsGetPrinters, "CUPS-Get-Printers")
            .await?;
        Ok(records.into_iter().map(|r| (r.name, r.attrs)).collect())
    }

    #[instrument(skip(self), fields(host = %self.host))]
    async fn list_classes(&self) -> Result<ClassTable> {
        let records = self
            .enumerate(Operation::CupsGetClasses, "CUPS-Get-Classes")
            .await?;
        Ok(records.into_iter().map(|r| (r.name, r.members)).collect())
    }

    #[instrument(skip(self), fields(host = %self.host))]
    async fn get_printer_attributes(&self, name: &str) -> Result<QueueAttrs> {
        let uri = parse_uri(&self.queue_uri(name))?;
        let operation = IppOperationBuilder::get_printer_attributes(uri.clone()).build();
        let client = AsyncIppClient::new(uri);

        debug!("sending Get-Printer-Attributes");
        let response = client
            .send(operation)
            .await
            .map_err(|e| QueueTreeError::IppRequest(format!("Get-Printer-Attributes: {e}")))?;

        if response.header().status_code() == StatusCode::ClientErrorNotFound {
            return Err(QueueTreeError::QueueNotFound {
                host: self.host.clone(),
                name: name.to_owned(),
            });
        }
        self.check_status(&response, "Get-Printer-Attributes")?;

        queue_records(response.attributes())
            .into_iter()
            .next()
            .map(|r| r.attrs)
            .ok_or_else(|| QueueTreeError::QueueNotFound {
                host: self.host.clone(),
                name: name.to_owned(),
            })
    }
}

/// A CUPS operation that takes only operation attributes.
struct CupsQuery {
    operation: Operation,
    requested: &'static [&'static str],
}

impl IppOperation for CupsQuery {
    fn into_ipp_request(self) -> IppRequestResponse {
        let mut request = IppRequestResponse::new(self.version(), self.operation, None);
        let keywords = self
            .requested
            .iter()
            .map(|name| IppValue::Keyword((*name).to_owned()))
            .collect();
        request.attributes_mut().add(
            DelimiterTag::OperationAttributes,
            IppAttribute::new("requested-attributes", IppValue::Array(keywords)),
        );
        request
    }
}

fn parse_uri(uri: &str) -> Result<Uri> {
    uri.parse()
        .map_err(|e| QueueTreeError::IppRequest(format!("invalid URI '{uri}': {e}")))
}

// ---------------------------------------------------------------------------
// Helper functions for parsing IPP responses
// ---------------------------------------------------------------------------

/// One printer-attributes group reduced to what the walk consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueueRecord {
    name: String,
    attrs: QueueAttrs,
    members: Vec<String>,
}

/// Read every Printer Attributes group, in response order.
///
/// Groups without a `printer-name` are skipped.
fn queue_records(attrs: &IppAttributes) -> Vec<QueueRecord> {
    let mut records = Vec::new();

    for group in attrs.groups_of(DelimiterTag::PrinterAttributes) {
        let attributes = group.attributes();

        let Some(name) = attributes.get("printer-name").map(|a| a.value().to_string()) else {
            continue;
        };

        let printer_type = attributes
            .get("printer-type")
            .and_then(|a| integer_value(a.value()))
            .unwrap_or(0);

        let device_uri = attributes
            .get("device-uri")
            .map(|a| a.value().to_string())
            .unwrap_or_default();

        let info = attributes
            .get("printer-info")
            .map(|a| a.value().to_string());

        let members = attributes
            .get("member-names")
            .map(|a| string_values(a.value()))
            .unwrap_or_default();

        records.push(QueueRecord {
            name,
            attrs: QueueAttrs {
                is_class: is_class_type(printer_type),
                device_uri,
                info,
            },
            members,
        });
    }

    records
}

fn is_class_type(printer_type: i32) -> bool {
    printer_type & CUPS_PRINTER_CLASS != 0
}

fn integer_value(value: &IppValue) -> Option<i32> {
    match value {
        IppValue::Integer(n) | IppValue::Enum(n) => Some(*n),
        _ => None,
    }
}

/// Values of a possibly multi-valued attribute, in order.
fn string_values(value: &IppValue) -> Vec<String> {
    match value {
        IppValue::Array(values) => values.iter().map(|v| v.to_string()).collect(),
        other => vec![other.to_string()],
    }
}

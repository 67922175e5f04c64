//! Exporter seam for finished hierarchy documents.
//!
//! Serialization formats live outside the engine; consumers implement
//! [`HierarchyExporter`] against whatever sink they target. A JSON writer is
//! provided as the reference implementation and for round-trip testing.

use crate::document::HierarchyDocument;
use std::io::Write;

/// Failure while handing a document to a sink.
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Serialization(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "export I/O failed: {err}"),
            ExportError::Serialization(msg) => write!(f, "export serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Serialization(_) => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

/// Consumes finished documents. Implementations decide the wire format.
pub trait HierarchyExporter {
    fn export(&mut self, document: &HierarchyDocument) -> Result<(), ExportError>;
}

/// Reference exporter writing pretty-printed JSON to any sink.
pub struct JsonExporter<W: Write> {
    sink: W,
}

impl<W: Write> JsonExporter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> HierarchyExporter for JsonExporter<W> {
    fn export(&mut self, document: &HierarchyDocument) -> Result<(), ExportError> {
        let rendered = document
            .to_json()
            .map_err(|err| ExportError::Serialization(err.to_string()))?;
        self.sink.write_all(rendered.as_bytes())?;
        Ok(())
    }
}

//! Core types for the Mural runtime bridge.
//!
//! This component defines the bridge value model, the error taxonomy, the
//! task wire format, and the collaborator interfaces (document, transport,
//! host timer) shared by every other component.

pub mod config;
pub mod document;
pub mod error;
pub mod simple_document;
pub mod task;
pub mod value;

// Re-export main types
pub use config::{HostTimer, SharedConfig};
pub use document::{Document, DocumentFactory, DocumentListener, PhaseSignal};
pub use error::{BridgeError, BridgeResult};
pub use simple_document::{SimpleDocument, SimpleDocumentFactory, SimpleElement};
pub use task::{Task, Transport, WireTask, NO_CALLBACK};
pub use value::{BridgeFunction, BridgeValue};

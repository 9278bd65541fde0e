//! In-memory reference document.
//!
//! A minimal `Document` implementation backing unit and integration tests,
//! and a starting point for embedders without a full virtual-DOM engine.
//! Mutations are staged until `flush_diff` moves them into the listener's
//! update queue, mirroring how a real differ batches work.

use crate::document::{Document, DocumentFactory, DocumentListener};
use crate::error::{BridgeError, BridgeResult};
use crate::task::Task;
use crate::value::{BridgeFunction, BridgeValue};
use std::collections::HashMap;

/// Ref id assigned to the document body.
pub const ROOT_REF: &str = "_root";

/// One element in the simple document.
#[derive(Debug)]
pub struct SimpleElement {
    pub ref_id: String,
    pub element_type: String,
    pub attributes: BridgeValue,
    handlers: HashMap<String, BridgeFunction>,
}

impl SimpleElement {
    fn new(ref_id: &str, element_type: &str) -> Self {
        Self {
            ref_id: ref_id.to_string(),
            element_type: element_type.to_string(),
            attributes: BridgeValue::empty_object(),
            handlers: HashMap::new(),
        }
    }

    /// Installs an event handler for `event_type`.
    pub fn on(&mut self, event_type: &str, handler: BridgeFunction) {
        self.handlers.insert(event_type.to_string(), handler);
    }
}

/// An in-memory document with a queue-backed listener.
#[derive(Debug, Default)]
pub struct SimpleDocument {
    elements: HashMap<String, SimpleElement>,
    root: Option<String>,
    staged: Vec<Task>,
    listener: DocumentListener,
}

impl SimpleDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element under an explicit ref id.
    pub fn insert_element(&mut self, ref_id: &str, element_type: &str) -> &mut SimpleElement {
        self.elements
            .entry(ref_id.to_string())
            .or_insert_with(|| SimpleElement::new(ref_id, element_type))
    }

    /// Returns the element at `ref_id`.
    pub fn element(&self, ref_id: &str) -> Option<&SimpleElement> {
        self.elements.get(ref_id)
    }

    /// Number of staged mutations not yet flushed.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

impl Document for SimpleDocument {
    fn contains(&self, ref_id: &str) -> bool {
        self.elements.contains_key(ref_id)
    }

    fn fire_event(
        &mut self,
        ref_id: &str,
        event_type: &str,
        event: &BridgeValue,
    ) -> BridgeResult<BridgeValue> {
        let element = self
            .elements
            .get(ref_id)
            .ok_or_else(|| BridgeError::invalid(format!("no element at ref {}", ref_id)))?;
        match element.handlers.get(event_type) {
            Some(handler) => Ok(handler.call(event.clone())),
            None => Ok(BridgeValue::Undefined),
        }
    }

    fn update_element(&mut self, ref_id: &str, changes: &BridgeValue) -> BridgeResult<()> {
        let element = self
            .elements
            .get_mut(ref_id)
            .ok_or_else(|| BridgeError::invalid(format!("no element at ref {}", ref_id)))?;
        element.attributes.merge_shallow(changes);
        self.staged.push(Task::new(
            "updateElement",
            vec![BridgeValue::Element(ref_id.to_string()), changes.clone()],
        ));
        Ok(())
    }

    fn create_body(&mut self, component: &str, data: &BridgeValue) -> BridgeResult<String> {
        let element = self.insert_element(ROOT_REF, component);
        element.attributes = data.clone();
        self.root = Some(ROOT_REF.to_string());
        self.staged.push(Task::new(
            "createBody",
            vec![BridgeValue::Object(vec![
                ("ref".to_string(), BridgeValue::string(ROOT_REF)),
                ("type".to_string(), BridgeValue::string(component)),
                ("attr".to_string(), data.clone()),
            ])],
        ));
        Ok(ROOT_REF.to_string())
    }

    fn flush_diff(&mut self) {
        for task in self.staged.drain(..) {
            self.listener.push_update(task);
        }
    }

    fn listener(&mut self) -> &mut DocumentListener {
        &mut self.listener
    }

    fn root_ref(&self) -> Option<&str> {
        self.root.as_deref()
    }
}

/// Factory producing a fresh `SimpleDocument` per instance.
#[derive(Debug, Default)]
pub struct SimpleDocumentFactory;

impl DocumentFactory for SimpleDocumentFactory {
    fn create_document(&self, _instance_id: &str) -> Box<dyn Document> {
        Box::new(SimpleDocument::new())
    }
}

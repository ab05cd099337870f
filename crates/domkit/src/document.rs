//! Arena-backed document tree and the element factory
//!
//! Nodes live in a single `Vec`, addressed by `NodeId`. Creation returns a
//! detached node; attaching it is the caller's `append_child`. Removal only
//! detaches — slots are never reused, so ids stay valid for the document's
//! lifetime.

use crate::error::{DomError, Result};
use crate::events::{
    Event, IntoEvents, IntoListeners, IntoTargets, Listener, ListenerCapability, ListenerRegistry,
};
use crate::name;
use crate::types::{ClientRect, Node, NodeId, ViewportMetrics};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Environment-level choices, resolved once at document construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentConfig {
    pub listener_capability: ListenerCapability,
}

/// A child to append: literal text (becomes a text node) or an existing node.
#[derive(Debug, Clone)]
pub enum Child {
    Text(String),
    Node(NodeId),
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<NodeId> for Child {
    fn from(node: NodeId) -> Self {
        Child::Node(node)
    }
}

/// Everything `create_element` needs: the name string plus optional
/// attributes, ordered children, and an ordered event → listener(s) map.
#[derive(Debug, Default)]
pub struct ElementSpec {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Child>,
    listeners: Vec<(String, SmallVec<[Listener; 1]>)>,
}

impl ElementSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<C: Into<Child>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Bind listener(s) to one event name; scalar or sequence accepted.
    pub fn listen(mut self, event: impl Into<String>, listeners: impl IntoListeners) -> Self {
        self.listeners.push((event.into(), listeners.into_listeners()));
        self
    }
}

/// The document tree plus its listener table and viewport metrics.
pub struct Document {
    nodes: Vec<Node>,
    listeners: ListenerRegistry,
    viewport: ViewportMetrics,
}

impl Document {
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            nodes: Vec::with_capacity(64),
            listeners: ListenerRegistry::new(config.listener_capability),
            viewport: ViewportMetrics::default(),
        }
    }

    /// Number of nodes ever created in this document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, node_id: NodeId) -> Result<&Node> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    pub(crate) fn get_mut(&mut self, node_id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Does this id address a node in this document?
    pub fn is_node(&self, node_id: NodeId) -> bool {
        (node_id as usize) < self.nodes.len()
    }

    /// Does this id address an element node?
    pub fn is_element(&self, node_id: NodeId) -> bool {
        self.get(node_id).map(Node::is_element).unwrap_or(false)
    }

    pub fn children(&self, node_id: NodeId) -> Result<Vec<&Node>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    pub fn parent(&self, node_id: NodeId) -> Result<Option<&Node>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Shorthand for [`Document::create_element`] with a bare name string.
    pub fn create(&mut self, name: &str) -> Result<NodeId> {
        self.create_element(ElementSpec::new(name))
    }

    /// Build a fully wired, detached element from a spec.
    ///
    /// A name that resolves no tag fails with [`DomError::InvalidName`] before
    /// anything is allocated. Later steps are a linear builder, not a
    /// transaction.
    pub fn create_element(&mut self, spec: ElementSpec) -> Result<NodeId> {
        let parsed = name::parse(&spec.name)?;
        debug!(name = %spec.name, tag = %parsed.tag, "create element");

        let node_id = self.alloc(Node::new_element(
            self.next_id(),
            parsed.tag,
            parsed.namespace,
        ));

        if let Some(id) = parsed.id {
            if !id.is_empty() {
                self.set_attribute(node_id, "id", id)?;
            }
        }
        for class in parsed.class_names {
            self.add_class(node_id, &class)?;
        }

        self.set_attributes(node_id, spec.attributes)?;
        self.append_children(node_id, spec.children)?;
        for (event, listeners) in spec.listeners {
            self.add_listener(node_id, event, listeners);
        }

        Ok(node_id)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new_text(self.next_id(), text.into(), None))
    }

    /// Append one child. Text becomes a text node, created under the parent's
    /// namespace when the parent is namespaced; an existing node is moved from
    /// wherever it was.
    pub fn append_child(&mut self, parent_id: NodeId, child: impl Into<Child>) -> Result<()> {
        let parent = self.get(parent_id)?;
        if !parent.is_element() {
            return Err(DomError::NotAnElement(parent_id));
        }
        let child_id = match child.into() {
            Child::Text(text) => {
                let namespace = parent.namespace.clone();
                self.alloc(Node::new_text(self.next_id(), text, namespace))
            }
            Child::Node(child_id) => {
                self.get(child_id)?;
                child_id
            }
        };
        self.attach(parent_id, child_id);
        Ok(())
    }

    /// Append children in order.
    pub fn append_children<C: Into<Child>>(
        &mut self,
        parent_id: NodeId,
        children: impl IntoIterator<Item = C>,
    ) -> Result<()> {
        for child in children {
            self.append_child(parent_id, child)?;
        }
        Ok(())
    }

    /// Detach a node from its parent. Unknown or already-detached nodes are a
    /// silent no-op.
    pub fn remove_element(&mut self, node_id: NodeId) {
        if !self.is_node(node_id) {
            return;
        }
        if self.nodes[node_id as usize].parent_id.is_some() {
            debug!(node = node_id, "remove element");
            self.detach(node_id);
        }
    }

    pub fn remove_elements(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        for node_id in nodes {
            self.remove_element(node_id);
        }
    }

    /// Detach every child of a node. Unknown nodes are a silent no-op.
    pub fn empty_element(&mut self, node_id: NodeId) {
        if !self.is_node(node_id) {
            return;
        }
        let children: SmallVec<[NodeId; 4]> =
            std::mem::take(&mut self.nodes[node_id as usize].children_ids);
        for child_id in children {
            self.nodes[child_id as usize].parent_id = None;
        }
    }

    /// Set one attribute via the generic primitive; no special-casing of
    /// attribute names.
    pub fn set_attribute(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if !node.is_element() {
            return Err(DomError::NotAnElement(node_id));
        }
        node.attributes.insert(key.into(), value.into());
        Ok(())
    }

    pub fn set_attributes<K: Into<String>, V: Into<String>>(
        &mut self,
        node_id: NodeId,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> Result<()> {
        for (key, value) in attributes {
            self.set_attribute(node_id, key, value)?;
        }
        Ok(())
    }

    /// Add one class token, preserving pre-existing tokens.
    pub fn add_class(&mut self, node_id: NodeId, class: &str) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if !node.is_element() {
            return Err(DomError::NotAnElement(node_id));
        }
        let value = match node.attr("class") {
            Some(existing) => format!("{existing} {class}"),
            None => class.to_string(),
        };
        node.attributes.insert("class".to_string(), value);
        Ok(())
    }

    /// Record a measurement for a node, the way a host layout pass would.
    pub fn set_client_rect(&mut self, node_id: NodeId, rect: ClientRect) -> Result<()> {
        self.get_mut(node_id)?.client_rect = Some(rect);
        Ok(())
    }

    pub fn set_viewport(&mut self, metrics: ViewportMetrics) {
        self.viewport = metrics;
    }

    pub fn viewport(&self) -> &ViewportMetrics {
        &self.viewport
    }

    /// Register every (target, event, listener) triple from the three
    /// scalar-or-sequence arguments: targets outer, events middle, listeners
    /// inner. No deduplication.
    pub fn add_listener(
        &mut self,
        targets: impl IntoTargets,
        events: impl IntoEvents,
        listeners: impl IntoListeners,
    ) {
        let targets = targets.into_targets();
        let events = events.into_events();
        let listeners = listeners.into_listeners();
        for &target in &targets {
            for event in &events {
                for listener in &listeners {
                    trace!(target, event = %event, "add listener");
                    self.listeners.add(target, event, listener.clone());
                }
            }
        }
    }

    /// Remove every matching triple, one live binding each.
    pub fn remove_listener(
        &mut self,
        targets: impl IntoTargets,
        events: impl IntoEvents,
        listeners: impl IntoListeners,
    ) {
        let targets = targets.into_targets();
        let events = events.into_events();
        let listeners = listeners.into_listeners();
        for &target in &targets {
            for event in &events {
                for listener in &listeners {
                    trace!(target, event = %event, "remove listener");
                    self.listeners.remove(target, event, listener);
                }
            }
        }
    }

    /// Map-style entry point: each key is one single-event broadcast across
    /// all targets.
    pub fn add_listeners<E: Into<String>, L: IntoListeners>(
        &mut self,
        targets: impl IntoTargets,
        event_map: impl IntoIterator<Item = (E, L)>,
    ) {
        let targets = targets.into_targets();
        for (event, listeners) in event_map {
            self.add_listener(targets.clone(), event.into(), listeners.into_listeners());
        }
    }

    pub fn remove_listeners<E: Into<String>, L: IntoListeners>(
        &mut self,
        targets: impl IntoTargets,
        event_map: impl IntoIterator<Item = (E, L)>,
    ) {
        let targets = targets.into_targets();
        for (event, listeners) in event_map {
            self.remove_listener(targets.clone(), event.into(), listeners.into_listeners());
        }
    }

    /// Live bindings on a target, across all events.
    pub fn listener_count(&self, target: NodeId) -> usize {
        self.listeners.binding_count(target)
    }

    /// Fire an event at a target: its listeners in registration order, then
    /// the ancestors' (bubbling), until a listener stops propagation.
    pub fn dispatch(&self, target: NodeId, event: &mut Event) -> Result<()> {
        self.get(target)?;
        event.target = Some(target);
        trace!(target, event = %event.name, "dispatch");

        let mut current = Some(target);
        while let Some(node_id) = current {
            for listener in self.listeners.listeners_for(node_id, &event.name) {
                listener.call(event);
            }
            if event.propagation_stopped() {
                break;
            }
            current = self.nodes[node_id as usize].parent_id;
        }
        Ok(())
    }

    fn next_id(&self) -> NodeId {
        self.nodes.len() as NodeId
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let node_id = node.node_id;
        self.nodes.push(node);
        node_id
    }

    fn attach(&mut self, parent_id: NodeId, child_id: NodeId) {
        self.detach(child_id);
        self.nodes[child_id as usize].parent_id = Some(parent_id);
        self.nodes[parent_id as usize].children_ids.push(child_id);
    }

    fn detach(&mut self, child_id: NodeId) {
        if let Some(parent_id) = self.nodes[child_id as usize].parent_id.take() {
            let siblings = &mut self.nodes[parent_id as usize].children_ids;
            if let Some(pos) = siblings.iter().position(|&id| id == child_id) {
                siblings.remove(pos);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

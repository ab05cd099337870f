//! Core type definitions for the document tree
//!
//! Key design principles:
//! 1. Use u32 indices into the arena, not pointers
//! 2. Use SmallVec for child lists (most nodes have few children)
//! 3. Keep nodes plain data; behavior lives on `Document`

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into the document arena).
pub type NodeId = u32;

/// Node type, numbered per the DOM specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            3 => Some(NodeType::Text),
            _ => None,
        }
    }
}

/// Raw recorded measurement for a node, the shape a host rectangle query
/// reports. Any field may be 0.0 when the measuring environment omits it;
/// [`crate::geometry::element_bounds`] normalizes those.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl ClientRect {
    /// Rectangle from its four edges; `x`/`y`/`width`/`height` left at 0.0,
    /// the way legacy environments report.
    pub fn from_edges(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
            ..Self::default()
        }
    }

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            top: y,
            left: x,
            bottom: y + height,
            right: x + width,
        }
    }
}

/// Viewport measurements used by [`crate::geometry::page_bounds`]. A zero
/// dimension means "not reported"; resolution falls through window inner size,
/// body client size, then root element client size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportMetrics {
    pub window_inner_width: f64,
    pub window_inner_height: f64,
    pub body_client_width: f64,
    pub body_client_height: f64,
    pub root_client_width: f64,
    pub root_client_height: f64,
}

/// A node in the document arena.
///
/// Small fixed-size fields first, navigation by index, no back-pointers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    pub node_type: NodeType,

    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    /// Tag name for elements, `"#text"` for text nodes.
    pub node_name: String,
    /// Text content for text nodes, empty for elements.
    pub node_value: String,
    pub attributes: HashMap<String, String>,

    /// Namespace URI the node was created under, if any. Recorded at creation
    /// so descendants can test "am I inside an SVG-like namespace" when text
    /// nodes are made.
    pub namespace: Option<String>,

    /// Last recorded measurement, if the caller has measured this node.
    pub client_rect: Option<ClientRect>,
}

impl Node {
    pub fn new_element(node_id: NodeId, tag: String, namespace: Option<String>) -> Self {
        Self {
            node_id,
            node_type: NodeType::Element,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: tag,
            node_value: String::new(),
            attributes: HashMap::new(),
            namespace,
            client_rect: None,
        }
    }

    pub fn new_text(node_id: NodeId, text: String, namespace: Option<String>) -> Self {
        Self {
            node_id,
            node_type: NodeType::Text,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: "#text".to_string(),
            node_value: text,
            attributes: HashMap::new(),
            namespace,
            client_rect: None,
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Class tokens, split from the `class` attribute. Empty when unset.
    /// Tokens are kept verbatim, including empty ones the name grammar
    /// produced.
    pub fn class_list(&self) -> Vec<&str> {
        match self.attr("class") {
            Some(value) => value.split(' ').collect(),
            None => Vec::new(),
        }
    }
}

/// Commonly used key codes.
pub mod key_codes {
    pub const ESCAPE: u32 = 27;
    pub const ENTER: u32 = 13;
    pub const TAB: u32 = 9;
    pub const DELETE: u32 = 46;
    pub const BACKSPACE: u32 = 8;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
}

//! Markup serializer — render a subtree as markup text
//!
//! Namespace-aware: a node created under a namespace gets an `xmlns`
//! declaration where it enters the tree. Attributes beyond `id`/`class` are
//! emitted in sorted order, so output is deterministic.

use crate::document::Document;
use crate::error::Result;
use crate::types::{Node, NodeId};

/// Elements with no closing tag in plain HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// Emit `xmlns` on nodes whose namespace differs from their parent's.
    pub namespace_declarations: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            namespace_declarations: true,
        }
    }
}

/// Renders document subtrees to markup.
pub struct Serializer {
    config: SerializerConfig,
}

impl Serializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize the subtree rooted at `node_id`.
    pub fn serialize(&self, doc: &Document, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.serialize_node(doc, node_id, None, &mut output)?;
        Ok(output)
    }

    fn serialize_node(
        &self,
        doc: &Document,
        node_id: NodeId,
        parent_namespace: Option<&str>,
        output: &mut String,
    ) -> Result<()> {
        let node = doc.get(node_id)?;
        if node.is_text() {
            output.push_str(&escape_text(&node.node_value));
            return Ok(());
        }

        output.push('<');
        output.push_str(&node.node_name);
        if self.config.namespace_declarations {
            if let Some(namespace) = &node.namespace {
                if parent_namespace != Some(namespace.as_str()) {
                    output.push_str(&format!(" xmlns=\"{}\"", escape_attr(namespace)));
                }
            }
        }
        for (key, value) in ordered_attributes(node) {
            output.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
        }

        let namespace = node.namespace.as_deref();
        if node.children_ids.is_empty() {
            if namespace.is_some() {
                output.push_str("/>");
            } else if VOID_ELEMENTS.contains(&node.node_name.as_str()) {
                output.push('>');
            } else {
                output.push_str(&format!("></{}>", node.node_name));
            }
            return Ok(());
        }

        output.push('>');
        for &child_id in &node.children_ids {
            self.serialize_node(doc, child_id, namespace, output)?;
        }
        output.push_str(&format!("</{}>", node.node_name));
        Ok(())
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// `id` first, `class` second, the rest sorted by key.
fn ordered_attributes(node: &Node) -> Vec<(&str, &str)> {
    let mut ordered = Vec::with_capacity(node.attributes.len());
    for key in ["id", "class"] {
        if let Some(value) = node.attr(key) {
            ordered.push((key, value));
        }
    }
    let mut rest: Vec<(&str, &str)> = node
        .attributes
        .iter()
        .filter(|(key, _)| key.as_str() != "id" && key.as_str() != "class")
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    rest.sort_unstable_by_key(|(key, _)| *key);
    ordered.extend(rest);
    ordered
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementSpec;
    use crate::name::SVG_NAMESPACE;

    #[test]
    fn serializes_element_with_attributes_and_text() {
        let mut doc = Document::new();
        let node = doc
            .create_element(
                ElementSpec::new("div#main.card.featured")
                    .attr("data-x", "1")
                    .child("hello"),
            )
            .unwrap();

        let markup = Serializer::new().serialize(&doc, node).unwrap();
        assert_eq!(
            markup,
            "<div id=\"main\" class=\"card featured\" data-x=\"1\">hello</div>"
        );
    }

    #[test]
    fn serializes_nested_tree_in_child_order() {
        let mut doc = Document::new();
        let list = doc.create("ul.menu").unwrap();
        let first = doc.create_element(ElementSpec::new("li").child("one")).unwrap();
        let second = doc.create_element(ElementSpec::new("li").child("two")).unwrap();
        doc.append_children(list, [first, second]).unwrap();

        let markup = Serializer::new().serialize(&doc, list).unwrap();
        assert_eq!(
            markup,
            "<ul class=\"menu\"><li>one</li><li>two</li></ul>"
        );
    }

    #[test]
    fn namespaced_root_declares_xmlns_once() {
        let mut doc = Document::new();
        let svg = doc.create("svg:svg").unwrap();
        let path = doc.create_element(ElementSpec::new("svg:path").attr("d", "M0 0")).unwrap();
        doc.append_child(svg, path).unwrap();

        let markup = Serializer::new().serialize(&doc, svg).unwrap();
        assert_eq!(
            markup,
            format!("<svg xmlns=\"{SVG_NAMESPACE}\"><path d=\"M0 0\"/></svg>")
        );
    }

    #[test]
    fn namespace_declarations_can_be_disabled() {
        let mut doc = Document::new();
        let svg = doc.create("svg:svg").unwrap();
        let serializer = Serializer::with_config(SerializerConfig {
            namespace_declarations: false,
        });
        assert_eq!(serializer.serialize(&doc, svg).unwrap(), "<svg/>");
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let mut doc = Document::new();
        let br = doc.create("br").unwrap();
        assert_eq!(Serializer::new().serialize(&doc, br).unwrap(), "<br>");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut doc = Document::new();
        let node = doc
            .create_element(
                ElementSpec::new("span")
                    .attr("title", "a \"b\" <c>")
                    .child("1 < 2 & 3 > 2"),
            )
            .unwrap();
        let markup = Serializer::new().serialize(&doc, node).unwrap();
        assert_eq!(
            markup,
            "<span title=\"a &quot;b&quot; &lt;c&gt;\">1 &lt; 2 &amp; 3 &gt; 2</span>"
        );
    }
}

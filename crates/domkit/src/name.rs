//! The element-name mini-grammar
//!
//! `[namespace ":"] tag ["#" id] ["." class ("." class)*]`, e.g.
//! `"svg:path#main.icon.active"`. Delimiter precedence is fixed (namespace,
//! then id-or-tag, then classes) and is a compatibility contract with existing
//! name strings, quirks included: `"#main"` resolves `main` as the tag, and
//! empty dot-segments become empty class tokens.

use crate::error::{DomError, Result};
use serde::{Deserialize, Serialize};

/// XML namespace URI for SVG elements.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Namespace key → URI table. Read-only; unresolved keys fall back to plain
/// (un-namespaced) creation.
const NAMESPACES: &[(&str, &str)] = &[("svg", SVG_NAMESPACE)];

/// Resolve a namespace key from the static table.
pub fn lookup_namespace(key: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, uri)| *uri)
}

/// Result of parsing one element-name string. Value type, created per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    /// Resolved namespace URI, when the namespace key was in the table.
    pub namespace: Option<String>,
    /// Always non-empty after a successful parse.
    pub tag: String,
    pub id: Option<String>,
    pub class_names: Vec<String>,
}

/// Parse an element-name string.
///
/// Fails with [`DomError::InvalidName`] when no tag can be resolved, e.g. for
/// `""` or `"#"`.
pub fn parse(name: &str) -> Result<ParsedName> {
    let mut rest = name;

    let namespace = match rest.split_once(':') {
        Some((key, after)) => {
            rest = after;
            lookup_namespace(key).map(str::to_string)
        }
        None => None,
    };

    let mut tag: Option<String> = None;
    if let Some((left, after)) = rest.split_once('#') {
        if !left.is_empty() {
            tag = Some(left.to_string());
        }
        rest = after;
    }

    let mut id = None;
    let mut class_names = Vec::new();
    if rest.contains('.') {
        let mut segments = rest.split('.');
        let first = segments.next().unwrap_or("");
        if tag.is_some() {
            id = Some(first.to_string());
        } else if !first.is_empty() {
            tag = Some(first.to_string());
        }
        class_names = segments.map(str::to_string).collect();
    }

    let tag = match tag {
        Some(tag) => tag,
        None if !rest.is_empty() => rest.to_string(),
        None => return Err(DomError::InvalidName(name.to_string())),
    };

    Ok(ParsedName {
        namespace,
        tag,
        id,
        class_names,
    })
}

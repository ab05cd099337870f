//! Read-only geometry: normalized bounds and the containment heuristic
//!
//! Measurement only, never mutation. All boundary comparisons are inclusive
//! with no epsilon: exact equality at an edge counts as within.

use crate::document::Document;
use crate::error::Result;
use crate::types::{ClientRect, NodeId};
use serde::{Deserialize, Serialize};

/// Viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageBounds {
    pub width: f64,
    pub height: f64,
}

/// Normalized rectangle for an element. Unlike [`ClientRect`], the derived
/// fields are always consistent: `width == right - left` and
/// `height == bottom - top` whenever the raw measurement left them out.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Bounds {
    /// Normalize a raw measurement: zero `height`/`width` are recomputed from
    /// the edges, zero `x`/`y` default to `left`/`top`.
    pub fn from_client_rect(rect: ClientRect) -> Self {
        let mut bounds = Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            top: rect.top,
            left: rect.left,
            bottom: rect.bottom,
            right: rect.right,
        };
        if bounds.height == 0.0 {
            bounds.height = bounds.bottom - bounds.top;
        }
        if bounds.width == 0.0 {
            bounds.width = bounds.right - bounds.left;
        }
        if bounds.x == 0.0 {
            bounds.x = bounds.left;
        }
        if bounds.y == 0.0 {
            bounds.y = bounds.top;
        }
        bounds
    }

    /// Is the point inside this rectangle, edges included?
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Best-effort viewport size. Width and height resolve independently through
/// the fixed priority: window inner size, body client size, root element
/// client size — first non-zero wins.
pub fn page_bounds(doc: &Document) -> PageBounds {
    let metrics = doc.viewport();
    PageBounds {
        width: first_nonzero(&[
            metrics.window_inner_width,
            metrics.body_client_width,
            metrics.root_client_width,
        ]),
        height: first_nonzero(&[
            metrics.window_inner_height,
            metrics.body_client_height,
            metrics.root_client_height,
        ]),
    }
}

/// The node's normalized bounds. An unmeasured node reports all zeros, the
/// way a detached element measures in a host document.
pub fn element_bounds(doc: &Document, node_id: NodeId) -> Result<Bounds> {
    let rect = doc.get(node_id)?.client_rect.unwrap_or_default();
    Ok(Bounds::from_client_rect(rect))
}

/// "Mostly inside" containment heuristic: true when the child's top-left
/// corner lies within the container, or its geometric center does. The center
/// test keeps the predicate useful for containers smaller than the child.
pub fn within(doc: &Document, child: NodeId, container: NodeId) -> Result<bool> {
    let child_bounds = element_bounds(doc, child)?;
    let container_bounds = element_bounds(doc, container)?;
    let (center_x, center_y) = child_bounds.center();
    Ok(container_bounds.contains_point(child_bounds.left, child_bounds.top)
        || container_bounds.contains_point(center_x, center_y))
}

fn first_nonzero(candidates: &[f64]) -> f64 {
    candidates
        .iter()
        .copied()
        .find(|&value| value != 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewportMetrics;

    fn measured(doc: &mut Document, rect: ClientRect) -> NodeId {
        let node = doc.create("div").unwrap();
        doc.set_client_rect(node, rect).unwrap();
        node
    }

    #[test]
    fn bounds_recomputed_from_edges() {
        let bounds = Bounds::from_client_rect(ClientRect::from_edges(10.0, 5.0, 30.0, 15.0));
        assert_eq!(bounds.width, 10.0);
        assert_eq!(bounds.height, 20.0);
        assert_eq!(bounds.x, 5.0);
        assert_eq!(bounds.y, 10.0);
    }

    #[test]
    fn complete_measurements_pass_through() {
        let bounds = Bounds::from_client_rect(ClientRect::new(5.0, 10.0, 100.0, 50.0));
        assert_eq!(bounds.x, 5.0);
        assert_eq!(bounds.y, 10.0);
        assert_eq!(bounds.width, 100.0);
        assert_eq!(bounds.height, 50.0);
        assert_eq!(bounds.right, 105.0);
        assert_eq!(bounds.bottom, 60.0);
    }

    #[test]
    fn corner_inside_container() {
        let mut doc = Document::new();
        let container = measured(&mut doc, ClientRect::from_edges(0.0, 0.0, 100.0, 100.0));
        let child = measured(&mut doc, ClientRect::from_edges(50.0, 50.0, 50.0, 50.0));
        assert!(within(&doc, child, container).unwrap());
    }

    #[test]
    fn fully_outside_container() {
        let mut doc = Document::new();
        let container = measured(&mut doc, ClientRect::from_edges(0.0, 0.0, 100.0, 100.0));
        let child = measured(&mut doc, ClientRect::from_edges(200.0, 200.0, 200.0, 200.0));
        assert!(!within(&doc, child, container).unwrap());
    }

    #[test]
    fn center_test_covers_oversized_child() {
        let mut doc = Document::new();
        let container = measured(&mut doc, ClientRect::from_edges(40.0, 40.0, 60.0, 60.0));
        // corner far outside, but the centers coincide at (50, 50)
        let child = measured(&mut doc, ClientRect::from_edges(0.0, 0.0, 100.0, 100.0));
        assert!(within(&doc, child, container).unwrap());
    }

    #[test]
    fn boundary_equality_counts_as_within() {
        let mut doc = Document::new();
        let container = measured(&mut doc, ClientRect::from_edges(0.0, 0.0, 100.0, 100.0));
        let child = measured(&mut doc, ClientRect::from_edges(100.0, 100.0, 100.0, 100.0));
        assert!(within(&doc, child, container).unwrap());
    }

    #[test]
    fn unmeasured_nodes_report_zero_bounds() {
        let mut doc = Document::new();
        let node = doc.create("div").unwrap();
        assert_eq!(element_bounds(&doc, node).unwrap(), Bounds::default());
    }

    #[test]
    fn page_bounds_prefers_window_inner_size() {
        let mut doc = Document::new();
        doc.set_viewport(ViewportMetrics {
            window_inner_width: 1280.0,
            window_inner_height: 720.0,
            body_client_width: 1024.0,
            body_client_height: 768.0,
            ..ViewportMetrics::default()
        });
        let bounds = page_bounds(&doc);
        assert_eq!(bounds.width, 1280.0);
        assert_eq!(bounds.height, 720.0);
    }

    #[test]
    fn page_bounds_falls_through_per_dimension() {
        let mut doc = Document::new();
        doc.set_viewport(ViewportMetrics {
            window_inner_width: 1280.0,
            body_client_height: 768.0,
            root_client_width: 800.0,
            root_client_height: 600.0,
            ..ViewportMetrics::default()
        });
        let bounds = page_bounds(&doc);
        assert_eq!(bounds.width, 1280.0);
        assert_eq!(bounds.height, 768.0);
    }

    #[test]
    fn page_bounds_with_no_metrics_is_zero() {
        let doc = Document::new();
        assert_eq!(page_bounds(&doc), PageBounds::default());
    }
}

//! domkit — a small document-tree facade
//!
//! Elements are built from a compact name mini-language
//! (`"svg:path#main.icon.active"`), listener registration broadcasts
//! scalar-or-sequence arguments over the full Cartesian product, and the
//! geometry helpers answer "mostly inside" containment questions for
//! hit-testing.
//!
//! ```
//! use domkit::{Document, ElementSpec, Event, Listener};
//!
//! let mut doc = Document::new();
//! let button = doc
//!     .create_element(
//!         ElementSpec::new("button#save.primary")
//!             .attr("type", "submit")
//!             .child("Save")
//!             .listen("click", Listener::new(|event| event.prevent_default())),
//!     )
//!     .unwrap();
//!
//! let mut event = Event::new("click");
//! doc.dispatch(button, &mut event).unwrap();
//! assert!(event.default_prevented());
//! ```

pub mod document;
pub mod error;
pub mod events;
pub mod geometry;
pub mod name;
pub mod serializer;
pub mod types;

pub use document::{Child, Document, DocumentConfig, ElementSpec};
pub use error::{DomError, Result};
pub use events::{
    is_right_click, prevent_default, squash_event, stop_propagation, Event, IntoEvents,
    IntoListeners, IntoTargets, Listener, ListenerCapability,
};
pub use geometry::{element_bounds, page_bounds, within, Bounds, PageBounds};
pub use name::{parse, ParsedName};
pub use serializer::{Serializer, SerializerConfig};
pub use types::{key_codes, ClientRect, Node, NodeId, NodeType, ViewportMetrics};

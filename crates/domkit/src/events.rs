//! Events, listeners, and the scalar-or-sequence normalization layer
//!
//! Registration is a Cartesian broadcast: every (target, event, listener)
//! triple from the three argument positions gets its own live binding, no
//! deduplication. Removal matches on listener identity, so callers keep the
//! [`Listener`] handle they registered with.

use crate::types::NodeId;
use ahash::AHashMap;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::rc::Rc;

/// A registered callback. Cheap to clone; clones share identity, which is
/// what removal matches on.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&mut Event)>);

impl Listener {
    pub fn new(f: impl Fn(&mut Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Same underlying callback as `other`.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn call(&self, event: &mut Event) {
        (self.0)(event);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Rc::as_ptr(&self.0))
            .finish()
    }
}

/// An event as seen by listeners.
#[derive(Debug, Clone, Default)]
pub struct Event {
    pub name: String,
    /// Node the event was dispatched at, set by `Document::dispatch`.
    pub target: Option<NodeId>,
    /// Gecko/WebKit-style mouse button field (3 = right button).
    pub which: Option<u32>,
    /// Legacy-style mouse button field (2 = right button).
    pub button: Option<u32>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_which(mut self, which: u32) -> Self {
        self.which = Some(which);
        self
    }

    pub fn with_button(mut self, button: u32) -> Self {
        self.button = Some(button);
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Cancel the event's default action.
pub fn prevent_default(event: &mut Event) {
    event.prevent_default();
}

/// Stop the event from bubbling further.
pub fn stop_propagation(event: &mut Event) {
    event.stop_propagation();
}

/// Cancel the default action, stop bubbling, and return `false` — usable as
/// the tail call of a listener that wants the event fully squashed.
pub fn squash_event(event: &mut Event) -> bool {
    prevent_default(event);
    stop_propagation(event);
    false
}

/// Is this mouse event a right click? `None` when the event carries neither
/// a `which` nor a `button` field (ambiguous input, not a failure).
pub fn is_right_click(event: &Event) -> Option<bool> {
    if let Some(which) = event.which {
        Some(which == 3)
    } else {
        event.button.map(|button| button == 2)
    }
}

/// How listeners attach to a target. Resolved once per document at
/// construction, never re-checked per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerCapability {
    /// Standard registration: any number of listeners per (target, event).
    #[default]
    Standard,
    /// Legacy on-`event` single-slot attachment: at most one listener per
    /// (target, event); a new registration silently overwrites the previous
    /// one. Documented limitation, kept for fidelity with legacy hosts.
    LegacySingle,
}

/// One listener argument: a single [`Listener`] or a sequence of them.
pub trait IntoListeners {
    fn into_listeners(self) -> SmallVec<[Listener; 1]>;
}

impl IntoListeners for Listener {
    fn into_listeners(self) -> SmallVec<[Listener; 1]> {
        smallvec![self]
    }
}

impl IntoListeners for &Listener {
    fn into_listeners(self) -> SmallVec<[Listener; 1]> {
        smallvec![self.clone()]
    }
}

impl IntoListeners for Vec<Listener> {
    fn into_listeners(self) -> SmallVec<[Listener; 1]> {
        self.into_iter().collect()
    }
}

impl IntoListeners for &[Listener] {
    fn into_listeners(self) -> SmallVec<[Listener; 1]> {
        self.iter().cloned().collect()
    }
}

impl<const N: usize> IntoListeners for [Listener; N] {
    fn into_listeners(self) -> SmallVec<[Listener; 1]> {
        self.into_iter().collect()
    }
}

impl IntoListeners for SmallVec<[Listener; 1]> {
    fn into_listeners(self) -> SmallVec<[Listener; 1]> {
        self
    }
}

/// One target argument: a single node id or a sequence of them.
pub trait IntoTargets {
    fn into_targets(self) -> SmallVec<[NodeId; 1]>;
}

impl IntoTargets for NodeId {
    fn into_targets(self) -> SmallVec<[NodeId; 1]> {
        smallvec![self]
    }
}

impl IntoTargets for Vec<NodeId> {
    fn into_targets(self) -> SmallVec<[NodeId; 1]> {
        self.into_iter().collect()
    }
}

impl IntoTargets for &[NodeId] {
    fn into_targets(self) -> SmallVec<[NodeId; 1]> {
        self.iter().copied().collect()
    }
}

impl<const N: usize> IntoTargets for [NodeId; N] {
    fn into_targets(self) -> SmallVec<[NodeId; 1]> {
        self.into_iter().collect()
    }
}

impl IntoTargets for SmallVec<[NodeId; 1]> {
    fn into_targets(self) -> SmallVec<[NodeId; 1]> {
        self
    }
}

/// One event-name argument: a single name or a sequence of them.
pub trait IntoEvents {
    fn into_events(self) -> SmallVec<[String; 1]>;
}

impl IntoEvents for &str {
    fn into_events(self) -> SmallVec<[String; 1]> {
        smallvec![self.to_string()]
    }
}

impl IntoEvents for String {
    fn into_events(self) -> SmallVec<[String; 1]> {
        smallvec![self]
    }
}

impl IntoEvents for &[&str] {
    fn into_events(self) -> SmallVec<[String; 1]> {
        self.iter().map(|name| name.to_string()).collect()
    }
}

impl<const N: usize> IntoEvents for [&str; N] {
    fn into_events(self) -> SmallVec<[String; 1]> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoEvents for Vec<&str> {
    fn into_events(self) -> SmallVec<[String; 1]> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoEvents for Vec<String> {
    fn into_events(self) -> SmallVec<[String; 1]> {
        self.into_iter().collect()
    }
}

struct Binding {
    event: String,
    listener: Listener,
}

/// Per-node listener table. Bindings for one node live in a single Vec so
/// dispatch order is registration order across event names.
pub(crate) struct ListenerRegistry {
    bindings: AHashMap<NodeId, Vec<Binding>>,
    capability: ListenerCapability,
}

impl ListenerRegistry {
    pub fn new(capability: ListenerCapability) -> Self {
        Self {
            bindings: AHashMap::new(),
            capability,
        }
    }

    pub fn add(&mut self, target: NodeId, event: &str, listener: Listener) {
        let bucket = self.bindings.entry(target).or_default();
        match self.capability {
            ListenerCapability::Standard => bucket.push(Binding {
                event: event.to_string(),
                listener,
            }),
            ListenerCapability::LegacySingle => {
                // Single slot per event: overwrite, keep original position.
                if let Some(existing) = bucket.iter_mut().find(|b| b.event == event) {
                    existing.listener = listener;
                } else {
                    bucket.push(Binding {
                        event: event.to_string(),
                        listener,
                    });
                }
            }
        }
    }

    /// Detach one live binding matching the triple. Registration never
    /// deduplicates, so a triple registered twice needs two removals.
    pub fn remove(&mut self, target: NodeId, event: &str, listener: &Listener) {
        if let Some(bucket) = self.bindings.get_mut(&target) {
            if let Some(pos) = bucket
                .iter()
                .position(|b| b.event == event && b.listener.ptr_eq(listener))
            {
                bucket.remove(pos);
            }
        }
    }

    /// Listeners bound to (target, event), in registration order.
    pub fn listeners_for(&self, target: NodeId, event: &str) -> Vec<Listener> {
        self.bindings
            .get(&target)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|b| b.event == event)
                    .map(|b| b.listener.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total live bindings on a target, across all events.
    pub fn binding_count(&self, target: NodeId) -> usize {
        self.bindings.get(&target).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listener_clones_share_identity() {
        let a = Listener::new(|_| {});
        let b = a.clone();
        let c = Listener::new(|_| {});
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn registry_keeps_duplicate_bindings() {
        let mut registry = ListenerRegistry::new(ListenerCapability::Standard);
        let listener = Listener::new(|_| {});
        registry.add(1, "click", listener.clone());
        registry.add(1, "click", listener.clone());
        assert_eq!(registry.binding_count(1), 2);

        registry.remove(1, "click", &listener);
        assert_eq!(registry.binding_count(1), 1);
        registry.remove(1, "click", &listener);
        assert_eq!(registry.binding_count(1), 0);
    }

    #[test]
    fn registry_removal_ignores_unknown_triples() {
        let mut registry = ListenerRegistry::new(ListenerCapability::Standard);
        let registered = Listener::new(|_| {});
        let stranger = Listener::new(|_| {});
        registry.add(1, "click", registered.clone());

        registry.remove(1, "click", &stranger);
        registry.remove(1, "focus", &registered);
        registry.remove(2, "click", &registered);
        assert_eq!(registry.binding_count(1), 1);
    }

    #[test]
    fn legacy_capability_overwrites_instead_of_stacking() {
        let mut registry = ListenerRegistry::new(ListenerCapability::LegacySingle);
        let first = Listener::new(|_| {});
        let second = Listener::new(|_| {});
        registry.add(1, "click", first);
        registry.add(1, "click", second.clone());

        assert_eq!(registry.binding_count(1), 1);
        let bound = registry.listeners_for(1, "click");
        assert!(bound[0].ptr_eq(&second));
    }

    #[test]
    fn listeners_for_preserves_registration_order() {
        let mut registry = ListenerRegistry::new(ListenerCapability::Standard);
        let first = Listener::new(|_| {});
        let second = Listener::new(|_| {});
        registry.add(1, "click", first.clone());
        registry.add(1, "focus", Listener::new(|_| {}));
        registry.add(1, "click", second.clone());

        let bound = registry.listeners_for(1, "click");
        assert_eq!(bound.len(), 2);
        assert!(bound[0].ptr_eq(&first));
        assert!(bound[1].ptr_eq(&second));
    }

    #[test]
    fn squash_event_cancels_everything_and_returns_false() {
        let mut event = Event::new("click");
        assert!(!squash_event(&mut event));
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
    }

    #[test]
    fn right_click_detection() {
        assert_eq!(is_right_click(&Event::new("mousedown").with_which(3)), Some(true));
        assert_eq!(is_right_click(&Event::new("mousedown").with_which(1)), Some(false));
        assert_eq!(is_right_click(&Event::new("mousedown").with_button(2)), Some(true));
        assert_eq!(is_right_click(&Event::new("mousedown").with_button(0)), Some(false));
        assert_eq!(is_right_click(&Event::new("mousedown")), None);
    }

    #[test]
    fn which_wins_over_button() {
        let event = Event::new("mousedown").with_which(1).with_button(2);
        assert_eq!(is_right_click(&event), Some(false));
    }

    #[test]
    fn listener_invocation_sees_event_state() {
        let fired = std::rc::Rc::new(Cell::new(false));
        let fired_flag = std::rc::Rc::clone(&fired);
        let listener = Listener::new(move |event| {
            event.prevent_default();
            fired_flag.set(true);
        });

        let mut event = Event::new("submit");
        listener.call(&mut event);
        assert!(fired.get());
        assert!(event.default_prevented());
    }
}

//! Rendering surface abstraction.
//!
//! The core never touches a concrete renderer. It asks a [`Surface`] whether
//! a target exists, what its children are (in document order) and where it
//! sits on the page; every visual write leaves the core as a
//! [`Change`](crate::outputs::Change) that the host applies. [`Stage`] is the
//! in-memory surface used by tests and the wasm adapter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::outputs::{Change, Outputs};
use crate::value::{Property, Value};

/// Opaque target handle (small string key, e.g. `"about/skills"`).
pub type TargetHandle = String;

/// Vertical placement of an element in document coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Read-only queries the core needs from the host.
/// Adapters (DOM, wasm, tests) implement this.
pub trait Surface {
    fn contains(&self, target: &str) -> bool;

    /// Direct children in document order. Unknown targets have none.
    fn children(&self, target: &str) -> Vec<TargetHandle>;

    fn bounds(&self, target: &str) -> Option<Bounds>;
}

#[derive(Clone, Debug, Default)]
struct Element {
    parent: Option<TargetHandle>,
    children: Vec<TargetHandle>,
    bounds: Option<Bounds>,
    props: IndexMap<Property, Value>,
}

/// In-memory element tree with applied property values.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    elements: IndexMap<TargetHandle, Element>,
    mutations: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root-level element. Re-adding an existing key keeps it.
    pub fn add(&mut self, target: &str) -> &mut Self {
        self.elements.entry(target.to_string()).or_default();
        self
    }

    /// Insert `child` as the last child of `parent` (created if missing).
    pub fn add_child(&mut self, parent: &str, child: &str) -> &mut Self {
        self.add(parent);
        let entry = self.elements.entry(child.to_string()).or_default();
        if entry.parent.as_deref() != Some(parent) {
            entry.parent = Some(parent.to_string());
            if let Some(p) = self.elements.get_mut(parent) {
                p.children.push(child.to_string());
            }
        }
        self
    }

    pub fn set_bounds(&mut self, target: &str, bounds: Bounds) -> &mut Self {
        self.elements.entry(target.to_string()).or_default().bounds = Some(bounds);
        self
    }

    /// Remove an element and its subtree. Returns whether it existed.
    pub fn remove(&mut self, target: &str) -> bool {
        let Some(el) = self.elements.shift_remove(target) else {
            return false;
        };
        if let Some(parent) = el.parent.as_deref() {
            if let Some(p) = self.elements.get_mut(parent) {
                p.children.retain(|c| c != target);
            }
        }
        for child in el.children {
            self.remove(&child);
        }
        true
    }

    pub fn value(&self, target: &str, property: &Property) -> Option<Value> {
        self.elements
            .get(target)
            .and_then(|el| el.props.get(property))
            .copied()
    }

    /// Number of property writes applied so far.
    #[inline]
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Apply one change. Writes to unknown targets are dropped.
    pub fn apply_change(&mut self, change: &Change) -> bool {
        match self.elements.get_mut(&change.target) {
            Some(el) => {
                el.props.insert(change.property.clone(), change.value);
                self.mutations += 1;
                true
            }
            None => false,
        }
    }

    /// Apply every change in `outputs`, returning how many landed.
    pub fn apply(&mut self, outputs: &Outputs) -> usize {
        outputs
            .changes
            .iter()
            .filter(|c| self.apply_change(c))
            .count()
    }
}

impl Surface for Stage {
    fn contains(&self, target: &str) -> bool {
        self.elements.contains_key(target)
    }

    fn children(&self, target: &str) -> Vec<TargetHandle> {
        self.elements
            .get(target)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    fn bounds(&self, target: &str) -> Option<Bounds> {
        self.elements.get(target).and_then(|el| el.bounds)
    }
}

//! Retained node tree
//!
//! Views are built once into a [`NodeTree`] keyed by stable string ids and then
//! mutated in place. Structural changes (mounting or removing nodes) bump the
//! tree's structure revision; content writes do not, which lets callers verify
//! that a refresh never rebuilt anything.

use std::collections::HashMap;

use crate::render::Color;

/// A leaf of the view
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Proportional bar inside a fixed-width track
    Bar { width_pct: f64, color: Color },
    /// Text label with an optional style class
    Text { text: String, class: Option<String> },
}

impl Node {
    pub fn bar(width_pct: f64, color: Color) -> Self {
        Node::Bar { width_pct, color }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            class: None,
        }
    }

    pub fn text_with_class(text: impl Into<String>, class: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            class: Some(class.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: HashMap<String, Node>,
    structure_revision: u64,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a node under `id`, replacing any node already there.
    pub fn mount(&mut self, id: impl Into<String>, node: Node) {
        self.nodes.insert(id.into(), node);
        self.structure_revision += 1;
    }

    pub fn remove(&mut self, id: &str) -> Option<Node> {
        let removed = self.nodes.remove(id);
        if removed.is_some() {
            self.structure_revision += 1;
        }
        removed
    }

    /// Drop every node (view teardown).
    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            self.nodes.clear();
            self.structure_revision += 1;
        }
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Incremented on every mount/remove/clear, never on content updates
    pub fn structure_revision(&self) -> u64 {
        self.structure_revision
    }

    /// Text of a text node
    pub fn text(&self, id: &str) -> Option<&str> {
        match self.nodes.get(id)? {
            Node::Text { text, .. } => Some(text.as_str()),
            Node::Bar { .. } => None,
        }
    }

    /// Class of a text node
    pub fn class(&self, id: &str) -> Option<&str> {
        match self.nodes.get(id)? {
            Node::Text { class, .. } => class.as_deref(),
            Node::Bar { .. } => None,
        }
    }

    /// Width and color of a bar node
    pub fn bar(&self, id: &str) -> Option<(f64, Color)> {
        match self.nodes.get(id)? {
            Node::Bar { width_pct, color } => Some((*width_pct, *color)),
            Node::Text { .. } => None,
        }
    }

    /// Update a bar in place. Returns `false` when no bar is mounted under `id`.
    pub fn set_bar(&mut self, id: &str, width_pct: f64, color: Option<Color>) -> bool {
        match self.nodes.get_mut(id) {
            Some(Node::Bar {
                width_pct: w,
                color: c,
            }) => {
                *w = width_pct;
                if let Some(color) = color {
                    *c = color;
                }
                true
            }
            _ => false,
        }
    }

    /// Update a text node in place. `class: None` leaves the class untouched.
    pub fn set_text(&mut self, id: &str, text: &str, class: Option<&str>) -> bool {
        match self.nodes.get_mut(id) {
            Some(Node::Text { text: t, class: c }) => {
                if t.as_str() != text {
                    *t = text.to_string();
                }
                if let Some(class) = class {
                    *c = Some(class.to_string());
                }
                true
            }
            _ => false,
        }
    }
}

// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, updates, queries.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::types::{Element, NodeFlags, NodeId};

/// A retained tree of element boxes with a body root and a viewport.
///
/// Layout is external: callers write each element's document-space bounds with
/// [`Document::set_bounds`]. The document answers the questions a positioning
/// controller asks: is a node alive, attached under the body, displayed, non-empty,
/// where is it, and what is on top at a point.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use tether_scene::{Document, Element};
///
/// let mut doc = Document::new(Size::new(800.0, 600.0));
/// let button = doc.insert(
///     Some(doc.body()),
///     Element::new("button").with_bounds(Rect::new(10.0, 10.0, 90.0, 40.0)),
/// );
/// assert!(doc.is_rendered(button));
///
/// let detached = doc.insert(None, Element::new("div"));
/// assert!(!doc.is_rendered(detached));
/// ```
#[derive(Debug)]
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: NodeId,
    viewport: Rect,
    pub(crate) styles: BTreeMap<String, StyleEntry>,
}

#[derive(Clone, Debug)]
pub(crate) struct StyleEntry {
    pub(crate) node: NodeId,
    pub(crate) holders: usize,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Document {
    /// Create a document whose body and viewport span `viewport` at the origin.
    pub fn new(viewport: Size) -> Self {
        let viewport = Rect::from_origin_size(Point::ZERO, viewport);
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: NodeId::new(0, 0),
            viewport,
            styles: BTreeMap::new(),
        };
        doc.body = doc.insert(None, Element::new("body").with_bounds(viewport));
        doc
    }

    /// The body element; the root every attached node descends from.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The visible viewport in document space.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Resize the viewport (and the body with it).
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = Rect::from_origin_size(Point::ZERO, size);
        let body = self.body;
        self.set_bounds(body, self.viewport);
    }

    /// Insert a new node as the last child of `parent` (or detached if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let node = |generation| Node {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node and its subtree. The body cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        let children = self.children_of(id).to_vec();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` (or detach it with `None`).
    ///
    /// Moving a node under its own descendant is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.contains(id, p))
        {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Update document-space bounds.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.bounds = bounds;
        }
    }

    /// Update flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.flags = flags;
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.z_index = z;
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.attrs.insert(name.into(), value.into());
        }
    }

    /// Replace the text content of a text or style node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.text = Some(text.into());
        }
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.attrs.remove(name);
        }
    }

    /// Element data of a live node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Attribute value of a live node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node_opt(id)?.element.attrs.get(name).map(String::as_str)
    }

    /// Document-space bounds of a live node.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.element.bounds)
    }

    /// Flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.element.flags)
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Whether the node's ancestor chain reaches the body.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(self.body, id)
    }

    /// Whether the node and all its ancestors are displayed.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur.and_then(|id| self.node_opt(id)) {
            if !n.element.flags.contains(NodeFlags::DISPLAYED) {
                return false;
            }
            cur = n.parent;
        }
        self.is_alive(id)
    }

    /// Whether the node is alive, attached, displayed, and has a non-empty box.
    ///
    /// Positioning against a node that is not rendered is meaningless; callers skip it.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.is_attached(id)
            && self.is_displayed(id)
            && self
                .bounds(id)
                .is_some_and(|b| b.width() > 0.0 && b.height() > 0.0)
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent_of(id);
        }
        false
    }

    /// Topmost rendered, pickable node under `point`.
    ///
    /// Ordering: higher z first, then deeper nodes, then newer identifiers.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        let mut best: Option<(NodeId, i32, usize)> = None;
        for (idx, slot) in self.nodes.iter().enumerate() {
            let Some(n) = slot else { continue };
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            let id = NodeId::new(idx as u32, n.generation);
            if !n.element.flags.contains(NodeFlags::PICKABLE)
                || !n.element.bounds.contains(point)
                || !self.is_rendered(id)
            {
                continue;
            }
            let z = n.element.z_index;
            let depth = self.depth(id);
            let wins = match best {
                None => true,
                Some((b, bz, bd)) => {
                    z > bz || (z == bz && (depth > bd || (depth == bd && id.is_newer_than(b))))
                }
            };
            if wins {
                best = Some((id, z, depth));
            }
        }
        best.map(|(id, _, _)| id)
    }

    fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            depth += 1;
            cur = self.parent_of(p);
        }
        depth
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(Size::new(800.0, 600.0))
    }

    fn boxed(doc: &mut Document, parent: NodeId, r: Rect) -> NodeId {
        doc.insert(Some(parent), Element::default().with_bounds(r))
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut doc = doc();
        let body = doc.body();
        let a = boxed(&mut doc, body, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(doc.is_alive(a));

        doc.remove(a);
        assert!(!doc.is_alive(a));

        let b = boxed(&mut doc, body, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(doc.is_alive(b));
        assert!(!doc.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn remove_takes_subtree() {
        let mut doc = doc();
        let body = doc.body();
        let a = boxed(&mut doc, body, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = boxed(&mut doc, a, Rect::new(0.0, 0.0, 5.0, 5.0));
        doc.remove(a);
        assert!(!doc.is_alive(b));
        assert!(doc.children_of(body).is_empty());
        doc.remove(body);
        assert!(doc.is_alive(body));
    }

    #[test]
    fn rendered_requires_attachment_display_and_size() {
        let mut doc = doc();
        let body = doc.body();
        let parent = boxed(&mut doc, body, Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = boxed(&mut doc, parent, Rect::new(10.0, 10.0, 20.0, 20.0));
        assert!(doc.is_rendered(child));

        doc.set_flags(parent, NodeFlags::PICKABLE);
        assert!(!doc.is_rendered(child));
        doc.set_flags(parent, NodeFlags::default());

        doc.reparent(parent, None);
        assert!(!doc.is_attached(child));
        assert!(!doc.is_rendered(child));
        doc.reparent(parent, Some(body));

        doc.set_bounds(child, Rect::new(10.0, 10.0, 10.0, 20.0));
        assert!(!doc.is_rendered(child));
    }

    #[test]
    fn reparent_into_own_subtree_is_ignored() {
        let mut doc = doc();
        let body = doc.body();
        let a = boxed(&mut doc, body, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = boxed(&mut doc, a, Rect::new(0.0, 0.0, 5.0, 5.0));
        doc.reparent(a, Some(b));
        assert_eq!(doc.parent_of(a), Some(body));
        assert!(doc.contains(a, b));
        assert!(!doc.contains(b, a));
    }

    #[test]
    fn hit_prefers_z_then_depth_then_newer() {
        let mut doc = doc();
        let body = doc.body();
        let low = boxed(&mut doc, body, Rect::new(0.0, 0.0, 100.0, 100.0));
        let inner = boxed(&mut doc, low, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(doc.hit_test(Point::new(10.0, 10.0)), Some(inner));

        let overlay = boxed(&mut doc, body, Rect::new(0.0, 0.0, 100.0, 100.0));
        doc.set_z_index(overlay, 10);
        assert_eq!(doc.hit_test(Point::new(10.0, 10.0)), Some(overlay));

        doc.set_flags(overlay, NodeFlags::DISPLAYED);
        assert_eq!(doc.hit_test(Point::new(10.0, 10.0)), Some(inner));
        assert_eq!(doc.hit_test(Point::new(75.0, 75.0)), Some(low));
    }

    #[test]
    fn viewport_resizes_body() {
        let mut doc = doc();
        doc.set_viewport(Size::new(320.0, 240.0));
        assert_eq!(doc.viewport(), Rect::new(0.0, 0.0, 320.0, 240.0));
        assert_eq!(doc.bounds(doc.body()), Some(doc.viewport()));
    }
}

// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render model: virtual nodes produced by the compositions and their materialization into a
//! [`Document`].
//!
//! Compositions are pure functions from state to a [`VNode`] tree. [`mount`] creates the
//! document nodes for a tree and [`Mounted::patch`] brings an existing mount in line with a
//! newer tree, reusing nodes whose kind and tag are unchanged so that bound refs and
//! layout bounds survive re-rendering. [`NodeRef`]s are bound after the document update,
//! so a ref callback may read the document.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;
use tether_scene::{Document, Element, NodeId};

use crate::host::Host;
use crate::transition::{TransitionHooks, TransitionSpec};

/// Inline style declarations in property-name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style(BTreeMap<String, String>);

impl Style {
    /// An empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style property setter.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Value of a property.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Properties of `other` override those of `self`.
    pub fn merge(&mut self, other: &Self) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// `name: value` declarations joined with `; `.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                css.push_str("; ");
            }
            css.push_str(k);
            css.push_str(": ");
            css.push_str(v);
        }
        css
    }
}

/// Callback told which document node a virtual node became, or `None` when it is removed.
#[derive(Clone)]
pub struct NodeRef(Rc<dyn Fn(Option<NodeId>)>);

impl NodeRef {
    /// Wrap a binding callback.
    pub fn new(f: impl Fn(Option<NodeId>) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Report the bound node.
    pub fn bind(&self, node: Option<NodeId>) {
        (self.0)(node);
    }

    /// Whether both refs are the same callback.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodeRef(..)")
    }
}

/// Attributes, class, inline style and ref of a virtual node.
#[derive(Clone, Debug, Default)]
pub struct Props {
    /// Plain attributes.
    pub attrs: BTreeMap<String, String>,
    /// Space-separated classes.
    pub class: Option<String>,
    /// Inline style.
    pub style: Style,
    /// Binding of the resulting document node.
    pub node_ref: Option<NodeRef>,
}

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder-style class appender.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.push_class(class);
        self
    }

    /// Builder-style style merge.
    #[must_use]
    pub fn with_style(mut self, style: &Style) -> Self {
        self.style.merge(style);
        self
    }

    /// Builder-style ref setter.
    #[must_use]
    pub fn with_ref(mut self, node_ref: NodeRef) -> Self {
        self.node_ref = Some(node_ref);
        self
    }

    fn push_class(&mut self, class: &str) {
        if class.is_empty() {
            return;
        }
        match &mut self.class {
            Some(existing) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(class);
            }
            _ => self.class = Some(class.into()),
        }
    }

    /// Merge `other` over `self`: classes concatenate, style properties and attributes of
    /// `other` win, and `other`'s ref replaces this one.
    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        for (k, v) in &other.attrs {
            self.attrs.insert(k.clone(), v.clone());
        }
        if let Some(class) = &other.class {
            self.push_class(class);
        }
        self.style.merge(&other.style);
        if let Some(r) = &other.node_ref {
            self.node_ref = Some(r.clone());
        }
        self
    }
}

/// An element node.
#[derive(Clone, Debug)]
pub struct ElementNode {
    /// Tag name.
    pub tag: String,
    /// Attributes, class, style and ref.
    pub props: Props,
    /// Child nodes.
    pub children: Vec<VNode>,
    /// Layout box to apply when mounted, if known.
    pub bounds: Option<Rect>,
    /// `false` keeps floating content rendered while hidden.
    pub unmount: bool,
}

impl ElementNode {
    /// An element with no props or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::default(),
            children: Vec::new(),
            bounds: None,
            unmount: true,
        }
    }

    /// Builder-style props merge.
    #[must_use]
    pub fn with_props(mut self, props: &Props) -> Self {
        self.props = core::mem::take(&mut self.props).merge(props);
        self
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.props.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder-style child appender.
    #[must_use]
    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder-style layout box.
    #[must_use]
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Keep this floating content rendered while hidden.
    #[must_use]
    pub fn keep_mounted(mut self) -> Self {
        self.unmount = false;
        self
    }
}

/// Root transition or keyed child transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// A transition root.
    Root,
    /// A child of an enclosing transition root.
    Child,
}

/// Enter/leave transition around floating content.
#[derive(Clone, Debug)]
pub struct TransitionNode {
    /// Root or child transition.
    pub kind: TransitionKind,
    /// Key; a new key replaces the transition instead of patching it.
    pub key: Option<String>,
    /// Run the enter transition on first render.
    pub appear: bool,
    /// Classes.
    pub spec: TransitionSpec,
    /// Lifecycle hooks.
    pub hooks: TransitionHooks,
    /// Bound to the first element of the content.
    pub node_ref: Option<NodeRef>,
    /// The transitioned content.
    pub content: Box<VNode>,
}

/// A virtual node.
#[derive(Clone, Debug)]
pub enum VNode {
    /// An element.
    Element(ElementNode),
    /// A text node.
    Text(String),
    /// A placeholder that renders nothing.
    Comment,
    /// Children without a wrapper.
    Fragment(Vec<VNode>),
    /// Content rendered at the document body.
    Portal(Box<VNode>),
    /// Content inside an enter/leave transition.
    Transition(TransitionNode),
}

impl From<ElementNode> for VNode {
    fn from(e: ElementNode) -> Self {
        Self::Element(e)
    }
}

impl VNode {
    /// A text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Whether this node renders something other than text or nothing.
    #[must_use]
    pub fn is_valid_element(&self) -> bool {
        matches!(self, Self::Element(_) | Self::Portal(_) | Self::Transition(_))
    }

    /// Whether this node renders nothing.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment)
    }

    /// Expand nested fragments into one list.
    #[must_use]
    pub fn flatten(children: Vec<Self>) -> Vec<Self> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Self::Fragment(inner) => out.extend(Self::flatten(inner)),
                other => out.push(other),
            }
        }
        out
    }

    /// Merge `props` into this node. Only elements take props; other nodes are unchanged.
    #[must_use]
    pub fn with_props(self, props: &Props) -> Self {
        match self {
            Self::Element(e) => Self::Element(e.with_props(props)),
            other => other,
        }
    }

    /// The element, if this is one.
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// First element in depth-first order satisfying `pred`, searching through every
    /// wrapper.
    pub fn find(&self, pred: &dyn Fn(&ElementNode) -> bool) -> Option<&ElementNode> {
        match self {
            Self::Element(e) => {
                if pred(e) {
                    return Some(e);
                }
                e.children.iter().find_map(|c| c.find(pred))
            }
            Self::Fragment(children) => children.iter().find_map(|c| c.find(pred)),
            Self::Portal(content) => content.find(pred),
            Self::Transition(t) => t.content.find(pred),
            Self::Text(_) | Self::Comment => None,
        }
    }

    /// First transition in depth-first order.
    pub fn find_transition(&self) -> Option<&TransitionNode> {
        match self {
            Self::Transition(t) => Some(t),
            Self::Element(e) => e.children.iter().find_map(Self::find_transition),
            Self::Fragment(children) => children.iter().find_map(Self::find_transition),
            Self::Portal(content) => content.find_transition(),
            Self::Text(_) | Self::Comment => None,
        }
    }

    /// Whether the tree contains a portal.
    pub fn has_portal(&self) -> bool {
        match self {
            Self::Portal(_) => true,
            Self::Element(e) => e.children.iter().any(Self::has_portal),
            Self::Fragment(children) => children.iter().any(Self::has_portal),
            Self::Transition(t) => t.content.has_portal(),
            Self::Text(_) | Self::Comment => false,
        }
    }
}

#[derive(Debug)]
enum Mount {
    Element {
        id: NodeId,
        tag: String,
        node_ref: Option<NodeRef>,
        children: Vec<Mount>,
    },
    Text {
        id: NodeId,
    },
    Empty,
    Fragment(Vec<Mount>),
    Portal(Box<Mount>),
    Transition {
        key: Option<String>,
        hooks: TransitionHooks,
        node_ref: Option<NodeRef>,
        content: Box<Mount>,
    },
}

impl Mount {
    fn first_id(&self) -> Option<NodeId> {
        match self {
            Self::Element { id, .. } | Self::Text { id } => Some(*id),
            Self::Empty => None,
            Self::Fragment(children) => children.iter().find_map(Self::first_id),
            Self::Portal(content) | Self::Transition { content, .. } => content.first_id(),
        }
    }

    fn compatible(&self, node: &VNode) -> bool {
        match (self, node) {
            (Self::Element { tag, .. }, VNode::Element(e)) => *tag == e.tag,
            (Self::Transition { key, .. }, VNode::Transition(t)) => *key == t.key,
            (Self::Text { .. }, VNode::Text(_))
            | (Self::Empty, VNode::Comment)
            | (Self::Fragment(_), VNode::Fragment(_))
            | (Self::Portal(_), VNode::Portal(_)) => true,
            _ => false,
        }
    }
}

/// Document nodes created for a rendered tree.
#[derive(Debug)]
pub struct Mounted {
    parent: NodeId,
    root: Mount,
}

struct Pass<'a> {
    doc: &'a mut Document,
    binds: Vec<(NodeRef, Option<NodeId>)>,
}

fn element_of(node: &ElementNode) -> Element {
    let mut el = Element::new(node.tag.clone());
    el.attrs = desired_attrs(&node.props);
    if let Some(b) = node.bounds {
        el.bounds = b;
    }
    el
}

fn desired_attrs(props: &Props) -> BTreeMap<String, String> {
    let mut attrs = props.attrs.clone();
    if let Some(class) = props.class.as_ref().filter(|c| !c.is_empty()) {
        attrs.insert("class".into(), class.clone());
    }
    if !props.style.is_empty() {
        attrs.insert("style".into(), props.style.to_css());
    }
    attrs
}

impl Pass<'_> {
    fn build(&mut self, node: &VNode, parent: NodeId) -> Mount {
        match node {
            VNode::Element(e) => {
                let id = self.doc.insert(Some(parent), element_of(e));
                let children = e.children.iter().map(|c| self.build(c, id)).collect();
                if let Some(r) = &e.props.node_ref {
                    self.binds.push((r.clone(), Some(id)));
                }
                Mount::Element {
                    id,
                    tag: e.tag.clone(),
                    node_ref: e.props.node_ref.clone(),
                    children,
                }
            }
            VNode::Text(t) => Mount::Text {
                id: self.doc.insert(Some(parent), Element::text(t.clone())),
            },
            VNode::Comment => Mount::Empty,
            VNode::Fragment(children) => {
                Mount::Fragment(children.iter().map(|c| self.build(c, parent)).collect())
            }
            VNode::Portal(content) => {
                let body = self.doc.body();
                Mount::Portal(Box::new(self.build(content, body)))
            }
            VNode::Transition(t) => {
                let content = self.build(&t.content, parent);
                if let Some(r) = &t.node_ref {
                    self.binds.push((r.clone(), content.first_id()));
                }
                Mount::Transition {
                    key: t.key.clone(),
                    hooks: t.hooks.clone(),
                    node_ref: t.node_ref.clone(),
                    content: Box::new(content),
                }
            }
        }
    }

    /// Queue unbinding of every ref in `mount`; remove its nodes when `remove` is set.
    fn release(&mut self, mount: Mount, remove: bool) {
        match mount {
            Mount::Element {
                id,
                node_ref,
                children,
                ..
            } => {
                for child in children {
                    self.release(child, false);
                }
                if let Some(r) = node_ref {
                    self.binds.push((r, None));
                }
                if remove {
                    self.doc.remove(id);
                }
            }
            Mount::Text { id } => {
                if remove {
                    self.doc.remove(id);
                }
            }
            Mount::Empty => {}
            Mount::Fragment(children) => {
                for child in children {
                    self.release(child, remove);
                }
            }
            Mount::Portal(content) => self.release(*content, true),
            Mount::Transition {
                node_ref, content, ..
            } => {
                self.release(*content, remove);
                if let Some(r) = node_ref {
                    self.binds.push((r, None));
                }
            }
        }
    }

    fn patch(&mut self, mount: &mut Mount, node: &VNode, parent: NodeId) {
        if !mount.compatible(node) {
            let stale = core::mem::replace(mount, Mount::Empty);
            self.release(stale, true);
            *mount = self.build(node, parent);
            return;
        }
        match (mount, node) {
            (
                Mount::Element {
                    id,
                    node_ref,
                    children,
                    ..
                },
                VNode::Element(e),
            ) => {
                let id = *id;
                self.sync_attrs(id, &e.props);
                if let Some(b) = e.bounds {
                    self.doc.set_bounds(id, b);
                }
                self.patch_children(children, &e.children, id);
                self.swap_ref(node_ref, e.props.node_ref.as_ref(), Some(id));
            }
            (Mount::Text { id }, VNode::Text(t)) => self.doc.set_text(*id, t.clone()),
            (Mount::Fragment(children), VNode::Fragment(new)) => {
                self.patch_children(children, new, parent);
            }
            (Mount::Portal(content), VNode::Portal(new)) => {
                let body = self.doc.body();
                self.patch(content, new, body);
            }
            (
                Mount::Transition {
                    hooks,
                    node_ref,
                    content,
                    ..
                },
                VNode::Transition(t),
            ) => {
                *hooks = t.hooks.clone();
                self.patch(content, &t.content, parent);
                let first = content.first_id();
                self.swap_ref(node_ref, t.node_ref.as_ref(), first);
            }
            _ => {}
        }
    }

    fn patch_children(&mut self, mounted: &mut Vec<Mount>, nodes: &[VNode], parent: NodeId) {
        let shared = mounted.len().min(nodes.len());
        for (m, n) in mounted.iter_mut().zip(nodes) {
            self.patch(m, n, parent);
        }
        for stale in mounted.drain(shared..) {
            self.release(stale, true);
        }
        for n in &nodes[shared..] {
            let m = self.build(n, parent);
            mounted.push(m);
        }
    }

    fn swap_ref(&mut self, slot: &mut Option<NodeRef>, new: Option<&NodeRef>, id: Option<NodeId>) {
        match (slot.as_ref(), new) {
            (Some(old), Some(new)) if old.ptr_eq(new) => {
                self.binds.push((new.clone(), id));
            }
            (old, new) => {
                if let Some(old) = old {
                    self.binds.push((old.clone(), None));
                }
                if let Some(new) = new {
                    self.binds.push((new.clone(), id));
                }
            }
        }
        *slot = new.cloned();
    }

    fn sync_attrs(&mut self, id: NodeId, props: &Props) {
        let desired = desired_attrs(props);
        let stale: Vec<String> = self
            .doc
            .element(id)
            .map(|el| {
                el.attrs
                    .keys()
                    .filter(|k| !desired.contains_key(*k))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        for k in stale {
            self.doc.remove_attr(id, &k);
        }
        for (k, v) in desired {
            if self.doc.attr(id, &k) != Some(v.as_str()) {
                self.doc.set_attr(id, &k, v);
            }
        }
    }
}

fn apply_binds(binds: Vec<(NodeRef, Option<NodeId>)>) {
    for (r, id) in binds {
        r.bind(id);
    }
}

/// Create document nodes for `node` under `parent` and bind its refs.
pub fn mount(node: &VNode, host: &Host, parent: NodeId) -> Mounted {
    let (root, binds) = {
        let mut doc = host.document.borrow_mut();
        let mut pass = Pass {
            doc: &mut *doc,
            binds: Vec::new(),
        };
        let root = pass.build(node, parent);
        (root, pass.binds)
    };
    apply_binds(binds);
    Mounted { parent, root }
}

/// Remove what `mounted` created and unbind its refs.
pub fn unmount_tree(mounted: Mounted, host: &Host) {
    mounted.unmount(host);
}

impl Mounted {
    /// Update the mounted nodes to match `node`.
    pub fn patch(&mut self, node: &VNode, host: &Host) {
        let binds = {
            let mut doc = host.document.borrow_mut();
            let mut pass = Pass {
                doc: &mut *doc,
                binds: Vec::new(),
            };
            pass.patch(&mut self.root, node, self.parent);
            pass.binds
        };
        apply_binds(binds);
    }

    /// Remove the mounted nodes and unbind their refs.
    pub fn unmount(self, host: &Host) {
        let binds = {
            let mut doc = host.document.borrow_mut();
            let mut pass = Pass {
                doc: &mut *doc,
                binds: Vec::new(),
            };
            pass.release(self.root, true);
            pass.binds
        };
        apply_binds(binds);
    }

    /// Top-level document nodes, in render order.
    pub fn root_ids(&self) -> Vec<NodeId> {
        fn collect(m: &Mount, out: &mut Vec<NodeId>) {
            match m {
                Mount::Element { id, .. } | Mount::Text { id } => out.push(*id),
                Mount::Empty => {}
                Mount::Fragment(children) => children.iter().for_each(|c| collect(c, out)),
                Mount::Portal(content) | Mount::Transition { content, .. } => {
                    collect(content, out);
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }

    /// Hooks of every mounted transition, outermost first.
    pub fn transition_hooks(&self) -> Vec<TransitionHooks> {
        fn collect(m: &Mount, out: &mut Vec<TransitionHooks>) {
            match m {
                Mount::Transition { hooks, content, .. } => {
                    out.push(hooks.clone());
                    collect(content, out);
                }
                Mount::Element { children, .. } | Mount::Fragment(children) => {
                    children.iter().for_each(|c| collect(c, out));
                }
                Mount::Portal(content) => collect(content, out),
                Mount::Text { .. } | Mount::Empty => {}
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::Size;

    fn host() -> Host {
        Host::new(Size::new(800.0, 600.0))
    }

    fn recorder() -> (Rc<RefCell<Vec<Option<NodeId>>>>, NodeRef) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let r = NodeRef::new({
            let log = log.clone();
            move |id| log.borrow_mut().push(id)
        });
        (log, r)
    }

    #[test]
    fn merge_concatenates_classes_and_overrides_style() {
        let a = Props::new()
            .with_class("a")
            .with_style(&Style::new().with("top", "0px").with("left", "0px"));
        let b = Props::new()
            .with_class("b")
            .with_attr("role", "menu")
            .with_style(&Style::new().with("left", "4px"));
        let m = a.merge(&b);
        assert_eq!(m.class.as_deref(), Some("a b"));
        assert_eq!(m.style.get("left"), Some("4px"));
        assert_eq!(m.style.get("top"), Some("0px"));
        assert_eq!(m.attrs.get("role").map(String::as_str), Some("menu"));
        assert_eq!(m.style.to_css(), "left: 4px; top: 0px");
    }

    #[test]
    fn flatten_and_filter() {
        let children = vec![
            VNode::text(" "),
            VNode::Fragment(vec![ElementNode::new("button").into(), VNode::Comment]),
            ElementNode::new("div").into(),
        ];
        let valid: Vec<VNode> = VNode::flatten(children)
            .into_iter()
            .filter(VNode::is_valid_element)
            .collect();
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].as_element().map(|e| e.tag.as_str()), Some("button"));
    }

    #[test]
    fn mount_binds_and_unmount_unbinds() {
        let host = host();
        let body = host.document.borrow().body();
        let (log, r) = recorder();
        let tree: VNode = ElementNode::new("div")
            .with_props(&Props::new().with_ref(r).with_class("menu"))
            .child(VNode::text("hi"))
            .into();
        let mounted = mount(&tree, &host, body);
        let id = mounted.root_ids()[0];
        assert_eq!(*log.borrow(), vec![Some(id)]);
        assert_eq!(host.document.borrow().attr(id, "class"), Some("menu"));
        assert_eq!(host.document.borrow().children_of(id).len(), 1);
        unmount_tree(mounted, &host);
        assert_eq!(*log.borrow(), vec![Some(id), None]);
        assert!(!host.document.borrow().is_alive(id));
    }

    #[test]
    fn patch_reuses_nodes_and_syncs_attrs() {
        let host = host();
        let body = host.document.borrow().body();
        let first: VNode = ElementNode::new("div")
            .attr("data-a", "1")
            .attr("data-b", "1")
            .into();
        let mut mounted = mount(&first, &host, body);
        let id = mounted.root_ids()[0];
        host.document
            .borrow_mut()
            .set_bounds(id, Rect::new(0.0, 0.0, 10.0, 10.0));
        let second: VNode = ElementNode::new("div").attr("data-a", "2").into();
        mounted.patch(&second, &host);
        let doc = host.document.borrow();
        assert_eq!(mounted.root_ids(), vec![id]);
        assert_eq!(doc.attr(id, "data-a"), Some("2"));
        assert_eq!(doc.attr(id, "data-b"), None);
        assert_eq!(doc.bounds(id), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn patch_replaces_incompatible_nodes_and_rebinds() {
        let host = host();
        let body = host.document.borrow().body();
        let (log, r) = recorder();
        let shown: VNode = ElementNode::new("div")
            .with_props(&Props::new().with_ref(r.clone()))
            .into();
        let mut mounted = mount(&VNode::Comment, &host, body);
        assert!(mounted.root_ids().is_empty());
        mounted.patch(&shown, &host);
        let id = mounted.root_ids()[0];
        mounted.patch(&VNode::Comment, &host);
        assert_eq!(*log.borrow(), vec![Some(id), None]);
        assert!(!host.document.borrow().is_alive(id));
    }

    #[test]
    fn portal_mounts_at_body() {
        let host = host();
        let body = host.document.borrow().body();
        let wrapper = host
            .document
            .borrow_mut()
            .insert(Some(body), Element::new("section"));
        let tree = VNode::Portal(Box::new(ElementNode::new("div").into()));
        let mounted = mount(&tree, &host, wrapper);
        let id = mounted.root_ids()[0];
        assert_eq!(host.document.borrow().parent_of(id), Some(body));
    }

    #[test]
    fn transition_ref_binds_first_content_element() {
        let host = host();
        let body = host.document.borrow().body();
        let (log, r) = recorder();
        let tree = VNode::Transition(TransitionNode {
            kind: TransitionKind::Root,
            key: None,
            appear: true,
            spec: TransitionSpec::default(),
            hooks: TransitionHooks::noop(),
            node_ref: Some(r),
            content: Box::new(ElementNode::new("div").into()),
        });
        let mounted = mount(&tree, &host, body);
        assert_eq!(*log.borrow(), vec![Some(mounted.root_ids()[0])]);
        assert_eq!(mounted.transition_hooks().len(), 1);
    }
}

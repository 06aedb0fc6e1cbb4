// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether Float: keeps a floating element positioned against its reference.
//!
//! A [`FloatController`] owns one floating element's position. It recomputes through the
//! host's [`GeometryEngine`](tether_geometry::GeometryEngine) when the configuration or an
//! endpoint changes, keeps the position current through an [`AutoUpdate`] subscription while
//! the element is shown, and emits [`FloatEvent`]s for the show/hide lifecycle.
//!
//! Components build on the controller and produce a [`VNode`] tree:
//!
//! - [`Float`]: the root. In implicit mode its first two element children are the reference and
//!   the floating content; in composable mode it provides a [`ContextScope`] for
//!   [`FloatReference`], [`FloatContent`] and [`FloatArrow`].
//! - [`FloatVirtual`]: floating content against a [`VirtualReference`].
//! - [`FloatContextMenu`]: opens at the pointer on `contextmenu`, closes on an outside click.
//! - [`FloatCursor`]: follows the mouse or the first touch.
//!
//! The environment is a [`Host`]: the [`Document`](tether_scene::Document) being positioned
//! in, a [`Scheduler`] for render-flush ticks and animation frames, the document
//! [`EventHub`](tether_events::EventHub), the geometry engine and the auto-update source.
//! [`mount`] writes a rendered tree into the document and binds the controller's refs.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use tether_float::{ElementNode, Float, FloatProps, Host, RenderAs, mount};
//! use tether_geometry::OffsetOptions;
//!
//! let host = Host::new(Size::new(1024.0, 768.0));
//! let float = Float::new(
//!     &host,
//!     FloatProps {
//!         offset: Some(OffsetOptions::Distance(8.0)),
//!         floating_as: RenderAs::Template,
//!         ..FloatProps::default()
//!     },
//! );
//! let tree = float.render(|_| {
//!     vec![
//!         ElementNode::new("button")
//!             .bounds(Rect::new(100.0, 100.0, 150.0, 120.0))
//!             .into(),
//!         ElementNode::new("ul")
//!             .bounds(Rect::new(0.0, 0.0, 200.0, 40.0))
//!             .into(),
//!     ]
//! });
//! let body = host.document.borrow().body();
//! let _mounted = mount(&tree, &host, body);
//! float.mounted();
//! host.flush();
//!
//! assert_eq!(float.controller().coords(), Some(Point::new(100.0, 128.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arrow;
mod auto_update;
mod context;
mod context_menu;
mod controller;
mod cursor;
mod emitter;
mod error;
mod float;
mod host;
mod middleware;
mod origin;
mod props;
mod reference;
mod render;
mod scheduler;
mod transition;
mod virtual_ref;
mod vnode;

pub use arrow::{ArrowStyle, FloatArrow};
pub use auto_update::{AutoUpdate, AutoUpdateHub, ChangeCallback, Subscription};
pub use context::{ArrowContext, ContextScope, FloatingContext, ReferenceContext};
pub use context_menu::FloatContextMenu;
pub use controller::{FloatController, FloatEvent};
pub use cursor::{CURSOR_ROOT_CLASS, CURSOR_STYLE_CSS, CURSOR_STYLE_ID, FloatCursor};
pub use emitter::{Emitter, ListenerKey};
pub use error::FloatError;
pub use float::{Float, FloatContent, FloatReference, FloatSlot};
pub use host::{Host, TransitionMode};
pub use middleware::middleware_from_props;
pub use origin::{OriginClass, OriginResolver, tailwindcss_origin_class};
pub use props::{
    FloatArrowProps, FloatContentProps, FloatContextMenuProps, FloatCursorProps, FloatProps,
    FloatReferenceProps, FloatVirtualProps, MiddlewareFactory, MiddlewareRefs, MiddlewareSource,
    RenderAs, RenderFn, Toggle, ZIndex,
};
pub use reference::{Reference, VirtualReference};
pub use render::{
    FloatingOptions, floating_style, render_as, render_floating, render_reference,
    render_wrapper,
};
pub use scheduler::{Scheduler, TaskId};
pub use transition::{TransitionHooks, TransitionProps, TransitionSpec, TransitionType};
pub use virtual_ref::{CloseHandle, FloatVirtual, VirtualHandles, VirtualSlot};
pub use vnode::{
    ElementNode, Mounted, NodeRef, Props, Style, TransitionKind, TransitionNode, VNode, mount,
    unmount_tree,
};

// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether Scene: a small retained document of element boxes.
//!
//! Floating elements are positioned against boxes that some host layout produced. This crate
//! holds those boxes in a tree rooted at a body element and answers the queries a
//! positioning controller needs.
//!
//! - [`Document`]: nodes, parent links, bounds, flags, attributes, and the viewport.
//! - [`NodeId`]: generational handle of a node; stale handles never alias live nodes.
//! - [`NodeFlags`]: display and picking controls.
//! - [`Element`]: per-node data (tag, attributes, text, bounds, z, flags).
//!
//! Key operations:
//! - [`Document::insert`] / [`Document::remove`] / [`Document::reparent`]
//! - [`Document::set_bounds`] / [`Document::set_flags`] / [`Document::set_attr`]
//! - [`Document::is_rendered`]: alive, attached under the body, displayed, and non-empty.
//! - [`Document::contains`] and [`Document::hit_test`] for outside-interaction checks.
//! - [`Document::acquire_style`] / [`Document::release_style`]: shared global style elements
//!   with holder counting.
//!
//! ## Not a layout engine
//!
//! Bounds are written by the caller in document space. There are no transforms, clips, or
//! stacking contexts; a single z value orders hit testing.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod styles;
mod types;

pub use document::Document;
pub use types::{Element, NodeFlags, NodeId};

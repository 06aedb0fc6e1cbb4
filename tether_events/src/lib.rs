// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether Events: document-level listeners scoped to component lifetimes.
//!
//! Floating components listen to the whole document: a context menu opens on `contextmenu`
//! anywhere, a cursor follower tracks every pointer move, and an open menu closes on a click
//! outside it. Those listeners must disappear with the component.
//!
//! - [`EventHub`]: per-kind listener registry; [`EventHub::listen`] returns a [`ListenerGuard`]
//!   that unregisters on drop.
//! - [`DocumentEvent`]: payload with position, target, pointer, touches, and a
//!   default-prevented flag.
//! - [`Outcome`]: only controls propagation to later listeners.
//! - [`OutsideClick`] / [`watch_outside_clicks`]: press tracking that recognizes clicks which
//!   started and ended outside a region.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod event;
mod hub;
mod outside;

pub use event::{DocumentEvent, EventKind, Outcome, PRIMARY_POINTER, PointerId};
pub use hub::{EventHub, ListenerGuard, ListenerId};
pub use outside::{OutsideClick, OutsideClickWatch, watch_outside_clicks};

// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document event payloads.

use core::cell::Cell;
use core::fmt;
use core::num::NonZeroU64;

use kurbo::Point;
use smallvec::SmallVec;
use tether_scene::NodeId;

/// Pointer identifier for tracking multiple concurrent presses.
pub type PointerId = NonZeroU64;

/// The pointer used when an event does not name one.
pub const PRIMARY_POINTER: PointerId = NonZeroU64::MIN;

/// Kinds of document-level events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Secondary-button request for a context menu.
    ContextMenu,
    /// The pointer entered the document.
    MouseEnter,
    /// The pointer moved.
    MouseMove,
    /// The pointer left the document.
    MouseLeave,
    /// A touch began.
    TouchStart,
    /// A touch moved.
    TouchMove,
    /// A touch ended.
    TouchEnd,
    /// A pointer was pressed.
    PointerDown,
    /// A pointer was released.
    PointerUp,
}

impl EventKind {
    /// DOM-style event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContextMenu => "contextmenu",
            Self::MouseEnter => "mouseenter",
            Self::MouseMove => "mousemove",
            Self::MouseLeave => "mouseleave",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether dispatch continues to later listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Skip the remaining listeners.
    Stop,
}

/// An event delivered to document-level listeners.
///
/// "Default prevented" lives on the payload, not in [`Outcome`]: listeners call
/// [`DocumentEvent::prevent_default`] and the dispatcher reports the flag afterwards.
#[derive(Clone, Debug)]
pub struct DocumentEvent {
    /// Event kind.
    pub kind: EventKind,
    /// Pointer position in viewport (client) coordinates.
    pub position: Point,
    /// Topmost node under the pointer, if any.
    pub target: Option<NodeId>,
    /// Pointer that produced the event.
    pub pointer: PointerId,
    /// Active touch points, first touch first.
    pub touches: SmallVec<[Point; 2]>,
    default_prevented: Cell<bool>,
}

impl DocumentEvent {
    /// A pointer event at `position` from the primary pointer.
    pub fn new(kind: EventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            target: None,
            pointer: PRIMARY_POINTER,
            touches: SmallVec::new(),
            default_prevented: Cell::new(false),
        }
    }

    /// A touch event whose first touch is at `position`.
    pub fn touch(kind: EventKind, position: Point) -> Self {
        let mut event = Self::new(kind, position);
        if kind != EventKind::TouchEnd {
            event.touches.push(position);
        }
        event
    }

    /// Builder-style target setter.
    #[must_use]
    pub fn with_target(mut self, target: Option<NodeId>) -> Self {
        self.target = target;
        self
    }

    /// Builder-style pointer setter.
    #[must_use]
    pub fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }

    /// Position of the first touch, or the pointer position for non-touch events.
    pub fn primary_point(&self) -> Point {
        self.touches.first().copied().unwrap_or(self.position)
    }

    /// Ask the host to skip its default action for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether a listener prevented the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

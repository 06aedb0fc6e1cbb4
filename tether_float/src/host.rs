// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The collaborators one document shares between its floating components.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use kurbo::Size;
use tether_events::EventHub;
use tether_geometry::{GeometryEngine, ReferenceEngine};
use tether_scene::Document;

use crate::auto_update::{AutoUpdate, AutoUpdateHub};
use crate::scheduler::Scheduler;

/// Who calls the transition hooks of floating content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TransitionMode {
    /// No animation engine: the controller runs the hooks itself as soon as the requested
    /// visibility changes.
    #[default]
    Instant,
    /// The host's transition engine runs the hooks when enter starts and leave ends.
    Driven,
}

/// Shared environment of the floating components of one document.
///
/// Cloning is cheap; every clone refers to the same document and queues.
#[derive(Clone)]
pub struct Host {
    /// The document being positioned in.
    pub document: Rc<RefCell<Document>>,
    /// Tick and animation-frame queues.
    pub scheduler: Rc<Scheduler>,
    /// Document-level event listeners.
    pub events: Rc<EventHub>,
    /// Geometry engine used for every computation.
    pub engine: Rc<dyn GeometryEngine>,
    /// Layout-change notifications.
    pub auto_update: Rc<dyn AutoUpdate>,
    /// Who calls transition hooks.
    pub transition_mode: TransitionMode,
    /// Rendering on a server: floating content appears only once mounted and shown.
    pub is_server: bool,
    /// The device reports touch input instead of a mouse.
    pub touch_capable: bool,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("viewport", &self.document.borrow().viewport())
            .field("scheduler", &self.scheduler)
            .field("events", &self.events)
            .field("transition_mode", &self.transition_mode)
            .field("is_server", &self.is_server)
            .field("touch_capable", &self.touch_capable)
            .finish_non_exhaustive()
    }
}

impl Host {
    /// A host with an empty document of the given viewport size, the [`ReferenceEngine`],
    /// and a fresh [`AutoUpdateHub`].
    pub fn new(viewport: Size) -> Self {
        Self {
            document: Rc::new(RefCell::new(Document::new(viewport))),
            scheduler: Rc::new(Scheduler::new()),
            events: Rc::new(EventHub::new()),
            engine: Rc::new(ReferenceEngine::default()),
            auto_update: Rc::new(AutoUpdateHub::new()),
            transition_mode: TransitionMode::Instant,
            is_server: false,
            touch_capable: false,
        }
    }

    /// Builder-style engine setter.
    #[must_use]
    pub fn with_engine(mut self, engine: Rc<dyn GeometryEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Builder-style auto-update source setter.
    #[must_use]
    pub fn with_auto_update(mut self, auto_update: Rc<dyn AutoUpdate>) -> Self {
        self.auto_update = auto_update;
        self
    }

    /// Builder-style transition mode setter.
    #[must_use]
    pub fn with_transition_mode(mut self, mode: TransitionMode) -> Self {
        self.transition_mode = mode;
        self
    }

    /// Builder-style server-rendering flag.
    #[must_use]
    pub fn with_server(mut self, is_server: bool) -> Self {
        self.is_server = is_server;
        self
    }

    /// Builder-style touch-capability flag.
    #[must_use]
    pub fn with_touch(mut self, touch_capable: bool) -> Self {
        self.touch_capable = touch_capable;
        self
    }

    /// Run the ticks queued by the last render pass.
    pub fn flush(&self) -> usize {
        self.scheduler.flush_ticks()
    }
}

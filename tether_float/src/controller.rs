// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The positioning controller: decides when to recompute, owns the show/hide lifecycle and
//! the auto-update subscription.
//!
//! ## Recompute triggers
//!
//! - Configuration edits (placement, strategy, middleware options) and rebinding an element
//!   reference, the floating element or the arrow recompute synchronously. Inside
//!   [`FloatController::batch`] they are folded into one recompute at the end of the
//!   outermost batch.
//! - A new virtual reference recomputes on the next animation frame. Bursts before the
//!   frame coalesce; a change made while the frame callback runs schedules the next frame.
//! - Auto-update notifications recompute while the floating element is shown.
//!
//! Computation needs both endpoints rendered (attached, displayed, non-empty). Otherwise it
//! is skipped and the previous coordinates stay. A request whose inputs equal the last
//! computed one is skipped as well, so repeated triggers never emit duplicate
//! [`FloatEvent::Update`]s.
//!
//! ## Lifecycle
//!
//! Requested visibility (what the caller asked for) and the shown state (between the enter
//! transition starting and the leave transition finishing) are tracked separately. When the
//! shown state turns on, the controller waits for the next render-flush tick, computes once,
//! subscribes to auto-update (if enabled) and then emits [`FloatEvent::Show`]. If an endpoint
//! is not rendered at the tick, subscribing and [`FloatEvent::Show`] wait until one binds or
//! [`FloatController::update`] finds both rendered. When it turns off, the subscription is dropped before
//! [`FloatEvent::Hide`] is emitted. [`FloatController::unmount`] drops the subscription,
//! cancels any pending tick or frame, and silences all further events.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;

use kurbo::{Point, Rect, Size};
use tether_geometry::{
    ArrowData, ComputeRequest, MiddlewareData, MiddlewareList, Placement, Strategy,
};
use tether_scene::NodeId;

use crate::auto_update::{ChangeCallback, Subscription};
use crate::emitter::{Emitter, ListenerKey};
use crate::host::{Host, TransitionMode};
use crate::middleware::middleware_from_props;
use crate::props::{FloatProps, MiddlewareRefs, MiddlewareSource};
use crate::reference::Reference;
use crate::scheduler::TaskId;
use crate::transition::TransitionHooks;
use crate::vnode::NodeRef;

/// Lifecycle notifications of a floating element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FloatEvent {
    /// The floating element is shown and its position is being kept current.
    Show,
    /// The floating element finished leaving.
    Hide,
    /// A new position was computed.
    Update,
}

struct LastRequest {
    reference: Rect,
    floating: Size,
    placement: Placement,
    strategy: Strategy,
    middleware: MiddlewareList,
    boundary: Rect,
    arrow: Option<Size>,
}

impl LastRequest {
    fn as_request(&self) -> ComputeRequest<'_> {
        ComputeRequest {
            reference: self.reference,
            floating: self.floating,
            placement: self.placement,
            strategy: self.strategy,
            middleware: &self.middleware,
            boundary: self.boundary,
            arrow_element: self.arrow,
        }
    }
}

struct Measured {
    reference: Rect,
    floating: Size,
    boundary: Rect,
    arrow: Option<Size>,
}

struct State {
    reference: Option<Reference>,
    floating: Option<NodeId>,
    arrow: Option<NodeId>,
    coords: Option<Point>,
    placement: Placement,
    strategy: Strategy,
    middleware_data: MiddlewareData,
    last: Option<LastRequest>,
    requested: bool,
    shown: bool,
    announced: bool,
    mounted: bool,
    torn_down: bool,
    subscription: Option<Subscription>,
    pending_tick: Option<TaskId>,
    pending_frame: Option<TaskId>,
    frame_in_flight: bool,
    frame_dirty: bool,
    batch_depth: u32,
    batch_dirty: bool,
    computes: u64,
}

struct Inner {
    host: Host,
    props: RefCell<FloatProps>,
    state: RefCell<State>,
    events: Emitter<FloatEvent>,
}

/// Positioning controller of one floating element.
///
/// Cloning is cheap and every clone drives the same element. Callbacks handed to the host
/// (ticks, frames, auto-update, refs, transition hooks) hold weak handles, so dropping
/// every clone stops them.
#[derive(Clone)]
pub struct FloatController {
    inner: Rc<Inner>,
}

impl fmt::Debug for FloatController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.inner.state.borrow();
        f.debug_struct("FloatController")
            .field("reference", &s.reference)
            .field("floating", &s.floating)
            .field("coords", &s.coords)
            .field("placement", &s.placement)
            .field("strategy", &s.strategy)
            .field("requested", &s.requested)
            .field("shown", &s.shown)
            .field("subscribed", &s.subscription.is_some())
            .field("torn_down", &s.torn_down)
            .finish_non_exhaustive()
    }
}

impl FloatController {
    /// Controller for `props`; requested visibility follows `props.show`, with `None`
    /// meaning always rendered.
    pub fn new(host: &Host, props: FloatProps) -> Self {
        let requested = props.show.unwrap_or(true);
        Self::with_requested(host, props, requested)
    }

    /// Controller with an explicit initial requested visibility.
    pub fn with_requested(host: &Host, props: FloatProps, requested: bool) -> Self {
        let state = State {
            reference: None,
            floating: None,
            arrow: None,
            coords: None,
            placement: props.placement,
            strategy: props.strategy,
            middleware_data: MiddlewareData::default(),
            last: None,
            requested,
            shown: false,
            announced: false,
            mounted: false,
            torn_down: false,
            subscription: None,
            pending_tick: None,
            pending_frame: None,
            frame_in_flight: false,
            frame_dirty: false,
            batch_depth: 0,
            batch_dirty: false,
            computes: 0,
        };
        let controller = Self {
            inner: Rc::new(Inner {
                host: host.clone(),
                props: RefCell::new(props),
                state: RefCell::new(state),
                events: Emitter::new(),
            }),
        };
        if requested && host.transition_mode == TransitionMode::Instant {
            controller.set_shown(true);
        }
        controller
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn weak(&self) -> Weak<Inner> {
        Rc::downgrade(&self.inner)
    }

    /// The host this controller runs against.
    pub fn host(&self) -> &Host {
        &self.inner.host
    }

    // --- events ---

    /// Listen for lifecycle events.
    pub fn on(&self, listener: impl Fn(&FloatEvent) + 'static) -> ListenerKey {
        self.inner.events.on(listener)
    }

    /// Stop listening.
    pub fn off(&self, key: ListenerKey) -> bool {
        self.inner.events.off(key)
    }

    fn emit(&self, event: FloatEvent) {
        if self.inner.state.borrow().torn_down {
            return;
        }
        self.inner.events.emit(&event);
    }

    // --- configuration ---

    /// Read the current configuration.
    pub fn with_props<R>(&self, f: impl FnOnce(&FloatProps) -> R) -> R {
        f(&self.inner.props.borrow())
    }

    /// Edit the configuration, then recompute.
    pub fn update_props(&self, f: impl FnOnce(&mut FloatProps)) {
        f(&mut self.inner.props.borrow_mut());
        self.compute_now();
    }

    /// Change the requested placement.
    pub fn set_placement(&self, placement: Placement) {
        self.update_props(|p| p.placement = placement);
    }

    /// Change the positioning strategy.
    pub fn set_strategy(&self, strategy: Strategy) {
        self.update_props(|p| p.strategy = strategy);
    }

    /// Replace the user middleware.
    pub fn set_middleware(&self, middleware: MiddlewareSource) {
        self.update_props(|p| p.middleware = middleware);
    }

    /// Run `f`, folding every recompute it triggers into one at the end.
    ///
    /// If `f` panics the batch is closed without recomputing.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Depth<'a>(&'a RefCell<State>);

        impl Drop for Depth<'_> {
            fn drop(&mut self) {
                self.0.borrow_mut().batch_depth -= 1;
            }
        }

        self.inner.state.borrow_mut().batch_depth += 1;
        let out = {
            let _depth = Depth(&self.inner.state);
            f()
        };
        let run = {
            let mut s = self.inner.state.borrow_mut();
            s.batch_depth == 0 && core::mem::take(&mut s.batch_dirty)
        };
        if run {
            self.compute_now();
        }
        out
    }

    // --- endpoints ---

    /// Bind or clear the reference.
    ///
    /// Element references recompute at once; virtual references on the next frame.
    pub fn set_reference(&self, reference: Option<Reference>) {
        {
            let mut s = self.inner.state.borrow_mut();
            let same = match (&s.reference, &reference) {
                (Some(a), Some(b)) => a.same_identity(b),
                (None, None) => true,
                _ => false,
            };
            if same || s.torn_down {
                return;
            }
            s.reference = reference.clone();
        }
        match reference {
            Some(Reference::Virtual(_)) => self.schedule_frame(),
            _ => {
                self.compute_now();
                self.announce_if_ready();
            }
        }
    }

    /// Bind or clear the floating element.
    pub fn set_floating(&self, floating: Option<NodeId>) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.floating == floating || s.torn_down {
                return;
            }
            s.floating = floating;
        }
        self.compute_now();
        self.announce_if_ready();
    }

    /// Bind or clear the arrow element.
    pub fn set_arrow(&self, arrow: Option<NodeId>) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.arrow == arrow || s.torn_down {
                return;
            }
            s.arrow = arrow;
        }
        self.compute_now();
    }

    /// Ref that binds an element reference.
    pub fn reference_ref(&self) -> NodeRef {
        let weak = self.weak();
        NodeRef::new(move |id| {
            if let Some(c) = Self::from_weak(&weak) {
                c.set_reference(id.map(Reference::Element));
            }
        })
    }

    /// Ref that binds the floating element.
    pub fn floating_ref(&self) -> NodeRef {
        let weak = self.weak();
        NodeRef::new(move |id| {
            if let Some(c) = Self::from_weak(&weak) {
                c.set_floating(id);
            }
        })
    }

    /// Ref that binds the arrow element.
    pub fn arrow_ref(&self) -> NodeRef {
        let weak = self.weak();
        NodeRef::new(move |id| {
            if let Some(c) = Self::from_weak(&weak) {
                c.set_arrow(id);
            }
        })
    }

    // --- computation ---

    fn measure(&self) -> Option<Measured> {
        let (reference, floating, arrow) = {
            let s = self.inner.state.borrow();
            (s.reference.clone()?, s.floating?, s.arrow)
        };
        let doc = self.inner.host.document.borrow();
        let reference = reference.measure(&doc)?;
        if !doc.is_rendered(floating) {
            return None;
        }
        let floating = doc.bounds(floating)?.size();
        let arrow = arrow
            .filter(|a| doc.is_rendered(*a))
            .and_then(|a| doc.bounds(a))
            .map(|b| b.size());
        Some(Measured {
            reference,
            floating,
            boundary: doc.viewport(),
            arrow,
        })
    }

    /// Whether both endpoints are bound and rendered.
    pub fn is_visible(&self) -> bool {
        self.measure().is_some()
    }

    /// Recompute now if both endpoints are rendered and the inputs changed.
    ///
    /// Returns whether the engine ran. Emits [`FloatEvent::Update`] when it did.
    pub fn compute_now(&self) -> bool {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down {
                return false;
            }
            if s.batch_depth > 0 {
                s.batch_dirty = true;
                return false;
            }
        }
        let Some(m) = self.measure() else {
            tracing::trace!("compute suppressed: endpoint missing or not rendered");
            return false;
        };
        let props = self.inner.props.borrow().clone();
        let refs = {
            let s = self.inner.state.borrow();
            MiddlewareRefs {
                reference: s.reference.clone(),
                floating: s.floating,
            }
        };
        let middleware = middleware_from_props(&props, &refs, m.arrow.is_some());
        let request = ComputeRequest {
            reference: m.reference,
            floating: m.floating,
            placement: props.placement,
            strategy: props.strategy,
            middleware: &middleware,
            boundary: m.boundary,
            arrow_element: m.arrow,
        };
        let unchanged = self
            .inner
            .state
            .borrow()
            .last
            .as_ref()
            .is_some_and(|last| last.as_request().same_inputs(&request));
        if unchanged {
            tracing::trace!("compute skipped: inputs unchanged");
            return false;
        }
        let result = self.inner.host.engine.compute(&request);
        tracing::trace!(
            x = result.x,
            y = result.y,
            placement = %result.placement,
            "position computed"
        );
        {
            let mut s = self.inner.state.borrow_mut();
            s.coords = Some(result.coords());
            s.placement = result.placement;
            s.strategy = result.strategy;
            s.middleware_data = result.middleware_data;
            s.computes += 1;
            s.last = Some(LastRequest {
                reference: m.reference,
                floating: m.floating,
                placement: props.placement,
                strategy: props.strategy,
                middleware,
                boundary: m.boundary,
                arrow: m.arrow,
            });
        }
        self.emit(FloatEvent::Update);
        true
    }

    /// Recompute if visible; the auto-update and render-time entry point.
    ///
    /// Also completes a show that was waiting for its endpoints to render.
    pub fn update(&self) {
        self.compute_now();
        self.announce_if_ready();
    }

    fn schedule_frame(&self) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down {
                return;
            }
            if s.pending_frame.is_some() {
                tracing::trace!("virtual reference change coalesced into pending frame");
                return;
            }
            if s.frame_in_flight {
                s.frame_dirty = true;
                return;
            }
        }
        let weak = self.weak();
        let id = self
            .inner
            .host
            .scheduler
            .request_animation_frame(move || {
                if let Some(c) = Self::from_weak(&weak) {
                    c.run_frame();
                }
            });
        self.inner.state.borrow_mut().pending_frame = Some(id);
    }

    fn run_frame(&self) {
        {
            let mut s = self.inner.state.borrow_mut();
            s.pending_frame = None;
            if s.torn_down {
                return;
            }
            s.frame_in_flight = true;
        }
        self.compute_now();
        self.announce_if_ready();
        let again = {
            let mut s = self.inner.state.borrow_mut();
            s.frame_in_flight = false;
            core::mem::take(&mut s.frame_dirty)
        };
        if again {
            self.schedule_frame();
        }
    }

    // --- lifecycle ---

    /// Change the requested visibility.
    ///
    /// In [`TransitionMode::Instant`] this also runs the transition hooks.
    pub fn set_requested(&self, requested: bool) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.requested == requested || s.torn_down {
                return;
            }
            s.requested = requested;
        }
        if self.inner.host.transition_mode == TransitionMode::Instant {
            self.set_shown(requested);
        }
    }

    /// Hooks for the transition around the floating content.
    pub fn transition_hooks(&self) -> TransitionHooks {
        let enter = self.weak();
        let leave = self.weak();
        TransitionHooks::new(
            move || {
                if let Some(c) = Self::from_weak(&enter) {
                    c.set_shown(true);
                }
            },
            move || {
                if let Some(c) = Self::from_weak(&leave) {
                    c.set_shown(false);
                }
            },
        )
    }

    fn set_shown(&self, shown: bool) {
        let (subscription, tick, announced) = {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down || s.shown == shown {
                return;
            }
            s.shown = shown;
            let announced = !shown && core::mem::take(&mut s.announced);
            (s.subscription.take(), s.pending_tick.take(), announced)
        };
        if let Some(tick) = tick {
            self.inner.host.scheduler.cancel(tick);
        }
        if let Some(mut subscription) = subscription {
            subscription.unsubscribe();
            tracing::debug!("auto-update unsubscribed");
        }
        if !shown {
            if announced {
                tracing::debug!("floating element hidden");
                self.emit(FloatEvent::Hide);
            }
            return;
        }
        let weak = self.weak();
        let id = self.inner.host.scheduler.next_tick(move || {
            if let Some(c) = Self::from_weak(&weak) {
                c.start_shown();
            }
        });
        self.inner.state.borrow_mut().pending_tick = Some(id);
    }

    fn start_shown(&self) {
        {
            let mut s = self.inner.state.borrow_mut();
            s.pending_tick = None;
            if s.torn_down || !s.shown {
                return;
            }
        }
        self.compute_now();
        self.announce_if_ready();
    }

    /// Subscribe to auto-update and emit [`FloatEvent::Show`] once the tick has run and
    /// both endpoints are rendered. Until then the announcement waits for an endpoint
    /// binding, a frame or an [`update`](Self::update).
    fn announce_if_ready(&self) {
        let endpoints = {
            let s = self.inner.state.borrow();
            if s.torn_down || !s.shown || s.announced || s.pending_tick.is_some() {
                return;
            }
            s.reference.clone().zip(s.floating)
        };
        let Some((reference, floating)) = endpoints.filter(|_| self.is_visible()) else {
            tracing::trace!("show deferred: endpoint missing or not rendered");
            return;
        };
        let options = self.inner.props.borrow().auto_update;
        if let Some(options) = options {
            let stale = self.inner.state.borrow_mut().subscription.take();
            if let Some(mut stale) = stale {
                stale.unsubscribe();
            }
            let weak = self.weak();
            let on_change: ChangeCallback = Rc::new(move || {
                if let Some(c) = Self::from_weak(&weak) {
                    c.update();
                }
            });
            let subscription =
                self.inner
                    .host
                    .auto_update
                    .subscribe(&reference, floating, on_change, options);
            self.inner.state.borrow_mut().subscription = Some(subscription);
            tracing::debug!("auto-update subscribed");
        }
        self.inner.state.borrow_mut().announced = true;
        tracing::debug!("floating element shown");
        self.emit(FloatEvent::Show);
    }

    /// Note that the owning component has been mounted.
    pub fn mark_mounted(&self) {
        self.inner.state.borrow_mut().mounted = true;
    }

    /// Tear down: drop the subscription, cancel pending work, silence events.
    ///
    /// Does not emit [`FloatEvent::Hide`].
    pub fn unmount(&self) {
        let (subscription, tick, frame) = {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down {
                return;
            }
            s.torn_down = true;
            s.mounted = false;
            (
                s.subscription.take(),
                s.pending_tick.take(),
                s.pending_frame.take(),
            )
        };
        let scheduler = &self.inner.host.scheduler;
        if let Some(tick) = tick {
            scheduler.cancel(tick);
        }
        if let Some(frame) = frame {
            scheduler.cancel(frame);
        }
        if let Some(mut subscription) = subscription {
            subscription.unsubscribe();
            tracing::debug!("auto-update unsubscribed on unmount");
        }
        self.inner.events.clear();
    }

    // --- state ---

    /// Last computed coordinates, or `None` before the first computation.
    pub fn coords(&self) -> Option<Point> {
        self.inner.state.borrow().coords
    }

    /// Resolved placement (after flip/autoPlacement).
    pub fn placement(&self) -> Placement {
        self.inner.state.borrow().placement
    }

    /// Resolved strategy.
    pub fn strategy(&self) -> Strategy {
        self.inner.state.borrow().strategy
    }

    /// Side data of the last computation.
    pub fn middleware_data(&self) -> MiddlewareData {
        self.inner.state.borrow().middleware_data.clone()
    }

    /// Arrow side data of the last computation.
    pub fn arrow_data(&self) -> Option<ArrowData> {
        self.inner.state.borrow().middleware_data.arrow()
    }

    /// Current reference.
    pub fn reference(&self) -> Option<Reference> {
        self.inner.state.borrow().reference.clone()
    }

    /// Current floating element.
    pub fn floating(&self) -> Option<NodeId> {
        self.inner.state.borrow().floating
    }

    /// Current arrow element.
    pub fn arrow(&self) -> Option<NodeId> {
        self.inner.state.borrow().arrow
    }

    /// Width of an element reference, when rendered.
    pub fn reference_width(&self) -> Option<f64> {
        let reference = self.inner.state.borrow().reference.clone()?;
        let id = reference.element()?;
        let doc = self.inner.host.document.borrow();
        doc.is_rendered(id)
            .then(|| doc.bounds(id))
            .flatten()
            .map(|b| b.width())
    }

    /// Requested visibility.
    pub fn is_requested(&self) -> bool {
        self.inner.state.borrow().requested
    }

    /// Whether the element is between enter start and leave end.
    pub fn is_shown(&self) -> bool {
        self.inner.state.borrow().shown
    }

    /// Whether an auto-update subscription is live.
    pub fn is_subscribed(&self) -> bool {
        self.inner.state.borrow().subscription.is_some()
    }

    /// Whether the owning component is mounted.
    pub fn is_mounted(&self) -> bool {
        self.inner.state.borrow().mounted
    }

    /// Whether [`FloatController::unmount`] ran.
    pub fn is_torn_down(&self) -> bool {
        self.inner.state.borrow().torn_down
    }

    /// Number of engine invocations so far.
    pub fn compute_count(&self) -> u64 {
        self.inner.state.borrow().computes
    }

    /// Whether a frame callback is queued.
    pub fn has_pending_frame(&self) -> bool {
        self.inner.state.borrow().pending_frame.is_some()
    }
}

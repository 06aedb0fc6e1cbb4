// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/leave transition classes and lifecycle hooks.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use tether_geometry::Placement;

use crate::origin::{OriginClass, tailwindcss_origin_class};

/// Whether the host waits for a CSS transition or a CSS animation to end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionType {
    /// `transitionend`.
    Transition,
    /// `animationend`.
    Animation,
}

/// Transition configuration shared by `Float` and its content.
#[derive(Clone, Debug, Default)]
pub struct TransitionProps {
    /// Named transition; when set, the class strings below are not passed on.
    pub name: Option<String>,
    /// Which end event to wait for.
    pub kind: Option<TransitionType>,
    /// Classes present for the whole enter phase.
    pub enter: Option<String>,
    /// Classes at the first enter frame.
    pub enter_from: Option<String>,
    /// Classes at the last enter frame.
    pub enter_to: Option<String>,
    /// Classes present for the whole leave phase.
    pub leave: Option<String>,
    /// Classes at the first leave frame.
    pub leave_from: Option<String>,
    /// Classes at the last leave frame.
    pub leave_to: Option<String>,
    /// Placement-dependent origin class.
    pub origin_class: Option<OriginClass>,
    /// Use the Tailwind CSS origin table when `origin_class` is unset.
    pub tailwindcss_origin_class: bool,
}

impl TransitionProps {
    /// The origin class for `placement`, or an empty string.
    #[must_use]
    pub fn origin_class_for(&self, placement: Placement) -> String {
        match &self.origin_class {
            Some(origin) => origin.resolve(placement),
            None if self.tailwindcss_origin_class => tailwindcss_origin_class(placement).into(),
            None => String::new(),
        }
    }
}

/// Transition classes resolved for one placement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionSpec {
    /// Named transition.
    pub name: Option<String>,
    /// Which end event to wait for.
    pub kind: Option<TransitionType>,
    /// Enter classes joined with the origin class.
    pub enter_active: Option<String>,
    /// Classes at the first enter frame.
    pub enter_from: Option<String>,
    /// Classes at the last enter frame.
    pub enter_to: Option<String>,
    /// Leave classes joined with the origin class.
    pub leave_active: Option<String>,
    /// Classes at the first leave frame.
    pub leave_from: Option<String>,
    /// Classes at the last leave frame.
    pub leave_to: Option<String>,
    /// The origin class the active classes were joined with.
    pub origin_class: String,
}

fn join_classes(explicit: Option<&str>, origin: &str) -> Option<String> {
    match (explicit.filter(|c| !c.is_empty()), origin.is_empty()) {
        (None, true) => None,
        (None, false) => Some(origin.into()),
        (Some(c), true) => Some(c.into()),
        (Some(c), false) => Some(format!("{c} {origin}")),
    }
}

impl TransitionSpec {
    /// Resolve `props` against the current placement.
    #[must_use]
    pub fn resolve(props: &TransitionProps, placement: Placement) -> Self {
        let origin_class = props.origin_class_for(placement);
        Self {
            name: props.name.clone(),
            kind: props.kind,
            enter_active: join_classes(props.enter.as_deref(), &origin_class),
            enter_from: props.enter_from.clone(),
            enter_to: props.enter_to.clone(),
            leave_active: join_classes(props.leave.as_deref(), &origin_class),
            leave_from: props.leave_from.clone(),
            leave_to: props.leave_to.clone(),
            origin_class,
        }
    }

    /// Whether the class strings apply; a named transition supplies its own.
    #[must_use]
    pub fn uses_classes(&self) -> bool {
        self.name.is_none()
    }
}

/// Callbacks the transition engine runs around the floating content's lifetime.
#[derive(Clone)]
pub struct TransitionHooks {
    before_enter: Rc<dyn Fn()>,
    after_leave: Rc<dyn Fn()>,
}

impl fmt::Debug for TransitionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionHooks").finish_non_exhaustive()
    }
}

impl TransitionHooks {
    /// Hooks from the two callbacks.
    pub fn new(before_enter: impl Fn() + 'static, after_leave: impl Fn() + 'static) -> Self {
        Self {
            before_enter: Rc::new(before_enter),
            after_leave: Rc::new(after_leave),
        }
    }

    /// Hooks that do nothing.
    pub fn noop() -> Self {
        Self::new(|| {}, || {})
    }

    /// Enter is about to start.
    pub fn before_enter(&self) {
        (self.before_enter)();
    }

    /// Leave has finished.
    pub fn after_leave(&self) {
        (self.after_leave)();
    }
}

// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turns component configuration into the ordered middleware list.

use tether_geometry::{
    ArrowOptions, AutoPlacementOptions, FlipOptions, HideOptions, Middleware, MiddlewareList,
    ShiftOptions,
};

use crate::props::{FloatProps, MiddlewareRefs};

/// Middleware for `props`, in application order.
///
/// The order is `offset`, `flip`, `shift`, `autoPlacement`, `arrow`, the user middleware,
/// then `hide`, so that `hide` sees the final position. `arrow` is only added while an
/// arrow element is bound.
pub fn middleware_from_props(
    props: &FloatProps,
    refs: &MiddlewareRefs,
    arrow_bound: bool,
) -> MiddlewareList {
    let mut list = MiddlewareList::new();
    if let Some(offset) = props.offset {
        list.push(Middleware::Offset(offset));
    }
    if let Some(flip) = props.flip.options(|o, p| FlipOptions {
        padding: p.into(),
        ..o
    }) {
        list.push(Middleware::Flip(flip));
    }
    if let Some(shift) = props.shift.options(|o, p| ShiftOptions {
        padding: p.into(),
        ..o
    }) {
        list.push(Middleware::Shift(shift));
    }
    if let Some(auto) = props.auto_placement.options(|o, p| AutoPlacementOptions {
        padding: p.into(),
        ..o
    }) {
        list.push(Middleware::AutoPlacement(auto));
    }
    if arrow_bound
        && let Some(arrow) = props
            .arrow
            .options(|_, p| ArrowOptions { padding: p.into() })
    {
        list.push(Middleware::Arrow(arrow));
    }
    list.extend(props.middleware.resolve(refs));
    if let Some(hide) = props.hide.options(|o, p| HideOptions {
        padding: p.into(),
        ..o
    }) {
        list.push(Middleware::Hide(hide));
    }
    list
}

// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-process [`GeometryEngine`] implementing every built-in middleware.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::data::{Datum, MiddlewareData, Payload, PlacementOverflow, SideOffsets};
use crate::engine::{ComputeRequest, ComputeResult, GeometryEngine};
use crate::middleware::{
    ArrowOptions, AutoPlacementOptions, ElementRects, FallbackStrategy, FlipOptions, HideOptions,
    HideStrategy, Middleware, MiddlewareReturn, MiddlewareState, OffsetOptions, Padding, Reset,
    ShiftOptions,
};
use crate::placement::{Alignment, Axis, Placement, Side};

/// Default bound on middleware loop restarts.
pub const DEFAULT_RESET_LIMIT: usize = 50;

/// Reference implementation of the engine contract.
///
/// Coordinates are computed from the placement, then each middleware step runs in
/// order. A step may restart the loop (for example `flip` choosing another placement);
/// restarts are bounded by [`ReferenceEngine::reset_limit`].
#[derive(Copy, Clone, Debug)]
pub struct ReferenceEngine {
    /// Maximum number of loop restarts per computation.
    pub reset_limit: usize,
}

impl Default for ReferenceEngine {
    fn default() -> Self {
        Self {
            reset_limit: DEFAULT_RESET_LIMIT,
        }
    }
}

impl GeometryEngine for ReferenceEngine {
    fn compute(&self, request: &ComputeRequest<'_>) -> ComputeResult {
        let rects = ElementRects {
            reference: request.reference,
            floating: request.floating,
        };
        let mut placement = request.placement;
        let mut coords = coords_from_placement(&rects, placement);
        let mut data = MiddlewareData::default();
        let mut resets = 0;
        let mut i = 0;

        while let Some(step) = request.middleware.get(i) {
            let ret = {
                let state = MiddlewareState {
                    coords,
                    initial_placement: request.placement,
                    placement,
                    strategy: request.strategy,
                    rects,
                    middleware_data: &data,
                    boundary: request.boundary,
                    arrow_element: request.arrow_element,
                };
                run_step(step, &state)
            };
            coords = Point::new(ret.x.unwrap_or(coords.x), ret.y.unwrap_or(coords.y));
            if let Some(payload) = ret.data {
                data.merge(step.name(), payload);
            }
            match ret.reset {
                Some(reset) if resets < self.reset_limit => {
                    resets += 1;
                    if let Reset::Placement(next) = reset {
                        placement = next;
                        coords = coords_from_placement(&rects, placement);
                    }
                    i = 0;
                }
                _ => i += 1,
            }
        }

        ComputeResult {
            x: coords.x,
            y: coords.y,
            placement,
            strategy: request.strategy,
            middleware_data: data,
        }
    }
}

/// Coordinates of the floating element for `placement` before any middleware.
#[must_use]
pub fn coords_from_placement(rects: &ElementRects, placement: Placement) -> Point {
    let reference = rects.reference;
    let floating = rects.floating;
    let common_x = reference.x0 + reference.width() / 2.0 - floating.width / 2.0;
    let common_y = reference.y0 + reference.height() / 2.0 - floating.height / 2.0;
    let align_axis = placement.alignment_axis();
    let common_align =
        align_axis.length(reference.size()) / 2.0 - align_axis.length(floating) / 2.0;

    let coords = match placement.side() {
        Side::Top => Point::new(common_x, reference.y0 - floating.height),
        Side::Bottom => Point::new(common_x, reference.y1),
        Side::Right => Point::new(reference.x1, common_y),
        Side::Left => Point::new(reference.x0 - floating.width, common_y),
    };

    match placement.alignment() {
        Some(Alignment::Start) => {
            align_axis.with_point(coords, align_axis.of_point(coords) - common_align)
        }
        Some(Alignment::End) => {
            align_axis.with_point(coords, align_axis.of_point(coords) + common_align)
        }
        None => coords,
    }
}

/// How far `element` extends past each side of `boundary`, after `padding`.
#[must_use]
pub fn detect_overflow(element: Rect, boundary: Rect, padding: &Padding) -> SideOffsets {
    SideOffsets {
        top: boundary.y0 - element.y0 + padding.top,
        bottom: element.y1 - boundary.y1 + padding.bottom,
        left: boundary.x0 - element.x0 + padding.left,
        right: element.x1 - boundary.x1 + padding.right,
    }
}

fn clamp(start: f64, value: f64, end: f64) -> f64 {
    start.max(value.min(end))
}

/// Sides to check along the alignment axis, nearest-overflowing first.
fn alignment_sides(placement: Placement, rects: &ElementRects) -> (Side, Side) {
    let axis = placement.alignment_axis();
    let start = placement.alignment() == Some(Alignment::Start);
    let mut main = match axis {
        Axis::X if start => Side::Right,
        Axis::X => Side::Left,
        Axis::Y if start => Side::Bottom,
        Axis::Y => Side::Top,
    };
    if axis.length(rects.reference.size()) > axis.length(rects.floating) {
        main = main.opposite();
    }
    (main, main.opposite())
}

fn run_step(step: &Middleware, state: &MiddlewareState<'_>) -> MiddlewareReturn {
    match step {
        Middleware::Offset(options) => offset(state, options),
        Middleware::Shift(options) => shift(state, options),
        Middleware::Flip(options) => flip(state, options),
        Middleware::AutoPlacement(options) => auto_placement(state, options),
        Middleware::Arrow(options) => arrow(state, options),
        Middleware::Hide(options) => hide(state, options),
        Middleware::Custom(custom) => custom.run(state),
    }
}

fn offset(state: &MiddlewareState<'_>, options: &OffsetOptions) -> MiddlewareReturn {
    let placement = state.placement;
    // The arrow already nudged the floating element on a previous pass.
    let previous = state.middleware_data.get("offset");
    let arrow_shifted = state
        .middleware_data
        .arrow()
        .is_some_and(|a| a.alignment_offset.is_some());
    if arrow_shifted && previous.and_then(|p| p.placement("placement")) == Some(placement) {
        return MiddlewareReturn::none();
    }

    let side = placement.side();
    let main_multi = if matches!(side, Side::Left | Side::Top) {
        -1.0
    } else {
        1.0
    };
    let (main, mut cross, alignment_axis) = match options {
        OffsetOptions::Distance(d) => (*d, 0.0, None),
        OffsetOptions::Axes(axes) => (axes.main_axis, axes.cross_axis, axes.alignment_axis),
    };
    if let (Some(alignment), Some(value)) = (placement.alignment(), alignment_axis) {
        cross = if alignment == Alignment::End {
            -value
        } else {
            value
        };
    }
    let (dx, dy) = if side.axis() == Axis::Y {
        (cross, main * main_multi)
    } else {
        (main * main_multi, cross)
    };

    MiddlewareReturn::at(Point::new(state.coords.x + dx, state.coords.y + dy)).with_data(
        Payload::new()
            .with("x", Datum::Number(dx))
            .with("y", Datum::Number(dy))
            .with("placement", Datum::Placement(placement)),
    )
}

fn shift(state: &MiddlewareState<'_>, options: &ShiftOptions) -> MiddlewareReturn {
    let overflow = detect_overflow(state.floating_rect(), state.boundary, &options.padding);
    let cross_axis = state.placement.side_axis();
    let main_axis = cross_axis.opposite();
    let mut limited = state.coords;

    let mut limit = |axis: Axis| {
        let (min_side, max_side) = match axis {
            Axis::Y => (Side::Top, Side::Bottom),
            Axis::X => (Side::Left, Side::Right),
        };
        let coord = axis.of_point(limited);
        let min = coord + overflow.get(min_side);
        let max = coord - overflow.get(max_side);
        limited = axis.with_point(limited, clamp(min, coord, max));
    };
    if options.main_axis {
        limit(main_axis);
    }
    if options.cross_axis {
        limit(cross_axis);
    }

    MiddlewareReturn::at(limited).with_data(
        Payload::new()
            .with("x", Datum::Number(limited.x - state.coords.x))
            .with("y", Datum::Number(limited.y - state.coords.y)),
    )
}

fn flip(state: &MiddlewareState<'_>, options: &FlipOptions) -> MiddlewareReturn {
    if state
        .middleware_data
        .arrow()
        .is_some_and(|a| a.alignment_offset.is_some())
    {
        return MiddlewareReturn::none();
    }

    let placement = state.placement;
    let initial = state.initial_placement;
    let mut placements = Vec::with_capacity(4);
    placements.push(initial);
    match &options.fallback_placements {
        Some(list) => placements.extend(list.iter().copied()),
        None if initial.alignment().is_none() => placements.push(initial.opposite()),
        None => placements.extend(initial.expanded()),
    }

    let overflow = detect_overflow(state.floating_rect(), state.boundary, &options.padding);
    let mut overflows = Vec::with_capacity(3);
    if options.main_axis {
        overflows.push(overflow.get(placement.side()));
    }
    if options.cross_axis {
        let (a, b) = alignment_sides(placement, &state.rects);
        overflows.push(overflow.get(a));
        overflows.push(overflow.get(b));
    }

    let previous = state.middleware_data.get("flip");
    let mut history: Vec<PlacementOverflow> = previous
        .map(|p| p.overflows("overflows").to_vec())
        .unwrap_or_default();
    let fits = overflows.iter().all(|v| *v <= 0.0);
    history.push(PlacementOverflow {
        placement,
        overflows,
    });
    if fits {
        return MiddlewareReturn::none();
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "indices are small non-negative integers stored as side data"
    )]
    let next_index = previous
        .and_then(|p| p.number("index"))
        .map_or(0, |n| n as usize)
        + 1;
    if let Some(next) = placements.get(next_index) {
        #[allow(
            clippy::cast_precision_loss,
            reason = "indices are small non-negative integers stored as side data"
        )]
        let index = next_index as f64;
        return MiddlewareReturn::none()
            .with_data(
                Payload::new()
                    .with("index", Datum::Number(index))
                    .with("overflows", Datum::Overflows(history)),
            )
            .with_reset(Reset::Placement(*next));
    }

    let first_fitting_main = history
        .iter()
        .filter(|d| d.overflows.first().is_none_or(|v| *v <= 0.0))
        .min_by(|a, b| {
            let a = a.overflows.get(1).copied().unwrap_or(0.0);
            let b = b.overflows.get(1).copied().unwrap_or(0.0);
            a.total_cmp(&b)
        })
        .map(|d| d.placement);
    let reset_placement = first_fitting_main.unwrap_or_else(|| match options.fallback_strategy {
        FallbackStrategy::BestFit => history
            .iter()
            .map(|d| {
                let total: f64 = d.overflows.iter().filter(|v| **v > 0.0).sum();
                (d.placement, total)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(initial, |(p, _)| p),
        FallbackStrategy::InitialPlacement => initial,
    });

    if reset_placement != placement {
        return MiddlewareReturn::none().with_reset(Reset::Placement(reset_placement));
    }
    MiddlewareReturn::none()
}

fn placement_list(options: &AutoPlacementOptions) -> Vec<Placement> {
    let allowed = &options.allowed_placements;
    let sorted: Vec<Placement> = match options.alignment {
        Some(alignment) => allowed
            .iter()
            .filter(|p| p.alignment() == Some(alignment))
            .chain(allowed.iter().filter(|p| p.alignment() != Some(alignment)))
            .copied()
            .collect(),
        None => allowed
            .iter()
            .filter(|p| p.alignment().is_none())
            .copied()
            .collect(),
    };
    sorted
        .into_iter()
        .filter(|p| match options.alignment {
            Some(alignment) => {
                p.alignment() == Some(alignment)
                    || (options.auto_alignment && p.opposite_alignment() != *p)
            }
            None => true,
        })
        .collect()
}

fn auto_placement(state: &MiddlewareState<'_>, options: &AutoPlacementOptions) -> MiddlewareReturn {
    let placements = placement_list(options);
    let previous = state.middleware_data.get("autoPlacement");
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "indices are small non-negative integers stored as side data"
    )]
    let current_index = previous
        .and_then(|p| p.number("index"))
        .map_or(0, |n| n as usize);
    let Some(current) = placements.get(current_index).copied() else {
        return MiddlewareReturn::none();
    };
    if state.placement != current {
        return MiddlewareReturn::none().with_reset(Reset::Placement(placements[0]));
    }

    let overflow = detect_overflow(state.floating_rect(), state.boundary, &options.padding);
    let (a, b) = alignment_sides(current, &state.rects);
    let mut history: Vec<PlacementOverflow> = previous
        .map(|p| p.overflows("overflows").to_vec())
        .unwrap_or_default();
    history.push(PlacementOverflow {
        placement: current,
        overflows: alloc::vec![
            overflow.get(current.side()),
            overflow.get(a),
            overflow.get(b)
        ],
    });

    #[allow(
        clippy::cast_precision_loss,
        reason = "indices are small non-negative integers stored as side data"
    )]
    let next_index = (current_index + 1) as f64;
    if let Some(next) = placements.get(current_index + 1) {
        return MiddlewareReturn::none()
            .with_data(
                Payload::new()
                    .with("index", Datum::Number(next_index))
                    .with("overflows", Datum::Overflows(history)),
            )
            .with_reset(Reset::Placement(*next));
    }

    let mut scored: Vec<(Placement, f64, &[f64])> = history
        .iter()
        .map(|d| {
            let score = if d.placement.alignment().is_some() && options.cross_axis {
                d.overflows[0] + d.overflows[1]
            } else {
                d.overflows[0]
            };
            (d.placement, score, d.overflows.as_slice())
        })
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    let fitting = scored.iter().find(|(p, _, overflows)| {
        let checked = if p.alignment().is_some() { 2 } else { 3 };
        overflows[..checked].iter().all(|v| *v <= 0.0)
    });
    let reset_placement = fitting.or(scored.first()).map(|(p, _, _)| *p);

    match reset_placement {
        Some(p) if p != state.placement => MiddlewareReturn::none()
            .with_data(
                Payload::new()
                    .with("index", Datum::Number(next_index))
                    .with("overflows", Datum::Overflows(history.clone())),
            )
            .with_reset(Reset::Placement(p)),
        _ => MiddlewareReturn::none(),
    }
}

fn arrow(state: &MiddlewareState<'_>, options: &ArrowOptions) -> MiddlewareReturn {
    let Some(arrow) = state.arrow_element else {
        return MiddlewareReturn::none();
    };
    let placement = state.placement;
    let axis = placement.alignment_axis();
    let (min_side, max_side) = match axis {
        Axis::Y => (Side::Top, Side::Bottom),
        Axis::X => (Side::Left, Side::Right),
    };
    let coord = axis.of_point(state.coords);
    let reference_len = axis.length(state.rects.reference.size());
    let reference_start = axis.start(state.rects.reference);
    let floating_len = axis.length(state.rects.floating);
    let arrow_len = axis.length(arrow);

    let end_diff = reference_len + reference_start - coord - floating_len;
    let start_diff = coord - reference_start;
    let center_to_reference = end_diff / 2.0 - start_diff / 2.0;

    // Keep the arrow from overflowing the floating element's corners.
    let largest_padding = floating_len / 2.0 - arrow_len / 2.0 - 1.0;
    let min_padding = options.padding.get(min_side).min(largest_padding);
    let max_padding = options.padding.get(max_side).min(largest_padding);
    let min = min_padding;
    let max = floating_len - arrow_len - max_padding;
    let center = floating_len / 2.0 - arrow_len / 2.0 + center_to_reference;
    let offset = clamp(min, center, max);

    let should_add_offset = state.middleware_data.get("arrow").is_none()
        && placement.alignment().is_some()
        && center != offset
        && reference_len / 2.0
            - if center < min { min_padding } else { max_padding }
            - arrow_len / 2.0
            < 0.0;
    let alignment_offset = if should_add_offset {
        if center < min { center - min } else { center - max }
    } else {
        0.0
    };

    let mut payload = Payload::new()
        .with(axis.key(), Datum::Number(offset))
        .with(
            "centerOffset",
            Datum::Number(center - offset - alignment_offset),
        );
    if should_add_offset {
        payload.insert("alignmentOffset", Datum::Number(alignment_offset));
    }
    let mut ret = MiddlewareReturn::none().with_data(payload);
    match axis {
        Axis::X => ret.x = Some(coord + alignment_offset),
        Axis::Y => ret.y = Some(coord + alignment_offset),
    }
    if should_add_offset {
        ret.reset = Some(Reset::Rerun);
    }
    ret
}

fn side_offsets(overflow: SideOffsets, size: Size) -> SideOffsets {
    SideOffsets {
        top: overflow.top - size.height,
        right: overflow.right - size.width,
        bottom: overflow.bottom - size.height,
        left: overflow.left - size.width,
    }
}

fn hide(state: &MiddlewareState<'_>, options: &HideOptions) -> MiddlewareReturn {
    match options.strategy {
        HideStrategy::ReferenceHidden => {
            let reference = state.rects.reference;
            let overflow = detect_overflow(reference, state.boundary, &options.padding);
            let offsets = side_offsets(overflow, reference.size());
            MiddlewareReturn::none().with_data(
                Payload::new()
                    .with("referenceHiddenOffsets", Datum::Offsets(offsets))
                    .with("referenceHidden", Datum::Flag(offsets.any_fully_clipped())),
            )
        }
        HideStrategy::Escaped => {
            let overflow =
                detect_overflow(state.floating_rect(), state.boundary, &options.padding);
            let offsets = side_offsets(overflow, state.rects.floating);
            MiddlewareReturn::none().with_data(
                Payload::new()
                    .with("escapedOffsets", Datum::Offsets(offsets))
                    .with("escaped", Datum::Flag(offsets.any_fully_clipped())),
            )
        }
    }
}

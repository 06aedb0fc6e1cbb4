// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios: render, mount, show, update, hide and unmount against a host.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use tether_events::{DocumentEvent, EventKind};
use tether_float::{
    AutoUpdateHub, ContextScope, ElementNode, Float, FloatArrow, FloatArrowProps, FloatContent,
    FloatContentProps, FloatContextMenu, FloatContextMenuProps, FloatCursor, FloatCursorProps,
    FloatError, FloatEvent, FloatProps, FloatReference, FloatReferenceProps, Host, OriginClass,
    Props, RenderAs, Toggle, TransitionMode, TransitionProps, VNode, mount,
};
use tether_geometry::{OffsetOptions, Placement, Side, Strategy, UpdateCause};

struct Env {
    host: Host,
    hub: Rc<AutoUpdateHub>,
}

fn env(mode: TransitionMode) -> Env {
    let hub = Rc::new(AutoUpdateHub::new());
    let host = Host::new(Size::new(1024.0, 768.0))
        .with_auto_update(hub.clone())
        .with_transition_mode(mode);
    Env { host, hub }
}

fn button() -> VNode {
    ElementNode::new("button")
        .bounds(Rect::new(100.0, 100.0, 150.0, 120.0))
        .into()
}

fn panel() -> VNode {
    ElementNode::new("div")
        .bounds(Rect::new(0.0, 0.0, 200.0, 40.0))
        .into()
}

fn implicit_props() -> FloatProps {
    FloatProps {
        offset: Some(OffsetOptions::Distance(8.0)),
        floating_as: RenderAs::Template,
        ..FloatProps::default()
    }
}

/// Records every event with the number of live auto-update subscriptions at that moment.
fn record(float: &Float, hub: &Rc<AutoUpdateHub>) -> Rc<RefCell<Vec<(FloatEvent, usize)>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    float.controller().on({
        let log = log.clone();
        let hub = hub.clone();
        move |e| log.borrow_mut().push((*e, hub.active_subscriptions()))
    });
    log
}

fn lifecycle(log: &RefCell<Vec<(FloatEvent, usize)>>) -> Vec<(FloatEvent, usize)> {
    log.borrow()
        .iter()
        .copied()
        .filter(|(e, _)| *e != FloatEvent::Update)
        .collect()
}

#[test]
fn reference_below_with_offset() {
    let Env { host, .. } = env(TransitionMode::Instant);
    let float = Float::new(&host, implicit_props());
    let tree = float.render(|_| vec![button(), panel()]);
    let body = host.document.borrow().body();
    let mut mounted = mount(&tree, &host, body);
    float.mounted();

    let floating = float.controller().floating().unwrap();
    assert_eq!(float.controller().coords(), Some(Point::new(100.0, 128.0)));

    // Re-render applies the computed position to the mounted node.
    mounted.patch(&float.render(|_| vec![button(), panel()]), &host);
    let style = host
        .document
        .borrow()
        .attr(floating, "style")
        .map(str::to_owned)
        .unwrap();
    assert!(style.contains("transform: translate(100px,128px)"), "{style}");
    assert_eq!(float.controller().floating(), Some(floating), "ref survives patch");
}

#[test]
fn show_then_hide_without_transitions() {
    let Env { host, hub } = env(TransitionMode::Instant);
    let float = Float::new(
        &host,
        FloatProps {
            show: Some(false),
            ..implicit_props()
        },
    );
    let log = record(&float, &hub);
    let body = host.document.borrow().body();
    let mut mounted = mount(&float.render(|_| vec![button(), panel()]), &host, body);
    float.mounted();
    assert!(float.controller().floating().is_none(), "hidden content is a placeholder");

    float.set_show(Some(true));
    mounted.patch(&float.render(|_| vec![button(), panel()]), &host);
    host.flush();
    assert!(float.controller().is_subscribed());

    float.set_show(Some(false));
    mounted.patch(&float.render(|_| vec![button(), panel()]), &host);
    host.flush();

    assert_eq!(
        lifecycle(&log),
        vec![(FloatEvent::Show, 1), (FloatEvent::Hide, 0)]
    );
    assert_eq!(hub.subscribed_total(), 1);
}

#[test]
fn show_then_hide_with_driven_transitions() {
    let Env { host, hub } = env(TransitionMode::Driven);
    let float = Float::new(
        &host,
        FloatProps {
            show: Some(false),
            ..implicit_props()
        },
    );
    let log = record(&float, &hub);
    let body = host.document.borrow().body();
    let mut mounted = mount(&float.render(|_| vec![button(), panel()]), &host, body);
    float.mounted();

    float.set_show(Some(true));
    mounted.patch(&float.render(|_| vec![button(), panel()]), &host);
    let hooks = mounted.transition_hooks();
    assert_eq!(hooks.len(), 1);
    hooks[0].before_enter();
    host.flush();

    float.set_show(Some(false));
    assert_eq!(lifecycle(&log), vec![(FloatEvent::Show, 1)], "leave in progress");
    assert!(float.controller().is_subscribed());
    hooks[0].after_leave();
    mounted.patch(&float.render(|_| vec![button(), panel()]), &host);

    assert_eq!(
        lifecycle(&log),
        vec![(FloatEvent::Show, 1), (FloatEvent::Hide, 0)]
    );
}

#[test]
fn configuration_batch_recomputes_once() {
    let Env { host, .. } = env(TransitionMode::Instant);
    let float = Float::new(&host, implicit_props());
    let body = host.document.borrow().body();
    let _mounted = mount(&float.render(|_| vec![button(), panel()]), &host, body);
    let c = float.controller();
    let updates = Rc::new(RefCell::new(0));
    c.on({
        let updates = updates.clone();
        move |e| {
            if *e == FloatEvent::Update {
                *updates.borrow_mut() += 1;
            }
        }
    });

    c.batch(|| {
        c.set_placement(Placement::TopStart);
        c.set_strategy(Strategy::Fixed);
        c.update_props(|p| p.shift = Toggle::Padding(4.0));
    });
    assert_eq!(*updates.borrow(), 1);
    assert_eq!(c.coords(), Some(Point::new(100.0, 52.0)));

    c.update();
    c.update();
    assert_eq!(*updates.borrow(), 1, "identical inputs");
}

#[test]
fn auto_update_follows_layout_until_unmount() {
    let Env { host, hub } = env(TransitionMode::Instant);
    let float = Float::new(&host, implicit_props());
    let body = host.document.borrow().body();
    let _mounted = mount(&float.render(|_| vec![button(), panel()]), &host, body);
    float.mounted();
    host.flush();
    let reference = float.controller().reference().unwrap().element().unwrap();

    host.document
        .borrow_mut()
        .set_bounds(reference, Rect::new(300.0, 200.0, 350.0, 220.0));
    hub.notify(UpdateCause::ElementResize);
    assert_eq!(float.controller().coords(), Some(Point::new(300.0, 228.0)));

    float.unmount();
    assert_eq!(hub.active_subscriptions(), 0);
    host.document
        .borrow_mut()
        .set_bounds(reference, Rect::new(0.0, 0.0, 50.0, 20.0));
    assert_eq!(hub.notify(UpdateCause::ElementResize), 0);
    assert_eq!(float.controller().coords(), Some(Point::new(300.0, 228.0)));
}

#[test]
fn composable_parts_and_arrow() {
    let Env { host, .. } = env(TransitionMode::Instant);
    let float = Float::new(
        &host,
        FloatProps {
            composable: true,
            placement: Placement::Right,
            arrow: Toggle::On,
            ..FloatProps::default()
        },
    );
    assert_eq!(
        FloatArrow::new(&ContextScope::root(), FloatArrowProps::default()).unwrap_err(),
        FloatError::MissingContext {
            component: "FloatArrow"
        }
    );
    let reference = FloatReference::new(float.scope(), FloatReferenceProps::default()).unwrap();
    let content = FloatContent::new(float.scope(), FloatContentProps::default()).unwrap();
    let arrow = FloatArrow::new(float.scope(), FloatArrowProps::default()).unwrap();
    let render = || {
        float.render(|_| {
            vec![
                reference.render(&Props::new(), |_| {
                    vec![ElementNode::new("button")
                        .bounds(Rect::new(100.0, 100.0, 140.0, 140.0))
                        .into()]
                }),
                content.render(&Props::new(), |_| {
                    vec![ElementNode::new("div")
                        .bounds(Rect::new(0.0, 0.0, 80.0, 64.0))
                        .child(arrow.render(&Props::new(), |_| Vec::new()))
                        .into()]
                }),
            ]
        })
    };
    let body = host.document.borrow().body();
    let mut mounted = mount(&render(), &host, body);
    let arrow_node = float.controller().arrow().unwrap();
    host.document
        .borrow_mut()
        .set_bounds(arrow_node, Rect::new(0.0, 0.0, 8.0, 8.0));
    float.controller().update();

    let style = arrow.style();
    assert_eq!(style.static_side, Side::Left);
    let css = style.to_style();
    assert_eq!(css.get("left"), Some("-4px"));
    let y = style.y.unwrap();
    assert_eq!(css.get("top").map(str::to_owned), Some(format!("{y}px")));

    mounted.patch(&render(), &host);
    let applied = host.document.borrow().attr(arrow_node, "style").map(str::to_owned);
    assert!(applied.unwrap().contains("left: -4px"));
}

#[test]
fn origin_class_follows_resolved_placement() {
    let Env { host, .. } = env(TransitionMode::Instant);
    let float = Float::new(
        &host,
        FloatProps {
            placement: Placement::TopStart,
            transition: TransitionProps {
                enter: Some("transition".into()),
                origin_class: Some(OriginClass::by_side([
                    (Side::Top, "origin-bottom"),
                    (Side::Bottom, "origin-top"),
                ])),
                ..TransitionProps::default()
            },
            ..implicit_props()
        },
    );
    let tree = float.render(|_| vec![button(), panel()]);
    let spec = &tree.find_transition().unwrap().spec;
    assert_eq!(spec.origin_class, "origin-bottom");
    assert_eq!(spec.enter_active.as_deref(), Some("transition origin-bottom"));
}

#[test]
fn context_menu_burst_within_one_frame_computes_once() {
    let Env { host, hub } = env(TransitionMode::Instant);
    let menu = FloatContextMenu::new(&host, FloatContextMenuProps::default());
    let controller = menu.virtual_float().controller().clone();
    host.events.dispatch(&DocumentEvent::new(
        EventKind::ContextMenu,
        Point::new(10.0, 10.0),
    ));
    let body = host.document.borrow().body();
    let _mounted = mount(
        &menu.render(&Props::new(), |_| {
            vec![ElementNode::new("ul")
                .bounds(Rect::new(0.0, 0.0, 100.0, 50.0))
                .into()]
        }),
        &host,
        body,
    );
    host.flush();
    host.scheduler.run_animation_frame();
    assert!(controller.is_subscribed());
    assert_eq!(hub.active_subscriptions(), 1);

    let before = controller.compute_count();
    for i in 1..=10 {
        host.events.dispatch(&DocumentEvent::new(
            EventKind::ContextMenu,
            Point::new(10.0 + f64::from(i), 20.0),
        ));
    }
    host.scheduler.run_animation_frame();
    assert_eq!(controller.compute_count(), before + 1);
    assert_eq!(controller.coords(), Some(Point::new(20.0, 20.0)));

    menu.unmount();
    assert_eq!(host.events.total_listeners(), 0);
    assert_eq!(hub.active_subscriptions(), 0);
    assert_eq!(host.scheduler.pending_frames(), 0);
}

#[test]
fn cursor_unmount_mid_transition_leaves_nothing_behind() {
    let Env { host, hub } = env(TransitionMode::Driven);
    let cursor = FloatCursor::new(&host, FloatCursorProps::default());
    let controller = cursor.virtual_float().controller().clone();
    let events = Rc::new(RefCell::new(Vec::new()));
    controller.on({
        let events = events.clone();
        move |e| events.borrow_mut().push(*e)
    });
    host.events.dispatch(&DocumentEvent::new(
        EventKind::MouseMove,
        Point::new(50.0, 50.0),
    ));
    let body = host.document.borrow().body();
    let mounted = mount(
        &cursor.render(&Props::new(), |_| {
            vec![ElementNode::new("span")
                .bounds(Rect::new(0.0, 0.0, 20.0, 20.0))
                .into()]
        }),
        &host,
        body,
    );
    mounted.transition_hooks()[0].before_enter();
    assert_eq!(host.scheduler.pending_ticks(), 1);

    drop(cursor);
    mounted.unmount(&host);
    host.flush();
    host.scheduler.run_animation_frame();
    assert_eq!(host.scheduler.pending_ticks(), 0);
    assert_eq!(host.scheduler.pending_frames(), 0);
    assert_eq!(host.events.total_listeners(), 0);
    assert_eq!(hub.active_subscriptions(), 0);
    assert!(
        host.document
            .borrow()
            .style_element(tether_float::CURSOR_STYLE_ID)
            .is_none()
    );
    assert!(!events.borrow().contains(&FloatEvent::Show));
}

#[test]
fn show_announced_once_content_mounts_after_the_tick() {
    let Env { host, hub } = env(TransitionMode::Instant);
    let float = Float::new(&host, implicit_props());
    let log = record(&float, &hub);
    host.flush();
    assert!(lifecycle(&log).is_empty(), "nothing rendered yet");

    let body = host.document.borrow().body();
    let _mounted = mount(&float.render(|_| vec![button(), panel()]), &host, body);
    float.mounted();
    assert!(float.controller().is_subscribed());

    float.set_show(Some(false));
    assert_eq!(
        lifecycle(&log),
        vec![(FloatEvent::Show, 1), (FloatEvent::Hide, 0)]
    );
}

fn failing_edit() {
    panic!("edit failed");
}

#[test]
fn panicking_batch_does_not_hold_back_later_updates() {
    let Env { host, .. } = env(TransitionMode::Instant);
    let float = Float::new(&host, implicit_props());
    let body = host.document.borrow().body();
    let _mounted = mount(&float.render(|_| vec![button(), panel()]), &host, body);
    let c = float.controller();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        c.batch(|| {
            c.set_placement(Placement::Top);
            failing_edit();
        });
    }));
    assert!(outcome.is_err());

    c.set_placement(Placement::TopStart);
    assert_eq!(c.coords(), Some(Point::new(100.0, 52.0)));
}

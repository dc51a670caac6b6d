//! Window creation, style refresh, geometry and aspect-constrained resize.

mod fake;

use casement_core::context::Context;
use casement_core::dpi::{PhysicalPosition, PhysicalSize};
use casement_core::os::{MonitorId, PumpMode, RawMessage, Rect};
use casement_core::window::{
    AspectRatio, ResizeEdge, WindowAttributes, WindowExStyle, WindowStyle,
};
use fake::{FakeMonitor, FakeOs};

fn context() -> (Context, FakeOs) {
    let os = FakeOs::with_monitors(vec![FakeMonitor::new(1, "DISPLAY1")]);
    let context = Context::new(Box::new(os.clone())).unwrap();
    (context, os)
}

fn aspect_window(context: &mut Context) -> casement_core::window::WindowId {
    let window = context
        .create_window(
            WindowAttributes::default()
                .with_surface_size(PhysicalSize::new(800, 450))
                .with_aspect_ratio(Some(AspectRatio { numer: 16, denom: 9 })),
        )
        .unwrap();
    window
}

// Decoration metrics of the fake at 96 DPI: 8px thick frame plus a 23px
// caption, so a decorated resizable window carries 16px of horizontal and
// 39px of vertical overhead.
const XOFF: i32 = 16;
const YOFF: i32 = 39;

#[test]
fn create_window_expands_client_to_full_size() {
    let (mut context, os) = context();
    let window = context
        .create_window(
            WindowAttributes::default()
                .with_surface_size(PhysicalSize::new(800, 600))
                .with_position(PhysicalPosition::new(40, 60)),
        )
        .unwrap();
    let handle = context.window(window).unwrap().handle();

    let state = os.0.borrow();
    let native = &state.windows[handle.0 as usize];
    assert_eq!(native.full_size, PhysicalSize::new(800 + XOFF as u32, 600 + YOFF as u32));
    assert_eq!(native.position, PhysicalPosition::new(40, 60));
}

fn decorated_resizable_styles() -> (WindowStyle, WindowExStyle) {
    (
        WindowStyle::CLIPSIBLINGS
            | WindowStyle::CLIPCHILDREN
            | WindowStyle::SYSMENU
            | WindowStyle::MINIMIZEBOX
            | WindowStyle::CAPTION
            | WindowStyle::MAXIMIZEBOX
            | WindowStyle::THICKFRAME,
        WindowExStyle::APPWINDOW,
    )
}

#[test]
fn full_window_size_uses_dpi_variant_when_available() {
    let (context, os) = context();
    let (style, ex_style) = decorated_resizable_styles();
    let size = context
        .full_window_size(style, ex_style, PhysicalSize::new(800, 600), 192)
        .unwrap();
    // Metrics double at 192 DPI.
    assert_eq!(size, PhysicalSize::new(800 + 2 * XOFF as u32, 600 + 2 * YOFF as u32));
    assert_eq!(os.0.borrow().adjust_for_dpi_calls, 1);
}

#[test]
fn full_window_size_falls_back_without_dpi_capability() {
    let os = FakeOs::with_monitors(vec![FakeMonitor::new(1, "DISPLAY1")]);
    os.0.borrow_mut().caps.adjust_rect_for_dpi = false;
    let context = Context::new(Box::new(os.clone())).unwrap();

    let (style, ex_style) = decorated_resizable_styles();
    let size = context
        .full_window_size(style, ex_style, PhysicalSize::new(800, 600), 192)
        .unwrap();
    // The requested DPI is ignored by the oblivious variant.
    assert_eq!(size, PhysicalSize::new(800 + XOFF as u32, 600 + YOFF as u32));
    let state = os.0.borrow();
    assert_eq!(state.adjust_for_dpi_calls, 0);
    assert!(state.adjust_calls > 0);
}

#[test]
fn frame_extents_reflect_decoration() {
    let (mut context, _os) = context();
    let decorated = context.create_window(WindowAttributes::default()).unwrap();
    let extents = context.frame_extents(decorated).unwrap();
    assert_eq!((extents.left, extents.top, extents.right, extents.bottom), (8, 31, 8, 8));

    let popup =
        context.create_window(WindowAttributes::default().with_decorations(false)).unwrap();
    let extents = context.frame_extents(popup).unwrap();
    assert_eq!((extents.left, extents.top, extents.right, extents.bottom), (0, 0, 0, 0));
}

#[test]
fn aspect_is_ignored_when_unconstrained() {
    let (mut context, _os) = context();
    let window = context.create_window(WindowAttributes::default()).unwrap();
    let mut area = Rect { left: 0, top: 0, right: 500, bottom: 77 };
    let proposed = area;
    context.apply_aspect_ratio(window, ResizeEdge::Right, &mut area).unwrap();
    assert_eq!(area, proposed);
}

#[test]
fn aspect_recomputes_height_for_side_and_bottom_edges() {
    let (mut context, _os) = context();
    let window = aspect_window(&mut context);

    for edge in
        [ResizeEdge::Left, ResizeEdge::Right, ResizeEdge::BottomLeft, ResizeEdge::BottomRight]
    {
        // Proposed client width of 1600 at 16:9 pins the client height to
        // 900; only the bottom edge moves.
        let mut area = Rect { left: 100, top: 200, right: 100 + 1600 + XOFF, bottom: 300 };
        context.apply_aspect_ratio(window, edge, &mut area).unwrap();
        assert_eq!(area.left, 100);
        assert_eq!(area.top, 200);
        assert_eq!(area.right, 100 + 1600 + XOFF);
        assert_eq!(area.bottom, 200 + YOFF + 900);
    }
}

#[test]
fn aspect_anchors_at_bottom_for_top_corners() {
    let (mut context, _os) = context();
    let window = aspect_window(&mut context);

    for edge in [ResizeEdge::TopLeft, ResizeEdge::TopRight] {
        let mut area = Rect { left: 100, top: 200, right: 100 + 1600 + XOFF, bottom: 1400 };
        context.apply_aspect_ratio(window, edge, &mut area).unwrap();
        assert_eq!(area.bottom, 1400);
        assert_eq!(area.top, 1400 - YOFF - 900);
        assert_eq!(area.right, 100 + 1600 + XOFF);
    }
}

#[test]
fn aspect_recomputes_width_for_vertical_edges() {
    let (mut context, _os) = context();
    let window = aspect_window(&mut context);

    for edge in [ResizeEdge::Top, ResizeEdge::Bottom] {
        let mut area = Rect { left: 100, top: 200, right: 500, bottom: 200 + 900 + YOFF };
        context.apply_aspect_ratio(window, edge, &mut area).unwrap();
        assert_eq!(area.top, 200);
        assert_eq!(area.bottom, 200 + 900 + YOFF);
        assert_eq!(area.right, 100 + XOFF + 1600);
    }
}

#[test]
fn aspect_scales_overhead_with_window_dpi() {
    let (mut context, os) = context();
    let window = aspect_window(&mut context);
    let handle = context.window(window).unwrap().handle();
    os.0.borrow_mut().windows[handle.0 as usize].dpi = 192;

    let mut area = Rect { left: 0, top: 0, right: 1600 + 2 * XOFF, bottom: 100 };
    context.apply_aspect_ratio(window, ResizeEdge::Right, &mut area).unwrap();
    assert_eq!(area.bottom, 2 * YOFF + 900);
}

#[test]
fn fullscreen_transition_pairs_window_and_monitor() {
    let (mut context, os) = context();
    let window = context.create_window(WindowAttributes::default()).unwrap();

    context
        .set_window_monitor(
            window,
            Some(MonitorId(1)),
            PhysicalPosition::new(0, 0),
            PhysicalSize::new(1920, 1080),
        )
        .unwrap();
    assert_eq!(context.window(window).unwrap().monitor(), Some(MonitorId(1)));
    assert_eq!(context.monitor(MonitorId(1)).unwrap().fullscreen_window(), Some(window));

    let handle = context.window(window).unwrap().handle();
    {
        let state = os.0.borrow();
        let native = &state.windows[handle.0 as usize];
        assert!(native.style.contains(WindowStyle::POPUP));
        assert!(!native.style.contains(WindowStyle::CAPTION));
    }

    context
        .set_window_monitor(
            window,
            None,
            PhysicalPosition::new(30, 40),
            PhysicalSize::new(640, 480),
        )
        .unwrap();
    assert_eq!(context.window(window).unwrap().monitor(), None);
    assert_eq!(context.monitor(MonitorId(1)).unwrap().fullscreen_window(), None);

    let state = os.0.borrow();
    let native = &state.windows[handle.0 as usize];
    assert!(native.style.contains(WindowStyle::CAPTION));
    assert_eq!(native.position, PhysicalPosition::new(30, 40));
    assert_eq!(native.client_size, PhysicalSize::new(640, 480));
}

#[test]
fn destroy_window_releases_monitor_pairing() {
    let (mut context, os) = context();
    let window = context
        .create_window(WindowAttributes::default().with_fullscreen(Some(MonitorId(1))))
        .unwrap();
    let handle = context.window(window).unwrap().handle();

    context.destroy_window(window).unwrap();
    assert_eq!(context.monitor(MonitorId(1)).unwrap().fullscreen_window(), None);
    assert!(os.0.borrow().windows[handle.0 as usize].destroyed);
}

#[test]
fn style_refresh_follows_attribute_changes() {
    let (mut context, os) = context();
    let window = context.create_window(WindowAttributes::default()).unwrap();
    let handle = context.window(window).unwrap().handle();

    context.set_decorated(window, false).unwrap();
    assert!(os.0.borrow().windows[handle.0 as usize].style.contains(WindowStyle::POPUP));

    context.set_decorated(window, true).unwrap();
    context.set_resizable(window, false).unwrap();
    {
        let state = os.0.borrow();
        let style = state.windows[handle.0 as usize].style;
        assert!(style.contains(WindowStyle::CAPTION));
        assert!(!style.contains(WindowStyle::THICKFRAME));
    }

    context.set_floating(window, true).unwrap();
    assert!(os.0.borrow().windows[handle.0 as usize]
        .ex_style
        .contains(WindowExStyle::TOPMOST));
}

#[test]
fn poll_pump_drains_queue() {
    let (mut context, os) = context();
    for code in [1u32, 2, 3] {
        os.0.borrow_mut().messages.push_back(RawMessage {
            window: None,
            code,
            wparam: 0,
            lparam: 0,
        });
    }

    context.pump_events(PumpMode::Poll).unwrap();
    let state = os.0.borrow();
    assert!(state.messages.is_empty());
    let codes: Vec<u32> = state.dispatched.iter().map(|m| m.code).collect();
    assert_eq!(codes, vec![1, 2, 3]);
}

#[test]
fn wait_pump_dispatches_at_least_one_message() {
    let (mut context, os) = context();
    os.0.borrow_mut().messages.push_back(RawMessage { window: None, code: 7, wparam: 0, lparam: 0 });

    context.pump_events(PumpMode::Wait).unwrap();
    assert_eq!(os.0.borrow().dispatched.len(), 1);

    // Nothing queued: polling dispatches nothing and returns.
    context.pump_events(PumpMode::Poll).unwrap();
    assert_eq!(os.0.borrow().dispatched.len(), 1);
}

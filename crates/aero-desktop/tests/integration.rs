//! Integration tests for DesktopEngine
//!
//! These tests verify the full desktop workflow including:
//! - Window lifecycle (open, drag, resize, minimize, maximize, close)
//! - Singleton registry behavior
//! - Listener bookkeeping across gestures and teardown
//! - Content panels driven through timers and events
//! - Geometric properties of drag and resize (proptest)

#![cfg(not(target_arch = "wasm32"))]

use aero_desktop::content::{ContentAction, ContentEvent, MessageDialog};
use aero_desktop::particles::LayerKind;
use aero_desktop::{
    DesktopEngine, Effect, ExpansionParams, PageConfig, PointerTarget, Rect, ResizeDirection, TitleButton, Universe,
    Viewport, WindowConfig, WindowKind, WindowState,
};
use proptest::prelude::*;

fn create_test_engine() -> DesktopEngine {
    let config = PageConfig {
        seed: Some(7),
        ..Default::default()
    };
    DesktopEngine::new(config, Viewport::new(1920.0, 1080.0))
}

/// Open a dialog at an explicit rectangle
fn open_dialog_at(engine: &mut DesktopEngine, rect: Rect) -> u64 {
    let config = WindowConfig::for_kind(WindowKind::Dialog).at(rect);
    let content = Box::new(MessageDialog::new("Aviso", "Teste"));
    let (opened, _) = engine.open_window(config, Some(content), 0.0);
    opened.id()
}

fn assert_rect_eq(a: Rect, b: Rect) {
    assert!((a.x - b.x).abs() < 0.001, "x: {} != {}", a.x, b.x);
    assert!((a.y - b.y).abs() < 0.001, "y: {} != {}", a.y, b.y);
    assert!((a.width - b.width).abs() < 0.001, "width: {} != {}", a.width, b.width);
    assert!((a.height - b.height).abs() < 0.001, "height: {} != {}", a.height, b.height);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_drag_radio_by_title_bar() {
    let mut engine = create_test_engine();
    let (opened, _) = engine.open_kind(WindowKind::Radio, 0.0);
    let id = opened.id();
    let before = engine.window(id).unwrap().geometry;

    let (px, py) = (before.x + 40.0, before.y + 12.0);
    engine.pointer_down(id, PointerTarget::TitleBar, px, py, 0.0);
    engine.pointer_move(px + 20.0, py - 10.0);
    engine.pointer_move(px + 50.0, py - 30.0);
    engine.pointer_up();

    let after = engine.window(id).unwrap();
    assert!((after.geometry.x - (before.x + 50.0)).abs() < 0.001);
    assert!((after.geometry.y - (before.y - 30.0)).abs() < 0.001);
    assert!(!after.centered);
    assert!(engine.listeners().is_empty());
}

#[test]
fn test_maximize_restores_exact_snapshot() {
    let mut engine = create_test_engine();
    let saved = Rect::new(100.0, 100.0, 600.0, 400.0);
    let id = open_dialog_at(&mut engine, saved);

    let effects = engine.toggle_maximize(id);
    assert!(effects.contains(&Effect::RemoveResizeHandles { window_id: id }));
    let window = engine.window(id).unwrap();
    assert_eq!(window.state, WindowState::Maximized);
    assert_rect_eq(window.restore_rect().unwrap(), saved);

    let effects = engine.toggle_maximize(id);
    assert!(effects.contains(&Effect::InstallResizeHandles { window_id: id }));
    let window = engine.window(id).unwrap();
    assert_eq!(window.state, WindowState::Normal);
    assert_rect_eq(window.geometry, saved);
    assert!(window.restore_rect().is_none());
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_singleton_opened_twice_has_one_instance() {
    let mut engine = create_test_engine();
    for kind in [WindowKind::Radio, WindowKind::Video, WindowKind::Rss, WindowKind::ContactForm] {
        let (first, _) = engine.open_kind(kind, 0.0);
        let (second, _) = engine.open_kind(kind, 0.0);
        assert_eq!(first.id(), second.id());
        assert_eq!(engine.windows().count_of_kind(kind), 1);
    }
}

#[test]
fn test_singleton_reopens_after_close() {
    let mut engine = create_test_engine();
    let (first, _) = engine.open_kind(WindowKind::Rss, 0.0);
    engine.close_window(first.id(), 0.0);
    let (second, _) = engine.open_kind(WindowKind::Rss, 500.0);
    assert!(second.is_created());
    assert_ne!(first.id(), second.id());
}

#[test]
fn test_focus_raises_window() {
    let mut engine = create_test_engine();
    let a = open_dialog_at(&mut engine, Rect::new(10.0, 10.0, 400.0, 300.0));
    let b = open_dialog_at(&mut engine, Rect::new(50.0, 50.0, 400.0, 300.0));
    assert_eq!(engine.windows().topmost(), Some(b));

    engine.pointer_down(a, PointerTarget::Body, 20.0, 100.0, 0.0);
    assert_eq!(engine.windows().topmost(), Some(a));
}

// =============================================================================
// Listener bookkeeping
// =============================================================================

#[test]
fn test_close_during_drag_detaches_listeners() {
    let mut engine = create_test_engine();
    let id = open_dialog_at(&mut engine, Rect::new(100.0, 100.0, 600.0, 400.0));

    engine.pointer_down(id, PointerTarget::TitleBar, 150.0, 110.0, 0.0);
    assert_eq!(engine.listeners().len(), 2);

    let effects = engine.click_button(id, TitleButton::Close, 0.0);
    assert!(effects.contains(&Effect::DetachDocumentListeners { window_id: id }));
    assert!(engine.listeners().is_empty());
    assert!(engine.active_gesture().is_none());

    // Synthetic events after close have no observable effect
    assert!(engine.pointer_move(400.0, 400.0).is_empty());
    assert!(engine.pointer_up().is_empty());
    assert!(engine.window(id).is_none());
}

#[test]
fn test_listeners_released_after_each_gesture() {
    let mut engine = create_test_engine();
    let id = open_dialog_at(&mut engine, Rect::new(100.0, 100.0, 600.0, 400.0));

    for _ in 0..3 {
        engine.pointer_down(id, PointerTarget::ResizeHandle(ResizeDirection::SE), 700.0, 500.0, 0.0);
        engine.pointer_move(720.0, 530.0);
        engine.pointer_up();
        assert!(engine.listeners().is_empty());
    }
    let rect = engine.window(id).unwrap().geometry;
    assert_rect_eq(rect, Rect::new(100.0, 100.0, 660.0, 490.0));
}

#[test]
fn test_minimize_fixed_kind_is_noop() {
    let mut engine = create_test_engine();
    let (opened, _) = engine.open_kind(WindowKind::ContactForm, 0.0);
    let id = opened.id();
    let before = engine.window(id).unwrap().geometry;

    let effects = engine.click_button(id, TitleButton::Minimize, 0.0);
    assert!(effects.is_empty());
    let window = engine.window(id).unwrap();
    assert_eq!(window.state, WindowState::Normal);
    assert_rect_eq(window.geometry, before);
    assert!(!window.handles_installed());
}

#[test]
fn test_close_all_tears_everything_down() {
    let mut engine = create_test_engine();
    engine.open_kind(WindowKind::Radio, 0.0);
    engine.open_kind(WindowKind::Primary, 0.0);
    let id = open_dialog_at(&mut engine, Rect::new(0.0, 0.0, 400.0, 300.0));
    engine.pointer_down(id, PointerTarget::TitleBar, 10.0, 10.0, 0.0);

    let effects = engine.close_all(0.0);
    assert_eq!(
        effects
            .iter()
            .filter(|e| matches!(e, Effect::RemoveElement { .. }))
            .count(),
        3
    );
    assert!(engine.windows().is_empty());
    assert!(engine.listeners().is_empty());
    assert!(!engine.has_pending_timers());
}

// =============================================================================
// Viewport
// =============================================================================

#[test]
fn test_viewport_shrink_pins_nothing_already_open() {
    let mut engine = create_test_engine();
    let (opened, _) = engine.open_kind(WindowKind::Rss, 0.0);
    engine.resize_viewport(500.0, 900.0);
    // Mobile pinning only applies on open
    assert_eq!(engine.window(opened.id()).unwrap().state, WindowState::Normal);

    let (radio, _) = engine.open_kind(WindowKind::Radio, 0.0);
    let window = engine.window(radio.id()).unwrap();
    assert_eq!(window.state, WindowState::Maximized);
    assert!((window.geometry.width - 500.0).abs() < 0.001);
}

// =============================================================================
// Content
// =============================================================================

#[test]
fn test_feed_round_trip_through_engine() {
    let mut engine = create_test_engine();
    let (opened, effects) = engine.open_kind(WindowKind::Rss, 0.0);
    let id = opened.id();
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Content {
            action: ContentAction::Fetch { .. },
            ..
        }
    )));

    let body = r#"{
        "status": "ok",
        "feed": {"title": "Notícias", "description": "Últimas"},
        "items": [
            {"title": "Primeira", "pubDate": "2025-08-01 10:30:00", "link": "https://example.test/1",
             "description": "Resumo", "content": ""}
        ]
    }"#;
    let effects = engine.content_event(
        id,
        ContentEvent::FetchCompleted {
            status: 200,
            body: body.into(),
        },
        100.0,
    );
    let feed = effects.iter().find_map(|e| match e {
        Effect::Content {
            action: ContentAction::RenderFeed { feed },
            ..
        } => Some(feed),
        _ => None,
    });
    let feed = feed.expect("feed rendered");
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].published.as_deref(), Some("01/08/2025 10:30"));
}

#[test]
fn test_primary_progress_ticks_until_closed() {
    let mut engine = create_test_engine();
    let (opened, _) = engine.open_kind(WindowKind::Primary, 0.0);
    let id = opened.id();

    let mut rendered = 0;
    let mut now = 0.0;
    while now <= 10_000.0 {
        now += 100.0;
        rendered += engine
            .tick(now)
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    Effect::Content {
                        action: ContentAction::RenderCountdown { .. },
                        ..
                    }
                )
            })
            .count();
    }
    assert!(rendered >= 9);
    assert!(engine.has_pending_timers());

    engine.close_window(id, now);
    assert!(!engine.has_pending_timers());
    assert!(engine.tick(now + 5000.0).is_empty());
}

// =============================================================================
// Particles
// =============================================================================

#[test]
fn test_universe_layers_appear_once() {
    let params = ExpansionParams {
        particle_count: 100,
        ..Default::default()
    };
    let mut universe = Universe::new(params, 42);
    let mut added = Vec::new();
    for _ in 0..200 {
        added.extend(universe.step(0.1));
    }
    assert_eq!(added, vec![LayerKind::GalaxyCluster, LayerKind::Nebula]);
}

// =============================================================================
// Properties
// =============================================================================

fn direction_strategy() -> impl Strategy<Value = ResizeDirection> {
    prop::sample::select(ResizeDirection::ALL.to_vec())
}

fn fixed_corner(direction: ResizeDirection, rect: &Rect) -> (f32, f32) {
    let x = if direction.moves_left() { rect.right() } else { rect.x };
    let y = if direction.moves_top() { rect.bottom() } else { rect.y };
    (x, y)
}

proptest! {
    #[test]
    fn drag_position_independent_of_move_frequency(
        grab_x in 5.0f32..595.0,
        grab_y in 2.0f32..28.0,
        moves in prop::collection::vec((-200.0f32..200.0, -200.0f32..200.0), 1..20),
    ) {
        let mut engine = create_test_engine();
        let start = Rect::new(300.0, 200.0, 600.0, 400.0);
        let id = open_dialog_at(&mut engine, start);

        let (px, py) = (start.x + grab_x, start.y + grab_y);
        engine.pointer_down(id, PointerTarget::TitleBar, px, py, 0.0);
        let (mut x, mut y) = (px, py);
        for (dx, dy) in &moves {
            x += dx;
            y += dy;
            engine.pointer_move(x, y);
        }
        engine.pointer_up();

        let offset = (grab_x, grab_y);
        let rect = engine.window(id).unwrap().geometry;
        prop_assert!((rect.x - (x - offset.0)).abs() < 0.01);
        prop_assert!((rect.y - (y - offset.1)).abs() < 0.01);
        prop_assert!((rect.width - start.width).abs() < 0.001);
        prop_assert!(engine.listeners().is_empty());
    }

    #[test]
    fn resize_keeps_opposite_corner_and_floors(
        direction in direction_strategy(),
        dx in -800.0f32..800.0,
        dy in -800.0f32..800.0,
    ) {
        let mut engine = create_test_engine();
        let start = Rect::new(400.0, 300.0, 500.0, 350.0);
        let id = open_dialog_at(&mut engine, start);

        let (px, py) = (start.x + 1.0, start.y + 1.0);
        engine.pointer_down(id, PointerTarget::ResizeHandle(direction), px, py, 0.0);
        engine.pointer_move(px + dx / 2.0, py + dy / 2.0);
        engine.pointer_move(px + dx, py + dy);
        engine.pointer_up();

        let rect = engine.window(id).unwrap().geometry;
        prop_assert!(rect.width >= 300.0 - 0.001);
        prop_assert!(rect.height >= 200.0 - 0.001);

        let (bx, by) = fixed_corner(direction, &start);
        let (ax, ay) = fixed_corner(direction, &rect);
        prop_assert!((ax - bx).abs() < 0.01);
        prop_assert!((ay - by).abs() < 0.01);
    }

    #[test]
    fn closing_releases_all_listeners(gestures in 1usize..6, close_mid_gesture in any::<bool>()) {
        let mut engine = create_test_engine();
        let id = open_dialog_at(&mut engine, Rect::new(100.0, 100.0, 600.0, 400.0));
        for _ in 0..gestures {
            engine.pointer_down(id, PointerTarget::TitleBar, 150.0, 110.0, 0.0);
            engine.pointer_move(160.0, 120.0);
            if !close_mid_gesture {
                engine.pointer_up();
            }
        }
        engine.close_window(id, 0.0);
        prop_assert!(engine.listeners().is_empty());
        prop_assert!(engine.pointer_move(500.0, 500.0).is_empty());
    }
}

//! Timer dispatch and content event routing

use crate::content::{ContentEvent, Sound};
use crate::timer::{TimerAction, PAGE_OWNER};
use crate::window::{Effect, WindowId};
use super::DesktopEngine;

/// `path` with a `nocache` query stamped with the page clock
fn cache_busted(path: &str, now_ms: f64) -> String {
    format!("{}?nocache={}", path, now_ms.floor() as i64)
}

impl DesktopEngine {
    /// Restart the page with a clean cache
    ///
    /// Plays the start sound, shows a notice and reloads `path` after the
    /// configured delay. A second call while the reload is pending does nothing.
    pub fn refresh(&mut self, path: &str, now_ms: f64) -> Vec<Effect> {
        if self.timers.owned_by(PAGE_OWNER) > 0 {
            log::debug!("refresh already pending");
            return Vec::new();
        }
        log::info!("refreshing page {}", path);
        let mut effects = vec![Effect::PlaySound { sound: Sound::Start }];
        let (_, opened) = self.show_dialog(
            "Reiniciando Website",
            "A página será reiniciada com cache limpo...",
            now_ms,
        );
        effects.extend(opened);
        self.timers.schedule(
            PAGE_OWNER,
            now_ms,
            self.config.window.refresh_delay_ms,
            TimerAction::Reload { path: path.to_string() },
        );
        effects
    }

    /// Fire every timer due at `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        for (owner, action) in self.timers.take_due(now_ms) {
            if owner == PAGE_OWNER {
                if let TimerAction::Reload { path } = action {
                    effects.push(Effect::Reload {
                        url: cache_busted(&path, now_ms),
                    });
                }
                continue;
            }
            if !self.registry.is_live(owner) {
                log::debug!("dropping timer for window {}: not live", owner);
                continue;
            }
            match action {
                TimerAction::RevertMinimize => effects.extend(self.revert_minimize(owner)),
                TimerAction::Content(event) => effects.extend(self.content_event(owner, event, now_ms)),
                TimerAction::Reload { .. } => log::debug!("reload timer owned by window {} ignored", owner),
            }
        }
        effects
    }

    /// Deliver an event to a window's content
    ///
    /// Results for windows that are gone or closing are ignored, so late
    /// callbacks (fetch responses, media events) are harmless.
    pub fn content_event(&mut self, id: WindowId, event: ContentEvent, now_ms: f64) -> Vec<Effect> {
        if !self.registry.is_live(id) {
            log::debug!("content event for window {} ignored: not live", id);
            return Vec::new();
        }
        let actions = match self.registry.get_mut(id).and_then(|w| w.content_mut()) {
            Some(content) => content.handle(event, now_ms),
            None => return Vec::new(),
        };
        self.apply_content_actions(id, actions, now_ms)
    }

    /// Whether any timer is still pending
    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::content::{CaptchaProvider, ContactFields, ContentAction, StreamCommand};
    use crate::viewport::Viewport;
    use crate::window::{OpenOutcome, PointerTarget, ResizeDirection, TitleButton, WindowKind, WindowState};

    fn create_test_engine() -> DesktopEngine {
        let config = PageConfig {
            seed: Some(1),
            ..Default::default()
        };
        DesktopEngine::new(config, Viewport::new(1280.0, 800.0))
    }

    fn content_actions(effects: &[Effect]) -> Vec<&ContentAction> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Content { action, .. } => Some(action),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_singleton_reopen_reveals() {
        let mut engine = create_test_engine();
        let (first, _) = engine.open_kind(WindowKind::Radio, 0.0);
        let (second, effects) = engine.open_kind(WindowKind::Radio, 10.0);
        assert!(first.is_created());
        assert_eq!(second, OpenOutcome::Revealed(first.id()));
        assert!(!effects.iter().any(|e| matches!(e, Effect::CreateElement { .. })));
        assert_eq!(engine.windows().count_of_kind(WindowKind::Radio), 1);
    }

    #[test]
    fn test_refresh_reloads_after_notice() {
        let mut engine = create_test_engine();
        let effects = engine.refresh("/manutencao/", 1_000.0);

        assert_eq!(effects[0], Effect::PlaySound { sound: Sound::Start });
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::CreateElement {
                kind: WindowKind::Dialog,
                title,
                ..
            } if title == "Reiniciando Website"
        )));
        // Pending reload ignores a second click
        assert!(engine.refresh("/manutencao/", 1_200.0).is_empty());

        assert!(!engine
            .tick(2_499.0)
            .iter()
            .any(|e| matches!(e, Effect::Reload { .. })));
        let effects = engine.tick(2_500.0);
        assert_eq!(
            effects,
            vec![Effect::Reload {
                url: "/manutencao/?nocache=2500".into()
            }]
        );
    }

    #[test]
    fn test_refresh_survives_close_all() {
        let mut engine = create_test_engine();
        engine.refresh("/", 0.0);
        engine.close_all(10.0);
        assert!(engine.windows().is_empty());
        assert_eq!(
            engine.tick(1_500.0),
            vec![Effect::Reload {
                url: "/?nocache=1500".into()
            }]
        );
    }

    #[test]
    fn test_dialogs_are_not_singletons() {
        let mut engine = create_test_engine();
        let (a, _) = engine.show_dialog("A", "one", 0.0);
        let (b, _) = engine.show_dialog("B", "two", 0.0);
        assert_ne!(a.id(), b.id());
        assert_eq!(engine.windows().count_of_kind(WindowKind::Dialog), 2);
    }

    #[test]
    fn test_minimize_reverts_after_flash() {
        let mut engine = create_test_engine();
        let (opened, _) = engine.show_dialog("Aviso", "x", 0.0);
        let id = opened.id();

        engine.minimize(id, 1000.0);
        assert_eq!(engine.window(id).unwrap().state, WindowState::Minimized);

        assert!(engine.tick(1299.0).is_empty());
        let effects = engine.tick(1300.0);
        assert_eq!(
            effects,
            vec![Effect::SetMinimized {
                window_id: id,
                minimized: false
            }]
        );
        assert_eq!(engine.window(id).unwrap().state, WindowState::Normal);
    }

    #[test]
    fn test_primary_minimize_toggles() {
        let mut engine = create_test_engine();
        let (opened, _) = engine.open_kind(WindowKind::Primary, 0.0);
        let id = opened.id();

        engine.minimize(id, 0.0);
        engine.minimize(id, 100.0);
        assert_eq!(engine.window(id).unwrap().state, WindowState::Normal);

        // The cancelled flash timer does not fire later
        let effects = engine.tick(2000.0);
        assert!(!effects.iter().any(|e| matches!(e, Effect::SetMinimized { .. })));
    }

    #[test]
    fn test_reopen_restores_minimized_singleton() {
        let mut engine = create_test_engine();
        let (opened, _) = engine.open_kind(WindowKind::Primary, 0.0);
        let id = opened.id();

        engine.minimize(id, 0.0);
        assert_eq!(engine.window(id).unwrap().state, WindowState::Minimized);

        let (again, effects) = engine.open_kind(WindowKind::Primary, 100.0);
        assert_eq!(again, OpenOutcome::Revealed(id));
        assert_eq!(engine.window(id).unwrap().state, WindowState::Normal);
        assert!(effects.contains(&Effect::SetMinimized {
            window_id: id,
            minimized: false
        }));
        assert!(effects.contains(&Effect::SetVisible {
            window_id: id,
            visible: true
        }));

        // The flash timer was cancelled with the restore
        let effects = engine.tick(5000.0);
        assert!(!effects.iter().any(|e| matches!(e, Effect::SetMinimized { .. })));
    }

    #[test]
    fn test_fixed_size_kinds_ignore_minimize_and_maximize() {
        let mut engine = create_test_engine();
        let (opened, effects) = engine.open_kind(WindowKind::Video, 0.0);
        let id = opened.id();
        assert!(effects.contains(&Effect::CreateElement {
            window_id: id,
            kind: WindowKind::Video,
            title: WindowKind::Video.default_title().to_string(),
            maximize_enabled: false,
        }));
        assert!(engine.minimize(id, 0.0).is_empty());
        assert!(engine.toggle_maximize(id).is_empty());
        assert_eq!(engine.window(id).unwrap().state, WindowState::Normal);
    }

    #[test]
    fn test_mobile_pins_maximized() {
        let mut engine = DesktopEngine::new(PageConfig::default(), Viewport::new(400.0, 800.0));
        let (opened, effects) = engine.open_kind(WindowKind::Rss, 0.0);
        let id = opened.id();
        let w = engine.window(id).unwrap();
        assert_eq!(w.state, WindowState::Maximized);
        assert!((w.geometry.width - 400.0).abs() < 0.001);
        assert!(effects.contains(&Effect::SetMaximized {
            window_id: id,
            maximized: true
        }));
        // Maximize button cannot un-maximize it
        assert!(engine.click_button(id, TitleButton::Maximize, 0.0).is_empty());
    }

    #[test]
    fn test_resize_blocked_while_maximized() {
        let mut engine = create_test_engine();
        let (opened, _) = engine.show_dialog("Aviso", "x", 0.0);
        let id = opened.id();
        engine.toggle_maximize(id);
        let effects = engine.pointer_down(id, PointerTarget::ResizeHandle(ResizeDirection::SE), 10.0, 10.0, 0.0);
        assert!(engine.active_gesture().is_none());
        assert!(!effects.iter().any(|e| matches!(e, Effect::AttachDocumentListeners { .. })));
    }

    #[test]
    fn test_unmute_delivered_by_timer() {
        let mut engine = create_test_engine();
        let (opened, _) = engine.open_kind(WindowKind::Radio, 0.0);
        let id = opened.id();
        engine.content_event(
            id,
            ContentEvent::Hls {
                event: crate::content::HlsEvent::ManifestParsed,
            },
            0.0,
        );
        let effects = engine.tick(500.0);
        assert!(content_actions(&effects).contains(&&ContentAction::Stream {
            command: StreamCommand::Unmute
        }));
    }

    #[test]
    fn test_late_fetch_result_ignored_after_close() {
        let mut engine = create_test_engine();
        let (opened, _) = engine.open_kind(WindowKind::Rss, 0.0);
        let id = opened.id();
        engine.close_window(id, 0.0);
        let effects = engine.content_event(
            id,
            ContentEvent::FetchCompleted {
                status: 200,
                body: "{}".into(),
            },
            50.0,
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_close_guard_blocks_pointer_down() {
        let mut engine = create_test_engine();
        let (a, _) = engine.show_dialog("A", "x", 0.0);
        let (b, _) = engine.show_dialog("B", "y", 0.0);
        let effects = engine.click_button(a.id(), TitleButton::Close, 1000.0);
        assert!(effects.contains(&Effect::BlockPointerEvents { duration_ms: 100.0 }));

        engine.pointer_down(b.id(), PointerTarget::TitleBar, 500.0, 300.0, 1050.0);
        assert!(engine.active_gesture().is_none());
        engine.pointer_down(b.id(), PointerTarget::TitleBar, 500.0, 300.0, 1100.0);
        assert!(engine.active_gesture().is_some());
    }

    #[test]
    fn test_dialog_closes_on_ok_and_overlay() {
        let mut engine = create_test_engine();
        let (a, _) = engine.show_dialog("A", "x", 0.0);
        let effects = engine.content_event(a.id(), ContentEvent::Dismiss, 0.0);
        assert!(effects.contains(&Effect::RemoveElement { window_id: a.id() }));

        let (b, _) = engine.show_dialog("B", "y", 1000.0);
        let effects = engine.click_overlay(b.id(), 1000.0);
        assert!(effects.contains(&Effect::RemoveElement { window_id: b.id() }));
        assert!(engine.windows().is_empty());
    }

    #[test]
    fn test_form_success_opens_dialog() {
        let config = PageConfig {
            seed: Some(1),
            form: crate::config::FormSettings {
                access_key: "key".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = DesktopEngine::new(config, Viewport::new(1280.0, 800.0));
        let (opened, _) = engine.open_kind(WindowKind::ContactForm, 0.0);
        let id = opened.id();

        engine.content_event(
            id,
            ContentEvent::CaptchaSolved {
                provider: CaptchaProvider::HCaptcha,
                token: "t".into(),
            },
            0.0,
        );
        let fields = ContactFields {
            name: "Rui".into(),
            email: "rui@example.test".into(),
            subject: "Olá".into(),
            message: "Teste".into(),
        };
        engine.content_event(id, ContentEvent::Submit { fields }, 0.0);

        let effects = engine.tick(1500.0);
        assert!(content_actions(&effects)
            .iter()
            .any(|a| matches!(a, ContentAction::Fetch { .. })));

        engine.content_event(
            id,
            ContentEvent::FetchCompleted {
                status: 200,
                body: r#"{"success": true, "message": "ok"}"#.into(),
            },
            1600.0,
        );
        let effects = engine.tick(2600.0);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::CreateElement {
                kind: WindowKind::Dialog,
                title,
                ..
            } if title == "Message Sent"
        )));
    }
}

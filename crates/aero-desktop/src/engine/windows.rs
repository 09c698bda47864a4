//! Window lifecycle: open, minimize, maximize, close

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::content::{
    ContactForm, ContentAction, FeedReader, MessageDialog, PanelContent, PrimaryPanel, StreamPlayer, StreamSources,
};
use crate::input::{DocumentListeners, GestureRouter};
use crate::maintenance::{Countdown, ProgressSimulator};
use crate::timer::{TimerAction, TimerQueue};
use crate::window::lifecycle::{next_state, LifecycleEvent};
use crate::window::{Effect, OpenOutcome, RestoreSnapshot, WindowConfig, WindowId, WindowInstance, WindowKind, WindowState};
use super::DesktopEngine;

/// Release everything a closing window owns
fn teardown_window(
    window: &mut WindowInstance,
    router: &mut GestureRouter,
    listeners: &mut DocumentListeners,
    timers: &mut TimerQueue,
) -> Vec<Effect> {
    let id = window.id;
    let mut effects = Vec::new();

    let gesture = router.cancel_for(id);
    let released = listeners.remove_owned(id);
    if gesture.is_some() || released > 0 {
        effects.push(Effect::DetachDocumentListeners { window_id: id });
    }
    let cancelled = timers.cancel_owned(id);

    if let Some(mut content) = window.content.take() {
        for action in content.teardown() {
            match action {
                ContentAction::Stream { .. } => effects.push(Effect::Content { window_id: id, action }),
                other => log::debug!("dropping {:?} from closing window {}", other, id),
            }
        }
    }

    if window.handles_installed {
        window.handles_installed = false;
        effects.push(Effect::RemoveResizeHandles { window_id: id });
    }
    effects.push(Effect::RemoveElement { window_id: id });

    log::debug!(
        "window {} torn down: {} listeners, {} timers released",
        id,
        released,
        cancelled
    );
    effects
}

impl DesktopEngine {
    /// Open a window, or reveal the live singleton of its kind
    pub fn open_window(
        &mut self,
        config: WindowConfig,
        content: Option<Box<dyn PanelContent>>,
        now_ms: f64,
    ) -> (OpenOutcome, Vec<Effect>) {
        let kind = config.kind;
        let geometry = config
            .geometry
            .unwrap_or_else(|| self.viewport.centered_rect(config.size));
        let centered = config.geometry.is_none();
        let min_size = config.min_size.unwrap_or_else(|| self.config.window.min_size());
        let title = config.title;

        let outcome = self.registry.open(kind, move |id| {
            let mut window = WindowInstance::new(id, kind, title, geometry);
            window.centered = centered;
            window.min_size = min_size;
            if let Some(content) = content {
                window = window.with_content(content);
            }
            window
        });

        let id = outcome.id();
        let mut effects = Vec::new();

        if let OpenOutcome::Revealed(_) = outcome {
            log::debug!("revealing existing {:?} window {}", kind, id);
            effects.extend(self.reveal(id));
            return (outcome, effects);
        }

        log::info!("opened {:?} window {}", kind, id);
        let pin = self.viewport.is_mobile() && kind.maximizes_on_mobile();

        if let Some(window) = self.registry.get_mut(id) {
            effects.push(Effect::CreateElement {
                window_id: id,
                kind,
                title: window.title.clone(),
                maximize_enabled: kind.is_resizable() && !pin,
            });
            effects.push(Effect::SetGeometry {
                window_id: id,
                rect: window.geometry,
                centered: window.centered,
            });
            effects.push(Effect::SetZOrder {
                window_id: id,
                z_order: window.z_order,
            });
            if kind.is_resizable() {
                window.handles_installed = true;
                effects.push(Effect::InstallResizeHandles { window_id: id });
            }
        }

        if pin {
            effects.extend(self.pin_maximized(id));
        }

        let body = self.registry.get(id).map(|w| w.body_element_id()).unwrap_or_default();
        let actions = match self.registry.get_mut(id).and_then(|w| w.content_mut()) {
            Some(content) => content.attach(&body, now_ms),
            None => Vec::new(),
        };
        effects.extend(self.apply_content_actions(id, actions, now_ms));

        (outcome, effects)
    }

    /// Open a window of `kind` with the content configured for it
    pub fn open_kind(&mut self, kind: WindowKind, now_ms: f64) -> (OpenOutcome, Vec<Effect>) {
        if kind.is_singleton() {
            if let Some(id) = self.registry.live_of_kind(kind) {
                log::debug!("revealing existing {:?} window {}", kind, id);
                return (OpenOutcome::Revealed(id), self.reveal(id));
            }
        }
        let content = self.build_content(kind);
        self.open_window(WindowConfig::for_kind(kind), Some(content), now_ms)
    }

    /// Open a message dialog
    pub fn show_dialog(&mut self, title: &str, message: &str, now_ms: f64) -> (OpenOutcome, Vec<Effect>) {
        let config = WindowConfig::for_kind(WindowKind::Dialog).titled(title);
        let content = Box::new(MessageDialog::new(title, message));
        self.open_window(config, Some(content), now_ms)
    }

    fn build_content(&mut self, kind: WindowKind) -> Box<dyn PanelContent> {
        let streams = &self.config.streams;
        match kind {
            WindowKind::Radio => Box::new(
                StreamPlayer::radio(
                    StreamSources::with_low(streams.radio_high.as_str(), streams.radio_low.as_str()),
                    streams.radio_label.as_str(),
                )
                .with_max_retries(streams.max_retries)
                .with_unmute_delay(streams.unmute_delay_ms)
                .with_volume(streams.initial_volume),
            ),
            WindowKind::Video => Box::new(
                StreamPlayer::video(streams.video.as_str(), streams.video_label.as_str())
                    .with_max_retries(streams.max_retries)
                    .with_unmute_delay(streams.unmute_delay_ms)
                    .with_volume(streams.initial_volume),
            ),
            WindowKind::Rss => Box::new(FeedReader::new(
                self.config.feed.proxy.as_str(),
                self.config.feed.feed_url.as_str(),
            )),
            WindowKind::ContactForm => Box::new(
                ContactForm::new(self.config.form.endpoint.as_str(), self.config.form.access_key.as_str())
                    .with_send_delay(self.config.form.send_delay_ms)
                    .with_rng(StdRng::seed_from_u64(self.rng.gen())),
            ),
            WindowKind::Dialog => Box::new(MessageDialog::new(kind.default_title(), "")),
            WindowKind::Primary => {
                let m = &self.config.maintenance;
                let rng = StdRng::seed_from_u64(self.rng.gen());
                let progress = ProgressSimulator::new(rng, m.progress_initial_min, m.progress_initial_max);
                Box::new(PrimaryPanel::new(
                    Countdown::until(m.target_date),
                    progress,
                    m.progress_update_interval_ms,
                ))
            }
        }
    }

    /// Show a live window again and raise it, ending any minimize flash
    fn reveal(&mut self, id: WindowId) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.registry.get(id).map(|w| w.state) == Some(WindowState::Minimized) {
            self.timers.cancel_where(id, |a| matches!(a, TimerAction::RevertMinimize));
            effects.extend(self.revert_minimize(id));
        }
        effects.push(Effect::SetVisible {
            window_id: id,
            visible: true,
        });
        effects.extend(self.focus(id));
        effects
    }

    /// Raise a window to the top
    pub fn focus(&mut self, id: WindowId) -> Vec<Effect> {
        match self.registry.raise(id) {
            Some(z_order) => vec![Effect::SetZOrder { window_id: id, z_order }],
            None => Vec::new(),
        }
    }

    /// Force a window into the maximized layout for narrow viewports
    fn pin_maximized(&mut self, id: WindowId) -> Vec<Effect> {
        let rect = self.viewport.maximized_rect();
        let Some(window) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        match next_state(window.kind, window.state, window.prev_state, LifecycleEvent::PinMaximized) {
            Ok(state) => {
                window.restore = Some(RestoreSnapshot {
                    rect: window.geometry,
                    centered: window.centered,
                });
                window.state = state;
                window.pinned_maximized = true;
                window.geometry = rect;
                window.centered = false;

                let mut effects = vec![
                    Effect::SetMaximized {
                        window_id: id,
                        maximized: true,
                    },
                    Effect::SetGeometry {
                        window_id: id,
                        rect,
                        centered: false,
                    },
                ];
                if window.handles_installed {
                    window.handles_installed = false;
                    effects.push(Effect::RemoveResizeHandles { window_id: id });
                }
                effects
            }
            Err(e) => {
                log::debug!("window {} not pinned: {}", id, e);
                Vec::new()
            }
        }
    }

    /// Minimize button
    ///
    /// The window hides briefly and returns to its previous state on its own.
    pub fn minimize(&mut self, id: WindowId, now_ms: f64) -> Vec<Effect> {
        let Some(window) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        let from = window.state;
        let to = match next_state(window.kind, from, window.prev_state, LifecycleEvent::Minimize) {
            Ok(state) => state,
            Err(e) => {
                log::debug!("minimize ignored for window {}: {}", id, e);
                return Vec::new();
            }
        };

        if to == WindowState::Minimized {
            window.prev_state = Some(from);
            window.state = to;
            let flash_ms = if window.kind == WindowKind::Primary {
                self.config.window.primary_minimize_flash_ms
            } else {
                self.config.window.minimize_flash_ms
            };

            let mut effects = self.end_gesture_for(id);
            self.timers.cancel_where(id, |a| matches!(a, TimerAction::RevertMinimize));
            self.timers.schedule(id, now_ms, flash_ms, TimerAction::RevertMinimize);
            effects.push(Effect::SetMinimized {
                window_id: id,
                minimized: true,
            });
            effects
        } else {
            // Second press while minimized restores at once
            window.state = to;
            window.prev_state = None;
            self.timers.cancel_where(id, |a| matches!(a, TimerAction::RevertMinimize));
            vec![Effect::SetMinimized {
                window_id: id,
                minimized: false,
            }]
        }
    }

    /// End a minimize flash
    pub(crate) fn revert_minimize(&mut self, id: WindowId) -> Vec<Effect> {
        let Some(window) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        match next_state(window.kind, window.state, window.prev_state, LifecycleEvent::MinimizeElapsed) {
            Ok(state) => {
                window.state = state;
                window.prev_state = None;
                vec![Effect::SetMinimized {
                    window_id: id,
                    minimized: false,
                }]
            }
            Err(e) => {
                log::debug!("minimize revert ignored for window {}: {}", id, e);
                Vec::new()
            }
        }
    }

    /// Maximize button: toggles between Normal and Maximized
    pub fn toggle_maximize(&mut self, id: WindowId) -> Vec<Effect> {
        let rect = self.viewport.maximized_rect();
        let Some(window) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        if window.pinned_maximized {
            log::debug!("window {} is pinned maximized", id);
            return Vec::new();
        }
        let to = match next_state(window.kind, window.state, window.prev_state, LifecycleEvent::ToggleMaximize) {
            Ok(state) => state,
            Err(e) => {
                log::debug!("maximize ignored for window {}: {}", id, e);
                return Vec::new();
            }
        };

        let mut effects = Vec::new();
        if to == WindowState::Maximized {
            window.restore = Some(RestoreSnapshot {
                rect: window.geometry,
                centered: window.centered,
            });
            window.state = to;
            window.geometry = rect;
            window.centered = false;
            effects.push(Effect::SetMaximized {
                window_id: id,
                maximized: true,
            });
            effects.push(Effect::SetGeometry {
                window_id: id,
                rect,
                centered: false,
            });
            if window.handles_installed {
                window.handles_installed = false;
                effects.push(Effect::RemoveResizeHandles { window_id: id });
            }
            effects.splice(0..0, self.end_gesture_for(id));
        } else {
            if let Some(snapshot) = window.restore.take() {
                window.geometry = snapshot.rect;
                window.centered = snapshot.centered;
            }
            window.state = to;
            effects.push(Effect::SetMaximized {
                window_id: id,
                maximized: false,
            });
            effects.push(Effect::SetGeometry {
                window_id: id,
                rect: window.geometry,
                centered: window.centered,
            });
            if window.resizable() && !window.handles_installed {
                window.handles_installed = true;
                effects.push(Effect::InstallResizeHandles { window_id: id });
            }
        }
        effects
    }

    /// Close a window: detach listeners, cancel timers, tear down content,
    /// remove the element
    pub fn close_window(&mut self, id: WindowId, now_ms: f64) -> Vec<Effect> {
        if !self.registry.is_live(id) {
            log::debug!("close ignored for window {}: not live", id);
            return Vec::new();
        }
        let router = &mut self.router;
        let listeners = &mut self.listeners;
        let timers = &mut self.timers;
        match self
            .registry
            .close(id, |w| teardown_window(w, router, listeners, timers))
        {
            Ok(mut effects) => {
                log::info!("closed window {}", id);
                effects.push(self.block_pointer(now_ms));
                effects
            }
            Err(e) => {
                log::debug!("close failed for window {}: {}", id, e);
                Vec::new()
            }
        }
    }

    /// Close every window
    pub fn close_all(&mut self, now_ms: f64) -> Vec<Effect> {
        if self.registry.is_empty() {
            return Vec::new();
        }
        let router = &mut self.router;
        let listeners = &mut self.listeners;
        let timers = &mut self.timers;
        let mut effects = self
            .registry
            .close_all(|w| teardown_window(w, router, listeners, timers));
        log::info!("closed all windows");
        effects.push(self.block_pointer(now_ms));
        effects
    }

    fn block_pointer(&mut self, now_ms: f64) -> Effect {
        let duration_ms = self.config.window.close_guard_ms;
        self.pointer_guard_until = now_ms + duration_ms;
        Effect::BlockPointerEvents { duration_ms }
    }

    /// Route content actions: timers, dialogs and closes are handled here,
    /// everything else goes to the page
    pub(crate) fn apply_content_actions(
        &mut self,
        id: WindowId,
        actions: Vec<ContentAction>,
        now_ms: f64,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        for action in actions {
            match action {
                ContentAction::Schedule { delay_ms, event } => {
                    self.timers
                        .schedule(id, now_ms, delay_ms, TimerAction::Content(event));
                }
                ContentAction::ShowDialog { title, message } => {
                    let (_, opened) = self.show_dialog(&title, &message, now_ms);
                    effects.extend(opened);
                }
                ContentAction::CloseWindow => {
                    effects.extend(self.close_window(id, now_ms));
                    break;
                }
                action => effects.push(Effect::Content { window_id: id, action }),
            }
        }
        effects
    }
}

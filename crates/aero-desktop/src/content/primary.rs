//! Primary maintenance window: countdown, progress bar, details and retry

use rand::rngs::StdRng;

use super::{ContentAction, ContentEvent, PanelContent};
use crate::maintenance::{Countdown, ProgressSimulator, ProgressSnapshot, Remaining, Step};
use crate::window::WindowKind;

const COUNTDOWN_INTERVAL_MS: f64 = 1000.0;
const RETRY_DELAY_MS: f64 = 2000.0;

const DETAILS_TITLE: &str = "Detalhes da Manutenção";
const DETAILS_MESSAGE: &str = "O website está atualmente em manutenção programada para melhorar o \
desempenho e a segurança. Talvez acabe o website ou faça uma nova versão. Pedimos desculpa por \
qualquer inconveniente causado.";
const RETRY_TITLE: &str = "Tentativa de Conexão";
const RETRY_MESSAGE: &str = "A tentar reconectar ao servidor...\n\nServidor ainda em manutenção. \
Por favor, tente novamente mais tarde.";

#[derive(Debug)]
pub struct PrimaryPanel {
    countdown: Countdown,
    progress: ProgressSimulator<StdRng>,
    interval_ms: f64,
    /// Bumped on every retry; stale ticks from an earlier run are dropped
    run: u32,
    retrying: bool,
    closed: bool,
}

impl PrimaryPanel {
    pub fn new(countdown: Countdown, progress: ProgressSimulator<StdRng>, interval_ms: f64) -> Self {
        Self {
            countdown,
            progress,
            interval_ms,
            run: 0,
            retrying: false,
            closed: false,
        }
    }

    pub fn percent(&self) -> f32 {
        self.progress.percent()
    }

    pub fn remaining(&self, now_ms: f64) -> Remaining {
        self.countdown.remaining(now_ms)
    }

    fn render_countdown(&self, now_ms: f64) -> Vec<ContentAction> {
        let remaining = self.countdown.remaining(now_ms);
        let mut actions = vec![ContentAction::RenderCountdown {
            text: remaining.to_string(),
        }];
        if remaining != Remaining::Finished {
            actions.push(ContentAction::Schedule {
                delay_ms: COUNTDOWN_INTERVAL_MS,
                event: ContentEvent::CountdownTick,
            });
        }
        actions
    }

    fn render_progress(snapshot: ProgressSnapshot) -> ContentAction {
        ContentAction::RenderProgress {
            percent: snapshot.percent,
            label: snapshot.percent_label(),
            remaining: snapshot.remaining_label(),
            speed: snapshot.speed_label(),
        }
    }

    fn next_tick(&self) -> ContentAction {
        ContentAction::Schedule {
            delay_ms: self.interval_ms,
            event: ContentEvent::ProgressTick { run: self.run },
        }
    }

    fn on_tick(&mut self) -> Vec<ContentAction> {
        match self.progress.step() {
            Step::Advanced => vec![Self::render_progress(self.progress.snapshot()), self.next_tick()],
            Step::Stalled { duration_ms } => vec![ContentAction::Schedule {
                delay_ms: duration_ms,
                event: ContentEvent::ProgressResume { run: self.run },
            }],
            Step::Idle => Vec::new(),
        }
    }

    fn on_retry(&mut self) -> Vec<ContentAction> {
        if self.retrying {
            return Vec::new();
        }
        self.retrying = true;
        self.run = self.run.wrapping_add(1);
        vec![
            ContentAction::RenderProgress {
                percent: 0.0,
                label: "0% completo".to_string(),
                remaining: String::new(),
                speed: String::new(),
            },
            ContentAction::ShowDialog {
                title: RETRY_TITLE.to_string(),
                message: RETRY_MESSAGE.to_string(),
            },
            ContentAction::Schedule {
                delay_ms: RETRY_DELAY_MS,
                event: ContentEvent::RestartProgress,
            },
        ]
    }
}

impl PanelContent for PrimaryPanel {
    fn kind(&self) -> WindowKind {
        WindowKind::Primary
    }

    fn attach(&mut self, _container_id: &str, now_ms: f64) -> Vec<ContentAction> {
        let mut actions = self.render_countdown(now_ms);
        actions.push(Self::render_progress(self.progress.snapshot()));
        actions.push(self.next_tick());
        actions
    }

    fn handle(&mut self, event: ContentEvent, now_ms: f64) -> Vec<ContentAction> {
        if self.closed {
            return Vec::new();
        }
        match event {
            ContentEvent::CountdownTick => self.render_countdown(now_ms),
            ContentEvent::ProgressTick { run } if run == self.run && !self.retrying => self.on_tick(),
            ContentEvent::ProgressResume { run } if run == self.run && !self.retrying => {
                self.progress.resume();
                vec![self.next_tick()]
            }
            ContentEvent::ShowDetails => vec![ContentAction::ShowDialog {
                title: DETAILS_TITLE.to_string(),
                message: DETAILS_MESSAGE.to_string(),
            }],
            ContentEvent::Retry => self.on_retry(),
            ContentEvent::RestartProgress if self.retrying => {
                self.retrying = false;
                self.progress.reset();
                vec![Self::render_progress(self.progress.snapshot()), self.next_tick()]
            }
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) -> Vec<ContentAction> {
        self.closed = true;
        Vec::new()
    }

    fn status(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const TARGET_MS: i64 = 1_755_216_000_000;

    fn panel() -> PrimaryPanel {
        let progress = ProgressSimulator::new(StdRng::seed_from_u64(5), 15.0, 45.0);
        PrimaryPanel::new(Countdown::new(TARGET_MS), progress, 800.0)
    }

    fn scheduled(actions: &[ContentAction]) -> Vec<ContentEvent> {
        actions
            .iter()
            .filter_map(|a| match a {
                ContentAction::Schedule { event, .. } => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_attach_starts_both_loops() {
        let mut p = panel();
        let actions = p.attach("c", (TARGET_MS - 90_000) as f64);
        let events = scheduled(&actions);
        assert!(events.contains(&ContentEvent::CountdownTick));
        assert!(events.contains(&ContentEvent::ProgressTick { run: 0 }));
        assert!(actions
            .iter()
            .any(|a| matches!(a, ContentAction::RenderCountdown { text } if text == "Tempo restante: 0d 0h 1m 30s")));
    }

    #[test]
    fn test_countdown_stops_when_finished() {
        let mut p = panel();
        let actions = p.handle(ContentEvent::CountdownTick, TARGET_MS as f64);
        assert!(scheduled(&actions).is_empty());
    }

    #[test]
    fn test_tick_chain_continues() {
        let mut p = panel();
        p.attach("c", 0.0);
        for _ in 0..50 {
            let actions = p.handle(ContentEvent::ProgressTick { run: 0 }, 0.0);
            let events = scheduled(&actions);
            assert_eq!(events.len(), 1);
            if let ContentEvent::ProgressResume { run } = events[0] {
                let resumed = p.handle(ContentEvent::ProgressResume { run }, 0.0);
                assert_eq!(scheduled(&resumed), vec![ContentEvent::ProgressTick { run: 0 }]);
            }
        }
    }

    #[test]
    fn test_retry_drops_stale_ticks() {
        let mut p = panel();
        p.attach("c", 0.0);
        let actions = p.handle(ContentEvent::Retry, 0.0);
        assert!(actions.iter().any(|a| matches!(a, ContentAction::ShowDialog { title, .. } if title == RETRY_TITLE)));
        assert!(p.handle(ContentEvent::Retry, 0.0).is_empty());

        // The pre-retry chain dies out
        assert!(p.handle(ContentEvent::ProgressTick { run: 0 }, 800.0).is_empty());

        let actions = p.handle(ContentEvent::RestartProgress, 2000.0);
        assert!(p.percent() < 20.0);
        assert_eq!(scheduled(&actions), vec![ContentEvent::ProgressTick { run: 1 }]);
        assert!(p.handle(ContentEvent::ProgressTick { run: 0 }, 2800.0).is_empty());
    }

    #[test]
    fn test_details_dialog() {
        let mut p = panel();
        let actions = p.handle(ContentEvent::ShowDetails, 0.0);
        assert!(matches!(&actions[..], [ContentAction::ShowDialog { title, .. }] if title == DETAILS_TITLE));
    }
}

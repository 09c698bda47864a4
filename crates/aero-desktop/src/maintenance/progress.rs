use rand::Rng;

/// Highest value the bar ever shows
pub const PROGRESS_CAP: f32 = 99.0;

/// Probability that a step stalls instead of advancing
const STALL_CHANCE: f64 = 0.1;

/// What the bar shows after a step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressSnapshot {
    pub percent: f32,
    pub remaining_items: u32,
    pub speed_mbps: f32,
}

impl ProgressSnapshot {
    pub fn percent_label(&self) -> String {
        format!("{}% completo", self.percent.floor() as u32)
    }

    pub fn remaining_label(&self) -> String {
        format!("Itens restantes: {} ficheiros", self.remaining_items)
    }

    pub fn speed_label(&self) -> String {
        format!("Velocidade atual: {} MB/s", format!("{:.1}", self.speed_mbps).replace('.', ","))
    }
}

/// Outcome of one progress step
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Advanced,
    /// Progress pauses for `duration_ms`, then creeps
    Stalled { duration_ms: f64 },
    /// Waiting for a stall to end
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Pace {
    Normal,
    Stalled,
    Creeping,
}

/// Fake file-transfer progress
#[derive(Debug)]
pub struct ProgressSimulator<R> {
    rng: R,
    percent: f32,
    pace: Pace,
}

impl<R: Rng> ProgressSimulator<R> {
    /// Start uniformly in `[initial_min, initial_max)`, whole percent
    pub fn new(mut rng: R, initial_min: f32, initial_max: f32) -> Self {
        let span = (initial_max - initial_min).max(0.0);
        let start = (rng.gen::<f32>() * span).floor() + initial_min;
        Self {
            rng,
            percent: start.clamp(0.0, PROGRESS_CAP),
            pace: Pace::Normal,
        }
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    pub fn is_stalled(&self) -> bool {
        self.pace == Pace::Stalled
    }

    /// Advance one interval
    pub fn step(&mut self) -> Step {
        match self.pace {
            Pace::Stalled => Step::Idle,
            Pace::Creeping => {
                let creep = self.rng.gen_range(0.1..0.6);
                self.advance(creep);
                Step::Advanced
            }
            Pace::Normal => {
                let increment = if self.percent < 60.0 {
                    self.rng.gen_range(0.5..2.5)
                } else if self.percent < 85.0 {
                    self.rng.gen_range(0.2..1.2)
                } else {
                    self.rng.gen_range(0.05..0.35)
                };
                if self.rng.gen_bool(STALL_CHANCE) {
                    self.pace = Pace::Stalled;
                    Step::Stalled {
                        duration_ms: self.rng.gen_range(1000.0..4000.0),
                    }
                } else {
                    self.advance(increment);
                    Step::Advanced
                }
            }
        }
    }

    /// End a stall; later steps creep
    pub fn resume(&mut self) {
        if self.pace == Pace::Stalled {
            self.pace = Pace::Creeping;
        }
    }

    /// Start over from `[0, 20)` at normal pace
    pub fn reset(&mut self) {
        self.percent = (self.rng.gen::<f32>() * 20.0).floor();
        self.pace = Pace::Normal;
    }

    /// Current bar values; item count and speed are re-rolled each call
    pub fn snapshot(&mut self) -> ProgressSnapshot {
        let items = ((100.0 - self.percent) * 50.0).floor() as u32 + self.rng.gen_range(0..20);
        ProgressSnapshot {
            percent: self.percent,
            remaining_items: items,
            speed_mbps: self.rng.gen_range(1.0..4.0),
        }
    }

    fn advance(&mut self, by: f32) {
        self.percent = (self.percent + by).min(PROGRESS_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sim(seed: u64) -> ProgressSimulator<StdRng> {
        ProgressSimulator::new(StdRng::seed_from_u64(seed), 15.0, 45.0)
    }

    #[test]
    fn test_initial_range() {
        for seed in 0..50 {
            let p = sim(seed).percent();
            assert!((15.0..45.0).contains(&p), "{p}");
            assert_eq!(p, p.floor());
        }
    }

    #[test]
    fn test_never_exceeds_cap_and_monotonic() {
        let mut p = sim(7);
        let mut last = p.percent();
        for _ in 0..5000 {
            if let Step::Stalled { duration_ms } = p.step() {
                assert!((1000.0..4000.0).contains(&duration_ms));
                assert_eq!(p.step(), Step::Idle);
                p.resume();
            }
            assert!(p.percent() >= last);
            assert!(p.percent() <= PROGRESS_CAP);
            last = p.percent();
        }
        assert!((p.percent() - PROGRESS_CAP).abs() < 0.001);
    }

    #[test]
    fn test_reset_range() {
        let mut p = sim(3);
        for _ in 0..20 {
            p.reset();
            assert!((0.0..20.0).contains(&p.percent()));
            assert!(!p.is_stalled());
        }
    }

    #[test]
    fn test_snapshot_fakes() {
        let mut p = sim(11);
        let s = p.snapshot();
        let base = ((100.0 - s.percent) * 50.0).floor() as u32;
        assert!(s.remaining_items >= base && s.remaining_items < base + 20);
        assert!((1.0..4.0).contains(&s.speed_mbps));
    }

    #[test]
    fn test_labels() {
        let s = ProgressSnapshot {
            percent: 42.7,
            remaining_items: 2870,
            speed_mbps: 2.34,
        };
        assert_eq!(s.percent_label(), "42% completo");
        assert_eq!(s.remaining_label(), "Itens restantes: 2870 ficheiros");
        assert_eq!(s.speed_label(), "Velocidade atual: 2,3 MB/s");
    }
}

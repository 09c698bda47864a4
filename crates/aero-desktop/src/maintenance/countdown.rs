use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Time left until the target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remaining {
    Left {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Finished,
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Left {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "Tempo restante: {}d {}h {}m {}s", days, hours, minutes, seconds),
            Remaining::Finished => f.write_str("Conclusão: 99%"),
        }
    }
}

/// Countdown to a fixed target instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    target_ms: i64,
}

impl Countdown {
    /// Target as epoch milliseconds
    pub fn new(target_ms: i64) -> Self {
        Self { target_ms }
    }

    /// Target as a naive timestamp interpreted as UTC
    pub fn until(target: NaiveDateTime) -> Self {
        Self::new(target.and_utc().timestamp_millis())
    }

    pub fn target(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.target_ms)
    }

    /// Time left at `now_ms` (epoch milliseconds)
    pub fn remaining(&self, now_ms: f64) -> Remaining {
        let now = if now_ms.is_finite() { now_ms.floor() as i64 } else { i64::MAX };
        let left_ms = self.target_ms.saturating_sub(now);
        if left_ms <= 0 {
            return Remaining::Finished;
        }
        let total_secs = left_ms / 1000;
        Remaining::Left {
            days: total_secs / 86_400,
            hours: (total_secs % 86_400) / 3600,
            minutes: (total_secs % 3600) / 60,
            seconds: total_secs % 60,
        }
    }
}

//! Page configuration
//!
//! Every section has defaults matching the live page, so an empty JSON
//! object is a valid configuration.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::math::Size;
use crate::particles::ExpansionParams;

/// Invalid configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidUrl { field, source })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaintenanceSettings {
    /// End of maintenance, interpreted as UTC
    pub target_date: NaiveDateTime,
    pub progress_update_interval_ms: f64,
    pub progress_initial_min: f32,
    pub progress_initial_max: f32,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            target_date: NaiveDate::from_ymd_opt(2025, 8, 15)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            progress_update_interval_ms: 800.0,
            progress_initial_min: 15.0,
            progress_initial_max: 45.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamSettings {
    /// 80 kbps radio stream
    pub radio_high: String,
    /// 40 kbps radio stream
    pub radio_low: String,
    pub radio_label: String,
    pub video: String,
    pub video_label: String,
    pub max_retries: u32,
    pub unmute_delay_ms: f64,
    /// Starting volume of stream panels, `0..=1`
    pub initial_volume: f32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            radio_high: "https://streaming-live.rtp.pt/liveradio/antena380a/chunklist_DVR.m3u8".to_string(),
            radio_low: "https://streaming-live.rtp.pt/liveradio/antena340a/chunklist_DVR.m3u8".to_string(),
            radio_label: "Antena 3".to_string(),
            video: "https://m1b2.worldcast.tv/dancetelevisionone/2/dancetelevisionone.m3u8".to_string(),
            video_label: "Dance Television".to_string(),
            max_retries: 3,
            unmute_delay_ms: 500.0,
            initial_volume: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedSettings {
    /// RSS-to-JSON proxy; the feed URL is passed as `rss_url`
    pub proxy: String,
    pub feed_url: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            proxy: "https://api.rss2json.com/v1/api.json".to_string(),
            feed_url: "https://www.noticiasaominuto.com/rss/ultima-hora".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSettings {
    pub endpoint: String,
    /// Public form access key; submissions are refused while empty
    pub access_key: String,
    pub turnstile_site_key: String,
    pub hcaptcha_site_key: Option<String>,
    pub send_delay_ms: f64,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.web3forms.com/submit".to_string(),
            access_key: String::new(),
            turnstile_site_key: "0x4AAAAAABoph6l8jAkFimWx".to_string(),
            hcaptcha_site_key: None,
            send_delay_ms: 1500.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SoundSettings {
    pub start: String,
    pub success: String,
    pub error: String,
    /// Key click while typing in the contact form
    pub typing: String,
    pub volume: f32,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            start: "https://www.myinstants.com/media/sounds/windows-xp-ding.mp3".to_string(),
            success: "https://www.myinstants.com/media/sounds/windows-xp-shutdown.mp3".to_string(),
            error: "https://www.myinstants.com/media/sounds/windows-xp-error.mp3".to_string(),
            typing: "https://www.myinstants.com/media/sounds/windows-xp-pop.mp3".to_string(),
            volume: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowSettings {
    pub min_width: f32,
    pub min_height: f32,
    pub minimize_flash_ms: f64,
    pub primary_minimize_flash_ms: f64,
    /// Pointer-down is ignored this long after a close
    pub close_guard_ms: f64,
    pub mobile_breakpoint: f32,
    /// Page refresh waits this long before reloading
    pub refresh_delay_ms: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            min_width: 300.0,
            min_height: 200.0,
            minimize_flash_ms: 300.0,
            primary_minimize_flash_ms: 2000.0,
            close_guard_ms: 100.0,
            refresh_delay_ms: 1500.0,
            mobile_breakpoint: 768.0,
        }
    }
}

impl WindowSettings {
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }
}

/// Complete page configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    pub animation: ExpansionParams,
    pub maintenance: MaintenanceSettings,
    pub streams: StreamSettings,
    pub feed: FeedSettings,
    pub form: FormSettings,
    pub sounds: SoundSettings,
    pub window: WindowSettings,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl PageConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.maintenance;
        if !(m.progress_update_interval_ms > 0.0) {
            return Err(invalid("maintenance.progressUpdateIntervalMs", "must be positive"));
        }
        if !(0.0..=99.0).contains(&m.progress_initial_min)
            || !(0.0..=99.0).contains(&m.progress_initial_max)
            || m.progress_initial_min > m.progress_initial_max
        {
            return Err(invalid(
                "maintenance.progressInitialMin",
                "initial progress range must lie within 0..=99 with min <= max",
            ));
        }

        check_url("streams.radioHigh", &self.streams.radio_high)?;
        check_url("streams.radioLow", &self.streams.radio_low)?;
        check_url("streams.video", &self.streams.video)?;
        check_url("feed.proxy", &self.feed.proxy)?;
        check_url("feed.feedUrl", &self.feed.feed_url)?;
        check_url("form.endpoint", &self.form.endpoint)?;

        if !(0.0..=1.0).contains(&self.sounds.volume) {
            return Err(invalid("sounds.volume", "must be within 0..=1"));
        }
        if !(0.0..=1.0).contains(&self.streams.initial_volume) {
            return Err(invalid("streams.initialVolume", "must be within 0..=1"));
        }

        let w = &self.window;
        if !(w.min_width > 0.0 && w.min_height > 0.0) {
            return Err(invalid("window.minWidth", "minimum size must be positive"));
        }
        if !(w.mobile_breakpoint >= 0.0) {
            return Err(invalid("window.mobileBreakpoint", "must not be negative"));
        }
        if self.animation.particle_count == 0 {
            return Err(invalid("animation.particleCount", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.streams.max_retries, 3);
        assert!((config.window.minimize_flash_ms - 300.0).abs() < 0.001);
        assert_eq!(config.maintenance.target_date.to_string(), "2025-08-15 00:00:00");
    }

    #[test]
    fn test_partial_override() {
        let config = PageConfig::from_json(
            r#"{"form": {"accessKey": "abc"}, "maintenance": {"targetDate": "2026-01-01T12:00:00"}, "seed": 42}"#,
        )
        .unwrap();
        assert_eq!(config.form.access_key, "abc");
        assert_eq!(config.form.endpoint, "https://api.web3forms.com/submit");
        assert_eq!(config.maintenance.target_date.to_string(), "2026-01-01 12:00:00");
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(PageConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_bad_url() {
        let err = PageConfig::from_json(r#"{"feed": {"proxy": "not a url"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "feed.proxy", .. }));
    }

    #[test]
    fn test_bad_progress_range() {
        let err = PageConfig::from_json(r#"{"maintenance": {"progressInitialMin": 50, "progressInitialMax": 10}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_initial_volume_range() {
        assert!((PageConfig::default().streams.initial_volume - 0.8).abs() < 0.001);
        let err = PageConfig::from_json(r#"{"streams": {"initialVolume": 1.5}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "streams.initialVolume",
                ..
            }
        ));
    }
}

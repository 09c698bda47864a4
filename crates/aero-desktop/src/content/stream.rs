//! HLS stream panel (radio and video)
//!
//! The panel does not touch media itself. It follows the HLS library's
//! callbacks and answers with [`StreamCommand`]s for the adapter to apply.

use serde::{Deserialize, Serialize};

use super::{ContentAction, ContentEvent, PanelContent, StatusTone, StreamCommand};
use crate::window::WindowKind;

/// Media element backing the stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

/// Stream quality option
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamQuality {
    #[default]
    High,
    Low,
}

/// Error class reported by the HLS library
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HlsErrorKind {
    Network,
    Media,
    Mux,
    Other,
}

/// HLS library callback
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HlsEvent {
    MediaAttached,
    ManifestParsed,
    /// A new fragment started playing
    FragChanged,
    PlaybackStarted,
    /// The browser refused to autoplay
    AutoplayBlocked,
    /// Neither hls.js nor native HLS is available
    Unsupported,
    Error {
        error: HlsErrorKind,
        fatal: bool,
        #[serde(default)]
        details: String,
    },
}

/// Speaker glyph shown on the mute button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

impl VolumeIcon {
    /// Glyph for the element's mute flag and volume
    pub fn for_level(muted: bool, volume: f32) -> Self {
        if muted || volume <= 0.0 {
            VolumeIcon::Muted
        } else if volume < 0.5 {
            VolumeIcon::Low
        } else {
            VolumeIcon::High
        }
    }
}

/// Stream URLs for one panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamSources {
    pub high: String,
    pub low: Option<String>,
}

impl StreamSources {
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            high: url.into(),
            low: None,
        }
    }

    pub fn with_low(high: impl Into<String>, low: impl Into<String>) -> Self {
        Self {
            high: high.into(),
            low: Some(low.into()),
        }
    }

    /// URL for `quality`, falling back to the high stream
    pub fn url(&self, quality: StreamQuality) -> &str {
        match (quality, &self.low) {
            (StreamQuality::Low, Some(low)) => low,
            _ => &self.high,
        }
    }
}

/// Where the stream is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Attaching,
    Loading,
    /// Manifest parsed, play requested
    Starting,
    Playing,
    Paused,
    Failed,
    Destroyed,
}

/// Radio or video stream panel
#[derive(Debug)]
pub struct StreamPlayer {
    kind: WindowKind,
    media: MediaKind,
    sources: StreamSources,
    quality: StreamQuality,
    label: String,
    state: StreamState,
    retries: u32,
    max_retries: u32,
    unmute_delay_ms: f64,
    /// Mute chosen by the user, not the muted autoplay start
    muted: bool,
    volume: f32,
    status: Option<String>,
}

impl StreamPlayer {
    /// Audio panel with a quality selector
    pub fn radio(sources: StreamSources, label: impl Into<String>) -> Self {
        Self::new(WindowKind::Radio, MediaKind::Audio, sources, label)
    }

    /// Video panel
    pub fn video(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(WindowKind::Video, MediaKind::Video, StreamSources::single(url), label)
    }

    fn new(kind: WindowKind, media: MediaKind, sources: StreamSources, label: impl Into<String>) -> Self {
        Self {
            kind,
            media,
            sources,
            quality: StreamQuality::High,
            label: label.into(),
            state: StreamState::Idle,
            retries: 0,
            max_retries: 3,
            unmute_delay_ms: 500.0,
            muted: false,
            volume: 0.8,
            status: None,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_unmute_delay(mut self, delay_ms: f64) -> Self {
        self.unmute_delay_ms = delay_ms;
        self
    }

    /// Initial element volume in `0.0..=1.0`
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn quality(&self) -> StreamQuality {
        self.quality
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn media(&self) -> MediaKind {
        self.media
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn icon(&self) -> VolumeIcon {
        VolumeIcon::for_level(self.muted, self.volume)
    }

    /// URL currently selected
    pub fn source_url(&self) -> &str {
        self.sources.url(self.quality)
    }

    fn set_status(&mut self, message: &str, tone: StatusTone) -> ContentAction {
        self.status = Some(message.to_string());
        ContentAction::status(message, tone)
    }

    fn on_hls(&mut self, event: HlsEvent) -> Vec<ContentAction> {
        match event {
            HlsEvent::MediaAttached => {
                self.state = StreamState::Loading;
                vec![
                    ContentAction::stream(StreamCommand::LoadSource {
                        url: self.source_url().to_string(),
                    }),
                    self.set_status("Stream conectado, a carregar...", StatusTone::Busy),
                ]
            }
            HlsEvent::ManifestParsed => {
                self.state = StreamState::Starting;
                self.retries = 0;
                vec![
                    self.set_status("Stream carregado, a iniciar reprodução", StatusTone::Info),
                    ContentAction::stream(StreamCommand::Play { muted: true }),
                    ContentAction::Schedule {
                        delay_ms: self.unmute_delay_ms,
                        event: ContentEvent::Unmute,
                    },
                ]
            }
            HlsEvent::PlaybackStarted => {
                if self.state == StreamState::Starting || self.state == StreamState::Paused {
                    self.state = StreamState::Playing;
                    self.status = None;
                    return vec![ContentAction::ClearStatus];
                }
                Vec::new()
            }
            HlsEvent::AutoplayBlocked => {
                self.state = StreamState::Paused;
                vec![self.set_status("Clique em reproduzir para ouvir", StatusTone::Info)]
            }
            HlsEvent::FragChanged => {
                if self.label.is_empty() {
                    return Vec::new();
                }
                vec![ContentAction::stream(StreamCommand::SetNowPlaying {
                    text: self.label.clone(),
                })]
            }
            HlsEvent::Unsupported => {
                self.state = StreamState::Failed;
                vec![self.set_status("HLS não é suportado neste navegador", StatusTone::Error)]
            }
            HlsEvent::Error { fatal: false, details, .. } => {
                log::debug!("non-fatal {:?} stream error: {}", self.kind, details);
                Vec::new()
            }
            HlsEvent::Error { error, details, .. } => self.on_fatal(error, &details),
        }
    }

    fn on_fatal(&mut self, error: HlsErrorKind, details: &str) -> Vec<ContentAction> {
        let recoverable = matches!(error, HlsErrorKind::Network | HlsErrorKind::Media);
        if recoverable && self.retries < self.max_retries {
            self.retries += 1;
            log::warn!(
                "{:?} stream {:?} error, recovery attempt {}/{}: {}",
                self.kind,
                error,
                self.retries,
                self.max_retries,
                details
            );
            let (message, command) = match error {
                HlsErrorKind::Network => ("Erro de rede, a tentar recuperar...", StreamCommand::StartLoad),
                _ => ("Erro de média, a tentar recuperar...", StreamCommand::RecoverMediaError),
            };
            return vec![self.set_status(message, StatusTone::Error), ContentAction::stream(command)];
        }

        log::warn!("{:?} stream failed ({:?}): {}", self.kind, error, details);
        self.state = StreamState::Failed;
        vec![
            self.set_status("Erro fatal, não é possível reproduzir o stream", StatusTone::Error),
            ContentAction::stream(StreamCommand::Destroy),
        ]
    }

    fn on_select_quality(&mut self, quality: StreamQuality) -> Vec<ContentAction> {
        if quality == self.quality || self.sources.low.is_none() {
            return Vec::new();
        }
        self.quality = quality;
        self.retries = 0;
        self.state = StreamState::Loading;
        vec![
            self.set_status("A mudar qualidade...", StatusTone::Busy),
            ContentAction::stream(StreamCommand::LoadSource {
                url: self.source_url().to_string(),
            }),
        ]
    }

    fn on_toggle_play(&mut self) -> Vec<ContentAction> {
        match self.state {
            StreamState::Playing | StreamState::Starting => {
                self.state = StreamState::Paused;
                vec![ContentAction::stream(StreamCommand::Pause)]
            }
            StreamState::Paused => {
                self.state = StreamState::Starting;
                vec![ContentAction::stream(StreamCommand::Play { muted: self.muted })]
            }
            _ => Vec::new(),
        }
    }

    fn on_stop(&mut self) -> Vec<ContentAction> {
        match self.state {
            StreamState::Playing | StreamState::Starting | StreamState::Paused => {
                self.state = StreamState::Paused;
                vec![ContentAction::stream(StreamCommand::Stop)]
            }
            _ => Vec::new(),
        }
    }

    fn on_toggle_mute(&mut self) -> Vec<ContentAction> {
        self.muted = !self.muted;
        vec![ContentAction::stream(StreamCommand::SetMuted {
            muted: self.muted,
            icon: self.icon(),
        })]
    }

    fn on_set_volume(&mut self, percent: u8) -> Vec<ContentAction> {
        self.volume = f32::from(percent.min(100)) / 100.0;
        vec![ContentAction::stream(StreamCommand::SetVolume {
            volume: self.volume,
            icon: self.icon(),
        })]
    }
}

impl PanelContent for StreamPlayer {
    fn kind(&self) -> WindowKind {
        self.kind
    }

    fn attach(&mut self, container_id: &str, _now_ms: f64) -> Vec<ContentAction> {
        if self.state != StreamState::Idle {
            return Vec::new();
        }
        log::debug!("attaching {:?} stream to #{}", self.media, container_id);
        self.state = StreamState::Attaching;
        vec![
            self.set_status("A ligar ao stream...", StatusTone::Busy),
            ContentAction::stream(StreamCommand::AttachMedia { media: self.media }),
            ContentAction::stream(StreamCommand::SetVolume {
                volume: self.volume,
                icon: self.icon(),
            }),
        ]
    }

    fn handle(&mut self, event: ContentEvent, _now_ms: f64) -> Vec<ContentAction> {
        if matches!(self.state, StreamState::Destroyed) {
            return Vec::new();
        }
        match event {
            ContentEvent::Hls { event } => self.on_hls(event),
            ContentEvent::Unmute => match self.state {
                StreamState::Starting | StreamState::Playing if !self.muted => {
                    vec![ContentAction::stream(StreamCommand::Unmute)]
                }
                _ => Vec::new(),
            },
            ContentEvent::SelectQuality { quality } => self.on_select_quality(quality),
            ContentEvent::TogglePlay => self.on_toggle_play(),
            ContentEvent::Stop => self.on_stop(),
            ContentEvent::ToggleMute => self.on_toggle_mute(),
            ContentEvent::SetVolume { percent } => self.on_set_volume(percent),
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) -> Vec<ContentAction> {
        if self.state == StreamState::Destroyed {
            return Vec::new();
        }
        let already_gone = self.state == StreamState::Idle;
        self.state = StreamState::Destroyed;
        self.status = None;
        if already_gone {
            Vec::new()
        } else {
            vec![ContentAction::stream(StreamCommand::Destroy)]
        }
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

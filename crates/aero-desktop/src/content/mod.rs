//! Panel content modules
//!
//! Content plugs into a window body. The window manager never interprets it:
//! it calls [`PanelContent::attach`] once the body exists, routes events to
//! [`PanelContent::handle`], and calls [`PanelContent::teardown`] during the
//! close transition. Content answers with [`ContentAction`]s.

mod stream;
mod feed;
mod contact;
mod dialog;
mod primary;

pub use stream::{
    HlsErrorKind, HlsEvent, MediaKind, StreamPlayer, StreamQuality, StreamSources, StreamState, VolumeIcon,
};
pub use feed::{Feed, FeedError, FeedItem, FeedReader, FeedState};
pub use contact::{CaptchaProvider, CaptchaToken, ContactFields, ContactForm, FormError, SubmissionState};
pub use dialog::MessageDialog;
pub use primary::PrimaryPanel;

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::window::WindowKind;

/// Visual tone of an inline status message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Info,
    Busy,
    Success,
    Error,
}

/// Short system sound
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    Start,
    Success,
    Error,
    /// Key click while typing
    Typing,
}

/// HTTP method of a content request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request for the browser to perform
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: String,
    /// JSON body, sent as `application/json`
    pub body: Option<String>,
}

/// Command for the media element / HLS instance of a stream panel
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum StreamCommand {
    /// Bind an HLS instance to the panel's media element
    AttachMedia { media: MediaKind },
    LoadSource { url: String },
    /// Restart loading after a network error
    StartLoad,
    RecoverMediaError,
    Destroy,
    Play { muted: bool },
    Unmute,
    Pause,
    /// Pause and rewind to the start where the stream allows seeking
    Stop,
    SetMuted { muted: bool, icon: VolumeIcon },
    /// Element volume in `0.0..=1.0`
    SetVolume { volume: f32, icon: VolumeIcon },
    SetNowPlaying { text: String },
}

/// What content asks the page to do
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentAction {
    /// Show an inline status line
    SetStatus { message: String, tone: StatusTone },
    /// Clear the inline status line
    ClearStatus,
    /// Drive the panel's media element
    Stream { command: StreamCommand },
    /// Perform a request; the result comes back as a [`ContentEvent`]
    Fetch { request: FetchRequest },
    /// Replace the feed list
    RenderFeed { feed: Feed },
    /// Show a plain message body
    RenderMessage { message: String },
    /// Update the maintenance countdown line
    RenderCountdown { text: String },
    /// Update the fake transfer progress
    RenderProgress {
        percent: f32,
        label: String,
        remaining: String,
        speed: String,
    },
    /// Clear the contact form inputs and captcha widget
    ResetForm,
    /// Toggle the typing highlight on a form input
    SetTypingEffect { field: String, active: bool },
    PlaySound { sound: Sound },
    /// Open a message dialog
    ShowDialog { title: String, message: String },
    /// Deliver `event` back to this content after `delay_ms`
    Schedule { delay_ms: f64, event: ContentEvent },
    /// Close the window hosting this content
    CloseWindow,
}

impl ContentAction {
    /// Status line helper
    pub fn status(message: impl Into<String>, tone: StatusTone) -> Self {
        ContentAction::SetStatus {
            message: message.into(),
            tone,
        }
    }

    /// Stream command helper
    pub fn stream(command: StreamCommand) -> Self {
        ContentAction::Stream { command }
    }
}

/// Events delivered to content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentEvent {
    /// HLS library callback
    Hls { event: HlsEvent },
    /// Unmute after autoplay started muted
    Unmute,
    /// Play/pause button
    TogglePlay,
    /// Stop button
    Stop,
    /// Mute button
    ToggleMute,
    /// Volume slider moved; `percent` in `0..=100`
    SetVolume { percent: u8 },
    /// Quality selector change
    SelectQuality { quality: StreamQuality },
    /// A [`ContentAction::Fetch`] finished with an HTTP response
    FetchCompleted { status: u16, body: String },
    /// A [`ContentAction::Fetch`] failed before a response arrived
    FetchFailed { reason: String },
    /// Reload the feed
    Refresh,
    /// Captcha widget produced a token
    CaptchaSolved { provider: CaptchaProvider, token: String },
    /// Captcha token expired
    CaptchaExpired,
    /// Contact form submit
    Submit { fields: ContactFields },
    /// Contact form send delay elapsed
    SendNow,
    /// Show the confirmation dialog after a successful send
    ConfirmSent,
    /// Contact form reset button
    Reset,
    /// A contact form input gained focus
    FieldFocused { field: String },
    /// A contact form input lost focus
    FieldBlurred { field: String },
    /// Key click interval of typing session `session`
    TypingTick { session: u32 },
    /// Dialog OK button
    Dismiss,
    /// Maintenance countdown refresh
    CountdownTick,
    /// Maintenance progress step of progress run `run`
    ProgressTick { run: u32 },
    /// Maintenance progress stall of run `run` ended
    ProgressResume { run: u32 },
    /// Maintenance details button
    ShowDetails,
    /// Maintenance retry button
    Retry,
    /// Maintenance progress restart after a retry
    RestartProgress,
}

/// Content hosted inside a window body
pub trait PanelContent: fmt::Debug {
    /// Window kind this content belongs in
    fn kind(&self) -> WindowKind;

    /// Called once the window body element exists
    fn attach(&mut self, container_id: &str, now_ms: f64) -> Vec<ContentAction>;

    /// Handle an event; `now_ms` is the page clock (epoch milliseconds)
    fn handle(&mut self, event: ContentEvent, now_ms: f64) -> Vec<ContentAction>;

    /// Release everything the content holds; later events are ignored
    fn teardown(&mut self) -> Vec<ContentAction>;

    /// Current inline status message
    fn status(&self) -> Option<&str>;
}

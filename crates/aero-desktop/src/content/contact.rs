//! Contact form panel
//!
//! Validation, captcha bookkeeping and the submission round-trip. The form
//! markup lives in the adapter; this module only sees submitted values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::{ContentAction, ContentEvent, FetchRequest, HttpMethod, PanelContent, Sound, StatusTone};
use crate::window::WindowKind;

/// Errors submitting the contact form
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("captcha verification is required")]
    MissingCaptcha,

    #[error("form endpoint is not configured")]
    NotConfigured,

    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission request failed: {0}")]
    Transport(String),

    #[error("malformed submission response: {0}")]
    Response(String),
}

impl FormError {
    /// Message shown inline under the form
    pub fn user_message(&self) -> String {
        match self {
            FormError::MissingField(_) | FormError::InvalidEmail => {
                "Please fill in all fields with valid information.".to_string()
            }
            FormError::MissingCaptcha => "Please complete the CAPTCHA verification.".to_string(),
            _ => "Error sending message. Please try again.".to_string(),
        }
    }
}

/// Captcha widget that produced a token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptchaProvider {
    Turnstile,
    HCaptcha,
}

impl CaptchaProvider {
    /// Submission field carrying the token
    pub fn field_name(self) -> &'static str {
        match self {
            CaptchaProvider::Turnstile => "cf-turnstile-response",
            CaptchaProvider::HCaptcha => "h-captcha-response",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptchaToken {
    pub provider: CaptchaProvider,
    pub token: String,
}

/// Values typed into the form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFields {
    /// Check required fields and the email shape
    pub fn validate(&self) -> Result<(), FormError> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(field));
            }
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(FormError::InvalidEmail);
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

/// Where a submission stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    /// Waiting out the send delay or the response
    Sending,
    Sent,
    Failed,
}

/// Key click interval while an input has focus
const TYPING_INTERVAL_MS: f64 = 300.0;
/// Share of intervals that play a key click
const TYPING_CLICK_CHANCE: f64 = 0.3;

/// Contact form panel
#[derive(Debug)]
pub struct ContactForm {
    endpoint: String,
    access_key: String,
    subject_prefix: String,
    send_delay_ms: f64,
    confirm_delay_ms: f64,
    captcha: Option<CaptchaToken>,
    pending: Option<ContactFields>,
    state: SubmissionState,
    closed: bool,
    status: Option<String>,
    /// Input with the typing highlight
    typing: Option<String>,
    /// Bumped whenever a typing session ends so stale ticks die out
    typing_session: u32,
    rng: StdRng,
}

impl ContactForm {
    pub fn new(endpoint: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            subject_prefix: "Contact Form".to_string(),
            send_delay_ms: 1500.0,
            confirm_delay_ms: 1000.0,
            captcha: None,
            pending: None,
            state: SubmissionState::Idle,
            closed: false,
            status: None,
            typing: None,
            typing_session: 0,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_send_delay(mut self, delay_ms: f64) -> Self {
        self.send_delay_ms = delay_ms;
        self
    }

    /// Randomness for the typing clicks
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Input currently showing the typing highlight
    pub fn typing_field(&self) -> Option<&str> {
        self.typing.as_deref()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn has_captcha(&self) -> bool {
        self.captcha.is_some()
    }

    /// JSON body for `fields` with the current captcha token
    pub fn submission_body(&self, fields: &ContactFields) -> Result<Value, FormError> {
        if self.endpoint.is_empty() || self.access_key.is_empty() {
            return Err(FormError::NotConfigured);
        }
        let captcha = self.captcha.as_ref().ok_or(FormError::MissingCaptcha)?;

        let mut body = Map::new();
        body.insert("access_key".into(), json!(self.access_key));
        body.insert("subject".into(), json!(format!("{}: {}", self.subject_prefix, fields.subject.trim())));
        body.insert("name".into(), json!(fields.name.trim()));
        body.insert("email".into(), json!(fields.email.trim()));
        body.insert("message".into(), json!(fields.message.trim()));
        body.insert(captcha.provider.field_name().into(), json!(captcha.token));
        Ok(Value::Object(body))
    }

    fn set_status(&mut self, message: String, tone: StatusTone) -> ContentAction {
        self.status = Some(message.clone());
        ContentAction::SetStatus { message, tone }
    }

    fn reject(&mut self, error: FormError) -> Vec<ContentAction> {
        log::debug!("contact form rejected locally: {}", error);
        vec![
            self.set_status(error.user_message(), StatusTone::Error),
            ContentAction::PlaySound { sound: Sound::Error },
        ]
    }

    fn on_submit(&mut self, fields: ContactFields) -> Vec<ContentAction> {
        if self.state == SubmissionState::Sending {
            return Vec::new();
        }
        if let Err(e) = fields.validate() {
            return self.reject(e);
        }
        if let Err(e) = self.submission_body(&fields) {
            return self.reject(e);
        }

        self.state = SubmissionState::Sending;
        self.pending = Some(fields);
        vec![
            self.set_status("Sending message...".to_string(), StatusTone::Busy),
            ContentAction::PlaySound { sound: Sound::Start },
            ContentAction::Schedule {
                delay_ms: self.send_delay_ms,
                event: ContentEvent::SendNow,
            },
        ]
    }

    fn on_send_now(&mut self) -> Vec<ContentAction> {
        let Some(fields) = self.pending.take() else {
            return Vec::new();
        };
        match self.submission_body(&fields) {
            Ok(body) => vec![ContentAction::Fetch {
                request: FetchRequest {
                    method: HttpMethod::Post,
                    url: self.endpoint.clone(),
                    body: Some(body.to_string()),
                },
            }],
            Err(e) => self.fail(e),
        }
    }

    fn on_response(&mut self, status: u16, body: &str) -> Vec<ContentAction> {
        let outcome = serde_json::from_str::<SubmitResponse>(body)
            .map_err(|e| FormError::Response(e.to_string()))
            .and_then(|r| {
                if r.success && (200..300).contains(&status) {
                    Ok(())
                } else {
                    Err(FormError::Rejected(r.message))
                }
            });

        match outcome {
            Ok(()) => {
                log::info!("contact form sent");
                self.state = SubmissionState::Sent;
                self.captcha = None;
                vec![
                    self.set_status("Message sent successfully!".to_string(), StatusTone::Success),
                    ContentAction::ResetForm,
                    ContentAction::PlaySound { sound: Sound::Success },
                    ContentAction::Schedule {
                        delay_ms: self.confirm_delay_ms,
                        event: ContentEvent::ConfirmSent,
                    },
                ]
            }
            Err(e) => self.fail(e),
        }
    }

    fn on_focus(&mut self, field: String) -> Vec<ContentAction> {
        let mut actions = self.stop_typing();
        self.typing = Some(field.clone());
        actions.push(ContentAction::SetTypingEffect { field, active: true });
        actions.push(ContentAction::Schedule {
            delay_ms: TYPING_INTERVAL_MS,
            event: ContentEvent::TypingTick {
                session: self.typing_session,
            },
        });
        actions
    }

    fn on_typing_tick(&mut self, session: u32) -> Vec<ContentAction> {
        if session != self.typing_session || self.typing.is_none() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.rng.gen::<f64>() < TYPING_CLICK_CHANCE {
            actions.push(ContentAction::PlaySound { sound: Sound::Typing });
        }
        actions.push(ContentAction::Schedule {
            delay_ms: TYPING_INTERVAL_MS,
            event: ContentEvent::TypingTick { session },
        });
        actions
    }

    /// End the typing session, if any
    fn stop_typing(&mut self) -> Vec<ContentAction> {
        match self.typing.take() {
            Some(field) => {
                self.typing_session = self.typing_session.wrapping_add(1);
                vec![ContentAction::SetTypingEffect { field, active: false }]
            }
            None => Vec::new(),
        }
    }

    fn fail(&mut self, error: FormError) -> Vec<ContentAction> {
        log::warn!("contact form failed: {}", error);
        self.state = SubmissionState::Failed;
        vec![
            self.set_status(error.user_message(), StatusTone::Error),
            ContentAction::PlaySound { sound: Sound::Error },
            ContentAction::ShowDialog {
                title: "Error".to_string(),
                message: "There was an error sending your message. Please try again later.".to_string(),
            },
        ]
    }
}

impl PanelContent for ContactForm {
    fn kind(&self) -> WindowKind {
        WindowKind::ContactForm
    }

    fn attach(&mut self, _container_id: &str, _now_ms: f64) -> Vec<ContentAction> {
        Vec::new()
    }

    fn handle(&mut self, event: ContentEvent, _now_ms: f64) -> Vec<ContentAction> {
        if self.closed {
            return Vec::new();
        }
        match event {
            ContentEvent::CaptchaSolved { provider, token } => {
                self.captcha = Some(CaptchaToken { provider, token });
                Vec::new()
            }
            ContentEvent::CaptchaExpired => {
                self.captcha = None;
                Vec::new()
            }
            ContentEvent::Submit { fields } => self.on_submit(fields),
            ContentEvent::SendNow if self.state == SubmissionState::Sending => self.on_send_now(),
            ContentEvent::FetchCompleted { status, body } if self.state == SubmissionState::Sending => {
                self.on_response(status, &body)
            }
            ContentEvent::FetchFailed { reason } if self.state == SubmissionState::Sending => {
                self.fail(FormError::Transport(reason))
            }
            ContentEvent::ConfirmSent => vec![ContentAction::ShowDialog {
                title: "Message Sent".to_string(),
                message: "Thank you for your message! We will get back to you soon.".to_string(),
            }],
            ContentEvent::Reset if self.state != SubmissionState::Sending => {
                self.state = SubmissionState::Idle;
                self.captcha = None;
                self.pending = None;
                self.status = None;
                let mut actions = self.stop_typing();
                actions.extend([ContentAction::ResetForm, ContentAction::ClearStatus]);
                actions
            }
            ContentEvent::FieldFocused { field } => self.on_focus(field),
            ContentEvent::FieldBlurred { field } if self.typing.as_deref() == Some(field.as_str()) => {
                self.stop_typing()
            }
            ContentEvent::TypingTick { session } => self.on_typing_tick(session),
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) -> Vec<ContentAction> {
        self.closed = true;
        self.pending = None;
        self.status = None;
        self.typing = None;
        self.typing_session = self.typing_session.wrapping_add(1);
        Vec::new()
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

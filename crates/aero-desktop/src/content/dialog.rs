use super::{ContentAction, ContentEvent, PanelContent};
use crate::window::WindowKind;

/// Title + message + OK
#[derive(Debug)]
pub struct MessageDialog {
    title: String,
    message: String,
    dismissed: bool,
}

impl MessageDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            dismissed: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl PanelContent for MessageDialog {
    fn kind(&self) -> WindowKind {
        WindowKind::Dialog
    }

    fn attach(&mut self, _container_id: &str, _now_ms: f64) -> Vec<ContentAction> {
        vec![ContentAction::RenderMessage {
            message: self.message.clone(),
        }]
    }

    fn handle(&mut self, event: ContentEvent, _now_ms: f64) -> Vec<ContentAction> {
        match event {
            ContentEvent::Dismiss if !self.dismissed => {
                self.dismissed = true;
                vec![ContentAction::CloseWindow]
            }
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) -> Vec<ContentAction> {
        self.dismissed = true;
        Vec::new()
    }

    fn status(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_closes_once() {
        let mut d = MessageDialog::new("Message Sent", "Obrigado!");
        assert_eq!(
            d.attach("c", 0.0),
            vec![ContentAction::RenderMessage {
                message: "Obrigado!".into()
            }]
        );
        assert_eq!(d.handle(ContentEvent::Dismiss, 0.0), vec![ContentAction::CloseWindow]);
        assert!(d.handle(ContentEvent::Dismiss, 0.0).is_empty());
    }
}

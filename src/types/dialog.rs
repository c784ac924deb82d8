//! Dialog descriptors rendered by the overlay.

use std::fmt;
use std::sync::Arc;

use crate::overlay::DialogOverlay;

/// Handler run when a dialog button is activated.
///
/// Receives the overlay so it can dismiss or replace the dialog.
pub type ButtonHandler = Arc<dyn Fn(&DialogOverlay) + Send + Sync>;

/// Handler run on dismissal with the descriptor as it was before dismissal.
pub type DismissHandler = Arc<dyn Fn(&DialogDescriptor) + Send + Sync>;

/// One dialog button.
#[derive(Clone)]
pub struct DialogButton {
    /// Button label.
    pub label: String,
    /// Activation handler.
    pub on_activate: Option<ButtonHandler>,
}

impl DialogButton {
    /// Button that only carries a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_activate: None,
        }
    }

    /// Attach an activation handler.
    pub fn on_activate<F>(mut self, handler: F) -> Self
    where
        F: Fn(&DialogOverlay) + Send + Sync + 'static,
    {
        self.on_activate = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for DialogButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogButton")
            .field("label", &self.label)
            .field("on_activate", &self.on_activate.is_some())
            .finish()
    }
}

/// The dialog currently owned by the session.
///
/// `content` is opaque to this crate; the rendering boundary interprets it.
#[derive(Clone, Default)]
pub struct DialogDescriptor {
    /// Whether the dialog is shown.
    pub visible: bool,
    /// Renderable payload.
    pub content: serde_json::Value,
    /// Buttons in display order.
    pub buttons: Vec<DialogButton>,
    /// Dismissal handler.
    pub on_dismiss: Option<DismissHandler>,
}

impl DialogDescriptor {
    /// Visible dialog with the given content and no buttons.
    pub fn new(content: serde_json::Value) -> Self {
        Self {
            visible: true,
            content,
            buttons: Vec::new(),
            on_dismiss: None,
        }
    }

    /// The empty, hidden slot.
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Append a button.
    pub fn with_button(mut self, button: DialogButton) -> Self {
        self.buttons.push(button);
        self
    }

    /// Attach a dismissal handler.
    pub fn on_dismiss<F>(mut self, handler: F) -> Self
    where
        F: Fn(&DialogDescriptor) + Send + Sync + 'static,
    {
        self.on_dismiss = Some(Arc::new(handler));
        self
    }

    /// Button labels in order.
    pub fn button_labels(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.label.as_str()).collect()
    }
}

impl fmt::Debug for DialogDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogDescriptor")
            .field("visible", &self.visible)
            .field("content", &self.content)
            .field("buttons", &self.buttons)
            .field("on_dismiss", &self.on_dismiss.is_some())
            .finish()
    }
}

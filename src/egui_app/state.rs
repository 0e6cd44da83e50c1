//! Shared state types for the egui UI.

use crate::config::ValidationOptions;
use crate::feedback::{ErrorAnchor, InlinePlacement};
use crate::intake::TextField;
use crate::render::TicketSurface;

/// Which page the shell is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    /// The intake form.
    #[default]
    Intake,
    /// The generated ticket.
    Ticket,
}

/// An inline validation message attached to an input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineMessage {
    /// Message text.
    pub text: String,
    /// Whether the message sits before or after its input.
    pub placement: InlinePlacement,
}

/// Text buffers and per-anchor messages for the intake form.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    /// Name input buffer.
    pub name: String,
    /// Email input buffer.
    pub email: String,
    /// GitHub input buffer.
    pub github: String,
    /// Inline message anchored to the name input.
    pub name_error: Option<InlineMessage>,
    /// Inline message anchored to the email input.
    pub email_error: Option<InlineMessage>,
    /// Inline message anchored to the GitHub input.
    pub github_error: Option<InlineMessage>,
    /// Inline message anchored to the avatar box.
    pub avatar_error: Option<InlineMessage>,
    /// Field that should grab keyboard focus next frame.
    pub focus_request: Option<TextField>,
}

impl FormState {
    /// Mutable text buffer for `field`.
    pub fn buffer_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Name => &mut self.name,
            TextField::Email => &mut self.email,
            TextField::Github => &mut self.github,
        }
    }

    /// Current text of `field`.
    pub fn value(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::Email => &self.email,
            TextField::Github => &self.github,
        }
    }

    /// Mutable inline-message slot for `anchor`.
    pub fn error_slot_mut(&mut self, anchor: ErrorAnchor) -> &mut Option<InlineMessage> {
        match anchor {
            ErrorAnchor::Name => &mut self.name_error,
            ErrorAnchor::Email => &mut self.email_error,
            ErrorAnchor::Github => &mut self.github_error,
            ErrorAnchor::Avatar => &mut self.avatar_error,
        }
    }

    /// Inline message currently anchored to `anchor`, if any.
    pub fn error(&self, anchor: ErrorAnchor) -> Option<&InlineMessage> {
        match anchor {
            ErrorAnchor::Name => self.name_error.as_ref(),
            ErrorAnchor::Email => self.email_error.as_ref(),
            ErrorAnchor::Github => self.github_error.as_ref(),
            ErrorAnchor::Avatar => self.avatar_error.as_ref(),
        }
    }
}

/// A queued notice awaiting expiry.
#[derive(Clone, Debug, PartialEq)]
pub struct ToastState {
    /// Message text.
    pub message: String,
    /// Whether the notice gets the error tint.
    pub is_error: bool,
    /// Display lifetime in milliseconds.
    pub lifetime_ms: u64,
    /// Absolute expiry in UI seconds, stamped on the first tick after push.
    pub expires_at: Option<f64>,
}

/// Populated display targets for the ticket view.
///
/// Doubles as the hydrator's render surface; targets stay `None` when the
/// stored record lacks the corresponding field.
#[derive(Clone, Debug, Default)]
pub struct TicketViewState {
    /// Greeting headline.
    pub greeting: Option<String>,
    /// Attendee email line.
    pub email: Option<String>,
    /// Avatar image as a `data:` URI.
    pub avatar_data_url: Option<String>,
    /// Attendee name on the ticket body.
    pub name: Option<String>,
    /// GitHub handle on the ticket body.
    pub github: Option<String>,
    /// Ticket identifier text.
    pub ticket_id: Option<String>,
    /// Fallback notice replacing the ticket when no record exists.
    pub missing_notice: Option<String>,
}

impl TicketViewState {
    /// Clear all targets ahead of a fresh hydration.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl TicketSurface for TicketViewState {
    fn set_greeting(&mut self, text: &str) {
        self.greeting = Some(text.to_string());
    }

    fn set_email(&mut self, text: &str) {
        self.email = Some(text.to_string());
    }

    fn set_avatar(&mut self, data_url: &str) {
        self.avatar_data_url = Some(data_url.to_string());
    }

    fn set_name(&mut self, text: &str) {
        self.name = Some(text.to_string());
    }

    fn set_github(&mut self, text: &str) {
        self.github = Some(text.to_string());
    }

    fn set_ticket_id(&mut self, text: &str) {
        self.ticket_id = Some(text.to_string());
    }

    fn show_missing_notice(&mut self, text: &str) {
        self.missing_notice = Some(text.to_string());
    }
}

/// State of the validation options window.
#[derive(Clone, Debug, Default)]
pub struct OptionsWindowState {
    /// Whether the window is open.
    pub open: bool,
    /// Pending edits, applied on confirm.
    pub pending: ValidationOptions,
    /// Last persistence error, if any.
    pub last_error: Option<String>,
}

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    /// Active page.
    pub page: Page,
    /// Intake form state.
    pub form: FormState,
    /// Ticket view state.
    pub ticket: TicketViewState,
    /// Queued notices.
    pub toasts: Vec<ToastState>,
    /// Blocking modal message, if open.
    pub modal: Option<String>,
    /// Validation options window state.
    pub options: OptionsWindowState,
}

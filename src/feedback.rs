//! Validation message presentation.
//!
//! One presentation mode is active at a time. Inline modes anchor a message
//! to the offending input (replacing any message already shown there), the
//! alert mode opens a blocking modal, and the toast mode appends an
//! auto-dismissing notice to the notice list. A page without a notice list
//! degrades toast mode to the blocking modal.

use crate::config::PresentationMode;

/// Default toast lifetime before unconditional removal.
pub const TOAST_LIFETIME_MS: u64 = 3000;

/// Input a validation message is anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorAnchor {
    /// The name input.
    Name,
    /// The email input.
    Email,
    /// The GitHub handle input.
    Github,
    /// The avatar picker box.
    Avatar,
}

impl ErrorAnchor {
    /// All anchors, in the order submit validates them.
    pub const ALL: [ErrorAnchor; 4] = [
        ErrorAnchor::Name,
        ErrorAnchor::Email,
        ErrorAnchor::Github,
        ErrorAnchor::Avatar,
    ];
}

/// Whether an inline message is inserted before or after its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InlinePlacement {
    /// Insert directly before the input.
    Above,
    /// Insert directly after the input.
    Below,
}

/// A non-blocking notice queued for the notice list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastNotice {
    /// Message text.
    pub message: String,
    /// Whether the notice gets the error visual variant.
    pub is_error: bool,
    /// Milliseconds before the notice is removed.
    pub lifetime_ms: u64,
}

/// Rendering capability the presenter drives.
///
/// Implementations own the actual widgets; the presenter only decides what
/// to show where. Inline messages are keyed by anchor, so placing a new one
/// must replace whatever was previously attached to that anchor.
pub trait FeedbackSurface {
    /// Show `message` inline at `anchor`, replacing any existing message there.
    fn place_inline(&mut self, anchor: ErrorAnchor, placement: InlinePlacement, message: &str);
    /// Remove the inline message attached to `anchor`, if any.
    fn clear_inline(&mut self, anchor: ErrorAnchor);
    /// Open a blocking modal with `message`.
    fn open_modal(&mut self, message: &str);
    /// Append a notice to the notice list.
    fn push_toast(&mut self, notice: ToastNotice);
    /// Whether the page has a notice list to append to.
    fn has_toast_area(&self) -> bool;
}

/// Dispatches validation messages according to the active presentation mode.
#[derive(Clone, Copy, Debug)]
pub struct Presenter {
    mode: PresentationMode,
}

impl Presenter {
    /// Create a presenter for the given mode.
    pub fn new(mode: PresentationMode) -> Self {
        Self { mode }
    }

    /// The active presentation mode.
    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// Surface a validation failure anchored to `anchor`.
    pub fn show<S: FeedbackSurface + ?Sized>(
        &self,
        surface: &mut S,
        anchor: ErrorAnchor,
        message: &str,
    ) {
        if message.is_empty() {
            return;
        }
        match self.mode {
            PresentationMode::Below => {
                surface.clear_inline(anchor);
                surface.place_inline(anchor, InlinePlacement::Below, message);
            }
            PresentationMode::Above => {
                surface.clear_inline(anchor);
                surface.place_inline(anchor, InlinePlacement::Above, message);
            }
            PresentationMode::Alert => surface.open_modal(message),
            PresentationMode::Toast => self.notify(surface, message, true),
        }
    }

    /// Remove any inline message attached to `anchor`.
    pub fn clear<S: FeedbackSurface + ?Sized>(&self, surface: &mut S, anchor: ErrorAnchor) {
        surface.clear_inline(anchor);
    }

    /// Surface a transient notice not tied to a field.
    ///
    /// Falls back to the blocking modal when the page has no notice list.
    pub fn notify<S: FeedbackSurface + ?Sized>(
        &self,
        surface: &mut S,
        message: &str,
        is_error: bool,
    ) {
        if !surface.has_toast_area() {
            surface.open_modal(message);
            return;
        }
        surface.push_toast(ToastNotice {
            message: message.to_string(),
            is_error,
            lifetime_ms: TOAST_LIFETIME_MS,
        });
    }
}

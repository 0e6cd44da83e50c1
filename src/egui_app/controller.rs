//! Maintains app state and bridges core logic to the egui UI.
//!
//! The controller owns the intake orchestrator and the session store,
//! implements the pipeline's surface traits against the UI state tree, and
//! exposes the event handlers the renderer calls. All decision logic lives
//! in the core modules; this layer only moves data between them and the
//! widgets.

use std::path::{Path, PathBuf};

use crate::config::{self, ValidationOptions};
use crate::feedback::{ErrorAnchor, FeedbackSurface, InlinePlacement, ToastNotice};
use crate::intake::orchestrator::READ_FAILED_NOTICE;
use crate::intake::{
    AvatarFile, FormSurface, IntakeOrchestrator, SubmitAttempt, SubmitOutcome, TextField,
};
use crate::render;
use crate::store::MemoryStore;

use super::state::{InlineMessage, Page, ToastState, UiState};

/// Bridges the intake pipeline and ticket hydrator to the egui state tree.
pub struct AppController {
    /// UI model consumed by the renderer.
    pub ui: UiState,
    orchestrator: IntakeOrchestrator,
    store: MemoryStore,
}

/// Surface adapter exposing the UI state tree to the core pipeline.
struct IntakePage<'a> {
    ui: &'a mut UiState,
}

impl FeedbackSurface for IntakePage<'_> {
    fn place_inline(&mut self, anchor: ErrorAnchor, placement: InlinePlacement, message: &str) {
        *self.ui.form.error_slot_mut(anchor) = Some(InlineMessage {
            text: message.to_string(),
            placement,
        });
    }

    fn clear_inline(&mut self, anchor: ErrorAnchor) {
        *self.ui.form.error_slot_mut(anchor) = None;
    }

    fn open_modal(&mut self, message: &str) {
        self.ui.modal = Some(message.to_string());
    }

    fn push_toast(&mut self, notice: ToastNotice) {
        self.ui.toasts.push(ToastState {
            message: notice.message,
            is_error: notice.is_error,
            lifetime_ms: notice.lifetime_ms,
            expires_at: None,
        });
    }

    fn has_toast_area(&self) -> bool {
        // The shell always renders a notice list.
        true
    }
}

impl FormSurface for IntakePage<'_> {
    fn value(&self, field: TextField) -> String {
        self.ui.form.value(field).to_string()
    }

    fn set_value(&mut self, field: TextField, value: &str) {
        *self.ui.form.buffer_mut(field) = value.to_string();
    }

    fn focus(&mut self, field: TextField) {
        self.ui.form.focus_request = Some(field);
    }
}

impl AppController {
    /// Load persisted options and build the controller.
    pub fn new() -> Result<Self, config::ConfigError> {
        let options = config::load_or_default()?;
        Ok(Self::with_options(options))
    }

    /// Build the controller with explicit options, skipping persistence.
    pub fn with_options(options: ValidationOptions) -> Self {
        let mut ui = UiState::default();
        ui.options.pending = options;
        Self {
            ui,
            orchestrator: IntakeOrchestrator::new(options),
            store: MemoryStore::new(),
        }
    }

    /// The options the pipeline currently runs under.
    pub fn options(&self) -> ValidationOptions {
        self.orchestrator.options()
    }

    /// Whether a submit is waiting on the avatar encode.
    pub fn encode_in_flight(&self) -> bool {
        self.orchestrator.encode_in_flight()
    }

    /// Path of the accepted avatar file, if any.
    pub fn avatar_path(&self) -> Option<&Path> {
        self.orchestrator.avatar().file().map(|file| file.path.as_path())
    }

    /// Validate one field after it lost focus.
    pub fn field_blurred(&mut self, field: TextField) {
        let mut page = IntakePage { ui: &mut self.ui };
        self.orchestrator.handle_blur(field, &mut page);
    }

    /// Run a submit attempt from the form button.
    pub fn submit_clicked(&mut self) {
        let mut page = IntakePage { ui: &mut self.ui };
        if self.orchestrator.handle_submit(&mut page) == SubmitAttempt::EncodeStarted {
            tracing::debug!("Form valid; avatar encode started");
        }
    }

    /// Open the image picker and offer the chosen file.
    pub fn avatar_pick_clicked(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file();
        if let Some(path) = picked {
            self.avatar_picked(path);
        }
    }

    /// Offer a file to the avatar selection.
    pub fn avatar_picked(&mut self, path: PathBuf) {
        let mut page = IntakePage { ui: &mut self.ui };
        match AvatarFile::from_path(path) {
            Ok(file) => {
                self.orchestrator.handle_avatar_pick(file, &mut page);
            }
            Err(err) => {
                tracing::warn!("Could not stat picked avatar: {err}");
                page.push_toast(ToastNotice {
                    message: READ_FAILED_NOTICE.to_string(),
                    is_error: true,
                    lifetime_ms: crate::feedback::TOAST_LIFETIME_MS,
                });
            }
        }
    }

    /// Drop the avatar selection, reverting the preview to the placeholder.
    pub fn avatar_cleared(&mut self) {
        let mut page = IntakePage { ui: &mut self.ui };
        self.orchestrator.handle_avatar_clear(&mut page);
    }

    /// Per-frame upkeep: finish a resolved encode and expire old notices.
    pub fn tick(&mut self, now: f64) {
        let outcome = {
            let mut page = IntakePage { ui: &mut self.ui };
            self.orchestrator.poll(&mut self.store, &mut page)
        };
        if outcome == Some(SubmitOutcome::NavigateToTicket) {
            self.show_ticket_page();
        }

        for toast in &mut self.ui.toasts {
            if toast.expires_at.is_none() {
                toast.expires_at = Some(now + toast.lifetime_ms as f64 / 1000.0);
            }
        }
        self.ui.toasts
            .retain(|toast| toast.expires_at.is_none_or(|at| at > now));
    }

    /// Hydrate the ticket view from the store and switch to it.
    pub fn show_ticket_page(&mut self) {
        self.ui.ticket.reset();
        render::hydrate(&self.store, &mut self.ui.ticket);
        self.ui.page = Page::Ticket;
    }

    /// Re-hydrate the ticket view in place, drawing a fresh identifier.
    pub fn reload_ticket_page(&mut self) {
        self.show_ticket_page();
    }

    /// Return to the intake form. The stored record is left untouched.
    pub fn back_to_form(&mut self) {
        self.ui.page = Page::Intake;
    }

    /// Open the options window seeded with the active options.
    pub fn open_options(&mut self) {
        self.ui.options.open = true;
        self.ui.options.pending = self.options();
        self.ui.options.last_error = None;
    }

    /// Apply and persist edited options, rebuilding the pipeline with them.
    pub fn apply_options(&mut self, options: ValidationOptions) {
        self.set_options(options);
        if let Err(err) = config::save(options) {
            tracing::warn!("Failed to persist options: {err}");
            self.ui.options.last_error = Some(err.to_string());
            return;
        }
        self.ui.options.open = false;
    }

    /// Swap the pipeline onto new options without touching the config file.
    pub fn set_options(&mut self, options: ValidationOptions) {
        let orchestrator = std::mem::replace(
            &mut self.orchestrator,
            IntakeOrchestrator::new(options),
        );
        self.orchestrator = orchestrator.with_options(options);
        // Messages produced under the old presentation mode are stale.
        for anchor in ErrorAnchor::ALL {
            *self.ui.form.error_slot_mut(anchor) = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GithubMode, NameMode, PresentationMode};
    use std::time::Duration;

    fn controller() -> AppController {
        AppController::with_options(ValidationOptions::default())
    }

    fn tick_until_ticket_page(controller: &mut AppController) {
        let mut now = 0.0;
        for _ in 0..200 {
            controller.tick(now);
            if controller.ui.page == Page::Ticket {
                return;
            }
            now += 0.05;
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("ticket page never appeared");
    }

    #[test]
    fn blur_normalizes_the_github_buffer() {
        let mut controller = controller();
        controller.ui.form.github = "@@ada".to_string();
        controller.field_blurred(TextField::Github);
        assert_eq!(controller.ui.form.github, "@ada");
        assert!(controller.ui.form.github_error.is_none());
    }

    #[test]
    fn submit_with_empty_form_anchors_the_name_error() {
        let mut controller = controller();
        controller.submit_clicked();
        let error = controller.ui.form.name_error.as_ref().expect("name error");
        assert_eq!(error.text, "Please enter your name.");
        assert_eq!(error.placement, InlinePlacement::Below);
        assert_eq!(controller.ui.form.focus_request, Some(TextField::Name));
        assert!(controller.ui.form.email_error.is_none());
    }

    #[test]
    fn above_mode_changes_the_message_placement() {
        let mut controller = AppController::with_options(ValidationOptions {
            presentation: PresentationMode::Above,
            name_mode: NameMode::Full,
            github_mode: GithubMode::Auto,
        });
        controller.submit_clicked();
        let error = controller.ui.form.name_error.as_ref().expect("name error");
        assert_eq!(error.placement, InlinePlacement::Above);
    }

    #[test]
    fn full_submit_lands_on_a_hydrated_ticket_page() {
        let dir = tempfile::tempdir().unwrap();
        let avatar = dir.path().join("me.png");
        std::fs::write(&avatar, [7u8; 128]).unwrap();

        let mut controller = controller();
        controller.ui.form.name = "Ada Lovelace".into();
        controller.ui.form.email = "ada@gmail.com".into();
        controller.ui.form.github = "ada".into();
        controller.avatar_picked(avatar);
        assert!(controller.avatar_path().is_some());

        controller.submit_clicked();
        assert!(controller.encode_in_flight());
        tick_until_ticket_page(&mut controller);

        let ticket = &controller.ui.ticket;
        assert_eq!(
            ticket.greeting.as_deref(),
            Some("Congrats, Ada Lovelace! Your ticket is ready.")
        );
        assert_eq!(ticket.github.as_deref(), Some("@ada"));
        assert!(ticket.missing_notice.is_none());
        assert!(ticket.ticket_id.is_some());
    }

    #[test]
    fn ticket_page_without_a_record_shows_the_fallback() {
        let mut controller = controller();
        controller.show_ticket_page();
        assert_eq!(controller.ui.page, Page::Ticket);
        assert_eq!(
            controller.ui.ticket.missing_notice.as_deref(),
            Some(render::MISSING_TICKET_NOTICE)
        );
    }

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let mut controller = controller();
        controller.ui.toasts.push(ToastState {
            message: "notice".into(),
            is_error: false,
            lifetime_ms: 3000,
            expires_at: None,
        });
        controller.tick(10.0);
        assert_eq!(controller.ui.toasts.len(), 1);
        controller.tick(12.9);
        assert_eq!(controller.ui.toasts.len(), 1);
        controller.tick(13.1);
        assert!(controller.ui.toasts.is_empty());
    }

    #[test]
    fn set_options_keeps_the_avatar_but_clears_messages() {
        let dir = tempfile::tempdir().unwrap();
        let avatar = dir.path().join("me.png");
        std::fs::write(&avatar, [7u8; 16]).unwrap();

        let mut controller = controller();
        controller.avatar_picked(avatar);
        controller.submit_clicked();
        assert!(controller.ui.form.name_error.is_some());

        controller.set_options(ValidationOptions {
            presentation: PresentationMode::Toast,
            name_mode: NameMode::First,
            github_mode: GithubMode::Auto,
        });
        assert!(controller.ui.form.name_error.is_none());
        assert!(controller.avatar_path().is_some());
        assert_eq!(controller.options().name_mode, NameMode::First);
    }
}

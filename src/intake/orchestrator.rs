//! Blur/submit sequencing and handoff.
//!
//! The orchestrator owns the per-field validation states and the avatar
//! selection, runs the validators against an abstracted form surface, and on
//! a fully valid submit drives the encode → store → navigate tail. At most
//! one field error is visible per submit attempt; validation short-circuits
//! at the first failure.

use crate::config::ValidationOptions;
use crate::feedback::{ErrorAnchor, FeedbackSurface, Presenter};
use crate::store::SessionStore;
use crate::ticket::{TICKET_DATA_KEY, TicketRecord};

use super::avatar::{AvatarFile, AvatarSelection};
use super::encode::{self, EncodeError, EncodeJob};
use super::validators::{self, FieldError};

/// Notice shown when the avatar file could not be read.
pub const READ_FAILED_NOTICE: &str = "Could not read the image file.";
/// Notice shown when serializing or storing the record failed.
pub const GENERATE_FAILED_NOTICE: &str =
    "Something went wrong while generating your ticket. Try again.";

/// The three text inputs of the intake form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextField {
    /// Attendee name.
    Name,
    /// Attendee email.
    Email,
    /// GitHub handle.
    Github,
}

impl TextField {
    /// Submit-order listing of the text fields.
    pub const ALL: [TextField; 3] = [TextField::Name, TextField::Email, TextField::Github];

    fn anchor(self) -> ErrorAnchor {
        match self {
            TextField::Name => ErrorAnchor::Name,
            TextField::Email => ErrorAnchor::Email,
            TextField::Github => ErrorAnchor::Github,
        }
    }
}

/// Form capability the orchestrator drives.
///
/// The shell owns the widgets; the orchestrator reads and writes values,
/// requests focus, and surfaces feedback through the supertrait.
pub trait FormSurface: FeedbackSurface {
    /// Current raw value of `field`.
    fn value(&self, field: TextField) -> String;
    /// Replace the displayed value of `field`.
    fn set_value(&mut self, field: TextField, value: &str);
    /// Move keyboard focus to `field`.
    fn focus(&mut self, field: TextField);
}

/// Validation state of one input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldStatus {
    /// Never validated, or reset at the start of a submit attempt.
    #[default]
    Untouched,
    /// Last validation failed with this error.
    Invalid(FieldError),
    /// Last validation passed.
    Valid,
}

/// Per-field validation states, transient and never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldStates {
    /// Name input state.
    pub name: FieldStatus,
    /// Email input state.
    pub email: FieldStatus,
    /// GitHub input state.
    pub github: FieldStatus,
    /// Avatar selection state.
    pub avatar: FieldStatus,
}

impl FieldStates {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_text(&mut self, field: TextField, status: FieldStatus) {
        match field {
            TextField::Name => self.name = status,
            TextField::Email => self.email = status,
            TextField::Github => self.github = status,
        }
    }
}

/// What a submit attempt led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Validation failed; the first error is displayed and focused.
    Halted,
    /// All fields passed; the avatar encode job is running.
    EncodeStarted,
}

/// Terminal result of a successful submission, reported by [`IntakeOrchestrator::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record is stored; the shell should switch to the ticket view.
    NavigateToTicket,
}

#[derive(Debug, thiserror::Error)]
enum HandoffError {
    #[error("Failed to serialize ticket record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),
}

#[derive(Clone, Debug, Default)]
struct TicketDraft {
    name: String,
    email: String,
    github: String,
}

/// Sequences the field validators and drives feedback, handoff, and navigation.
pub struct IntakeOrchestrator {
    options: ValidationOptions,
    presenter: Presenter,
    states: FieldStates,
    avatar: AvatarSelection,
    pending: Option<(EncodeJob, TicketDraft)>,
}

impl IntakeOrchestrator {
    /// Create an orchestrator with an immutable set of validation options.
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            presenter: Presenter::new(options.presentation),
            states: FieldStates::default(),
            avatar: AvatarSelection::default(),
            pending: None,
        }
    }

    /// Rebuild with new options, preserving the avatar selection.
    ///
    /// Any encode still in flight is cancelled and all field states reset;
    /// the next blur or submit re-validates under the new rules.
    pub fn with_options(self, options: ValidationOptions) -> Self {
        if let Some((job, _)) = self.pending {
            job.cancel();
        }
        Self {
            options,
            presenter: Presenter::new(options.presentation),
            states: FieldStates::default(),
            avatar: self.avatar,
            pending: None,
        }
    }

    /// The options this orchestrator was built with.
    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Current per-field validation states.
    pub fn states(&self) -> &FieldStates {
        &self.states
    }

    /// Current avatar selection.
    pub fn avatar(&self) -> &AvatarSelection {
        &self.avatar
    }

    /// Whether an encode job is still running.
    pub fn encode_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate a single field on loss of focus.
    ///
    /// A passing GitHub handle is written back so the user sees the
    /// canonical `@`-prefixed form immediately.
    pub fn handle_blur(&mut self, field: TextField, surface: &mut dyn FormSurface) {
        let verdict = self.run_text_validator(field, &surface.value(field));
        match verdict {
            Ok(normalized) => {
                if field == TextField::Github {
                    surface.set_value(field, &normalized);
                }
                self.states.set_text(field, FieldStatus::Valid);
                self.presenter.clear(surface, field.anchor());
            }
            Err(err) => {
                self.presenter.show(surface, field.anchor(), &err.to_string());
                self.states.set_text(field, FieldStatus::Invalid(err));
            }
        }
    }

    /// Offer a newly picked avatar file.
    ///
    /// Any previous avatar error is cleared first; a rejected file drops the
    /// active selection so the shell reverts its preview to the placeholder.
    /// Returns whether the file was accepted.
    pub fn handle_avatar_pick(&mut self, file: AvatarFile, surface: &mut dyn FormSurface) -> bool {
        self.presenter.clear(surface, ErrorAnchor::Avatar);
        match self.avatar.offer(file) {
            Ok(()) => {
                self.states.avatar = FieldStatus::Valid;
                true
            }
            Err(err) => {
                self.presenter
                    .show(surface, ErrorAnchor::Avatar, &err.to_string());
                self.states.avatar = FieldStatus::Invalid(err);
                false
            }
        }
    }

    /// Drop the avatar selection and its error, reverting to the placeholder.
    pub fn handle_avatar_clear(&mut self, surface: &mut dyn FormSurface) {
        self.presenter.clear(surface, ErrorAnchor::Avatar);
        self.avatar.clear();
        self.states.avatar = FieldStatus::Untouched;
    }

    /// Run a full submit attempt.
    ///
    /// All displayed errors are cleared first, then fields re-validate in
    /// order name → email → github → avatar, stopping at the first failure.
    /// On success the avatar encode job starts; the outcome arrives through
    /// [`IntakeOrchestrator::poll`].
    pub fn handle_submit(&mut self, surface: &mut dyn FormSurface) -> SubmitAttempt {
        // A fresh submit supersedes any encode still in flight.
        if let Some((job, _)) = self.pending.take() {
            job.cancel();
        }

        for anchor in ErrorAnchor::ALL {
            self.presenter.clear(surface, anchor);
        }
        self.states.reset();

        let mut draft = TicketDraft::default();
        for field in TextField::ALL {
            match self.run_text_validator(field, &surface.value(field)) {
                Ok(value) => {
                    self.states.set_text(field, FieldStatus::Valid);
                    match field {
                        TextField::Name => draft.name = value,
                        TextField::Email => draft.email = value,
                        TextField::Github => draft.github = value,
                    }
                }
                Err(err) => {
                    self.presenter.show(surface, field.anchor(), &err.to_string());
                    self.states.set_text(field, FieldStatus::Invalid(err));
                    surface.focus(field);
                    return SubmitAttempt::Halted;
                }
            }
        }

        let file = match self.avatar.require() {
            Ok(file) => file.clone(),
            Err(err) => {
                self.presenter
                    .show(surface, ErrorAnchor::Avatar, &err.to_string());
                self.states.avatar = FieldStatus::Invalid(err);
                return SubmitAttempt::Halted;
            }
        };
        self.states.avatar = FieldStatus::Valid;

        tracing::debug!(path = %file.path.display(), "Encoding avatar for ticket handoff");
        self.pending = Some((encode::begin(&file), draft));
        SubmitAttempt::EncodeStarted
    }

    /// Poll the in-flight encode job and finish the handoff when it resolves.
    ///
    /// On success the serialized record is written to the store and the
    /// caller is told to navigate. Read or store failures surface a transient
    /// notice and leave the user on the form with all input intact.
    pub fn poll(
        &mut self,
        store: &mut dyn SessionStore,
        surface: &mut dyn FormSurface,
    ) -> Option<SubmitOutcome> {
        let result = self
            .pending
            .as_ref()
            .and_then(|(job, _)| job.try_result())?;
        let (_, draft) = self.pending.take()?;

        match result {
            Ok(avatar_data_url) => {
                let record = TicketRecord {
                    name: draft.name,
                    email: draft.email,
                    github: draft.github,
                    avatar_data_url,
                };
                match store_record(&record, store) {
                    Ok(()) => {
                        tracing::info!("Ticket record stored; switching to the ticket view");
                        Some(SubmitOutcome::NavigateToTicket)
                    }
                    Err(err) => {
                        tracing::warn!("Ticket handoff failed: {err}");
                        self.presenter.notify(surface, GENERATE_FAILED_NOTICE, true);
                        None
                    }
                }
            }
            Err(EncodeError::Cancelled) => None,
            Err(err) => {
                tracing::warn!("Avatar read failed: {err}");
                self.presenter.notify(surface, READ_FAILED_NOTICE, true);
                None
            }
        }
    }

    fn run_text_validator(&self, field: TextField, raw: &str) -> Result<String, FieldError> {
        match field {
            TextField::Name => validators::validate_name(raw, self.options.name_mode),
            TextField::Email => validators::validate_email(raw),
            TextField::Github => validators::process_github_username(raw, self.options.github_mode),
        }
    }
}

fn store_record(record: &TicketRecord, store: &mut dyn SessionStore) -> Result<(), HandoffError> {
    let json = record.to_json()?;
    store.set(TICKET_DATA_KEY, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GithubMode, NameMode, PresentationMode};
    use crate::feedback::{InlinePlacement, ToastNotice};
    use crate::store::{MemoryStore, StoreError};
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeForm {
        values: HashMap<&'static str, String>,
        inline: HashMap<&'static str, String>,
        focused: Vec<TextField>,
        toasts: Vec<ToastNotice>,
        modals: Vec<String>,
    }

    fn key(anchor: ErrorAnchor) -> &'static str {
        match anchor {
            ErrorAnchor::Name => "name",
            ErrorAnchor::Email => "email",
            ErrorAnchor::Github => "github",
            ErrorAnchor::Avatar => "avatar",
        }
    }

    fn field_key(field: TextField) -> &'static str {
        match field {
            TextField::Name => "name",
            TextField::Email => "email",
            TextField::Github => "github",
        }
    }

    impl FakeForm {
        fn with_values(name: &str, email: &str, github: &str) -> Self {
            let mut form = Self::default();
            form.values.insert("name", name.to_string());
            form.values.insert("email", email.to_string());
            form.values.insert("github", github.to_string());
            form
        }
    }

    impl FeedbackSurface for FakeForm {
        fn place_inline(&mut self, anchor: ErrorAnchor, _placement: InlinePlacement, message: &str) {
            self.inline.insert(key(anchor), message.to_string());
        }

        fn clear_inline(&mut self, anchor: ErrorAnchor) {
            self.inline.remove(key(anchor));
        }

        fn open_modal(&mut self, message: &str) {
            self.modals.push(message.to_string());
        }

        fn push_toast(&mut self, notice: ToastNotice) {
            self.toasts.push(notice);
        }

        fn has_toast_area(&self) -> bool {
            true
        }
    }

    impl FormSurface for FakeForm {
        fn value(&self, field: TextField) -> String {
            self.values.get(field_key(field)).cloned().unwrap_or_default()
        }

        fn set_value(&mut self, field: TextField, value: &str) {
            self.values.insert(field_key(field), value.to_string());
        }

        fn focus(&mut self, field: TextField) {
            self.focused.push(field);
        }
    }

    struct RejectingStore;

    impl SessionStore for RejectingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Rejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            })
        }
    }

    fn orchestrator() -> IntakeOrchestrator {
        IntakeOrchestrator::new(ValidationOptions::default())
    }

    fn temp_avatar(dir: &tempfile::TempDir, bytes: &[u8]) -> AvatarFile {
        let path = dir.path().join("avatar.png");
        std::fs::write(&path, bytes).unwrap();
        AvatarFile::from_path(path).unwrap()
    }

    fn poll_until_outcome(
        orchestrator: &mut IntakeOrchestrator,
        store: &mut dyn SessionStore,
        form: &mut FakeForm,
    ) -> Option<SubmitOutcome> {
        for _ in 0..200 {
            if let Some(outcome) = orchestrator.poll(store, form) {
                return Some(outcome);
            }
            if !orchestrator.encode_in_flight() {
                return None;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("encode did not resolve in time");
    }

    #[test]
    fn blur_writes_back_the_normalized_github_handle() {
        let mut form = FakeForm::with_values("", "", "  @@ada  ");
        let mut orchestrator = orchestrator();
        orchestrator.handle_blur(TextField::Github, &mut form);
        assert_eq!(form.values["github"], "@ada");
        assert_eq!(orchestrator.states().github, FieldStatus::Valid);
        assert!(form.inline.is_empty());
    }

    #[test]
    fn blur_shows_the_field_error_and_records_the_state() {
        let mut form = FakeForm::with_values("Ada", "", "");
        let mut orchestrator = orchestrator();
        orchestrator.handle_blur(TextField::Name, &mut form);
        assert_eq!(
            form.inline.get("name").map(String::as_str),
            Some("Please enter your first and last name.")
        );
        assert_eq!(
            orchestrator.states().name,
            FieldStatus::Invalid(FieldError::MissingSurname)
        );
    }

    #[test]
    fn blur_clears_a_stale_error_after_an_edit() {
        let mut form = FakeForm::with_values("Ada", "", "");
        let mut orchestrator = orchestrator();
        orchestrator.handle_blur(TextField::Name, &mut form);
        assert!(form.inline.contains_key("name"));

        form.values.insert("name", "Ada Lovelace".to_string());
        orchestrator.handle_blur(TextField::Name, &mut form);
        assert!(!form.inline.contains_key("name"));
        assert_eq!(orchestrator.states().name, FieldStatus::Valid);
    }

    #[test]
    fn submit_short_circuits_on_the_first_invalid_field() {
        // Every field is invalid; only the name error may surface.
        let mut form = FakeForm::with_values("", "nope", "");
        let mut orchestrator = orchestrator();
        let attempt = orchestrator.handle_submit(&mut form);

        assert_eq!(attempt, SubmitAttempt::Halted);
        assert_eq!(form.inline.len(), 1);
        assert_eq!(
            form.inline.get("name").map(String::as_str),
            Some("Please enter your name.")
        );
        assert_eq!(form.focused, vec![TextField::Name]);
        assert!(!orchestrator.encode_in_flight());
    }

    #[test]
    fn submit_requires_an_avatar_after_the_text_fields_pass() {
        let mut form = FakeForm::with_values("Ada Lovelace", "ada@gmail.com", "@ada");
        let mut orchestrator = orchestrator();
        let attempt = orchestrator.handle_submit(&mut form);

        assert_eq!(attempt, SubmitAttempt::Halted);
        assert_eq!(
            form.inline.get("avatar").map(String::as_str),
            Some("Please select an avatar image.")
        );
        // Avatar errors do not steal focus.
        assert!(form.focused.is_empty());
    }

    #[test]
    fn submit_clears_previous_errors_before_revalidating() {
        let mut form = FakeForm::with_values("", "", "");
        let mut orchestrator = orchestrator();
        orchestrator.handle_submit(&mut form);
        assert!(form.inline.contains_key("name"));

        form.values.insert("name", "Ada Lovelace".to_string());
        orchestrator.handle_submit(&mut form);
        assert!(!form.inline.contains_key("name"));
        assert!(form.inline.contains_key("email"));
    }

    #[test]
    fn successful_submit_stores_the_record_and_navigates() {
        let dir = tempfile::tempdir().unwrap();
        let mut form = FakeForm::with_values("Ada Lovelace", "ada@gmail.com", "@ada");
        let mut store = MemoryStore::new();
        let mut orchestrator = orchestrator();
        let accepted = orchestrator.handle_avatar_pick(temp_avatar(&dir, &[9; 32]), &mut form);
        assert!(accepted);

        assert_eq!(
            orchestrator.handle_submit(&mut form),
            SubmitAttempt::EncodeStarted
        );
        let outcome = poll_until_outcome(&mut orchestrator, &mut store, &mut form);
        assert_eq!(outcome, Some(SubmitOutcome::NavigateToTicket));

        let raw = store.get(TICKET_DATA_KEY).expect("record stored");
        let record = TicketRecord::parse(&raw).expect("record parses");
        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.github, "@ada");
        assert!(record.avatar_data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn store_rejection_keeps_the_user_on_the_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut form = FakeForm::with_values("Ada Lovelace", "ada@gmail.com", "ada");
        let mut store = RejectingStore;
        let mut orchestrator = orchestrator();
        orchestrator.handle_avatar_pick(temp_avatar(&dir, &[9; 32]), &mut form);

        orchestrator.handle_submit(&mut form);
        let outcome = poll_until_outcome(&mut orchestrator, &mut store, &mut form);

        assert_eq!(outcome, None);
        assert_eq!(form.toasts.len(), 1);
        assert_eq!(form.toasts[0].message, GENERATE_FAILED_NOTICE);
        assert!(form.toasts[0].is_error);
        assert!(form.modals.is_empty());
        // Form contents are untouched.
        assert_eq!(form.values["name"], "Ada Lovelace");
    }

    #[test]
    fn unreadable_avatar_reports_a_read_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut form = FakeForm::with_values("Ada Lovelace", "ada@gmail.com", "ada");
        let mut store = MemoryStore::new();
        let mut orchestrator = orchestrator();
        let file = temp_avatar(&dir, &[9; 32]);
        orchestrator.handle_avatar_pick(file.clone(), &mut form);
        std::fs::remove_file(&file.path).unwrap();

        orchestrator.handle_submit(&mut form);
        let outcome = poll_until_outcome(&mut orchestrator, &mut store, &mut form);

        assert_eq!(outcome, None);
        assert_eq!(form.toasts.len(), 1);
        assert_eq!(form.toasts[0].message, READ_FAILED_NOTICE);
        assert!(store.get(TICKET_DATA_KEY).is_none());
    }

    #[test]
    fn oversized_avatar_pick_is_rejected_and_clears_the_selection() {
        let mut form = FakeForm::with_values("", "", "");
        let mut orchestrator = orchestrator();
        let file = AvatarFile {
            path: "huge.png".into(),
            mime: "image/png".into(),
            size: 600_000,
        };
        assert!(!orchestrator.handle_avatar_pick(file, &mut form));
        assert!(orchestrator.avatar().is_empty());
        assert_eq!(
            form.inline.get("avatar").map(String::as_str),
            Some("File too large. Please upload a photo under 500KB.")
        );
        assert_eq!(
            orchestrator.states().avatar,
            FieldStatus::Invalid(FieldError::TooLarge)
        );
    }

    #[test]
    fn strict_github_mode_flows_through_submit() {
        let options = ValidationOptions {
            presentation: PresentationMode::Below,
            name_mode: NameMode::Full,
            github_mode: GithubMode::RequireAt,
        };
        let mut form = FakeForm::with_values("Ada Lovelace", "ada@gmail.com", "ada");
        let mut orchestrator = IntakeOrchestrator::new(options);
        assert_eq!(orchestrator.handle_submit(&mut form), SubmitAttempt::Halted);
        assert_eq!(
            form.inline.get("github").map(String::as_str),
            Some("Please include \"@\" in your GitHub username.")
        );
        assert_eq!(form.focused, vec![TextField::Github]);
    }
}

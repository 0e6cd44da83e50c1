//! Intake form validation, normalization, and handoff.
//!
//! The intake pipeline validates each field on blur and on submit, keeps the
//! per-field validation states, and on full success encodes the avatar and
//! hands the assembled ticket record to the session store.

/// Avatar selection rules and state.
pub mod avatar;
/// Background avatar-to-data-URI encoding.
pub mod encode;
/// Blur/submit sequencing and handoff.
pub mod orchestrator;
/// Pure field validators.
pub mod validators;

pub use avatar::{AvatarFile, AvatarSelection, MAX_AVATAR_BYTES};
pub use orchestrator::{
    FieldStatus, FormSurface, IntakeOrchestrator, SubmitAttempt, SubmitOutcome, TextField,
};
pub use validators::FieldError;

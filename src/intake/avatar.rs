//! Avatar selection rules and state.
//!
//! A selection is either empty or one accepted image file. Candidate files
//! must carry an `image/` MIME type and stay within the size limit; a
//! rejected candidate also drops any previously accepted file so the shell
//! reverts its preview to the placeholder.

use std::path::{Path, PathBuf};

use super::validators::FieldError;

/// Maximum accepted avatar size in bytes (500 KiB).
pub const MAX_AVATAR_BYTES: u64 = 500 * 1024;

/// A candidate or accepted avatar file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarFile {
    /// Location of the file on disk.
    pub path: PathBuf,
    /// Detected MIME type, empty when unknown.
    pub mime: String,
    /// File size in bytes.
    pub size: u64,
}

impl AvatarFile {
    /// Build a candidate from a path, detecting MIME type and size.
    pub fn from_path(path: PathBuf) -> std::io::Result<Self> {
        let size = std::fs::metadata(&path)?.len();
        let mime = detect_mime(&path).unwrap_or_default();
        Ok(Self { path, mime, size })
    }
}

/// Detect the MIME type of an image file from its extension.
pub fn detect_mime(path: &Path) -> Option<String> {
    image::ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

/// Check a candidate file against the avatar constraints.
pub fn check_file(file: &AvatarFile) -> Result<(), FieldError> {
    if !file.mime.starts_with("image/") {
        return Err(FieldError::WrongType);
    }
    if file.size > MAX_AVATAR_BYTES {
        return Err(FieldError::TooLarge);
    }
    Ok(())
}

/// The intake form's current avatar selection.
#[derive(Clone, Debug, Default)]
pub struct AvatarSelection {
    active: Option<AvatarFile>,
}

impl AvatarSelection {
    /// Whether no file is currently selected.
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    /// The accepted file, if any.
    pub fn file(&self) -> Option<&AvatarFile> {
        self.active.as_ref()
    }

    /// Offer a candidate file; rejection clears any prior selection.
    pub fn offer(&mut self, file: AvatarFile) -> Result<(), FieldError> {
        if let Err(err) = check_file(&file) {
            self.active = None;
            return Err(err);
        }
        self.active = Some(file);
        Ok(())
    }

    /// Drop the current selection.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// The accepted file, or the missing-file error at submit time.
    pub fn require(&self) -> Result<&AvatarFile, FieldError> {
        self.active.as_ref().ok_or(FieldError::MissingFile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(size: u64) -> AvatarFile {
        AvatarFile {
            path: PathBuf::from("avatar.png"),
            mime: "image/png".into(),
            size,
        }
    }

    #[test]
    fn size_limit_is_exact() {
        assert_eq!(check_file(&png(400_000)), Ok(()));
        assert_eq!(check_file(&png(512_000)), Ok(()));
        assert_eq!(check_file(&png(512_001)), Err(FieldError::TooLarge));
        assert_eq!(check_file(&png(600_000)), Err(FieldError::TooLarge));
    }

    #[test]
    fn non_image_mime_is_rejected() {
        let file = AvatarFile {
            path: PathBuf::from("notes.txt"),
            mime: String::new(),
            size: 10,
        };
        assert_eq!(check_file(&file), Err(FieldError::WrongType));
    }

    #[test]
    fn rejected_candidate_clears_prior_selection() {
        let mut selection = AvatarSelection::default();
        selection.offer(png(1_000)).unwrap();
        assert!(!selection.is_empty());

        assert_eq!(selection.offer(png(600_000)), Err(FieldError::TooLarge));
        assert!(selection.is_empty());
        assert_eq!(selection.require(), Err(FieldError::MissingFile));
    }

    #[test]
    fn mime_detection_follows_the_extension() {
        assert_eq!(
            detect_mime(Path::new("me.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(
            detect_mime(Path::new("me.jpeg")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(detect_mime(Path::new("me.txt")), None);
    }
}

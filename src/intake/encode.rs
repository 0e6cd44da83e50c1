//! Background avatar-to-data-URI encoding.
//!
//! Reading and encoding the avatar is the single asynchronous step in the
//! intake pipeline. The work runs on a worker thread and reports through a
//! channel polled from the UI tick; a cancel flag lets a superseding submit
//! discard an in-flight read.

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender, TryRecvError},
    },
    thread,
};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::avatar::AvatarFile;

/// Errors the encode step can report.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Reading the avatar file failed.
    #[error("Failed to read avatar file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The job was cancelled before completing.
    #[error("Avatar encode was cancelled")]
    Cancelled,
}

/// Handle to an in-flight encode job.
#[derive(Debug)]
pub struct EncodeJob {
    receiver: Receiver<Result<String, EncodeError>>,
    cancel: Arc<AtomicBool>,
}

/// Start encoding `file` into a data URI on a worker thread.
pub fn begin(file: &AvatarFile) -> EncodeJob {
    let cancel = Arc::new(AtomicBool::new(false));
    let (sender, receiver) = std::sync::mpsc::channel();
    spawn_worker(file.path.clone(), file.mime.clone(), Arc::clone(&cancel), sender);
    EncodeJob { receiver, cancel }
}

impl EncodeJob {
    /// Take the result if the worker has finished.
    pub fn try_result(&self) -> Option<Result<String, EncodeError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Ask the worker to discard its result.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Assemble a `data:` URI from a MIME type and raw bytes.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn spawn_worker(
    path: PathBuf,
    mime: String,
    cancel: Arc<AtomicBool>,
    sender: Sender<Result<String, EncodeError>>,
) {
    thread::spawn(move || {
        let result = if cancel.load(Ordering::Relaxed) {
            Err(EncodeError::Cancelled)
        } else {
            read_data_url(&path, &mime).and_then(|url| {
                if cancel.load(Ordering::Relaxed) {
                    Err(EncodeError::Cancelled)
                } else {
                    Ok(url)
                }
            })
        };
        let _ = sender.send(result);
    });
}

fn read_data_url(path: &Path, mime: &str) -> Result<String, EncodeError> {
    let bytes = std::fs::read(path).map_err(|source| EncodeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(data_url(mime, &bytes))
}

//! Attachment uploads.
//!
//! Files picked in the upload dialog are pushed one at a time through the
//! injected [`Uploader`]; each upload is awaited before the next starts so
//! the pending list keeps the order the files were picked in. Batches run on
//! a background thread and report entries over a channel that the editor
//! drains on every tick.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use mime_sniffer::MimeTypeSniffer;

/// A file handed to the uploader.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    /// MIME type, `None` when it could not be determined.
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadFile {
    /// Reads `path` and sniffs its MIME type from the content.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let mime_type = sniff_mime_type(&data);
        Ok(Self {
            name,
            mime_type,
            data,
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.contains("image"))
    }
}

fn sniff_mime_type(data: &[u8]) -> Option<String> {
    if let Some(mime) = data.sniff_mime_type() {
        return Some(mime.to_string());
    }
    // The sniffer only knows binary signatures; treat readable text as text.
    if !data.is_empty() && std::str::from_utf8(data).is_ok() {
        return Some("text/plain".to_string());
    }
    None
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Async upload callback: resolves to the URL the file can be linked by.
pub type Uploader =
    Arc<dyn Fn(UploadFile) -> BoxFuture<'static, Result<String, UploadError>> + Send + Sync>;

/// A successfully uploaded file waiting to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEntry {
    pub url: String,
    pub name: String,
    pub is_image: bool,
}

impl UploadEntry {
    pub fn markdown(&self) -> String {
        let bang = if self.is_image { "!" } else { "" };
        format!("{bang}[{}]({})", self.name, self.url)
    }
}

/// Uploads `files` in order, awaiting each one before starting the next.
///
/// Files without a MIME type, rejected uploads and empty URLs are skipped.
/// Returns the number of entries reported through `on_entry`.
pub async fn upload_sequential<F>(
    files: Vec<UploadFile>,
    uploader: &Uploader,
    mut on_entry: F,
) -> usize
where
    F: FnMut(UploadEntry),
{
    let mut uploaded = 0;
    for file in files {
        if file.mime_type.as_deref().map_or(true, str::is_empty) {
            tracing::debug!(name = %file.name, "skipping file without mime type");
            continue;
        }
        let name = file.name.clone();
        let is_image = file.is_image();
        match uploader(file).await {
            Ok(url) if !url.is_empty() => {
                on_entry(UploadEntry {
                    url,
                    name,
                    is_image,
                });
                uploaded += 1;
            }
            Ok(_) => tracing::debug!(%name, "uploader returned no url"),
            Err(err) => tracing::warn!(%name, %err, "upload failed"),
        }
    }
    uploaded
}

/// A batch of uploads running on a background thread.
pub struct UploadJob {
    /// Modal generation the batch belongs to.
    pub generation: u64,
    rx: Receiver<UploadEntry>,
    handle: Option<JoinHandle<usize>>,
}

impl UploadJob {
    pub fn spawn(paths: Vec<PathBuf>, uploader: Uploader, generation: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            let files = paths
                .iter()
                .filter_map(|path| match UploadFile::from_path(path) {
                    Ok(file) => Some(file),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "cannot read file");
                        None
                    }
                })
                .collect();
            pollster::block_on(upload_sequential(files, &uploader, |entry| {
                // receiver gone means the editor dropped the job
                let _ = tx.send(entry);
            }))
        });
        Self {
            generation,
            rx,
            handle: Some(handle),
        }
    }

    /// Returns the entries completed since the last call.
    pub fn drain(&mut self) -> Vec<UploadEntry> {
        let mut entries = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(entry) => entries.push(entry),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if let Some(handle) = self.handle.take() {
                        if let Ok(count) = handle.join() {
                            tracing::info!(count, "upload batch finished");
                        }
                    }
                    break;
                }
            }
        }
        entries
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_none()
    }
}

/// Uploader that copies files into `dir` and links them by path.
pub fn local_dir_uploader(dir: PathBuf) -> Uploader {
    Arc::new(move |file: UploadFile| {
        let dir = dir.clone();
        async move {
            std::fs::create_dir_all(&dir)?;
            let target = dir.join(&file.name);
            std::fs::write(&target, &file.data)?;
            Ok::<_, UploadError>(target.to_string_lossy().into_owned())
        }
        .boxed()
    })
}

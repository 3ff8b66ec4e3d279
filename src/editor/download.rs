//! Download: writes the raw document to the download directory.

use super::*;

impl<'a> Editor<'a> {
    /// Writes the document verbatim to `新文章.md` in the download directory,
    /// replacing any previous download. The editor state is untouched.
    pub fn download(&mut self) -> Result<PathBuf> {
        let path = self.download_dir.join(DOWNLOAD_FILE_NAME);
        let content = self.get_doc();
        let result = std::fs::create_dir_all(&self.download_dir)
            .and_then(|_| std::fs::write(&path, &content));
        match result {
            Ok(_) => {
                tracing::info!(
                    path = %path.display(),
                    bytes = content.len(),
                    "downloaded document"
                );
                self.set_status(&format!("Downloaded to {}", path.display()));
                Ok(path)
            }
            Err(source) => {
                tracing::error!(path = %path.display(), %source, "download failed");
                self.set_status(&format!("Error downloading: {}", source));
                Err(Error::Download { path, source })
            }
        }
    }
}

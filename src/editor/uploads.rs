//! Background uploads started from the attachment dialog.

use super::*;

impl<'a> Editor<'a> {
    /// Starts uploading `paths` for the dialog currently open.
    pub(super) fn start_upload(&mut self, paths: Vec<PathBuf>) {
        let Some(uploader) = self.uploader.clone() else {
            self.set_status("Upload unavailable: no upload directory configured");
            return;
        };
        if paths.is_empty() {
            return;
        }
        tracing::info!(count = paths.len(), "starting upload batch");
        let generation = self.modal.generation();
        self.upload_jobs
            .push(UploadJob::spawn(paths, uploader, generation));
        self.modal.set_uploading(true);
    }

    /// Moves finished uploads into the dialog's pending list. Entries for a
    /// dialog that has since been closed or replaced are dropped.
    pub(super) fn poll_uploads(&mut self) {
        if self.upload_jobs.is_empty() {
            return;
        }
        for job in &mut self.upload_jobs {
            let entries = job.drain();
            if entries.is_empty() {
                continue;
            }
            let count = entries.len();
            if !self.modal.append_entries(job.generation, entries) {
                tracing::debug!(count, generation = job.generation, "discarding stale uploads");
            }
        }
        self.upload_jobs.retain(|job| !job.is_finished());

        let generation = self.modal.generation();
        let busy = self.upload_jobs.iter().any(|job| job.generation == generation);
        self.modal.set_uploading(busy);
    }

    pub fn is_uploading(&self) -> bool {
        !self.upload_jobs.is_empty()
    }
}

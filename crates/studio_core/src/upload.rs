use std::fmt;

use serde::{Deserialize, Serialize};

/// Extensions the upload picker offers. Plain text is handled specially when it shows up.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

pub const PLAIN_TEXT: &str = "text/plain";

/// Spacing between ids of consecutive submissions; the remainder is the batch index.
const ID_STRIDE: u64 = 1_000;

/// Opaque reference to file content owned by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef(pub String);

impl SourceRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A file as handed over by the picker or a drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub media_type: String,
    pub source: SourceRef,
}

impl FileHandle {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            source: SourceRef(source.into()),
        }
    }

    /// True when the declared media type can be read as text directly.
    pub fn is_plain_text(&self) -> bool {
        let essence = self
            .media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        essence.eq_ignore_ascii_case(PLAIN_TEXT)
            || essence
                .get(..5)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text/"))
    }
}

/// Whether the upload widget would offer `file_name`. The tracker never checks this.
pub fn is_accepted_upload(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// The file of a batch that text extraction runs on: the first one.
pub fn primary_extraction_target(files: &[FileHandle]) -> Option<&FileHandle> {
    files.first()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UploadId(pub u64);

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Uploading,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, UploadStatus::Uploading)
    }
}

/// Terminal state an upload can settle into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadOutcome {
    Completed,
    Failed,
}

impl From<UploadOutcome> for UploadStatus {
    fn from(outcome: UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Completed => UploadStatus::Completed,
            UploadOutcome::Failed => UploadStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEntry {
    pub id: UploadId,
    pub file_name: String,
    pub status: UploadStatus,
    pub source: FileHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadProgress {
    pub completed: usize,
    pub total: usize,
}

impl UploadProgress {
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Append-only set of simulated uploads for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadTracker {
    entries: Vec<UploadEntry>,
    next_id: u64,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every file as `uploading` and returns the new entries.
    ///
    /// Ids come from the submission time plus the batch index and are pushed
    /// past the last issued id, so they never repeat within a session.
    pub fn submit_batch(&mut self, files: Vec<FileHandle>, submitted_at_ms: u64) -> Vec<UploadEntry> {
        let base = submitted_at_ms.saturating_mul(ID_STRIDE);
        let created: Vec<UploadEntry> = files
            .into_iter()
            .enumerate()
            .map(|(index, file)| {
                let id = base.saturating_add(index as u64).max(self.next_id);
                self.next_id = id.saturating_add(1);
                UploadEntry {
                    id: UploadId(id),
                    file_name: file.name.clone(),
                    status: UploadStatus::Uploading,
                    source: file,
                }
            })
            .collect();
        self.entries.extend(created.iter().cloned());
        created
    }

    /// Moves an uploading entry to `outcome`. Returns false for unknown ids and
    /// entries that already settled.
    pub fn mark_terminal(&mut self, id: UploadId, outcome: UploadOutcome) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) if !entry.status.is_terminal() => {
                entry.status = outcome.into();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn aggregate_progress(&self) -> UploadProgress {
        UploadProgress {
            completed: self
                .entries
                .iter()
                .filter(|entry| entry.status == UploadStatus::Completed)
                .count(),
            total: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> FileHandle {
        FileHandle::new(name, "application/pdf", name)
    }

    #[test]
    fn plain_text_detection_ignores_parameters_and_case() {
        assert!(FileHandle::new("a.txt", "text/plain; charset=utf-8", "a").is_plain_text());
        assert!(FileHandle::new("a.md", "Text/Markdown", "a").is_plain_text());
        assert!(!FileHandle::new("a.pdf", "application/pdf", "a").is_plain_text());
        assert!(!FileHandle::new("a", "", "a").is_plain_text());
    }

    #[test]
    fn accepted_extensions_match_picker_filter() {
        assert!(is_accepted_upload("resume.PDF"));
        assert!(is_accepted_upload("cover.docx"));
        assert!(is_accepted_upload("jd.txt"));
        assert!(!is_accepted_upload("photo.png"));
        assert!(!is_accepted_upload("README"));
    }

    #[test]
    fn ids_derive_from_timestamp_and_index() {
        let mut tracker = UploadTracker::new();
        let created = tracker.submit_batch(vec![pdf("a.pdf"), pdf("b.pdf")], 5);
        let ids: Vec<_> = created.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![UploadId(5_000), UploadId(5_001)]);
    }

    #[test]
    fn same_millisecond_batches_do_not_collide() {
        let mut tracker = UploadTracker::new();
        tracker.submit_batch(vec![pdf("a.pdf"), pdf("b.pdf")], 7);
        let second = tracker.submit_batch(vec![pdf("c.pdf")], 7);
        assert_eq!(second[0].id, UploadId(7_002));
    }

    #[test]
    fn terminal_entries_never_transition_again() {
        let mut tracker = UploadTracker::new();
        let id = tracker.submit_batch(vec![pdf("a.pdf")], 0)[0].id;

        assert!(tracker.mark_terminal(id, UploadOutcome::Failed));
        assert!(!tracker.mark_terminal(id, UploadOutcome::Completed));
        assert_eq!(tracker.get(id).unwrap().status, UploadStatus::Failed);
        assert!(!tracker.mark_terminal(UploadId(99), UploadOutcome::Completed));
    }

    #[test]
    fn primary_target_is_first_file() {
        let files = vec![pdf("jd.pdf"), pdf("resume.pdf")];
        assert_eq!(primary_extraction_target(&files).unwrap().name, "jd.pdf");
        assert!(primary_extraction_target(&[]).is_none());
    }
}

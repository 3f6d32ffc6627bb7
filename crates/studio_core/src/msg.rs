use crate::{FileHandle, ResumeEdit, Section, SuggestionTarget, UploadId, UploadOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked an entry in the sidebar.
    SectionSelected(Section),
    /// User changed one field of the resume.
    ResumeEdited(ResumeEdit),
    /// User opened the recommendation panel for a field.
    RecommendationsRequested(SuggestionTarget),
    /// User clicked "add" on a suggested keyword.
    SuggestionAccepted { keyword: String },
    /// User closed the recommendation panel.
    RecommendationsDismissed,
    /// Files arrived from the picker or a drop, in one interaction.
    FilesSubmitted {
        files: Vec<FileHandle>,
        submitted_at_ms: u64,
    },
    /// A scheduled upload timer fired, or a caller forced a terminal state.
    UploadSettled {
        id: UploadId,
        outcome: UploadOutcome,
    },
    /// User dismissed the upload status panel.
    UploadPanelDismissed,
    /// Text was extracted from the primary file of a batch.
    JobDescriptionExtracted { source: String, text: String },
    /// Reading the primary file failed.
    ExtractionFailed { file_name: String, reason: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

use serde::Serialize;

use crate::{
    ExtractedText, Recommendations, ResumeDocument, Section, UploadId, UploadProgress, UploadStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AppViewModel {
    pub section: Section,
    pub resume: ResumeDocument,
    pub recommendations: Option<Recommendations>,
    pub uploads: Vec<UploadRowView>,
    pub progress: UploadProgress,
    pub job_description: Option<ExtractedText>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRowView {
    pub id: UploadId,
    pub file_name: String,
    pub status: UploadStatus,
}

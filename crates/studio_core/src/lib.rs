//! Resume studio core: pure state machine, keyword gap analysis and view-model helpers.
mod effect;
mod keywords;
mod msg;
mod resume;
mod state;
mod update;
mod upload;
mod view_model;

pub use effect::Effect;
pub use keywords::{find_gaps, GapError, KeywordCategory, KeywordTable, DEFAULT_MAX_SUGGESTIONS};
pub use msg::Msg;
pub use resume::{
    append_keyword, Education, EducationField, Experience, ExperienceField, PersonalField,
    PersonalInfo, Project, ProjectField, ResumeDocument, ResumeEdit,
};
pub use state::{AppState, ExtractedText, Recommendations, Section, SuggestionTarget};
pub use update::update;
pub use upload::{
    is_accepted_upload, primary_extraction_target, FileHandle, SourceRef, UploadEntry, UploadId,
    UploadOutcome, UploadProgress, UploadStatus, UploadTracker, ACCEPTED_EXTENSIONS, PLAIN_TEXT,
};
pub use view_model::{AppViewModel, UploadRowView};

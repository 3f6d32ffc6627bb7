use serde::{Deserialize, Serialize};

use crate::keywords::{KeywordCategory, KeywordTable};
use crate::resume::{append_keyword, ResumeDocument};
use crate::upload::UploadTracker;
use crate::view_model::{AppViewModel, UploadRowView};

/// Sidebar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Section {
    #[default]
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Upload,
    Recommendations,
}

/// The field a recommendation panel is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionTarget {
    Summary,
    ExperienceDescription(usize),
    Skills,
}

impl SuggestionTarget {
    pub fn category(self) -> KeywordCategory {
        match self {
            SuggestionTarget::Summary => KeywordCategory::Summary,
            SuggestionTarget::ExperienceDescription(_) => KeywordCategory::Experience,
            SuggestionTarget::Skills => KeywordCategory::Technical,
        }
    }

    /// Current text of the target field, or `None` if the record is gone.
    pub fn text_of(self, resume: &ResumeDocument) -> Option<String> {
        match self {
            SuggestionTarget::Summary => Some(resume.summary.clone()),
            SuggestionTarget::ExperienceDescription(index) => resume
                .experience
                .get(index)
                .map(|entry| entry.description.clone()),
            SuggestionTarget::Skills => Some(resume.skills_text()),
        }
    }

    /// Adds `keyword` to the target field: free text is concatenated, skills are appended.
    pub(crate) fn accept(self, resume: &mut ResumeDocument, keyword: &str) -> bool {
        match self {
            SuggestionTarget::Summary => {
                append_keyword(&mut resume.summary, keyword);
                true
            }
            SuggestionTarget::ExperienceDescription(index) => {
                match resume.experience.get_mut(index) {
                    Some(entry) => {
                        append_keyword(&mut entry.description, keyword);
                        true
                    }
                    None => false,
                }
            }
            SuggestionTarget::Skills => {
                resume.skills.push(keyword.to_string());
                true
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub target: SuggestionTarget,
    pub keywords: Vec<String>,
}

/// Text pulled out of the primary file of an upload batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppState {
    section: Section,
    resume: ResumeDocument,
    keywords: KeywordTable,
    recommendations: Option<Recommendations>,
    uploads: UploadTracker,
    job_description: Option<ExtractedText>,
    #[serde(skip)]
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(keywords: KeywordTable) -> Self {
        Self {
            keywords,
            ..Self::default()
        }
    }

    pub fn with_resume(mut self, resume: ResumeDocument) -> Self {
        self.resume = resume;
        self
    }

    /// Swaps the keyword table and leaves everything else in place.
    pub fn with_keyword_table(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            section: self.section,
            resume: self.resume.clone(),
            recommendations: self.recommendations.clone(),
            uploads: self
                .uploads
                .entries()
                .iter()
                .map(|entry| UploadRowView {
                    id: entry.id,
                    file_name: entry.file_name.clone(),
                    status: entry.status,
                })
                .collect(),
            progress: self.uploads.aggregate_progress(),
            job_description: self.job_description.clone(),
            dirty: self.dirty,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn resume(&self) -> &ResumeDocument {
        &self.resume
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn recommendations(&self) -> Option<&Recommendations> {
        self.recommendations.as_ref()
    }

    pub fn uploads(&self) -> &UploadTracker {
        &self.uploads
    }

    pub fn job_description(&self) -> Option<&ExtractedText> {
        self.job_description.as_ref()
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_section(&mut self, section: Section) -> bool {
        if self.section == section {
            return false;
        }
        self.section = section;
        true
    }

    pub(crate) fn resume_mut(&mut self) -> &mut ResumeDocument {
        &mut self.resume
    }

    pub(crate) fn uploads_mut(&mut self) -> &mut UploadTracker {
        &mut self.uploads
    }

    pub(crate) fn set_job_description(&mut self, extracted: ExtractedText) {
        self.job_description = Some(extracted);
    }

    /// Recomputes suggestions for `target`. A target whose record vanished closes the panel.
    pub(crate) fn open_recommendations(&mut self, target: SuggestionTarget) -> bool {
        let next = target.text_of(&self.resume).map(|text| Recommendations {
            target,
            keywords: self.keywords.find_gaps(&text, target.category().label()),
        });
        if self.recommendations == next {
            return false;
        }
        self.recommendations = next;
        true
    }

    pub(crate) fn refresh_recommendations(&mut self) -> bool {
        match self.recommendations.as_ref().map(|open| open.target) {
            Some(target) => self.open_recommendations(target),
            None => false,
        }
    }

    pub(crate) fn close_recommendations(&mut self) -> bool {
        self.recommendations.take().is_some()
    }
}

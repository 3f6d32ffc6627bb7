use studio_logging::{studio_debug, studio_info, studio_warn};

use crate::upload::primary_extraction_target;
use crate::{AppState, Effect, ExtractedText, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SectionSelected(section) => {
            if state.set_section(section) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ResumeEdited(edit) => {
            if state.resume_mut().apply(edit) {
                // Keep an open panel in step with the field it describes.
                state.refresh_recommendations();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RecommendationsRequested(target) => {
            if state.open_recommendations(target) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SuggestionAccepted { keyword } => {
            let target = state
                .recommendations()
                .filter(|open| open.keywords.contains(&keyword))
                .map(|open| open.target);
            let accepted =
                target.is_some_and(|target| target.accept(state.resume_mut(), &keyword));
            if accepted {
                state.refresh_recommendations();
                state.mark_dirty();
            } else {
                studio_debug!("Ignoring suggestion {:?}: not offered", keyword);
            }
            Vec::new()
        }
        Msg::RecommendationsDismissed => {
            if state.close_recommendations() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FilesSubmitted {
            files,
            submitted_at_ms,
        } => {
            if files.is_empty() {
                return (state, Vec::new());
            }
            let primary = primary_extraction_target(&files).cloned();
            let created = state.uploads_mut().submit_batch(files, submitted_at_ms);
            studio_info!("Registered {} upload(s)", created.len());

            let mut effects = Vec::with_capacity(created.len() + 1);
            for entry in &created {
                effects.push(Effect::ScheduleSettle { id: entry.id });
            }
            if let Some(file) = primary {
                effects.push(Effect::ExtractText { file });
            }
            state.mark_dirty();
            effects
        }
        Msg::UploadSettled { id, outcome } => {
            if state.uploads_mut().mark_terminal(id, outcome) {
                studio_info!("Upload {} settled as {:?}", id, outcome);
                state.mark_dirty();
            } else {
                studio_debug!("Ignoring settle for upload {}: unknown or already settled", id);
            }
            Vec::new()
        }
        Msg::UploadPanelDismissed => {
            if !state.uploads().is_empty() {
                state.uploads_mut().clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::JobDescriptionExtracted { source, text } => {
            studio_info!("Extracted {} bytes of text from {}", text.len(), source);
            state.set_job_description(ExtractedText {
                source,
                text: text.clone(),
            });
            state.mark_dirty();
            vec![Effect::DeliverExtraction { text }]
        }
        Msg::ExtractionFailed { file_name, reason } => {
            studio_warn!("Text extraction from {} failed: {}", file_name, reason);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

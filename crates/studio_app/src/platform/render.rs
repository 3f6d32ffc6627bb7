use studio_core::{AppViewModel, Recommendations, SuggestionTarget, UploadStatus};

/// Renders the upload panel: a progress line followed by one row per file.
pub fn render_uploads(view: &AppViewModel) -> Vec<String> {
    if view.uploads.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(view.uploads.len() + 1);
    lines.push(progress_badge(view.progress.completed, view.progress.total));
    for row in &view.uploads {
        lines.push(format!(
            "  {} {} (#{})",
            status_marker(row.status),
            row.file_name,
            row.id
        ));
    }
    lines
}

pub fn progress_badge(completed: usize, total: usize) -> String {
    let percent = if total > 0 {
        (completed.min(total) as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    format!("Uploads {}/{} ({:.1}%)", completed, total, percent)
}

fn status_marker(status: UploadStatus) -> &'static str {
    match status {
        UploadStatus::Uploading => "[..]",
        UploadStatus::Completed => "[ok]",
        UploadStatus::Failed => "[!!]",
    }
}

/// Renders a recommendation panel, or a note when the field already has every keyword.
pub fn render_recommendations(recommendations: &Recommendations) -> String {
    let label = target_label(recommendations.target);
    if recommendations.keywords.is_empty() {
        return format!("{label}: no missing keywords");
    }
    format!(
        "{label} ({}): {}",
        recommendations.target.category(),
        recommendations.keywords.join(", ")
    )
}

fn target_label(target: SuggestionTarget) -> String {
    match target {
        SuggestionTarget::Summary => "Summary".to_string(),
        SuggestionTarget::ExperienceDescription(index) => format!("Experience #{}", index + 1),
        SuggestionTarget::Skills => "Skills".to_string(),
    }
}

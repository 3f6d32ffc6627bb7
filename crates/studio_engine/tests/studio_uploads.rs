use std::fs;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use pretty_assertions::assert_eq;
use studio_core::{
    FileHandle, KeywordTable, ResumeDocument, UploadOutcome, UploadProgress, UploadStatus,
};
use studio_engine::{
    placeholder_text, FsContentReader, ManualScheduler, MemoryContentReader, Scheduler, Studio,
    TrackerSettings,
};
use tempfile::TempDir;

const JD_TEXT: &str = "Looking for React and AWS experience";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(studio_logging::initialize_for_tests);
}

fn settings() -> TrackerSettings {
    TrackerSettings {
        rng_seed: Some(7),
        ..TrackerSettings::default()
    }
}

fn studio_with(reader: MemoryContentReader) -> Studio<ManualScheduler> {
    init_logging();
    Studio::manual(settings(), Arc::new(reader))
}

fn studio() -> Studio<ManualScheduler> {
    studio_with(MemoryContentReader::new())
}

fn pdf(name: &str) -> FileHandle {
    FileHandle::new(name, "application/pdf", name)
}

fn text(name: &str) -> FileHandle {
    FileHandle::new(name, "text/plain", name)
}

fn capture_extractions(studio: &mut Studio<ManualScheduler>) -> Arc<Mutex<Vec<String>>> {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    studio.on_extraction(move |text| sink.lock().unwrap().push(text));
    received
}

#[test]
fn batch_entries_start_uploading_and_all_complete() {
    let mut studio = studio();
    let created = studio.submit_batch(vec![pdf("a.pdf"), pdf("b.docx"), pdf("c.pdf")]);

    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|e| e.status == UploadStatus::Uploading));
    assert_eq!(
        studio.aggregate_progress(),
        UploadProgress { completed: 0, total: 3 }
    );

    // Nothing settles before the lower delay bound.
    studio.advance(Duration::from_millis(1_999));
    assert_eq!(studio.aggregate_progress().completed, 0);

    studio.advance(Duration::from_millis(2_001));
    assert_eq!(
        studio.aggregate_progress(),
        UploadProgress { completed: 3, total: 3 }
    );
    assert_eq!(studio.scheduler().pending_timers(), 0);
}

#[test]
fn ids_stay_unique_across_batches_and_clears() {
    let mut studio = studio();
    let mut ids = Vec::new();
    ids.extend(studio.submit_batch(vec![pdf("a.pdf"), pdf("b.pdf")]).iter().map(|e| e.id));
    ids.extend(studio.submit_batch(vec![pdf("c.pdf")]).iter().map(|e| e.id));
    studio.clear_uploads();
    ids.extend(studio.submit_batch(vec![pdf("d.pdf")]).iter().map(|e| e.id));

    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());
}

#[test]
fn clear_resets_progress_and_late_timers_are_ignored() {
    let mut studio = studio();
    studio.submit_batch(vec![pdf("a.pdf"), pdf("b.pdf")]);
    studio.clear_uploads();
    assert_eq!(studio.aggregate_progress(), UploadProgress::default());
    assert!(studio.view().uploads.is_empty());

    studio.advance(settings().max_completion_delay());
    assert_eq!(studio.aggregate_progress(), UploadProgress::default());
}

#[test]
fn plain_text_primary_file_is_delivered_without_delay() {
    let mut studio = studio_with(MemoryContentReader::new().with("jd.txt", JD_TEXT));
    let received = capture_extractions(&mut studio);

    studio.submit_batch(vec![text("jd.txt")]);
    studio.settle();

    assert_eq!(studio.scheduler().now(), Duration::ZERO);
    assert_eq!(*received.lock().unwrap(), vec![JD_TEXT.to_string()]);
    assert_eq!(
        studio.view().job_description.map(|jd| jd.text),
        Some(JD_TEXT.to_string())
    );

    // Upload timers still run to completion; nothing is delivered twice.
    studio.advance(settings().max_completion_delay());
    assert_eq!(received.lock().unwrap().len(), 1);
    assert_eq!(studio.aggregate_progress().completed, 1);
}

#[test]
fn binary_primary_file_gets_placeholder_after_delay() {
    let mut studio = studio();
    let received = capture_extractions(&mut studio);

    studio.submit_batch(vec![pdf("jd.pdf")]);
    studio.settle();
    assert!(received.lock().unwrap().is_empty());

    studio.advance(Duration::from_millis(499));
    assert!(received.lock().unwrap().is_empty());

    assert!(studio.extraction_pending());
    studio.advance(Duration::from_millis(1));
    assert!(!studio.extraction_pending());
    let got = received.lock().unwrap().clone();
    assert_eq!(got, vec![placeholder_text("jd.pdf")]);
    assert!(got[0].contains("jd.pdf"));
}

#[test]
fn only_first_file_of_batch_is_extracted() {
    let mut studio = studio_with(
        MemoryContentReader::new()
            .with("jd.txt", JD_TEXT)
            .with("notes.txt", "ignored"),
    );
    let received = capture_extractions(&mut studio);

    studio.submit_batch(vec![text("jd.txt"), text("notes.txt"), pdf("cv.pdf")]);
    studio.advance(settings().max_completion_delay());

    assert_eq!(*received.lock().unwrap(), vec![JD_TEXT.to_string()]);
    assert_eq!(studio.aggregate_progress().completed, 3);
}

#[test]
fn no_callback_means_no_extraction_work() {
    let mut studio = studio();
    studio.submit_batch(vec![pdf("jd.pdf"), pdf("cv.pdf")]);

    assert_eq!(studio.scheduler().pending_timers(), 2);
    assert_eq!(studio.scheduler().pending_tasks(), 0);
    assert!(!studio.extraction_pending());
    studio.advance(settings().max_completion_delay());
    assert!(studio.view().job_description.is_none());
}

#[test]
fn filesystem_reader_works_on_the_virtual_clock() {
    init_logging();
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("jd.txt"), JD_TEXT).unwrap();
    let reader = FsContentReader::new(1024).with_root(temp.path());
    let mut studio = Studio::manual(settings(), Arc::new(reader));
    let received = capture_extractions(&mut studio);

    studio.submit_batch(vec![text("jd.txt"), text("gone.txt")]);
    studio.settle();
    assert_eq!(studio.scheduler().now(), Duration::ZERO);
    assert_eq!(*received.lock().unwrap(), vec![JD_TEXT.to_string()]);

    studio.advance(Duration::from_millis(5_000));
    assert_eq!(
        studio.aggregate_progress(),
        UploadProgress { completed: 2, total: 2 }
    );
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[test]
fn filesystem_read_failure_on_the_virtual_clock_ends_pending_extraction() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let reader = FsContentReader::new(1024).with_root(temp.path());
    let mut studio = Studio::manual(settings(), Arc::new(reader));
    let received = capture_extractions(&mut studio);

    studio.submit_batch(vec![text("missing.txt")]);
    assert!(studio.extraction_pending());
    studio.settle();

    assert!(!studio.extraction_pending());
    assert!(received.lock().unwrap().is_empty());
}

#[test]
fn read_failure_is_swallowed_and_upload_still_completes() {
    let mut studio = studio();
    let received = capture_extractions(&mut studio);

    let created = studio.submit_batch(vec![text("missing.txt")]);
    assert!(studio.extraction_pending());
    studio.settle();
    assert!(!studio.extraction_pending());

    assert!(received.lock().unwrap().is_empty());
    assert_eq!(created[0].status, UploadStatus::Uploading);
    assert_eq!(studio.view().uploads[0].status, UploadStatus::Uploading);

    studio.advance(settings().max_completion_delay());
    assert_eq!(studio.view().uploads[0].status, UploadStatus::Completed);
    assert!(studio.view().job_description.is_none());
}

#[test]
fn forced_failure_wins_over_scheduled_completion() {
    let mut studio = studio();
    let created = studio.submit_batch(vec![pdf("a.pdf"), pdf("b.pdf")]);
    studio.mark_terminal(created[0].id, UploadOutcome::Failed);

    studio.advance(settings().max_completion_delay());

    let view = studio.view();
    assert_eq!(view.uploads[0].status, UploadStatus::Failed);
    assert_eq!(view.uploads[1].status, UploadStatus::Completed);
    assert_eq!(view.progress, UploadProgress { completed: 1, total: 2 });
}

#[test]
fn observers_see_every_change_until_unsubscribed() {
    let mut studio = studio();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = studio.subscribe(move |view| sink.lock().unwrap().push(view.progress));

    studio.submit_batch(vec![pdf("a.pdf"), pdf("b.pdf")]);
    studio.advance(settings().max_completion_delay());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            UploadProgress { completed: 0, total: 2 },
            UploadProgress { completed: 1, total: 2 },
            UploadProgress { completed: 2, total: 2 },
        ]
    );

    assert!(studio.unsubscribe(id));
    assert!(!studio.unsubscribe(id));
    studio.clear_uploads();
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[test]
fn fixed_delay_settings_settle_exactly_on_time() {
    init_logging();
    let settings = TrackerSettings {
        completion_delay_min_ms: 100,
        completion_delay_max_ms: 100,
        ..TrackerSettings::default()
    };
    let mut studio = Studio::manual(settings, Arc::new(MemoryContentReader::new()));
    studio.submit_batch(vec![pdf("a.pdf")]);

    studio.advance(Duration::from_millis(99));
    assert_eq!(studio.aggregate_progress().completed, 0);
    studio.advance(Duration::from_millis(1));
    assert_eq!(studio.aggregate_progress().completed, 1);
}

#[test]
fn gap_analysis_uses_configured_cap() {
    init_logging();
    let settings = TrackerSettings {
        max_suggestions: 2,
        ..TrackerSettings::default()
    };
    let studio = Studio::manual(settings, Arc::new(MemoryContentReader::new()));
    assert_eq!(
        studio.find_gaps("I have used React and Node.js", "technical"),
        vec!["JavaScript", "Python"]
    );
    assert!(studio.find_gaps("anything", "unknown").is_empty());
}

#[test]
fn replacing_keywords_keeps_uploads_and_resume() {
    init_logging();
    let settings = TrackerSettings {
        max_suggestions: 1,
        ..settings()
    };
    let resume = ResumeDocument {
        summary: "Rust engineer".to_string(),
        ..ResumeDocument::default()
    };
    let mut studio = Studio::manual(settings, Arc::new(MemoryContentReader::new()))
        .with_resume(resume.clone());
    studio.submit_batch(vec![pdf("a.pdf")]);

    let mut table = KeywordTable::reference().with_max_suggestions(10);
    table.insert("runtime", ["Tokio", "Serde", "Axum"]);
    let studio = studio.with_keywords(table);

    assert_eq!(studio.state().resume(), &resume);
    assert_eq!(studio.view().uploads.len(), 1);
    assert_eq!(studio.find_gaps("serde everywhere", "Runtime"), vec!["Tokio"]);
    assert_eq!(studio.find_gaps("anything", "technical"), vec!["React"]);
}

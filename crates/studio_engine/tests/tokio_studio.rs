use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use studio_core::{FileHandle, UploadProgress};
use studio_engine::{placeholder_text, FsContentReader, Studio, TrackerSettings};
use tempfile::TempDir;
use tokio::runtime::Handle;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn text_batch_completes_on_runtime_clock() {
    studio_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("jd.txt"), "Looking for React and AWS experience").unwrap();

    let reader = FsContentReader::new(1024).with_root(temp.path());
    let mut studio = Studio::tokio(TrackerSettings::default(), Arc::new(reader), Handle::current());
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    studio.on_extraction(move |text| sink.lock().unwrap().push(text));

    studio.submit_batch(vec![
        FileHandle::new("jd.txt", "text/plain", "jd.txt"),
        FileHandle::new("cv.pdf", "application/pdf", "cv.pdf"),
    ]);

    while !(studio.aggregate_progress().is_complete() && !received.lock().unwrap().is_empty()) {
        assert!(studio.next_message().await);
    }

    assert_eq!(
        studio.aggregate_progress(),
        UploadProgress { completed: 2, total: 2 }
    );
    assert_eq!(
        *received.lock().unwrap(),
        vec!["Looking for React and AWS experience".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn placeholder_arrives_after_extraction_delay() {
    studio_logging::initialize_for_tests();
    let reader = FsContentReader::new(1024);
    let mut studio = Studio::tokio(TrackerSettings::default(), Arc::new(reader), Handle::current());
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    studio.on_extraction(move |text| sink.lock().unwrap().push(text));

    let started = Instant::now();
    studio.submit_batch(vec![FileHandle::new("jd.pdf", "application/pdf", "jd.pdf")]);

    while received.lock().unwrap().is_empty() {
        assert!(studio.next_message().await);
    }

    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(*received.lock().unwrap(), vec![placeholder_text("jd.pdf")]);
}

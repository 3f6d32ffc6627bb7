use std::sync::Arc;
use std::time::Duration;

use studio_core::{
    update, AppState, AppViewModel, Effect, FileHandle, KeywordTable, Msg, ResumeDocument,
    UploadEntry, UploadId, UploadOutcome, UploadProgress,
};
use studio_logging::{studio_debug, studio_info, studio_trace};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::reader::ContentReader;
use crate::scheduler::{millis, ManualScheduler, Scheduler, TokioScheduler};
use crate::settings::TrackerSettings;

/// Receives a fresh view after every change.
pub type Observer = Box<dyn FnMut(&AppViewModel) + Send>;

/// Receives the text extracted from the primary file of a batch.
pub type ExtractionCallback = Box<dyn FnMut(String) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Placeholder text produced by the simulated extraction of non-text files.
pub fn placeholder_text(file_name: &str) -> String {
    format!("Extracted job description from {file_name}")
}

/// Single owner of the editor state.
///
/// Every mutation is a message run through [`update`]; timers and reads only
/// post messages into the studio inbox, which the owner drains.
pub struct Studio<S: Scheduler> {
    state: AppState,
    settings: TrackerSettings,
    scheduler: S,
    reader: Arc<dyn ContentReader>,
    inbox: UnboundedReceiver<Msg>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    on_extraction: Option<ExtractionCallback>,
    extractions_in_flight: usize,
    rng: fastrand::Rng,
}

impl Studio<ManualScheduler> {
    /// Studio on a virtual clock, driven by [`Studio::advance`].
    pub fn manual(settings: TrackerSettings, reader: Arc<dyn ContentReader>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self::with_scheduler(settings, reader, ManualScheduler::new(tx), rx)
    }

    /// Moves virtual time forward by `by`, delivering every timer that falls
    /// due on the way, in due order.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.scheduler.now() + by;
        self.drain();
        while self.scheduler.fire_next(deadline) {
            self.drain();
        }
        self.scheduler.advance_to(deadline);
    }

    /// Delivers finished tasks and queued messages without moving the clock.
    pub fn settle(&mut self) {
        self.advance(Duration::ZERO);
    }

    fn drain(&mut self) {
        while self.scheduler.run_ready() > 0 || self.process_pending_messages() > 0 {}
    }
}

impl Studio<TokioScheduler> {
    /// Studio on real time; timers and reads run on `handle`.
    pub fn tokio(settings: TrackerSettings, reader: Arc<dyn ContentReader>, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self::with_scheduler(settings, reader, TokioScheduler::new(handle, tx), rx)
    }
}

impl<S: Scheduler> Studio<S> {
    pub fn with_scheduler(
        settings: TrackerSettings,
        reader: Arc<dyn ContentReader>,
        scheduler: S,
        inbox: UnboundedReceiver<Msg>,
    ) -> Self {
        let keywords = KeywordTable::reference().with_max_suggestions(settings.max_suggestions);
        let rng = match settings.rng_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            state: AppState::with_keywords(keywords),
            settings,
            scheduler,
            reader,
            inbox,
            observers: Vec::new(),
            next_subscription: 1,
            on_extraction: None,
            extractions_in_flight: 0,
            rng,
        }
    }

    /// Replaces the keyword table; the suggestion cap from the settings is kept.
    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        let keywords = keywords.with_max_suggestions(self.settings.max_suggestions);
        self.state = std::mem::take(&mut self.state).with_keyword_table(keywords);
        self
    }

    pub fn with_resume(mut self, resume: ResumeDocument) -> Self {
        self.state = std::mem::take(&mut self.state).with_resume(resume);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&AppViewModel) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() < before
    }

    /// Registers the callback that receives text from the primary file of
    /// each later batch. Replaces any earlier callback.
    pub fn on_extraction<F>(&mut self, callback: F)
    where
        F: FnMut(String) + Send + 'static,
    {
        self.on_extraction = Some(Box::new(callback));
    }

    pub fn clear_extraction_callback(&mut self) {
        self.on_extraction = None;
    }

    /// Keywords of `category` missing from `text`.
    pub fn find_gaps(&self, text: &str, category: &str) -> Vec<String> {
        self.state.keywords().find_gaps(text, category)
    }

    /// Registers `files` as uploading and returns the created entries.
    pub fn submit_batch(&mut self, files: Vec<FileHandle>) -> Vec<UploadEntry> {
        let before = self.state.uploads().entries().len();
        let submitted_at_ms = millis(self.scheduler.now());
        self.dispatch(Msg::FilesSubmitted {
            files,
            submitted_at_ms,
        });
        self.state
            .uploads()
            .entries()
            .get(before..)
            .map(<[UploadEntry]>::to_vec)
            .unwrap_or_default()
    }

    /// Forces an uploading entry into a terminal state.
    pub fn mark_terminal(&mut self, id: UploadId, outcome: UploadOutcome) {
        self.dispatch(Msg::UploadSettled { id, outcome });
    }

    pub fn clear_uploads(&mut self) {
        self.dispatch(Msg::UploadPanelDismissed);
    }

    pub fn aggregate_progress(&self) -> UploadProgress {
        self.state.uploads().aggregate_progress()
    }

    /// True while a started extraction has neither delivered nor failed.
    pub fn extraction_pending(&self) -> bool {
        self.extractions_in_flight > 0
    }

    /// Applies one message, runs its effects and notifies observers on change.
    pub fn dispatch(&mut self, msg: Msg) {
        studio_trace!("dispatch {:?}", msg);
        if matches!(
            msg,
            Msg::JobDescriptionExtracted { .. } | Msg::ExtractionFailed { .. }
        ) {
            self.extractions_in_flight = self.extractions_in_flight.saturating_sub(1);
        }
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        self.state = state;

        if changed {
            self.notify();
        }
        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Dispatches every message already waiting in the inbox. Returns how many ran.
    pub fn process_pending_messages(&mut self) -> usize {
        let mut inbox = Vec::new();
        while let Ok(msg) = self.inbox.try_recv() {
            inbox.push(msg);
        }
        let count = inbox.len();
        for msg in inbox {
            self.dispatch(msg);
        }
        count
    }

    /// Waits for the next inbox message and dispatches it.
    pub async fn next_message(&mut self) -> bool {
        match self.inbox.recv().await {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let view = self.state.view();
        for (_, observer) in &mut self.observers {
            observer(&view);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleSettle { id } => {
                let delay = self.draw_completion_delay();
                studio_debug!("Upload {} settles in {}ms", id, delay.as_millis());
                self.scheduler.schedule(
                    delay,
                    Msg::UploadSettled {
                        id,
                        outcome: UploadOutcome::Completed,
                    },
                );
            }
            Effect::ExtractText { file } => {
                if self.on_extraction.is_none() {
                    studio_debug!("No extraction callback; skipping {}", file.name);
                    return;
                }
                self.extract(file);
            }
            Effect::DeliverExtraction { text } => match self.on_extraction.as_mut() {
                Some(callback) => callback(text),
                None => studio_debug!("Extraction finished after callback was cleared"),
            },
        }
    }

    fn extract(&mut self, file: FileHandle) {
        self.extractions_in_flight += 1;
        if file.is_plain_text() {
            studio_info!("Reading text from {}", file.name);
            let reader = Arc::clone(&self.reader);
            self.scheduler.spawn(Box::pin(async move {
                let read = reader.read_text(&file).await;
                match read {
                    Ok(text) => Msg::JobDescriptionExtracted {
                        source: file.name,
                        text,
                    },
                    Err(err) => Msg::ExtractionFailed {
                        file_name: file.name,
                        reason: err.to_string(),
                    },
                }
            }));
        } else {
            studio_info!("Simulating extraction from {}", file.name);
            let text = placeholder_text(&file.name);
            self.scheduler.schedule(
                self.settings.extraction_delay(),
                Msg::JobDescriptionExtracted {
                    source: file.name,
                    text,
                },
            );
        }
    }

    fn draw_completion_delay(&mut self) -> Duration {
        let (min, max) = self.settings.completion_delay_bounds();
        Duration::from_millis(self.rng.u64(min..=max))
    }
}

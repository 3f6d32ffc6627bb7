use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use studio_core::Msg;
use studio_logging::{set_virtual_millis, studio_error, studio_trace};
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc::UnboundedSender;

/// Deferred work that ends in a message for the studio.
pub type MsgFuture = Pin<Box<dyn Future<Output = Msg> + Send + 'static>>;

/// Sending half of the studio inbox.
pub type Inbox = UnboundedSender<Msg>;

/// Time source and timer queue. Everything a scheduler produces goes back to
/// the studio as a message in its inbox; schedulers never touch state.
pub trait Scheduler: Send + Sync {
    /// Current time since the scheduler's epoch.
    fn now(&self) -> Duration;
    /// Deliver `msg` once `delay` has elapsed.
    fn schedule(&self, delay: Duration, msg: Msg);
    /// Run `task` and deliver its message when it finishes.
    fn spawn(&self, task: MsgFuture);
}

/// Scheduler backed by the tokio timer wheel. Works with a paused test clock.
pub struct TokioScheduler {
    handle: Handle,
    inbox: Inbox,
    epoch_offset: Duration,
    started: tokio::time::Instant,
}

impl TokioScheduler {
    pub fn new(handle: Handle, inbox: Inbox) -> Self {
        Self {
            handle,
            inbox,
            epoch_offset: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
            started: tokio::time::Instant::now(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.epoch_offset + self.started.elapsed()
    }

    fn schedule(&self, delay: Duration, msg: Msg) {
        let inbox = self.inbox.clone();
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = inbox.send(msg);
        });
    }

    fn spawn(&self, task: MsgFuture) {
        let inbox = self.inbox.clone();
        self.handle.spawn(async move {
            let msg = task.await;
            let _ = inbox.send(msg);
        });
    }
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    seq: u64,
    timers: BTreeMap<(Duration, u64), Msg>,
    tasks: Vec<MsgFuture>,
}

/// Virtual-time scheduler. Nothing happens until the owner moves the clock.
///
/// Timers due at the same instant fire in scheduling order. Spawned tasks run
/// to completion on a private current-thread runtime, built on first use, so
/// they finish at the virtual instant they are run. The owner must therefore
/// not drive this scheduler from inside another tokio runtime.
pub struct ManualScheduler {
    inbox: Inbox,
    clock: Mutex<ManualClock>,
    runtime: OnceLock<Option<Runtime>>,
}

impl ManualScheduler {
    pub fn new(inbox: Inbox) -> Self {
        set_virtual_millis(Some(0));
        Self {
            inbox,
            clock: Mutex::new(ManualClock::default()),
            runtime: OnceLock::new(),
        }
    }

    fn runtime(&self) -> Option<&Runtime> {
        self.runtime
            .get_or_init(|| match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => Some(runtime),
                Err(err) => {
                    studio_error!("Failed to build task runtime: {}", err);
                    None
                }
            })
            .as_ref()
    }

    fn clock(&self) -> MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn pending_timers(&self) -> usize {
        self.clock().timers.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.clock().tasks.len()
    }

    /// Runs every spawned task to completion. Returns how many finished.
    pub fn run_ready(&self) -> usize {
        let tasks = std::mem::take(&mut self.clock().tasks);
        if tasks.is_empty() {
            return 0;
        }

        let Some(runtime) = self.runtime() else {
            return self.poll_once(tasks);
        };
        let finished = tasks.len();
        for task in tasks {
            let msg = runtime.block_on(task);
            let _ = self.inbox.send(msg);
        }
        finished
    }

    /// Fallback without a runtime: polls each task once with a noop waker.
    fn poll_once(&self, mut tasks: Vec<MsgFuture>) -> usize {
        let waker = futures_util::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let before = tasks.len();
        tasks.retain_mut(|task| match task.as_mut().poll(&mut cx) {
            Poll::Ready(msg) => {
                let _ = self.inbox.send(msg);
                false
            }
            Poll::Pending => true,
        });
        let finished = before - tasks.len();

        // Tasks spawned while polling were queued behind our back.
        let mut clock = self.clock();
        tasks.append(&mut clock.tasks);
        clock.tasks = tasks;
        finished
    }

    /// Fires the earliest timer due at or before `deadline`, moving the clock
    /// to its due time. Returns false when no such timer exists.
    pub fn fire_next(&self, deadline: Duration) -> bool {
        let mut clock = self.clock();
        let Some((&(due, seq), _)) = clock.timers.first_key_value() else {
            return false;
        };
        if due > deadline {
            return false;
        }
        let Some(msg) = clock.timers.remove(&(due, seq)) else {
            return false;
        };
        clock.now = clock.now.max(due);
        set_virtual_millis(Some(millis(clock.now)));
        studio_trace!("Timer #{} fired", seq);
        let _ = self.inbox.send(msg);
        true
    }

    /// Moves the clock forward to `deadline` without firing anything.
    pub fn advance_to(&self, deadline: Duration) {
        let mut clock = self.clock();
        clock.now = clock.now.max(deadline);
        set_virtual_millis(Some(millis(clock.now)));
    }
}

impl Drop for ManualScheduler {
    fn drop(&mut self) {
        set_virtual_millis(None);
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.clock().now
    }

    fn schedule(&self, delay: Duration, msg: Msg) {
        let mut clock = self.clock();
        let due = clock.now + delay;
        let seq = clock.seq;
        clock.seq += 1;
        clock.timers.insert((due, seq), msg);
    }

    fn spawn(&self, task: MsgFuture) {
        self.clock().tasks.push(task);
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

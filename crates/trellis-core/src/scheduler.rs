//! Deferred one-shot task queue for Trellis.
//!
//! Provides [`DeferredQueue`], a manually-pumped queue of cancellable
//! one-shot callbacks. Widget controllers use it for transitions that must
//! happen "shortly after" an event rather than inside it - most notably the
//! blur-triggered dropdown close, which is delayed so that a
//! nearly-simultaneous menu-item click is processed first.
//!
//! The queue does no threading of its own: the host (or a test) decides when
//! time advances by calling [`DeferredQueue::process_expired`] or
//! [`DeferredQueue::run_due`]. Due callbacks run to completion synchronously
//! inside that call.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedulerError};

new_key_type! {
    /// A unique identifier for a scheduled task.
    pub struct TaskId;
}

/// Internal task data.
struct TaskData {
    /// When this task should fire.
    fire_at: Instant,
    /// The callback to run. Taken out of the slot when the task fires.
    callback: Option<Box<dyn FnOnce() + Send>>,
}

/// An entry in the task queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: TaskId,
    fire_at: Instant,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_at.cmp(&self.fire_at)
    }
}

#[derive(Default)]
struct QueueInner {
    /// All pending tasks.
    tasks: SlotMap<TaskId, TaskData>,
    /// Priority queue of pending fires (min-heap by fire time).
    queue: BinaryHeap<QueueEntry>,
}

/// A manually-pumped queue of cancellable one-shot tasks.
///
/// Tasks are scheduled with a delay and fire when the queue is pumped past
/// their deadline. A task that is cancelled before the pump reaches it never
/// runs. Cancelling an already-fired or unknown task is an error, so callers
/// that treat cancellation as best-effort should discard the result.
pub struct DeferredQueue {
    inner: Mutex<QueueInner>,
}

impl DeferredQueue {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner::default()),
        }
    }

    /// Schedule `callback` to run once `delay` has elapsed.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let fire_at = Instant::now() + delay;
        let mut inner = self.inner.lock();
        let id = inner.tasks.insert(TaskData {
            fire_at,
            callback: Some(Box::new(callback)),
        });
        inner.queue.push(QueueEntry { id, fire_at });
        tracing::trace!(target: "trellis_core::scheduler", ?id, ?delay, "task scheduled");
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns an error if the task is unknown, already fired, or already
    /// cancelled.
    pub fn cancel(&self, id: TaskId) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.tasks.remove(id).is_some() {
            tracing::trace!(target: "trellis_core::scheduler", ?id, "task cancelled");
            Ok(())
        } else {
            Err(SchedulerError::InvalidTaskId.into())
        }
    }

    /// Check whether a task is still pending.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.inner.lock().tasks.contains_key(id)
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    /// Get the duration until the next task fires, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        let mut inner = self.inner.lock();
        // Drop cancelled entries from the front of the queue.
        while let Some(entry) = inner.queue.peek() {
            if inner.tasks.contains_key(entry.id) {
                break;
            }
            inner.queue.pop();
        }
        inner
            .queue
            .peek()
            .map(|entry| entry.fire_at.saturating_duration_since(Instant::now()))
    }

    /// Run every task whose deadline has passed.
    ///
    /// Returns the number of tasks that fired.
    pub fn process_expired(&self) -> usize {
        self.run_due(Instant::now())
    }

    /// Run every task due at or before `now`.
    ///
    /// `now` is taken explicitly so tests and hosts with their own clock can
    /// advance time deterministically. Callbacks run outside the internal
    /// lock, so a firing task may schedule or cancel other tasks; tasks it
    /// schedules are not run until the next pump, even if already due.
    pub fn run_due(&self, now: Instant) -> usize {
        let mut due: Vec<(TaskId, Box<dyn FnOnce() + Send>)> = Vec::new();
        {
            let mut inner = self.inner.lock();
            while let Some(entry) = inner.queue.peek() {
                if entry.fire_at > now {
                    break;
                }
                let entry = *entry;
                inner.queue.pop();

                // Skip entries whose task was cancelled.
                let Some(task) = inner.tasks.get_mut(entry.id) else {
                    continue;
                };
                if let Some(callback) = task.callback.take() {
                    due.push((entry.id, callback));
                }
                inner.tasks.remove(entry.id);
            }
        }

        let count = due.len();
        for (id, callback) in due {
            tracing::trace!(target: "trellis_core::scheduler", ?id, "task fired");
            callback();
        }
        count
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(DeferredQueue: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    #[test]
    fn test_schedule_and_fire() {
        let queue = DeferredQueue::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = fired.clone();
        queue.schedule(Duration::ZERO, move || {
            fired_clone.fetch_add(1, AtomicOrdering::SeqCst);
        });

        assert_eq!(queue.pending_count(), 1);
        assert_eq!(queue.process_expired(), 1);
        assert_eq!(fired.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_not_due_yet() {
        let queue = DeferredQueue::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = fired.clone();
        let id = queue.schedule(Duration::from_secs(60), move || {
            fired_clone.fetch_add(1, AtomicOrdering::SeqCst);
        });

        assert_eq!(queue.process_expired(), 0);
        assert!(queue.is_pending(id));

        // Advancing past the deadline fires it.
        let later = Instant::now() + Duration::from_secs(120);
        assert_eq!(queue.run_due(later), 1);
        assert_eq!(fired.load(AtomicOrdering::SeqCst), 1);
        assert!(!queue.is_pending(id));
    }

    #[test]
    fn test_cancel() {
        let queue = DeferredQueue::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = fired.clone();
        let id = queue.schedule(Duration::ZERO, move || {
            fired_clone.fetch_add(1, AtomicOrdering::SeqCst);
        });

        assert!(queue.cancel(id).is_ok());
        assert_eq!(queue.process_expired(), 0);
        assert_eq!(fired.load(AtomicOrdering::SeqCst), 0);

        // Second cancel is an error.
        assert!(queue.cancel(id).is_err());
    }

    #[test]
    fn test_fire_order_by_deadline() {
        let queue = DeferredQueue::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let order_a = order.clone();
        queue.schedule(Duration::from_millis(200), move || {
            order_a.lock().push("late");
        });
        let order_b = order.clone();
        queue.schedule(Duration::from_millis(100), move || {
            order_b.lock().push("early");
        });

        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(queue.run_due(later), 2);
        assert_eq!(*order.lock(), vec!["early", "late"]);
    }

    #[test]
    fn test_time_until_next_skips_cancelled() {
        let queue = DeferredQueue::new();

        let id = queue.schedule(Duration::from_millis(10), || {});
        queue.schedule(Duration::from_secs(60), || {});

        queue.cancel(id).unwrap();
        let remaining = queue.time_until_next().expect("one task pending");
        assert!(remaining > Duration::from_secs(30));
    }

    #[test]
    fn test_task_may_schedule_from_callback() {
        let queue = Arc::new(DeferredQueue::new());
        let fired = Arc::new(AtomicUsize::new(0));

        let queue_clone = queue.clone();
        let fired_clone = fired.clone();
        queue.schedule(Duration::ZERO, move || {
            let fired_inner = fired_clone.clone();
            queue_clone.schedule(Duration::ZERO, move || {
                fired_inner.fetch_add(1, AtomicOrdering::SeqCst);
            });
        });

        // First pump runs the outer task only.
        assert_eq!(queue.process_expired(), 1);
        assert_eq!(fired.load(AtomicOrdering::SeqCst), 0);

        // Second pump runs the task scheduled from the callback.
        assert_eq!(queue.process_expired(), 1);
        assert_eq!(fired.load(AtomicOrdering::SeqCst), 1);
    }
}

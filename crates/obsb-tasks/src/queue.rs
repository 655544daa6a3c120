//! FIFO task queue shared between producers and the UI thread.

use crate::task::Task;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Ordered queue of pending tasks.
///
/// Every push and pop happens under a single lock, and tasks are never
/// run while it is held.
pub struct TaskQueue<V> {
    inner: Mutex<VecDeque<Task<V>>>,
}

impl<V> TaskQueue<V> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    // A VecDeque push/pop cannot leave the deque half-updated, so a
    // poisoned lock still guards a consistent queue.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Task<V>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a task to the tail.
    pub fn push(&self, task: Task<V>) {
        self.lock().push_back(task);
    }

    /// Remove the head, if any.
    pub fn pop(&self) -> Option<Task<V>> {
        self.lock().pop_front()
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take every queued task, leaving the queue empty.
    pub fn take_all(&self) -> VecDeque<Task<V>> {
        std::mem::take(&mut *self.lock())
    }
}

impl<V> Default for TaskQueue<V> {
    fn default() -> Self {
        Self::new()
    }
}

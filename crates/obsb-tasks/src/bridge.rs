//! Cross-thread task bridge.
//!
//! Any thread may queue work; the engine's UI thread drains it one task
//! per poll and hands the engine cooperative time slices in between.

use crate::config::{BridgeConfig, ShutdownPolicy};
use crate::platform;
use crate::pump::MessagePump;
use crate::queue::TaskQueue;
use crate::task::Task;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Hands work from arbitrary threads to the engine's UI thread.
///
/// Share it as an `Arc<TaskBridge<..>>` with every component that submits
/// or drains tasks.
pub struct TaskBridge<V, P> {
    /// Pending work, FIFO
    queue: TaskQueue<V>,
    /// The engine's message pump
    pump: P,
    config: BridgeConfig,
}

impl<V, P: MessagePump> TaskBridge<V, P> {
    /// Create a bridge with an empty queue.
    pub fn new(pump: P, config: BridgeConfig) -> Self {
        info!(
            "Task bridge ready (shutdown policy: {:?})",
            config.shutdown_policy
        );
        Self {
            queue: TaskQueue::new(),
            pump,
            config,
        }
    }

    /// Queue work with no target view.
    pub fn queue_task<F>(&self, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push(Task::plain(work));
    }

    /// Queue work against `view`.
    ///
    /// The queued task keeps `view` alive until it has run. The work should
    /// still check that the view has not been closed in the meantime.
    pub fn queue_view_task<F>(&self, view: Arc<V>, work: F)
    where
        F: FnOnce(Arc<V>) + Send + 'static,
    {
        self.queue.push(Task::for_view(view, work));
    }

    /// Run the task at the head of the queue.
    ///
    /// Must be called on the UI thread. Returns `false` immediately if the
    /// queue is empty. The queue lock is released before the task runs, so
    /// a task may queue further work.
    pub fn execute_next_task(&self) -> bool {
        self.check_ui_thread("execute_next_task");

        let Some(task) = self.queue.pop() else {
            return false;
        };
        task.run();
        true
    }

    /// Give the engine up to `max` of cooperative time.
    ///
    /// Must be called on the UI thread. At least one unit of engine work is
    /// always performed; the budget is only checked between units, so a
    /// slow unit can overrun it. A budget too large to represent as an
    /// instant only ends when the engine goes idle.
    pub fn pump_engine_loop(&self, max: Duration) {
        self.check_ui_thread("pump_engine_loop");

        let deadline = Instant::now().checked_add(max);
        let mut units = 0u32;
        loop {
            units = units.saturating_add(1);
            let more = self.pump.do_message_loop_work();
            if !more || deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
        }
        trace!("Engine pump slice ran {} unit(s)", units);
    }

    /// Whether the calling thread is the engine's UI thread.
    pub fn is_ui_thread(&self) -> bool {
        self.pump.is_ui_thread()
    }

    /// Absolute path of the running executable, empty if unknown.
    pub fn executable_path(&self) -> PathBuf {
        platform::executable_path()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Bridge configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The engine pump.
    pub fn pump(&self) -> &P {
        &self.pump
    }

    /// Apply the shutdown policy to whatever is still queued.
    ///
    /// With [`ShutdownPolicy::Drain`] this must be called on the UI thread;
    /// tasks queued by drained tasks are run too. If a task panics, the
    /// tasks behind it stay queued. Returns the number of tasks discarded
    /// without running.
    pub fn shutdown(&self) -> usize {
        match self.config.shutdown_policy {
            ShutdownPolicy::Drop => {
                let dropped = self.queue.take_all().len();
                if dropped > 0 {
                    warn!("Dropping {} pending task(s) at shutdown", dropped);
                }
                dropped
            }
            ShutdownPolicy::Drain => {
                self.check_ui_thread("shutdown");
                let mut ran = 0usize;
                while let Some(task) = self.queue.pop() {
                    task.run();
                    ran += 1;
                }
                debug!("Drained {} pending task(s) at shutdown", ran);
                0
            }
        }
    }

    fn check_ui_thread(&self, op: &str) {
        if self.config.assert_ui_thread {
            debug_assert!(
                self.pump.is_ui_thread(),
                "{} called off the engine UI thread",
                op
            );
        }
    }
}

impl<V, P> Drop for TaskBridge<V, P> {
    fn drop(&mut self) {
        let dropped = self.queue.len();
        if dropped > 0 {
            warn!("Task bridge dropped with {} pending task(s)", dropped);
        }
    }
}

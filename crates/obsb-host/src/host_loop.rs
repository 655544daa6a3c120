//! The host's per-tick update on the engine UI thread.

use obsb_tasks::{MessagePump, TaskBridge};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

/// Drains queued tasks and pumps the engine once per host tick.
pub struct HostLoop<V, P> {
    bridge: Arc<TaskBridge<V, P>>,
}

impl<V, P: MessagePump> HostLoop<V, P> {
    pub fn new(bridge: Arc<TaskBridge<V, P>>) -> Self {
        Self { bridge }
    }

    /// One host iteration: run up to `max_tasks_per_tick` tasks, then give
    /// the engine its pump slice. Returns the number of tasks run.
    pub fn tick(&self) -> usize {
        let config = self.bridge.config();
        let mut ran = 0;
        while ran < config.max_tasks_per_tick && self.bridge.execute_next_task() {
            ran += 1;
        }
        self.bridge.pump_engine_loop(config.pump_budget());
        ran
    }

    /// Run `ticks` iterations, one every `interval`. Returns tasks run.
    pub fn run(&self, ticks: u32, interval: Duration) -> usize {
        let mut total = 0;
        for n in 0..ticks {
            let started = Instant::now();
            let ran = self.tick();
            if ran > 0 {
                trace!("Tick {} ran {} task(s)", n, ran);
            }
            total += ran;

            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
        total
    }
}

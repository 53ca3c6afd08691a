//! Generation-stamped one-shot timers.
//!
//! Every scheduled action carries the queue generation it was created
//! under. `cancel_all` just bumps the generation; stale tasks stay in the
//! vector and are discarded when their countdown fires. That makes reset
//! safe against in-flight work: a round torn down mid-preview can never
//! flip cards of the round that replaced it.

use std::fmt::Debug;

use gridtap_core::constants::DT;

#[derive(Debug)]
struct DeferredTask<A> {
    generation: u64,
    remaining_secs: f64,
    action: A,
}

/// One-shot delayed actions, ticked at the fixed rate.
#[derive(Debug)]
pub struct DeferredQueue<A> {
    generation: u64,
    tasks: Vec<DeferredTask<A>>,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            generation: 0,
            tasks: Vec::new(),
        }
    }
}

impl<A: Debug> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate everything currently scheduled.
    pub fn cancel_all(&mut self) {
        self.generation += 1;
    }

    /// Schedule `action` to fire after `delay_secs` of engine time.
    /// A zero (or negative) delay fires on the next tick, never immediately.
    pub fn schedule(&mut self, delay_secs: f64, action: A) {
        self.tasks.push(DeferredTask {
            generation: self.generation,
            remaining_secs: delay_secs,
            action,
        });
    }

    /// Advance one tick and drain every task that comes due, in the order
    /// it was scheduled. Stale-generation tasks are dropped silently.
    pub fn tick(&mut self) -> Vec<A> {
        let generation = self.generation;
        let mut fired = Vec::new();
        let mut kept = Vec::with_capacity(self.tasks.len());
        for mut task in self.tasks.drain(..) {
            if task.generation != generation {
                log::trace!("dropping stale deferred action {:?}", task.action);
                continue;
            }
            task.remaining_secs -= DT;
            if task.remaining_secs > 1e-9 {
                kept.push(task);
            } else {
                fired.push(task.action);
            }
        }
        self.tasks = kept;
        fired
    }
}

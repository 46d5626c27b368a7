//! Fixed-capacity software timers polled from the main loop.

mod task;

use crate::{Error, Result};
use heapless::Vec;
pub use task::{Payload, Task, TaskId};

/// What a repeating task wants after it ran
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Repeat {
    Continue,
    Stop,
}

/// A pool of at most `N` pending tasks, fired in due-time order. Tasks due at
/// the same time fire in the order they were scheduled.
pub struct Scheduler<T: TaskId, const N: usize> {
    tasks: Vec<Task<T>, N>,
    next_sequence: u32,
}

impl<T: TaskId, const N: usize> Scheduler<T, N> {
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Run `id` once, `delay` milliseconds after `now`
    pub fn after(&mut self, now: u32, delay: u32, id: T, payload: Payload) -> Result<()> {
        self.push(Task::new(id, now.wrapping_add(delay), None, payload))
    }

    /// Run `id` every `period` milliseconds, first after one period
    pub fn every(&mut self, now: u32, period: u32, id: T, payload: Payload) -> Result<()> {
        let period = period.max(1);
        self.push(Task::new(id, now.wrapping_add(period), Some(period), payload))
    }

    /// Put a repeating task that just fired back in line, one period after
    /// `now`
    pub fn reschedule(&mut self, task: Task<T>, now: u32) -> Result<()> {
        match task.period {
            Some(period) => self.push(Task {
                timestamp: now.wrapping_add(period),
                ..task
            }),
            None => Ok(()),
        }
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Remove and return the most overdue task, if any is due
    pub fn pop_due(&mut self, now: u32) -> Option<Task<T>> {
        let mut next: Option<(usize, u32, u32)> = None;
        for (index, task) in self.tasks.iter().enumerate() {
            if let Some(overdue) = task.overdue_by(now) {
                let earlier = match next {
                    None => true,
                    Some((_, best_overdue, best_sequence)) => {
                        overdue > best_overdue
                            || (overdue == best_overdue && task.sequence < best_sequence)
                    }
                };
                if earlier {
                    next = Some((index, overdue, task.sequence));
                }
            }
        }
        next.map(|(index, _, _)| self.tasks.swap_remove(index))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: T) -> bool
    where
        T: PartialEq,
    {
        self.tasks.iter().any(|task| task.id == id)
    }

    fn push(&mut self, mut task: Task<T>) -> Result<()> {
        task.sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.tasks.push(task).map_err(|_| Error::SchedulerFull)
    }
}

impl<T: TaskId, const N: usize> Default for Scheduler<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

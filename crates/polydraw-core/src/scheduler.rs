//! Cooperative repeating tasks.
//!
//! Nothing here runs on its own: the host advances the clock with
//! [`Scheduler::advance`] and gets back the tasks that fired, then invokes
//! them on the same thread. This is how the aerosol keeps spraying while the
//! pointer is held still.

use std::time::Duration;

/// Most firings one task reports from a single [`Scheduler::advance`].
/// Firings past this are dropped and the task keeps its phase.
pub const MAX_FIRINGS_PER_ADVANCE: u32 = 100;

/// Identifies a running task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Task {
    handle: TaskHandle,
    period: Duration,
    /// Time left until the next firing.
    remaining: Duration,
}

/// A table of repeating tasks driven by an external clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a task that fires every `period`. The first firing is one period
    /// from now. A zero period is raised to one millisecond.
    pub fn start(&mut self, period: Duration) -> TaskHandle {
        let period = period.max(Duration::from_millis(1));
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.tasks.push(Task {
            handle,
            period,
            remaining: period,
        });
        handle
    }

    /// Cancel a task. Stopping an unknown or already stopped task is a no-op.
    pub fn stop(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn is_running(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Move the clock forward and collect every firing that became due, in
    /// time order. A task that is due several times appears several times,
    /// up to [`MAX_FIRINGS_PER_ADVANCE`].
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TaskHandle> {
        let mut fired: Vec<(Duration, TaskHandle)> = Vec::new();
        for task in &mut self.tasks {
            if elapsed < task.remaining {
                task.remaining -= elapsed;
                continue;
            }
            // Time left over after the first firing.
            let past = elapsed - task.remaining;
            let period = task.period.as_nanos();
            let due = (past.as_nanos() / period).saturating_add(1);
            let count = due.min(u128::from(MAX_FIRINGS_PER_ADVANCE)) as u32;
            if due > u128::from(count) {
                log::warn!("Task {:?} fell behind: dropped {} firings", task.handle, due - u128::from(count));
            }
            for n in 0..count {
                fired.push((task.remaining.saturating_add(task.period.saturating_mul(n)), task.handle));
            }
            let phase = Duration::from_nanos((past.as_nanos() % period) as u64);
            task.remaining = task.period - phase;
        }
        fired.sort_by_key(|(at, handle)| (*at, *handle));
        fired.into_iter().map(|(_, h)| h).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_every_period() {
        let mut scheduler = Scheduler::new();
        let task = scheduler.start(Duration::from_millis(40));
        assert!(scheduler.advance(Duration::from_millis(39)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![task]);
        assert_eq!(scheduler.advance(Duration::from_millis(100)), vec![task, task]);
        // 20 ms carried over from the previous advance.
        assert_eq!(scheduler.advance(Duration::from_millis(20)), vec![task]);
    }

    #[test]
    fn test_stop_cancels() {
        let mut scheduler = Scheduler::new();
        let task = scheduler.start(Duration::from_millis(10));
        assert!(scheduler.stop(task));
        assert!(!scheduler.stop(task));
        assert!(!scheduler.is_running(task));
        assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_interleaves_tasks_by_time() {
        let mut scheduler = Scheduler::new();
        let slow = scheduler.start(Duration::from_millis(30));
        let fast = scheduler.start(Duration::from_millis(20));
        assert_eq!(scheduler.advance(Duration::from_millis(60)), vec![fast, slow, fast, slow, fast]);
    }

    #[test]
    fn test_huge_advance_is_capped() {
        let mut scheduler = Scheduler::new();
        let task = scheduler.start(Duration::from_millis(40));
        let fired = scheduler.advance(Duration::from_millis(u64::MAX));
        assert_eq!(fired.len(), MAX_FIRINGS_PER_ADVANCE as usize);
        assert!(fired.iter().all(|h| *h == task));
        assert!(scheduler.is_running(task));

        // u64::MAX ms is 15 ms into a 40 ms period.
        assert!(scheduler.advance(Duration::from_millis(24)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![task]);
    }
}

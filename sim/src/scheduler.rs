//! Repeating timers driven by the frame clock.
//!
//! Timers are advanced by the same `dt` as the frame, so everything stays
//! on one thread. A timer fires at most once per `advance`; periods missed
//! during a long frame are skipped rather than replayed.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

#[derive(Debug, Clone)]
struct Timer<T> {
    handle: TimerHandle,
    period: f64,
    remaining: f64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    timers: Vec<Timer<T>>,
    next_handle: u32,
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_handle: 1,
        }
    }

    /// Register a looping timer. First fires one full period from now.
    /// Returns None for a non-positive or non-finite period.
    pub fn set_timer(&mut self, period: f64, task: T) -> Option<TimerHandle> {
        if !period.is_finite() || period <= 0.0 {
            return None;
        }
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            period,
            remaining: period,
            task,
        });
        Some(handle)
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance every timer by `dt` and return the tasks that came due,
    /// in registration order.
    pub fn advance(&mut self, dt: f64) -> Vec<T> {
        let mut due = Vec::new();
        if !dt.is_finite() || dt <= 0.0 {
            return due;
        }
        for timer in &mut self.timers {
            timer.remaining -= dt;
            if timer.remaining <= 1e-9 {
                due.push(timer.task);
                timer.remaining += timer.period;
                if timer.remaining <= 1e-9 {
                    timer.remaining = timer.period;
                }
            }
        }
        due
    }
}

impl<T: Copy> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Software timers and the kernel clock.
//!
//! Timers are one-byte countdowns bound at configuration time to one task
//! and one event mask. The application tick interrupt decrements them; a
//! countdown that reaches zero posts the bound event and goes inactive. A
//! periodic timer is simply re-armed by the task that received the event.
//!
//! Independently of the countdowns, the scheduler tick advances a free
//! running tick counter readable through [`now`].

use crate::event;
use crate::task_manager::task::{EventMask, TaskId};
use crate::task_manager::{self, critical};
use portable_atomic::{AtomicU32, AtomicU8, Ordering};

/// Timer identifier: an index into the timer table configured by the
/// application.
pub type TimerId = u8;

/// Type for counting scheduler ticks.
pub type TickType = u32;

/// Scheduler ticks elapsed since [`start_os`](crate::start_os).
static TICK_COUNTER: AtomicU32 = AtomicU32::new(0);

/// One software countdown timer.
pub struct TimerDescriptor {
    /// Ticks left until expiry. Zero means inactive.
    ticks_remaining: AtomicU8,
    /// Task that receives the expiry event.
    owner: TaskId,
    /// Event mask posted to the owner on expiry.
    event: EventMask,
}

impl TimerDescriptor {
    /// Create a timer bound to its owning task and expiry event. Timers
    /// start out inactive.
    pub const fn new(owner: TaskId, event: EventMask) -> TimerDescriptor {
        TimerDescriptor {
            ticks_remaining: AtomicU8::new(0),
            owner,
            event,
        }
    }

    /// Ticks left until expiry; zero when inactive.
    pub fn ticks_remaining(&self) -> u8 {
        self.ticks_remaining.load(Ordering::SeqCst)
    }
}

/// Arm a timer with `value` application ticks. Zero deactivates it.
pub fn set_timer(timer_id: TimerId, value: u8) {
    critical(|| {
        let timers = task_manager::timers();
        debug_assert!((timer_id as usize) < timers.len(), "no such timer");
        if let Some(timer) = timers.get(timer_id as usize) {
            timer.ticks_remaining.store(value, Ordering::SeqCst);
        }
    });
}

/// Advance one timer by one application tick.
///
/// Inactive timers are ignored. A countdown that reaches zero posts the
/// configured event to the owning task.
pub fn tick_timer(timer_id: TimerId) {
    critical(|| {
        let timers = task_manager::timers();
        debug_assert!((timer_id as usize) < timers.len(), "no such timer");
        let Some(timer) = timers.get(timer_id as usize) else {
            return;
        };
        let remaining = timer.ticks_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            let remaining = remaining - 1;
            timer.ticks_remaining.store(remaining, Ordering::SeqCst);
            if remaining == 0 {
                event::set_event(timer.owner, timer.event);
            }
        }
    });
}

/// Advance every configured timer by one application tick. This is the body
/// of the application tick interrupt.
pub extern "C" fn tick_all_timers() {
    for timer_id in 0..task_manager::timers().len() {
        tick_timer(timer_id as TimerId);
    }
}

/// Scheduler ticks since the kernel started.
pub fn now() -> TickType {
    TICK_COUNTER.load(Ordering::SeqCst)
}

pub(crate) fn advance_tick_counter() {
    TICK_COUNTER.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn reset_tick_counter() {
    TICK_COUNTER.store(0, Ordering::SeqCst);
}

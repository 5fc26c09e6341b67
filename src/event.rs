//! The event service.
//!
//! Every task owns two event bitmasks: *pending* holds the events that have
//! arrived, *awaited* the events the task has declared it waits for. Posting
//! an event a task waits on moves it from `Waiting` back to `Ready`, and
//! preempts the running task if the woken one outranks it.
//!
//! The awaited mask is sticky: waking does not clear anything. A task clears
//! the events it consumed with [`clear_events`] and nothing else touches the
//! masks on its behalf.
//!
//! [`set_event`] is the one operation that may be called from interrupt
//! context; the interrupt gate nests, so the same body serves both contexts.

use crate::ports::{Port, PortTrait};
use crate::task_manager::scheduler;
use crate::task_manager::task::{EventMask, TaskId, TaskState, EVENT_NONE};
use crate::task_manager::{self, critical};

/// Post the events in `mask` to a task.
///
/// If the task was `Waiting` and now has a pending event it waits for, it
/// becomes `Ready`; when it additionally outranks the running task, a
/// reschedule is requested so the switch happens without waiting for the
/// next regular tick.
pub fn set_event(task_id: TaskId, mask: EventMask) {
    critical(|| {
        let tasks = task_manager::tasks();
        debug_assert!((task_id as usize) < tasks.len(), "no such task");
        let Some(task) = tasks.get(task_id as usize) else {
            return;
        };
        task.post_events(mask);

        if task.state() == TaskState::Waiting
            && task.pending_events() & task.awaited_events() != EVENT_NONE
        {
            task.set_state(TaskState::Ready);
            if task.priority() > task_manager::current_task().priority() {
                scheduler::force_schedule();
            }
        }
    });
}

/// Clear the events in `mask` from the calling task's pending set.
///
/// Restricted to the task that owns the events; the awaited mask is left
/// untouched.
pub fn clear_events(mask: EventMask) {
    critical(|| {
        task_manager::current_task().retract_events(mask);
    });
}

/// Snapshot of the calling task's pending events.
///
/// The one kernel entry without a critical section: a single atomic read.
pub fn get_events() -> EventMask {
    task_manager::current_task().pending_events()
}

/// Wait until at least one event in `mask` is pending for the calling task.
///
/// The waiter mask is installed and the pending set re-checked under one
/// critical section, so an event posted between installation and blocking is
/// seen and the call does not block. A satisfied mask returns immediately
/// without rescheduling. Otherwise the task goes `Waiting` and the processor
/// is given away; the call returns once a matching event has made the task
/// `Running` again, with interrupts enabled and the masks as the waker left
/// them.
///
/// Must not be called while holding any resource, and only from task context.
pub fn wait_events(mask: EventMask) {
    debug_assert!(mask != EVENT_NONE, "waiting on no events");
    Port::enter_critical();
    let task = task_manager::current_task();
    task.install_awaited(mask);

    if task.pending_events() & mask == EVENT_NONE {
        task.set_state(TaskState::Waiting);
        // Give the processor away before blocking; the scheduler will only
        // come back to this task once a matching event is pending.
        scheduler::force_schedule();
        Port::exit_critical();

        // Runs at most once per wake-up on hardware: pending only changes
        // from an ISR, and that ISR ends in the scheduler.
        while task.pending_events() & mask == EVENT_NONE {
            core::hint::spin_loop();
        }
    } else {
        Port::exit_critical();
    }
}

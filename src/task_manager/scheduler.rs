//! The fixed-priority scheduler.
//!
//! One pass over the task table picks the highest-priority `Ready` task whose
//! required resources are all free; tasks that declared interest in an
//! occupied resource are skipped entirely. That skip is what bounds priority
//! inversion to a single critical section: no separate priority boost exists.
//!
//! The pass ends in one of three ways:
//!
//! - the current task left `Running` on its own (it is `Ready` after a
//!   preemption elsewhere, or `Waiting` after an unsatisfied wait): the
//!   candidate takes over unconditionally,
//! - the current task is still `Running`: it is preempted only by a strictly
//!   higher priority,
//! - nothing is `Ready`: the pass falls back to table entry 0, the idle task.
//!
//! [`schedule`] must run with interrupts disabled. Interrupt service routines
//! call it between saving and restoring context; kernel services reach it
//! through [`force_schedule`] from inside their own critical sections.

use crate::ports::{Port, PortTrait};
use crate::resource;
use crate::task_manager::task::TaskState;

/// Pick the task to run next and point the current-task globals at it.
///
/// Interrupts must be disabled by the caller. After the call, the descriptor
/// selected here is what the next context restore resumes.
pub(crate) fn schedule() {
    let tasks = super::tasks();
    if tasks.is_empty() {
        return;
    }
    let occupied = resource::occupied_mask();

    // Entry 0 is the idle task; it stands when nothing else is eligible.
    let mut next = 0usize;
    let mut highest = 0;
    for (index, task) in tasks.iter().enumerate() {
        if task.state() == TaskState::Ready
            && task.required_resources() & occupied == 0
            && task.priority() > highest
        {
            highest = task.priority();
            next = index;
        }
    }

    let current = super::current_task();
    match current.state() {
        // The current task left Running voluntarily (or the system is still
        // in its startup window). The candidate takes over.
        TaskState::Ready | TaskState::Waiting => {
            tasks[next].set_state(TaskState::Running);
            super::set_current(next);
        }
        // Preempt only for a strictly higher priority.
        TaskState::Running => {
            if tasks[next].priority() > current.priority() {
                current.set_state(TaskState::Ready);
                tasks[next].set_state(TaskState::Running);
                super::set_current(next);
            }
        }
    }
}

/// Request a scheduler pass as soon as possible.
///
/// On hardware this arms the scheduler tick to fire once interrupts are
/// enabled again; the mock port runs the scheduler inline. Used after every
/// state change that may have made a higher-priority task runnable.
pub fn force_schedule() {
    Port::force_schedule();
}

/// Body of the scheduler tick interrupt: advance the kernel clock, then
/// reschedule. Ports call this between saving and restoring context.
pub extern "C" fn scheduler_tick() {
    crate::timer::advance_tick_counter();
    schedule();
}

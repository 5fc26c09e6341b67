//! Keros is a tiny preemptive real-time operating system inspired by the
//! OSEK/VDX automotive standard.
//!
//! The kernel schedules a fixed set of tasks by strict priority, gates task
//! readiness on declared resources (an immediate priority-ceiling scheme
//! that bounds priority inversion to one critical section), signals tasks
//! through per-task event bitmasks and drives software countdown timers from
//! a periodic tick. Everything is configured statically: tasks, stacks and
//! timers are `'static` tables handed to [`start_os`], and nothing is
//! created or destroyed at run time.
//!
//! Hardware access lives in the `ports` layer. The AVR port switches
//! contexts from two timer interrupts on an ATmega328P; other targets get a
//! mock port, which is what the test suite drives on the host.
//!
//! # Configuration
//!
//! ```rust,no_run
//! use keros::{TaskDescriptor, TaskStack, TimerDescriptor, RESOURCE_NONE};
//!
//! const EVENT_STEP: keros::EventMask = 0x01;
//!
//! static IDLE_STACK: TaskStack<64> = TaskStack::new();
//! static WORKER_STACK: TaskStack<128> = TaskStack::new();
//!
//! fn idle() -> ! {
//!     loop {}
//! }
//!
//! fn worker() -> ! {
//!     loop {
//!         keros::wait_events(EVENT_STEP);
//!         keros::clear_events(EVENT_STEP);
//!         keros::set_timer(0, 25);
//!     }
//! }
//!
//! // The idle task comes first, at the lowest priority.
//! static TASKS: [TaskDescriptor; 2] = [
//!     TaskDescriptor::new(idle, &IDLE_STACK, 0, RESOURCE_NONE),
//!     TaskDescriptor::new(worker, &WORKER_STACK, 1, RESOURCE_NONE),
//! ];
//!
//! static TIMERS: [TimerDescriptor; 1] = [TimerDescriptor::new(1, EVENT_STEP)];
//!
//! fn main() -> ! {
//!     keros::start_os(&TASKS, &TIMERS);
//! }
//! ```

#![no_std]

pub mod event;
pub mod ports;
pub mod resource;
pub mod task_manager;
pub mod timer;

pub use event::{clear_events, get_events, set_event, wait_events};
pub use resource::{acquire_resources, release_resources, resources_occupied};
pub use task_manager::scheduler::{force_schedule, scheduler_tick};
pub use task_manager::task::{
    EventMask, ResourceMask, TaskDescriptor, TaskEntryFn, TaskId, TaskPriority, TaskStack,
    TaskState, EVENT_NONE, RESOURCE_NONE, SIZE_SAVED_CONTEXT, TASK_STACK_SIZE_MIN,
};
pub use task_manager::{
    current_task_id, disable_interrupts, enable_interrupts, enter_critical, exit_critical,
    init_os, shutdown_os, start_os,
};
pub use timer::{now, set_timer, tick_all_timers, tick_timer, TickType, TimerDescriptor, TimerId};
